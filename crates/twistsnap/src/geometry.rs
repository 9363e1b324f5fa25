//! Small geometric helpers shared by the connector and socket builders.

use std::f64::consts::TAU;

/// Arc scale of a socket channel past the tab's trailing side, and of the
/// entry channel on both sides.
pub const CHANNEL_CLEARANCE: f64 = 1.1;

/// Arc scale of the twist channel on the tab's leading side.
pub const TWIST_CHANNEL_LEAD: f64 = 3.1;

/// Point on a circle of `radius` at `angle_deg` (degrees from +X).
pub fn angular_intersection(radius: f64, angle_deg: f64) -> (f64, f64) {
    let a = angle_deg.to_radians();
    (radius * a.cos(), radius * a.sin())
}

/// Angular extent of a tab or channel, in degrees.
///
/// A full circle trimmed by `arc_percentage / 200` of its length on each
/// side of +X (scaled by `lead` before and `trail` after), then rotated by
/// `rotation_deg`.
pub fn arc_span(arc_percentage: f64, lead: f64, trail: f64, rotation_deg: f64) -> (f64, f64) {
    let half = 360.0 * arc_percentage / 200.0;
    (rotation_deg - half * lead, rotation_deg + half * trail)
}

/// Requested fillet radius, limited to what the geometry can take.
pub fn clamp_fillet_radius(requested: f64, maximum: f64) -> f64 {
    requested.min(maximum)
}

/// Largest value in `[0, upper]` the predicate accepts, found by bisection.
///
/// Assumes the accepted values form an interval starting at zero. Returns
/// `upper` straight away when it is accepted, and `0.0` when nothing is.
pub fn max_feasible(upper: f64, iterations: u32, mut accepts: impl FnMut(f64) -> bool) -> f64 {
    if accepts(upper) {
        return upper;
    }
    let (mut lo, mut hi) = (0.0, upper);
    for _ in 0..iterations {
        let mid = 0.5 * (lo + hi);
        if accepts(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Segment count for a partial sweep, in proportion to a full circle.
pub fn segments_for_sweep(sweep_rad: f64, circle_segments: u32) -> u32 {
    let n = (circle_segments as f64 * sweep_rad.abs() / TAU).ceil();
    (n as u32).max(2)
}
