//! Planar corner fillets.
//!
//! A fillet replaces the corner between two line segments with a circular
//! arc tangent to both. The tangent distance along each edge is
//! `r / tan(θ/2)` for interior angle `θ`, so the largest radius a corner
//! can take is `min(edge) * tan(θ/2)`.

use std::f64::consts::{PI, TAU};

use twistsnap_kernel_math::Point2;

use crate::FilletError;

/// Sample an arc from `start` to `end` (radians) into `segments` pieces.
///
/// Both endpoints are included. `ccw` picks the direction of travel; the
/// sweep is normalised into `[0, 2π)` in that direction.
pub fn arc_points(
    center: Point2,
    radius: f64,
    start: f64,
    end: f64,
    ccw: bool,
    segments: u32,
) -> Vec<Point2> {
    let mut delta = end - start;
    if ccw {
        while delta < 0.0 {
            delta += TAU;
        }
    } else {
        while delta > 0.0 {
            delta -= TAU;
        }
    }
    let n = segments.max(1);
    (0..=n)
        .map(|i| {
            let a = start + delta * i as f64 / n as f64;
            Point2::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect()
}

/// Interior angle at `corner` and the two unit edge directions leaving it.
fn corner_geometry(prev: &Point2, corner: &Point2, next: &Point2) -> Option<(f64, f64, f64)> {
    let l1 = (prev - corner).norm();
    let l2 = (next - corner).norm();
    if l1 < 1e-12 || l2 < 1e-12 {
        return None;
    }
    let cos = ((prev - corner).dot(&(next - corner)) / (l1 * l2)).clamp(-1.0, 1.0);
    Some((cos.acos(), l1, l2))
}

/// Largest fillet radius the corner can take without overrunning an edge.
pub fn max_corner_fillet(prev: &Point2, corner: &Point2, next: &Point2) -> f64 {
    match corner_geometry(prev, corner, next) {
        Some((theta, l1, l2)) if theta < PI - 1e-9 => l1.min(l2) * (theta / 2.0).tan(),
        Some(_) => f64::INFINITY,
        None => 0.0,
    }
}

/// Tangent distance from the corner for a given radius, or 0 when the
/// corner is straight and needs no fillet.
pub(crate) fn tangent_length(prev: &Point2, corner: &Point2, next: &Point2, radius: f64) -> f64 {
    match corner_geometry(prev, corner, next) {
        Some((theta, _, _)) if theta < PI - 1e-9 && theta > 1e-12 => radius / (theta / 2.0).tan(),
        Some((theta, _, _)) if theta <= 1e-12 => f64::INFINITY,
        _ => 0.0,
    }
}

/// Replace `corner` with a tangent arc of `radius`.
///
/// Returns the arc points from the tangent point on the incoming edge to
/// the tangent point on the outgoing edge. A zero radius or a straight
/// corner returns the corner itself.
pub fn fillet_corner(
    prev: &Point2,
    corner: &Point2,
    next: &Point2,
    radius: f64,
    segments: u32,
) -> Result<Vec<Point2>, FilletError> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(FilletError::InvalidRadius(radius));
    }
    if radius == 0.0 {
        return Ok(vec![*corner]);
    }
    let Some((theta, l1, l2)) = corner_geometry(prev, corner, next) else {
        return Ok(vec![*corner]);
    };
    if theta >= PI - 1e-9 {
        return Ok(vec![*corner]);
    }

    let max = l1.min(l2) * (theta / 2.0).tan();
    if radius > max + 1e-12 {
        return Err(FilletError::TooLarge { radius, max });
    }

    let u1 = (prev - corner) / l1;
    let u2 = (next - corner) / l2;
    let t = radius / (theta / 2.0).tan();
    let p1 = corner + u1 * t;
    let p2 = corner + u2 * t;
    let bisector = (u1 + u2).normalize();
    let center = corner + bisector * (radius / (theta / 2.0).sin());

    let d_in = corner - prev;
    let d_out = next - corner;
    let ccw = d_in.x * d_out.y - d_in.y * d_out.x > 0.0;

    let a1 = (p1.y - center.y).atan2(p1.x - center.x);
    let a2 = (p2.y - center.y).atan2(p2.x - center.x);
    Ok(arc_points(center, radius, a1, a2, ccw, segments))
}
