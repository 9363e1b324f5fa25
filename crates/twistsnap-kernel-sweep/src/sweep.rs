//! Sweep operation: move a profile along a circular path about the Z axis.

use std::f64::consts::TAU;

use twistsnap_kernel_math::{Point2, Point3};
use twistsnap_kernel_mesh::{Polygon, Solid};

use crate::extrude::cap_polygons;
use crate::{Profile2d, SweepError};

/// Sweep a profile around the Z axis from `start_angle` to `end_angle`.
///
/// The profile is given in `(radial, z)` coordinates, i.e. the half-plane
/// that contains the axis. This is the profile carried along a horizontal
/// circular path: its local x runs along the radius and local y along +Z.
/// Angles are radians; the order of the two angles does not matter.
///
/// Consecutive stations are joined by planar trapezoids, so `segments`
/// controls how closely the solid follows the arc.
///
/// # Errors
///
/// Fails if the profile crosses the axis (`radial < 0`), or if the sweep is
/// zero or wider than a full turn. A full turn closes on itself and has no
/// end caps.
pub fn sweep_arc(
    profile: &Profile2d,
    start_angle: f64,
    end_angle: f64,
    segments: u32,
) -> Result<Solid, SweepError> {
    let (lo, hi) = if start_angle <= end_angle {
        (start_angle, end_angle)
    } else {
        (end_angle, start_angle)
    };
    let span = hi - lo;
    if !(span > 1e-12) || span > TAU + 1e-12 {
        return Err(SweepError::InvalidSweepAngle(end_angle - start_angle));
    }
    if profile.points().iter().any(|p| p.x < 0.0) {
        return Err(SweepError::InvalidProfile(
            "swept profile crosses the axis".into(),
        ));
    }

    let profile = profile.to_ccw();
    let pts = profile.points();
    let n = pts.len();
    let steps = segments.max(1) as usize;

    let place = |p: &Point2, angle: f64| Point3::new(p.x * angle.cos(), p.x * angle.sin(), p.y);
    let full_turn = (span - TAU).abs() <= 1e-12;
    let mut stations: Vec<Vec<Point3>> = (0..=steps)
        .map(|i| {
            let a = lo + span * i as f64 / steps as f64;
            pts.iter().map(|p| place(p, a)).collect()
        })
        .collect();
    if full_turn {
        stations[steps] = stations[0].clone();
    }

    let mut polygons = Vec::with_capacity(n * steps + 2);
    for s in 0..steps {
        let (here, there) = (&stations[s], &stations[s + 1]);
        for i in 0..n {
            let j = (i + 1) % n;
            polygons.extend(Polygon::new(vec![here[i], there[i], there[j], here[j]]));
        }
    }

    if !full_turn {
        // A CCW (radial, z) profile faces back along the sweep, which is
        // outward at the start station.
        polygons.extend(cap_polygons(&profile, |p| place(p, lo), false));
        polygons.extend(cap_polygons(&profile, |p| place(p, hi), true));
    }
    Ok(Solid::from_polygons(polygons))
}
