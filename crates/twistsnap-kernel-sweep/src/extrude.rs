//! Linear extrusion of a profile along +Z.

use twistsnap_kernel_math::{Point2, Point3};
use twistsnap_kernel_mesh::{ear_clip, Polygon, Solid};

use crate::{Profile2d, SweepError};

/// Cap polygons for a counter-clockwise profile mapped into 3D.
///
/// Convex profiles become one polygon, others are ear-clipped. With
/// `reverse` set the caps face the opposite way.
pub(crate) fn cap_polygons(
    profile: &Profile2d,
    map: impl Fn(&Point2) -> Point3,
    reverse: bool,
) -> Vec<Polygon> {
    let pts = profile.points();
    if profile.is_convex() {
        let mut loop3: Vec<Point3> = pts.iter().map(&map).collect();
        if reverse {
            loop3.reverse();
        }
        return Polygon::new(loop3).into_iter().collect();
    }
    ear_clip(pts)
        .into_iter()
        .filter_map(|[a, b, c]| {
            let tri = if reverse { [a, c, b] } else { [a, b, c] };
            Polygon::new(tri.iter().map(|&i| map(&pts[i])).collect())
        })
        .collect()
}

/// Extrude a profile in the XY plane from `z0` to `z1`.
pub fn extrude(profile: &Profile2d, z0: f64, z1: f64) -> Result<Solid, SweepError> {
    if !(z1 > z0) {
        return Err(SweepError::InvalidExtent(z0, z1));
    }
    let profile = profile.to_ccw();
    let pts = profile.points();
    let n = pts.len();

    let mut polygons = Vec::with_capacity(n + 2);
    for i in 0..n {
        let a = &pts[i];
        let b = &pts[(i + 1) % n];
        polygons.extend(Polygon::new(vec![
            Point3::new(a.x, a.y, z0),
            Point3::new(b.x, b.y, z0),
            Point3::new(b.x, b.y, z1),
            Point3::new(a.x, a.y, z1),
        ]));
    }
    polygons.extend(cap_polygons(&profile, |p| Point3::new(p.x, p.y, z1), false));
    polygons.extend(cap_polygons(&profile, |p| Point3::new(p.x, p.y, z0), true));
    Ok(Solid::from_polygons(polygons))
}
