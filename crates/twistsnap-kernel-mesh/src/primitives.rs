//! Primitive solids: box, cylinder, cone.

use std::f64::consts::TAU;

use twistsnap_kernel_math::Point3;

use crate::{MeshError, Polygon, Solid};

/// Axis-aligned box from the origin to `(sx, sy, sz)`.
pub fn make_box(sx: f64, sy: f64, sz: f64) -> Result<Solid, MeshError> {
    MeshError::check_positive("box x size", sx)?;
    MeshError::check_positive("box y size", sy)?;
    MeshError::check_positive("box z size", sz)?;

    let p = |x: f64, y: f64, z: f64| Point3::new(x * sx, y * sy, z * sz);
    let faces = [
        // -Z, +Z
        [p(0., 0., 0.), p(0., 1., 0.), p(1., 1., 0.), p(1., 0., 0.)],
        [p(0., 0., 1.), p(1., 0., 1.), p(1., 1., 1.), p(0., 1., 1.)],
        // -Y, +Y
        [p(0., 0., 0.), p(1., 0., 0.), p(1., 0., 1.), p(0., 0., 1.)],
        [p(0., 1., 0.), p(0., 1., 1.), p(1., 1., 1.), p(1., 1., 0.)],
        // -X, +X
        [p(0., 0., 0.), p(0., 0., 1.), p(0., 1., 1.), p(0., 1., 0.)],
        [p(1., 0., 0.), p(1., 1., 0.), p(1., 1., 1.), p(1., 0., 1.)],
    ];
    Ok(Solid::from_polygons(
        faces
            .into_iter()
            .filter_map(|f| Polygon::new(f.to_vec()))
            .collect(),
    ))
}

/// Cylinder of `radius` along +Z from z = 0 to z = `height`.
pub fn make_cylinder(radius: f64, height: f64, segments: u32) -> Result<Solid, MeshError> {
    MeshError::check_positive("cylinder radius", radius)?;
    make_cone(radius, radius, height, segments)
}

/// Truncated cone along +Z from z = 0 to z = `height`.
///
/// Either radius may be zero for a pointed cone, but not both.
pub fn make_cone(
    r_bottom: f64,
    r_top: f64,
    height: f64,
    segments: u32,
) -> Result<Solid, MeshError> {
    MeshError::check_segments(segments)?;
    MeshError::check_positive("cone height", height)?;
    for (name, r) in [("cone bottom radius", r_bottom), ("cone top radius", r_top)] {
        if !r.is_finite() || r < 0.0 {
            return Err(MeshError::InvalidDimension { name, value: r });
        }
    }
    MeshError::check_positive("cone radius", r_bottom.max(r_top))?;

    let n = segments as usize;
    let ring = |r: f64, z: f64| -> Vec<Point3> {
        (0..n)
            .map(|k| {
                let a = TAU * k as f64 / n as f64;
                Point3::new(r * a.cos(), r * a.sin(), z)
            })
            .collect()
    };
    let bottom = ring(r_bottom, 0.0);
    let top = ring(r_top, height);

    let mut polygons = Vec::with_capacity(n + 2);
    for k in 0..n {
        let j = (k + 1) % n;
        let side = if r_top == 0.0 {
            vec![bottom[k], bottom[j], top[0]]
        } else if r_bottom == 0.0 {
            vec![bottom[0], top[j], top[k]]
        } else {
            vec![bottom[k], bottom[j], top[j], top[k]]
        };
        polygons.extend(Polygon::new(side));
    }
    if r_top > 0.0 {
        polygons.extend(Polygon::new(top));
    }
    if r_bottom > 0.0 {
        polygons.extend(Polygon::new(bottom.into_iter().rev().collect()));
    }
    Ok(Solid::from_polygons(polygons))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    /// Volume of the inscribed regular polygon prism.
    fn prism_volume(r: f64, h: f64, n: u32) -> f64 {
        0.5 * n as f64 * r * r * (TAU / n as f64).sin() * h
    }

    #[test]
    fn test_box_outward() {
        let b = make_box(1.0, 2.0, 3.0).unwrap();
        assert_eq!(b.num_polygons(), 6);
        assert_relative_eq!(b.volume(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cylinder_volume_matches_prism() {
        let c = make_cylinder(5.0, 4.0, 32).unwrap();
        assert_relative_eq!(c.volume(), prism_volume(5.0, 4.0, 32), epsilon = 1e-9);
        assert!(c.volume() < PI * 25.0 * 4.0);
        let bbox = c.bounding_box().unwrap();
        assert_relative_eq!(bbox.min.z, 0.0);
        assert_relative_eq!(bbox.max.z, 4.0);
        assert_relative_eq!(bbox.max.x, 5.0);
    }

    #[test]
    fn test_cone_to_apex() {
        let c = make_cone(3.0, 0.0, 6.0, 48).unwrap();
        assert_eq!(c.num_polygons(), 49);
        assert_relative_eq!(c.volume(), prism_volume(3.0, 6.0, 48) / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_frustum_volume() {
        let n = 64;
        let (r1, r2, h) = (2.0, 1.0, 3.0);
        let a1 = prism_volume(r1, 1.0, n);
        let a2 = prism_volume(r2, 1.0, n);
        let expected = h / 3.0 * (a1 + a2 + (a1 * a2).sqrt());
        let c = make_cone(r1, r2, h, n).unwrap();
        assert_relative_eq!(c.volume(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            make_cylinder(0.0, 1.0, 16),
            Err(MeshError::InvalidDimension { .. })
        ));
        assert!(matches!(
            make_cylinder(1.0, 1.0, 2),
            Err(MeshError::TooFewSegments(2))
        ));
        assert!(make_cone(0.0, 0.0, 1.0, 16).is_err());
        assert!(make_box(1.0, -1.0, 1.0).is_err());
    }
}
