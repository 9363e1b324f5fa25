//! Loft operation: create a solid by interpolating between horizontal sections.

use twistsnap_kernel_math::Point3;
use twistsnap_kernel_mesh::{Polygon, Solid};

use crate::extrude::cap_polygons;
use crate::{Profile2d, SweepError};

/// Options for the loft operation.
#[derive(Debug, Clone, Copy)]
pub struct LoftOptions {
    /// Number of polar samples per section.
    pub samples: u32,
}

impl Default for LoftOptions {
    fn default() -> Self {
        Self { samples: 64 }
    }
}

/// Ruled loft between horizontal sections at increasing heights.
///
/// Every section is resampled with [`Profile2d::resample_polar`] so that
/// vertex `k` of each ring sits on the same ray from the Z axis. Adjacent
/// rings are joined by quads, or by two triangles where the quad is not
/// planar.
///
/// # Errors
///
/// Returns an error if:
/// * fewer than 2 sections are provided
/// * heights are not strictly increasing
/// * a section is not star-shaped about the Z axis
pub fn loft(sections: &[(Profile2d, f64)], options: LoftOptions) -> Result<Solid, SweepError> {
    if sections.len() < 2 {
        return Err(SweepError::TooFewProfiles(sections.len()));
    }
    for w in sections.windows(2) {
        if !(w[1].1 > w[0].1) {
            return Err(SweepError::InvalidExtent(w[0].1, w[1].1));
        }
    }

    let resampled = sections
        .iter()
        .map(|(p, z)| Ok((p.resample_polar(options.samples)?, *z)))
        .collect::<Result<Vec<_>, SweepError>>()?;
    let rings: Vec<Vec<Point3>> = resampled
        .iter()
        .map(|(p, z)| p.points().iter().map(|q| Point3::new(q.x, q.y, *z)).collect())
        .collect();

    let n = options.samples as usize;
    let mut polygons = Vec::new();
    for w in rings.windows(2) {
        let (lower, upper) = (&w[0], &w[1]);
        for k in 0..n {
            let j = (k + 1) % n;
            let quad = [lower[k], lower[j], upper[j], upper[k]];
            if is_planar(&quad) {
                polygons.extend(Polygon::new(quad.to_vec()));
            } else {
                polygons.extend(Polygon::new(vec![quad[0], quad[1], quad[2]]));
                polygons.extend(Polygon::new(vec![quad[0], quad[2], quad[3]]));
            }
        }
    }

    let (first, z0) = &resampled[0];
    let (last, z1) = &resampled[resampled.len() - 1];
    polygons.extend(cap_polygons(first, |p| Point3::new(p.x, p.y, *z0), true));
    polygons.extend(cap_polygons(last, |p| Point3::new(p.x, p.y, *z1), false));
    Ok(Solid::from_polygons(polygons))
}

fn is_planar(quad: &[Point3; 4]) -> bool {
    let n = (quad[1] - quad[0]).cross(&(quad[2] - quad[0]));
    let len = n.norm();
    if len < 1e-15 {
        return false;
    }
    (n / len).dot(&(quad[3] - quad[0])).abs() < 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use twistsnap_kernel_mesh::{make_cone, make_cylinder};

    #[test]
    fn test_loft_circles_matches_cone() {
        let lower = Profile2d::circle(3.0, 32).unwrap();
        let upper = Profile2d::circle(1.5, 32).unwrap();
        let s = loft(&[(lower, 0.0), (upper, 4.0)], LoftOptions { samples: 32 }).unwrap();
        let cone = make_cone(3.0, 1.5, 4.0, 32).unwrap();
        assert_relative_eq!(s.volume(), cone.volume(), epsilon = 1e-9);
        assert_eq!(s.num_polygons(), 34);
    }

    #[test]
    fn test_loft_hexagon_to_circle() {
        let hex = Profile2d::regular_polygon(7.0, 6, 20.0)
            .unwrap()
            .fillet_vertices(1.0, 4)
            .unwrap();
        let circle = Profile2d::circle(7.0, 48).unwrap();
        let s = loft(&[(hex, 0.0), (circle, 10.0)], LoftOptions { samples: 48 }).unwrap();
        let cyl = make_cylinder(7.0, 10.0, 48).unwrap();
        assert!(s.volume() > 0.0);
        assert!(s.volume() < cyl.volume());
        let bbox = s.bounding_box().unwrap();
        assert_relative_eq!(bbox.max.z, 10.0);
    }

    #[test]
    fn test_loft_errors() {
        let c = Profile2d::circle(1.0, 8).unwrap();
        assert!(matches!(
            loft(&[(c.clone(), 0.0)], LoftOptions::default()),
            Err(SweepError::TooFewProfiles(1))
        ));
        assert!(matches!(
            loft(&[(c.clone(), 1.0), (c, 0.0)], LoftOptions::default()),
            Err(SweepError::InvalidExtent(..))
        ));
    }
}
