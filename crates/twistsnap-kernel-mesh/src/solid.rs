//! Closed polygon-soup solids and their mass properties.

use std::collections::HashMap;

use twistsnap_kernel_math::{Point3, Transform, Vec3};

use crate::{Aabb, MeshError, Polygon, TriangleMesh};

/// Grid size used to weld vertices when building a mesh (mm).
const WELD_QUANTUM: f64 = 1e-6;

/// A closed solid represented as convex planar polygons.
///
/// Polygons are wound counter-clockwise when seen from outside, so every
/// plane normal points out of the material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solid {
    polygons: Vec<Polygon>,
}

impl Solid {
    /// The empty solid.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap a list of polygons.
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    /// Build from indexed triangles, dropping degenerate ones.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::IndexOutOfRange`] if a triangle names a point
    /// past the end of `points`.
    pub fn from_triangles(
        points: &[Point3],
        triangles: &[[usize; 3]],
    ) -> Result<Self, MeshError> {
        let mut polygons = Vec::with_capacity(triangles.len());
        for (triangle, t) in triangles.iter().enumerate() {
            let corner = |index: usize| {
                points.get(index).copied().ok_or(MeshError::IndexOutOfRange {
                    triangle,
                    index,
                    points: points.len(),
                })
            };
            let vertices = vec![corner(t[0])?, corner(t[1])?, corner(t[2])?];
            polygons.extend(Polygon::new(vertices));
        }
        Ok(Self { polygons })
    }

    /// Borrow the polygons.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Take the polygons.
    pub fn into_polygons(self) -> Vec<Polygon> {
        self.polygons
    }

    /// True if the solid has no faces.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Number of polygons.
    pub fn num_polygons(&self) -> usize {
        self.polygons.len()
    }

    /// Concatenate two solids. Only correct when they do not overlap.
    pub fn merge(mut self, other: Solid) -> Solid {
        self.polygons.extend(other.polygons);
        self
    }

    /// Apply an affine transform.
    pub fn transform(&self, t: &Transform) -> Solid {
        Solid {
            polygons: self
                .polygons
                .iter()
                .filter_map(|p| p.transformed(t))
                .collect(),
        }
    }

    /// Translate by `(dx, dy, dz)`.
    pub fn translate(&self, dx: f64, dy: f64, dz: f64) -> Solid {
        self.transform(&Transform::translation(dx, dy, dz))
    }

    /// Rotate by Euler angles in degrees (X, then Y, then Z).
    pub fn rotate_deg(&self, x: f64, y: f64, z: f64) -> Solid {
        self.transform(&Transform::rotation_euler_deg(x, y, z))
    }

    /// Scale by `(sx, sy, sz)`.
    pub fn scale(&self, sx: f64, sy: f64, sz: f64) -> Solid {
        self.transform(&Transform::scale(sx, sy, sz))
    }

    /// Axis-aligned bounds, or `None` when empty.
    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(self.polygons.iter().flat_map(|p| p.vertices()))
    }

    /// Enclosed volume by the divergence theorem.
    pub fn volume(&self) -> f64 {
        self.polygons
            .iter()
            .flat_map(|p| p.fan())
            .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)) / 6.0)
            .sum()
    }

    /// Total face area.
    pub fn surface_area(&self) -> f64 {
        self.polygons.iter().map(Polygon::area).sum()
    }

    /// Centre of mass assuming uniform density, or `None` for zero volume.
    pub fn center_of_mass(&self) -> Option<Point3> {
        let mut volume = 0.0;
        let mut moment = Vec3::zeros();
        for [a, b, c] in self.polygons.iter().flat_map(|p| p.fan()) {
            let v = a.coords.dot(&b.coords.cross(&c.coords)) / 6.0;
            volume += v;
            moment += (a.coords + b.coords + c.coords) * (v / 4.0);
        }
        if volume.abs() < 1e-12 {
            return None;
        }
        Some(Point3::from(moment / volume))
    }

    /// Fan-triangulate and weld into an indexed mesh.
    ///
    /// Normals are area-weighted averages of the adjacent faces.
    pub fn to_mesh(&self) -> TriangleMesh {
        let mut mesh = TriangleMesh::new();
        let mut index: HashMap<[i64; 3], u32> = HashMap::new();
        let mut normals: Vec<Vec3> = Vec::new();

        for poly in &self.polygons {
            for tri in poly.fan() {
                let ids = tri.map(|p| {
                    let key = [
                        (p.x / WELD_QUANTUM).round() as i64,
                        (p.y / WELD_QUANTUM).round() as i64,
                        (p.z / WELD_QUANTUM).round() as i64,
                    ];
                    *index.entry(key).or_insert_with(|| {
                        mesh.vertices
                            .extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
                        normals.push(Vec3::zeros());
                        (normals.len() - 1) as u32
                    })
                });
                if ids[0] == ids[1] || ids[1] == ids[2] || ids[0] == ids[2] {
                    continue;
                }
                let weighted = (tri[1] - tri[0]).cross(&(tri[2] - tri[0]));
                for &i in &ids {
                    normals[i as usize] += weighted;
                }
                mesh.indices.extend_from_slice(&ids);
            }
        }

        mesh.normals = normals
            .iter()
            .flat_map(|n| {
                let n = n.try_normalize(1e-15).unwrap_or_else(Vec3::z);
                [n.x as f32, n.y as f32, n.z as f32]
            })
            .collect();
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make_box;
    use approx::assert_relative_eq;

    #[test]
    fn test_box_mass_properties() {
        let b = make_box(2.0, 3.0, 4.0).unwrap();
        assert_relative_eq!(b.volume(), 24.0, epsilon = 1e-9);
        assert_relative_eq!(b.surface_area(), 52.0, epsilon = 1e-9);
        let com = b.center_of_mass().unwrap();
        assert_relative_eq!(com.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(com.y, 1.5, epsilon = 1e-9);
        assert_relative_eq!(com.z, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mirror_preserves_positive_volume() {
        let b = make_box(1.0, 1.0, 1.0).unwrap();
        let m = b.scale(-1.0, 1.0, 1.0);
        assert_relative_eq!(m.volume(), 1.0, epsilon = 1e-9);
        let bbox = m.bounding_box().unwrap();
        assert_relative_eq!(bbox.min.x, -1.0);
    }

    #[test]
    fn test_to_mesh_welds_shared_corners() {
        let mesh = make_box(1.0, 1.0, 1.0).unwrap().to_mesh();
        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_triangles(), 12);
        assert_eq!(mesh.normals.len(), mesh.vertices.len());
    }

    #[test]
    fn test_empty_solid() {
        let s = Solid::empty();
        assert!(s.is_empty());
        assert!(s.bounding_box().is_none());
        assert!(s.center_of_mass().is_none());
        assert_eq!(s.volume(), 0.0);
    }

    #[test]
    fn test_from_triangles_drops_degenerate() {
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let s = Solid::from_triangles(&pts, &[[0, 1, 2], [0, 1, 3]]).unwrap();
        assert_eq!(s.num_polygons(), 1);
    }

    #[test]
    fn test_from_triangles_rejects_missing_points() {
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let err = Solid::from_triangles(&pts, &[[0, 1, 2], [0, 2, 3]]).unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOutOfRange {
                triangle: 1,
                index: 3,
                points: 3
            }
        );
    }
}
