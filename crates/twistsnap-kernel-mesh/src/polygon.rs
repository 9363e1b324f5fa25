//! Planar convex polygons and plane splitting.

use twistsnap_kernel_math::{Point3, Transform, Vec3};

/// Loops whose Newell area falls below this are treated as degenerate.
const MIN_AREA: f64 = 1e-12;

/// An oriented plane `normal · p = w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal.
    pub normal: Vec3,
    /// Offset along the normal.
    pub w: f64,
}

impl Plane {
    /// Plane through three points, oriented by their winding.
    pub fn from_points(a: &Point3, b: &Point3, c: &Point3) -> Option<Self> {
        let n = (b - a).cross(&(c - a));
        let len = n.norm();
        if len < MIN_AREA {
            return None;
        }
        let normal = n / len;
        Some(Self {
            normal,
            w: normal.dot(&a.coords),
        })
    }

    /// Best-fit plane of a closed loop using Newell's method.
    pub fn from_loop(points: &[Point3]) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }
        let n = newell_normal(points);
        let len = n.norm();
        if len < MIN_AREA {
            return None;
        }
        let normal = n / len;
        let centroid = points
            .iter()
            .fold(Vec3::zeros(), |acc, p| acc + p.coords)
            / points.len() as f64;
        Some(Self {
            normal,
            w: normal.dot(&centroid),
        })
    }

    /// Same plane facing the other way.
    pub fn flip(&self) -> Self {
        Self {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Signed distance of `p` from the plane (positive in front).
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        self.normal.dot(&p.coords) - self.w
    }
}

/// Unnormalised Newell normal; its length is twice the loop area.
fn newell_normal(points: &[Point3]) -> Vec3 {
    let mut n = Vec3::zeros();
    for (i, a) in points.iter().enumerate() {
        let b = &points[(i + 1) % points.len()];
        n.x += (a.y - b.y) * (a.z + b.z);
        n.y += (a.z - b.z) * (a.x + b.x);
        n.z += (a.x - b.x) * (a.y + b.y);
    }
    n
}

/// Result of splitting a polygon by a plane.
#[derive(Debug, Clone)]
pub enum Split {
    /// Coplanar with the plane and facing the same way.
    CoplanarFront(Polygon),
    /// Coplanar with the plane and facing the opposite way.
    CoplanarBack(Polygon),
    /// Entirely in front of the plane.
    Front(Polygon),
    /// Entirely behind the plane.
    Back(Polygon),
    /// Crosses the plane; either piece may vanish if it degenerates.
    Spanning {
        /// Piece in front of the plane.
        front: Option<Polygon>,
        /// Piece behind the plane.
        back: Option<Polygon>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    On,
    Front,
    Back,
}

/// A convex planar polygon, counter-clockwise when seen from its front.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point3>,
    plane: Plane,
}

impl Polygon {
    /// Build a polygon from a loop, or `None` if it is degenerate.
    pub fn new(vertices: Vec<Point3>) -> Option<Self> {
        let plane = Plane::from_loop(&vertices)?;
        Some(Self { vertices, plane })
    }

    /// Build a polygon that lies on a known plane.
    ///
    /// Used for split fragments, which stay on their parent's plane even
    /// when their first three vertices are nearly collinear.
    pub fn with_plane(vertices: Vec<Point3>, plane: Plane) -> Option<Self> {
        if vertices.len() < 3 || newell_normal(&vertices).norm() < MIN_AREA {
            return None;
        }
        Some(Self { vertices, plane })
    }

    /// Vertices in winding order.
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Supporting plane.
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Polygon area.
    pub fn area(&self) -> f64 {
        newell_normal(&self.vertices).norm() * 0.5
    }

    /// Reverse winding and plane in place.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane = self.plane.flip();
    }

    /// Apply a transform, reversing winding when it mirrors.
    pub fn transformed(&self, t: &Transform) -> Option<Self> {
        let mut vertices: Vec<Point3> = self.vertices.iter().map(|p| t.apply_point(p)).collect();
        if t.is_mirroring() {
            vertices.reverse();
        }
        Self::new(vertices)
    }

    /// Fan triangles `(0, i, i + 1)` over the loop.
    pub fn fan(&self) -> impl Iterator<Item = [&Point3; 3]> + '_ {
        (1..self.vertices.len() - 1)
            .map(move |i| [&self.vertices[0], &self.vertices[i], &self.vertices[i + 1]])
    }

    /// Classify and, if needed, cut this polygon by `plane`.
    ///
    /// Vertices within `eps` of the plane count as on it. Fragments of a
    /// spanning polygon keep this polygon's plane.
    pub fn split(self, plane: &Plane, eps: f64) -> Split {
        let sides: Vec<Side> = self
            .vertices
            .iter()
            .map(|v| {
                let t = plane.signed_distance(v);
                if t < -eps {
                    Side::Back
                } else if t > eps {
                    Side::Front
                } else {
                    Side::On
                }
            })
            .collect();

        let any_front = sides.contains(&Side::Front);
        let any_back = sides.contains(&Side::Back);

        match (any_front, any_back) {
            (false, false) => {
                if plane.normal.dot(&self.plane.normal) > 0.0 {
                    Split::CoplanarFront(self)
                } else {
                    Split::CoplanarBack(self)
                }
            }
            (true, false) => Split::Front(self),
            (false, true) => Split::Back(self),
            (true, true) => {
                let n = self.vertices.len();
                let mut f = Vec::with_capacity(n + 1);
                let mut b = Vec::with_capacity(n + 1);
                for i in 0..n {
                    let j = (i + 1) % n;
                    let (ti, tj) = (sides[i], sides[j]);
                    let (vi, vj) = (&self.vertices[i], &self.vertices[j]);
                    if ti != Side::Back {
                        f.push(*vi);
                    }
                    if ti != Side::Front {
                        b.push(*vi);
                    }
                    let crosses = matches!(
                        (ti, tj),
                        (Side::Front, Side::Back) | (Side::Back, Side::Front)
                    );
                    if crosses {
                        let t = (plane.w - plane.normal.dot(&vi.coords))
                            / plane.normal.dot(&(vj - vi));
                        let v = vi + (vj - vi) * t;
                        f.push(v);
                        b.push(v);
                    }
                }
                Split::Spanning {
                    front: Self::with_plane(f, self.plane),
                    back: Self::with_plane(b, self.plane),
                }
            }
        }
    }
}
