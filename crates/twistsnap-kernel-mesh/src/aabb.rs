//! Axis-aligned bounding boxes.

use twistsnap_kernel_math::{Point3, Vec3};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb {
    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bbox = Self {
            min: first,
            max: first,
        };
        for p in iter {
            bbox.include(p);
        }
        Some(bbox)
    }

    /// Grow the box to contain `p`.
    pub fn include(&mut self, p: &Point3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Union of two boxes.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// True when the boxes overlap by more than `eps` on every axis.
    ///
    /// Boxes that only touch do not overlap.
    pub fn overlaps(&self, other: &Aabb, eps: f64) -> bool {
        (0..3).all(|i| self.min[i] < other.max[i] - eps && other.min[i] < self.max[i] - eps)
    }

    /// Edge lengths along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Box centre.
    pub fn center(&self) -> Point3 {
        Point3::from((self.min.coords + self.max.coords) * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let pts = [
            Point3::new(1.0, -2.0, 0.0),
            Point3::new(-1.0, 4.0, 3.0),
            Point3::new(0.0, 0.0, -1.0),
        ];
        let bbox = Aabb::from_points(&pts).unwrap();
        assert_eq!(bbox.min, Point3::new(-1.0, -2.0, -1.0));
        assert_eq!(bbox.max, Point3::new(1.0, 4.0, 3.0));
        assert_eq!(bbox.center(), Point3::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn test_empty_has_no_box() {
        assert!(Aabb::from_points(&Vec::<Point3>::new()).is_none());
    }

    #[test]
    fn test_touching_boxes_do_not_overlap() {
        let a = Aabb {
            min: Point3::new(0.0, 0.0, 0.0),
            max: Point3::new(1.0, 1.0, 1.0),
        };
        let b = Aabb {
            min: Point3::new(1.0, 0.0, 0.0),
            max: Point3::new(2.0, 1.0, 1.0),
        };
        let c = Aabb {
            min: Point3::new(0.5, 0.5, 0.5),
            max: Point3::new(2.0, 2.0, 2.0),
        };
        assert!(!a.overlaps(&b, 1e-9));
        assert!(a.overlaps(&c, 1e-9));
        assert_eq!(a.union(&b).max.x, 2.0);
    }
}
