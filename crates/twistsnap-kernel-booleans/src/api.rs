//! Public API types and entry point for boolean operations.

use rayon::prelude::*;
use tracing::debug;
use twistsnap_kernel_math::Tolerance;
use twistsnap_kernel_mesh::Solid;

use crate::bsp::BspTree;

/// CSG boolean operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    /// Union: combine both solids.
    Union,
    /// Difference: subtract the tool from the target.
    Difference,
    /// Intersection: keep only the overlapping region.
    Intersection,
}

/// Perform a CSG boolean operation on two solids.
///
/// Empty operands and operands whose bounding boxes are separated take a
/// shortcut (union is both solids combined, difference is the target,
/// intersection is empty). Boxes that merely touch count as overlapping so
/// shared faces are resolved by the BSP pass.
pub fn boolean_op(solid_a: &Solid, solid_b: &Solid, op: BooleanOp) -> Solid {
    let boxes = solid_a.bounding_box().zip(solid_b.bounding_box());
    let disjoint = match boxes {
        Some((a, b)) => !a.overlaps(&b, -Tolerance::CSG.linear),
        None => true,
    };
    if disjoint {
        debug!(?op, "boolean shortcut: operands do not overlap");
        return non_overlapping_boolean(solid_a, solid_b, op);
    }

    let a_polys = solid_a.polygons().to_vec();
    let b_polys = solid_b.polygons().to_vec();
    debug!(
        ?op,
        a = a_polys.len(),
        b = b_polys.len(),
        "boolean: building BSP trees"
    );
    let mut a = BspTree::new(a_polys);
    let mut b = BspTree::new(b_polys);

    match op {
        BooleanOp::Union => {
            a.clip_to(&b);
            b.clip_to(&a);
            b.invert();
            b.clip_to(&a);
            b.invert();
            a.build(b.into_polygons());
        }
        BooleanOp::Difference => {
            a.invert();
            a.clip_to(&b);
            b.clip_to(&a);
            b.invert();
            b.clip_to(&a);
            b.invert();
            a.build(b.into_polygons());
            a.invert();
        }
        BooleanOp::Intersection => {
            a.invert();
            b.clip_to(&a);
            b.invert();
            a.clip_to(&b);
            b.clip_to(&a);
            a.build(b.into_polygons());
            a.invert();
        }
    }

    let result = Solid::from_polygons(a.into_polygons());
    debug!(?op, polygons = result.num_polygons(), "boolean: done");
    result
}

/// Result for operands that cannot interact.
fn non_overlapping_boolean(solid_a: &Solid, solid_b: &Solid, op: BooleanOp) -> Solid {
    match op {
        BooleanOp::Union => solid_a.clone().merge(solid_b.clone()),
        BooleanOp::Difference => solid_a.clone(),
        BooleanOp::Intersection => Solid::empty(),
    }
}

/// Union a list of solids.
///
/// Pairs are reduced in parallel; an empty list yields the empty solid.
pub fn union_all(solids: &[Solid]) -> Solid {
    solids
        .par_iter()
        .cloned()
        .reduce(Solid::empty, |a, b| boolean_op(&a, &b, BooleanOp::Union))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use twistsnap_kernel_mesh::{make_box, make_cylinder};

    fn cube_at(x: f64, y: f64, z: f64, size: f64) -> Solid {
        make_box(size, size, size).unwrap().translate(x, y, z)
    }

    #[test]
    fn test_union_overlapping_cubes() {
        let a = cube_at(0.0, 0.0, 0.0, 2.0);
        let b = cube_at(1.0, 0.0, 0.0, 2.0);
        let r = boolean_op(&a, &b, BooleanOp::Union);
        assert_relative_eq!(r.volume(), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_difference_overlapping_cubes() {
        let a = cube_at(0.0, 0.0, 0.0, 2.0);
        let b = cube_at(1.0, 1.0, 1.0, 2.0);
        let r = boolean_op(&a, &b, BooleanOp::Difference);
        assert_relative_eq!(r.volume(), 7.0, epsilon = 1e-9);
    }

    #[test]
    fn test_intersection_overlapping_cubes() {
        let a = cube_at(0.0, 0.0, 0.0, 2.0);
        let b = cube_at(1.0, 1.0, 1.0, 2.0);
        let r = boolean_op(&a, &b, BooleanOp::Intersection);
        assert_relative_eq!(r.volume(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_disjoint_shortcuts() {
        let a = cube_at(0.0, 0.0, 0.0, 1.0);
        let b = cube_at(5.0, 0.0, 0.0, 1.0);
        assert_eq!(boolean_op(&a, &b, BooleanOp::Union).num_polygons(), 12);
        assert_eq!(boolean_op(&a, &b, BooleanOp::Difference), a);
        assert!(boolean_op(&a, &b, BooleanOp::Intersection).is_empty());
    }

    #[test]
    fn test_empty_operands() {
        let a = cube_at(0.0, 0.0, 0.0, 1.0);
        let e = Solid::empty();
        assert_eq!(boolean_op(&a, &e, BooleanOp::Union), a);
        assert_eq!(boolean_op(&e, &a, BooleanOp::Union).num_polygons(), 6);
        assert_eq!(boolean_op(&a, &e, BooleanOp::Difference), a);
        assert!(boolean_op(&e, &a, BooleanOp::Difference).is_empty());
        assert!(boolean_op(&a, &e, BooleanOp::Intersection).is_empty());
    }

    #[test]
    fn test_stacked_touching_cylinders_fuse() {
        // Equal rings share vertices, so the touching caps cancel exactly.
        let a = make_cylinder(2.0, 1.0, 24).unwrap();
        let b = make_cylinder(2.0, 1.0, 24).unwrap().translate(0.0, 0.0, 1.0);
        let r = boolean_op(&a, &b, BooleanOp::Union);
        assert_relative_eq!(r.volume(), 2.0 * a.volume(), epsilon = 1e-9);
        let cap = (a.surface_area() - side_area(&a)) / 2.0;
        assert_relative_eq!(
            r.surface_area(),
            2.0 * a.surface_area() - 2.0 * cap,
            epsilon = 1e-9
        );
    }

    fn side_area(c: &Solid) -> f64 {
        c.polygons()
            .iter()
            .filter(|p| p.plane().normal.z.abs() < 0.5)
            .map(|p| p.area())
            .sum()
    }

    #[test]
    fn test_union_all_of_disjoint_boxes() {
        let boxes: Vec<Solid> = (0..4).map(|i| cube_at(3.0 * i as f64, 0.0, 0.0, 1.0)).collect();
        let r = union_all(&boxes);
        assert_relative_eq!(r.volume(), 4.0, epsilon = 1e-9);
        assert!(union_all(&[]).is_empty());
    }
}
