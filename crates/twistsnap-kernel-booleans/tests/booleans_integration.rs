use approx::assert_relative_eq;
use twistsnap_kernel_booleans::{boolean_op, union_all, BooleanOp};
use twistsnap_kernel_mesh::{make_box, make_cylinder, Solid};

#[test]
fn tube_from_cylinder_difference() {
    let outer = make_cylinder(5.0, 10.0, 32).unwrap();
    let bore = make_cylinder(3.0, 12.0, 32)
        .unwrap()
        .translate(0.0, 0.0, -1.0);
    let tube = boolean_op(&outer, &bore, BooleanOp::Difference);

    let inner = make_cylinder(3.0, 10.0, 32).unwrap();
    assert_relative_eq!(
        tube.volume(),
        outer.volume() - inner.volume(),
        epsilon = 1e-6
    );
    let bbox = tube.bounding_box().unwrap();
    assert_relative_eq!(bbox.max.z, 10.0, epsilon = 1e-9);
    assert_relative_eq!(bbox.min.z, 0.0, epsilon = 1e-9);
}

#[test]
fn box_with_slot_cut() {
    let block = make_box(10.0, 10.0, 4.0).unwrap();
    let slot = make_box(2.0, 12.0, 2.0).unwrap().translate(4.0, -1.0, 3.0);
    let cut = boolean_op(&block, &slot, BooleanOp::Difference);
    assert_relative_eq!(cut.volume(), 400.0 - 2.0 * 10.0 * 1.0, epsilon = 1e-9);
    let bbox = cut.bounding_box().unwrap();
    assert_relative_eq!(bbox.max.z, 4.0, epsilon = 1e-9);
}

#[test]
fn polar_pins_union() {
    let body = make_cylinder(5.0, 2.0, 32).unwrap();
    let pins: Vec<Solid> = (0..4)
        .map(|k| {
            make_box(1.0, 1.0, 2.0)
                .unwrap()
                .translate(4.5, -0.5, 0.0)
                .rotate_deg(0.0, 0.0, 90.0 * k as f64)
        })
        .collect();
    let pins = union_all(&pins);
    let all = boolean_op(&body, &pins, BooleanOp::Union);
    assert!(all.volume() > body.volume());
    assert!(all.volume() < body.volume() + pins.volume());
}

#[test]
fn intersection_is_commutative_in_volume() {
    let a = make_cylinder(3.0, 4.0, 24).unwrap();
    let b = make_box(4.0, 4.0, 6.0).unwrap().translate(0.0, 0.0, -1.0);
    let ab = boolean_op(&a, &b, BooleanOp::Intersection);
    let ba = boolean_op(&b, &a, BooleanOp::Intersection);
    assert_relative_eq!(ab.volume(), ba.volume(), epsilon = 1e-9);
    // The box covers the first quadrant of the cylinder.
    assert_relative_eq!(ab.volume(), a.volume() / 4.0, epsilon = 1e-6);
}
