use approx::assert_relative_eq;
use twistsnap_kernel_math::{Point3, Tolerance, Transform};

#[test]
fn flip_and_raise_matches_fitting_placement() {
    // Turn a part upside down about Y, then lift it: a point on its base
    // ends up on top.
    let place = Transform::translation(0.0, 0.0, 14.0)
        .then(&Transform::rotation_y(std::f64::consts::PI));
    let base = place.apply_point(&Point3::new(4.5, 0.0, 0.0));
    let top = place.apply_point(&Point3::new(4.5, 0.0, 4.0));
    assert_relative_eq!(base.z, 14.0, epsilon = 1e-12);
    assert_relative_eq!(top.z, 10.0, epsilon = 1e-12);
    assert_relative_eq!(base.x, -4.5, epsilon = 1e-12);
    assert!(!place.is_mirroring());
}

#[test]
fn inverse_round_trips_points() {
    let t = Transform::rotation_euler_deg(10.0, 20.0, 30.0)
        .then(&Transform::translation(1.0, 2.0, 3.0));
    let inv = t.inverse().unwrap();
    let p = Point3::new(0.3, -1.2, 5.0);
    let back = inv.apply_point(&t.apply_point(&p));
    assert!(Tolerance::DEFAULT.points_equal(&p, &back));
}

#[test]
fn mirror_is_detected() {
    assert!(Transform::scale(1.0, -1.0, 1.0).is_mirroring());
    assert!(!Transform::scale(2.0, 2.0, 2.0).is_mirroring());
}
