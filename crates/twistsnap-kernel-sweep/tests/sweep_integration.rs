use std::f64::consts::PI;

use approx::assert_relative_eq;
use twistsnap_kernel_booleans::{boolean_op, BooleanOp};
use twistsnap_kernel_math::Point2;
use twistsnap_kernel_mesh::make_cylinder;
use twistsnap_kernel_sweep::{
    arc_points, extrude, loft, sweep_arc, EndFinish, Hand, LoftOptions, Profile2d,
    TrapezoidalThread,
};

/// Annular sector in the XY plane between two radii and angles (radians).
fn sector(r0: f64, r1: f64, a0: f64, a1: f64, segments: u32) -> Profile2d {
    let mut pts = arc_points(Point2::origin(), r1, a0, a1, true, segments);
    pts.extend(arc_points(Point2::origin(), r0, a1, a0, false, segments));
    Profile2d::new(pts).unwrap()
}

#[test]
fn ramp_clipped_by_outline() {
    // Ramp swept wider than the outline, then trimmed to it.
    let ramp = Profile2d::new(vec![
        Point2::new(4.0, 0.0),
        Point2::new(6.0, 0.0),
        Point2::new(6.0, 1.0),
        Point2::new(4.0, 2.0),
    ])
    .unwrap();
    let swept = sweep_arc(&ramp, 0.0, PI / 2.0, 24).unwrap();
    let outline = sector(4.5, 5.5, PI / 8.0, 3.0 * PI / 8.0, 12)
        .fillet_vertices(0.1, 3)
        .unwrap();
    let cutter = extrude(&outline, -0.5, 2.5).unwrap();
    let tab = boolean_op(&swept, &cutter, BooleanOp::Intersection);

    assert!(tab.volume() > 0.0);
    assert!(tab.volume() < swept.volume());
    let bbox = tab.bounding_box().unwrap();
    assert_relative_eq!(bbox.min.z, 0.0, epsilon = 1e-9);
    assert!(bbox.max.z < 2.0);
    assert!(bbox.min.x > 0.0 && bbox.min.y > 0.0);
}

#[test]
fn sector_extrusion_volume() {
    let s = extrude(&sector(2.0, 3.0, 0.0, PI, 64), 0.0, 1.0).unwrap();
    let exact = 0.5 * PI * (9.0 - 4.0);
    assert_relative_eq!(s.volume(), exact, max_relative = 1e-2);
}

#[test]
fn knob_loft_meets_socket_rim() {
    let hex = Profile2d::regular_polygon(7.0, 6, 20.0)
        .unwrap()
        .fillet_vertices(1.0, 4)
        .unwrap();
    let rim = Profile2d::circle(9.0, 32).unwrap();
    let knob = loft(&[(hex, 0.0), (rim, 7.0)], LoftOptions { samples: 32 }).unwrap();
    let shell = make_cylinder(9.0, 4.0, 32).unwrap().translate(0.0, 0.0, 7.0);
    let fused = boolean_op(&knob, &shell, BooleanOp::Union);
    assert_relative_eq!(
        fused.volume(),
        knob.volume() + shell.volume(),
        max_relative = 1e-6
    );
}

#[test]
fn internal_thread_fits_bore() {
    let thread = TrapezoidalThread {
        diameter: 10.0,
        pitch: 1.0,
        length: 5.0,
        thread_angle: 30.0,
        external: false,
        hand: Hand::Right,
        end_finish: EndFinish::Fade,
    };
    let s = thread.solid(24).unwrap();
    let bbox = s.bounding_box().unwrap();
    assert!(bbox.max.x <= 5.0 + 1e-9);
    assert!(bbox.min.z >= -1e-9 && bbox.max.z <= 5.0 + 1e-9);
    // Crest sits half a pitch inside the major radius.
    let nearest = s
        .polygons()
        .iter()
        .flat_map(|p| p.vertices())
        .map(|v| v.x.hypot(v.y))
        .fold(f64::INFINITY, f64::min);
    assert_relative_eq!(nearest, 4.5, epsilon = 1e-9);
}
