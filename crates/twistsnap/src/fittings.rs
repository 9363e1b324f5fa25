//! PTFE tube fittings: a hexagonal grip knob carrying a twist-snap
//! connector or socket, bored for the tube and tapped for a screw-in
//! pneumatic coupler.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use twistsnap_cad::{Assembly, Part};
use twistsnap_kernel_sweep::{loft, EndFinish, Hand, LoftOptions, Profile2d, TrapezoidalThread};

use crate::config::TwistSnapConnector;
use crate::error::{Result, TwistSnapError};
use crate::geometry::segments_for_sweep;

/// Grip length of the bare fittings.
pub const DEFAULT_KNOB_LENGTH: f64 = 10.0;

/// Grip length of the bored and threaded fittings.
pub const CUT_KNOB_LENGTH: f64 = 15.0;

/// How far tube and thread cutters reach past the faces they open.
const CUT_OVERSHOOT: f64 = 0.01;

/// Length of a tube cutter that opens both ends of a `length` bore.
fn cut_length(length: f64) -> f64 {
    length + 2.0 * CUT_OVERSHOOT
}

/// The connector every fitting is built around: radius 4.5, 2 mm walls.
pub fn ptfe_connector() -> TwistSnapConnector {
    TwistSnapConnector::new(4.5, 2.0, 0.1)
}

/// Thread of the screw-in coupler at the knob end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadedConnector {
    /// Major diameter.
    pub diameter: f64,
    /// Thread length, from the knob face inward.
    pub length: f64,
    /// Axial pitch.
    pub thread_pitch: f64,
    /// Included flank angle in degrees.
    pub thread_angle: f64,
}

impl Default for ThreadedConnector {
    fn default() -> Self {
        Self {
            diameter: 10.0,
            length: 6.7,
            thread_pitch: 1.0,
            thread_angle: 30.0,
        }
    }
}

impl ThreadedConnector {
    /// The finer 10.1 mm thread used by the tapered connector fitting.
    pub fn fine_pitch() -> Self {
        Self {
            diameter: 10.1,
            thread_pitch: 0.874,
            ..Self::default()
        }
    }

    /// Internal right-hand thread with faded ends, z ∈ [0, length].
    pub fn thread(&self) -> TrapezoidalThread {
        TrapezoidalThread {
            diameter: self.diameter,
            pitch: self.thread_pitch,
            length: self.length,
            thread_angle: self.thread_angle,
            external: false,
            hand: Hand::Right,
            end_finish: EndFinish::Fade,
        }
    }

    /// Plain bore the thread sits in.
    fn bore(&self, segments: u32) -> Result<Part> {
        Ok(Part::cylinder(
            "thread-bore",
            self.diameter / 2.0,
            self.length + CUT_OVERSHOOT,
            segments,
        )?
        .translate(0.0, 0.0, -CUT_OVERSHOOT))
    }
}

/// Rounded hexagon at the base of the grip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnobProfile {
    /// Hexagon circumradius.
    pub circumradius: f64,
    /// Rotation of the first corner in degrees.
    pub rotation_deg: f64,
    /// Corner fillet radius.
    pub fillet_radius: f64,
}

impl Default for KnobProfile {
    fn default() -> Self {
        Self {
            circumradius: 7.0,
            rotation_deg: 20.0,
            fillet_radius: 1.0,
        }
    }
}

impl KnobProfile {
    /// The filleted hexagon in the XY plane.
    pub fn profile(&self, circle_segments: u32) -> Result<Profile2d> {
        let corner_segments = segments_for_sweep(60f64.to_radians(), circle_segments);
        Ok(Profile2d::regular_polygon(self.circumradius, 6, self.rotation_deg)?
            .fillet_vertices(self.fillet_radius, corner_segments)?)
    }

    /// Loft from the hexagon at z = 0 to the socket's outer circle at
    /// `knob_length`.
    pub fn knob(&self, connector: &TwistSnapConnector, knob_length: f64) -> Result<Part> {
        check_positive("knob_length", knob_length)?;
        let n = connector.circle_segments();
        let top_radius = connector.connector_radius() + connector.wall_width() * 4.0 / 3.0;
        let sections = [
            (self.profile(n)?, 0.0),
            (Profile2d::circle(top_radius, n)?, knob_length),
        ];
        let solid = loft(&sections, LoftOptions { samples: n })?;
        Ok(Part::from_solid("knob", solid))
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TwistSnapError::InvalidParameter { name, value })
    }
}

/// Tube path with a funnel at its far end.
///
/// A cylinder of `external_radius` over `[0, length - taper_length]`, then
/// a cone from `taper_start_radius` to `taper_end_radius` up to `length`.
pub fn tapered_tube_path(
    external_radius: f64,
    taper_start_radius: f64,
    taper_end_radius: f64,
    taper_length: f64,
    length: f64,
    segments: u32,
) -> Result<Part> {
    check_positive("taper_length", taper_length)?;
    if !(length > taper_length) {
        return Err(TwistSnapError::InvalidParameter {
            name: "length",
            value: length,
        });
    }
    let straight = Part::cylinder("tube", external_radius, length - taper_length, segments)?;
    let taper = Part::cone(
        "taper",
        taper_start_radius,
        taper_end_radius,
        taper_length,
        segments,
    )?
    .translate(0.0, 0.0, length - taper_length);
    Ok(straight.union(&taper).renamed("tube-path"))
}

/// Straight tube path, a cylinder over `[0, length]`.
pub fn flush_tube_path(external_radius: f64, length: f64, segments: u32) -> Result<Part> {
    Ok(Part::cylinder("tube-path", external_radius, length, segments)?)
}

/// Grip knob with the connector standing on top, tabs up.
pub fn connector_fitting(connector: &TwistSnapConnector, knob_length: f64) -> Result<Part> {
    let knob = KnobProfile::default().knob(connector, knob_length)?;
    let plug = connector
        .twist_snap_connector()?
        .rotate_about_y(180.0)
        .translate(0.0, 0.0, knob_length + 2.0 * connector.wall_depth());
    Ok(knob.union(&plug).renamed("connector-fitting"))
}

/// Grip knob with the socket on top.
pub fn socket_fitting(connector: &TwistSnapConnector, knob_length: f64) -> Result<Part> {
    let knob = KnobProfile::default().knob(connector, knob_length)?;
    let socket = connector
        .twist_snap_socket()?
        .translate(0.0, 0.0, knob_length);
    Ok(knob.union(&socket).renamed("socket-fitting"))
}

/// Parameters of a fitting with a straight tube bore.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StraightCut {
    /// Grip length.
    pub knob_length: f64,
    /// Bore diameter, with clearance over the tube.
    pub tube_outer_diameter: f64,
    /// Coupler thread.
    pub threaded: ThreadedConnector,
}

impl Default for StraightCut {
    fn default() -> Self {
        Self {
            knob_length: CUT_KNOB_LENGTH,
            tube_outer_diameter: 4.3,
            threaded: ThreadedConnector::default(),
        }
    }
}

/// Parameters of a fitting whose bore steps down through a funnel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaperCut {
    /// Grip length.
    pub knob_length: f64,
    /// Outer diameter of the wide tube.
    pub tube_outer_diameter: f64,
    /// Inner diameter of the wide tube, where the funnel starts.
    pub tube_inner_diameter: f64,
    /// Diameter left at the end of the funnel.
    pub taper_end_diameter: f64,
    /// Funnel length.
    pub taper_length: f64,
    /// Coupler thread; `None` takes the fitting's usual thread.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threaded: Option<ThreadedConnector>,
}

impl Default for TaperCut {
    fn default() -> Self {
        Self {
            knob_length: CUT_KNOB_LENGTH,
            tube_outer_diameter: 6.4,
            tube_inner_diameter: 3.4,
            taper_end_diameter: 2.7,
            taper_length: 4.0,
            threaded: None,
        }
    }
}

impl TaperCut {
    fn path(&self, length: f64, segments: u32) -> Result<Part> {
        tapered_tube_path(
            self.tube_outer_diameter / 2.0,
            self.tube_inner_diameter / 2.0,
            self.taper_end_diameter / 2.0,
            self.taper_length,
            length,
            segments,
        )
    }
}

/// Bore `body` with the tube path and thread, and pair it with the thread.
/// `tube_path` starts at z = 0 and is lowered by the cutter overshoot.
fn threaded_fitting(
    label: &str,
    body: Part,
    tube_path: Part,
    threaded: &ThreadedConnector,
    segments: u32,
) -> Result<Assembly> {
    let tube_path = tube_path.translate(0.0, 0.0, -CUT_OVERSHOOT);
    let bored = body
        .difference(&tube_path)
        .difference(&threaded.bore(segments)?)
        .renamed("assembly");
    let thread = Part::from_solid("thread", threaded.thread().solid(segments)?);
    debug!(
        label,
        thread_diameter = threaded.diameter,
        thread_polygons = thread.solid().num_polygons(),
        "bored fitting"
    );
    let fitting = Assembly::with_children(label, vec![bored, thread]);
    info!(label, volume = fitting.volume(), "built fitting");
    Ok(fitting)
}

/// Socket fitting with a straight bore of radius `tube_outer_diameter / 2`.
pub fn straight_cut_socket_fitting(
    connector: &TwistSnapConnector,
    cut: &StraightCut,
) -> Result<Assembly> {
    let n = connector.circle_segments();
    let body = socket_fitting(connector, cut.knob_length)?;
    let path = flush_tube_path(
        cut.tube_outer_diameter / 2.0,
        cut_length(cut.knob_length + 2.0),
        n,
    )?;
    threaded_fitting("Socket Fitting", body, path, &cut.threaded, n)
}

/// Socket fitting whose bore steps down to a narrower tube.
pub fn taper_cut_socket_fitting(
    connector: &TwistSnapConnector,
    cut: &TaperCut,
) -> Result<Assembly> {
    let n = connector.circle_segments();
    let body = socket_fitting(connector, cut.knob_length)?;
    let path = cut.path(cut_length(cut.knob_length + 2.0), n)?;
    let threaded = cut.threaded.unwrap_or_default();
    threaded_fitting("Socket Fitting", body, path, &threaded, n)
}

/// Connector fitting with a straight bore.
pub fn straight_cut_connector_fitting(
    connector: &TwistSnapConnector,
    cut: &StraightCut,
) -> Result<Assembly> {
    let n = connector.circle_segments();
    let body = connector_fitting(connector, cut.knob_length)?;
    let path = flush_tube_path(
        cut.tube_outer_diameter / 2.0,
        cut_length(cut.knob_length + 4.0),
        n,
    )?;
    threaded_fitting("Connector Fitting", body, path, &cut.threaded, n)
}

/// Connector fitting whose bore steps down; uses the fine-pitch thread
/// unless `cut.threaded` says otherwise.
pub fn taper_cut_connector_fitting(
    connector: &TwistSnapConnector,
    cut: &TaperCut,
) -> Result<Assembly> {
    let n = connector.circle_segments();
    let body = connector_fitting(connector, cut.knob_length)?;
    let path = cut.path(cut_length(cut.knob_length + 4.0), n)?;
    let threaded = cut.threaded.unwrap_or_else(ThreadedConnector::fine_pitch);
    threaded_fitting("Connector Fitting", body, path, &threaded, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn coarse() -> TwistSnapConnector {
        let mut c = ptfe_connector();
        c.set_circle_segments(32);
        c
    }

    #[test]
    fn test_threaded_connector_defaults() {
        let t = ThreadedConnector::default();
        assert_eq!(
            (t.diameter, t.length, t.thread_pitch, t.thread_angle),
            (10.0, 6.7, 1.0, 30.0)
        );
        let fine = ThreadedConnector::fine_pitch();
        assert_eq!(fine.diameter, 10.1);
        assert_eq!(fine.thread_pitch, 0.874);
        assert_eq!(fine.length, 6.7);

        let thread = t.thread();
        assert!(!thread.external);
        assert_eq!(thread.hand, Hand::Right);
        assert_eq!(thread.end_finish, EndFinish::Fade);
    }

    #[test]
    fn test_tube_paths() {
        let flush = flush_tube_path(2.15, 17.0, 32).unwrap();
        let (min, max) = flush.bounding_box();
        assert_relative_eq!(min[2], 0.0);
        assert_relative_eq!(max[2], 17.0);

        let taper = tapered_tube_path(3.2, 1.7, 1.35, 4.0, 17.0, 32).unwrap();
        let (_, max) = taper.bounding_box();
        assert_relative_eq!(max[2], 17.0, epsilon = 1e-9);
        let straight = Part::cylinder("s", 3.2, 13.0, 32).unwrap();
        assert!(taper.volume() > straight.volume());
        let funnel_bound = Part::cylinder("c", 1.7, 4.0, 32).unwrap();
        assert!(taper.volume() < straight.volume() + funnel_bound.volume());

        assert!(matches!(
            tapered_tube_path(3.2, 1.7, 1.35, 4.0, 4.0, 32),
            Err(TwistSnapError::InvalidParameter { name: "length", .. })
        ));
    }

    #[test]
    fn test_knob_spans_grip() {
        let c = coarse();
        let knob = KnobProfile::default().knob(&c, 10.0).unwrap();
        let (min, max) = knob.bounding_box();
        assert_relative_eq!(min[2], 0.0);
        assert_relative_eq!(max[2], 10.0);
        assert!(max[0] <= 4.5 + 8.0 / 3.0 + 1e-9);
        assert!(KnobProfile::default().knob(&c, 0.0).is_err());
    }

    #[test]
    fn test_socket_fitting_height() {
        let c = coarse();
        let fitting = socket_fitting(&c, 10.0).unwrap();
        let (min, max) = fitting.bounding_box();
        assert_relative_eq!(min[2], 0.0, epsilon = 1e-9);
        assert_relative_eq!(max[2], 14.0, epsilon = 1e-9);
    }

    #[test]
    fn test_connector_fitting_height() {
        let c = coarse();
        let fitting = connector_fitting(&c, 10.0).unwrap();
        let (min, max) = fitting.bounding_box();
        assert_relative_eq!(min[2], 0.0, epsilon = 1e-9);
        assert_relative_eq!(max[2], 14.0, epsilon = 1e-9);
    }

    #[test]
    fn test_straight_socket_fitting_children() {
        let c = coarse();
        let fitting = straight_cut_socket_fitting(&c, &StraightCut::default()).unwrap();
        assert_eq!(fitting.label, "Socket Fitting");
        assert_eq!(fitting.len(), 2);
        let body = fitting.child("assembly").unwrap();
        let thread = fitting.child("thread").unwrap();

        let uncut = socket_fitting(&c, CUT_KNOB_LENGTH).unwrap();
        assert!(body.volume() < uncut.volume());

        let (min, max) = thread.bounding_box();
        assert!(min[2] >= -1e-9 && max[2] <= 6.7 + 1e-9);
        assert!(max[0] <= 5.0 + 1e-9);
    }

    #[test]
    fn test_straight_socket_bore_is_half_the_diameter() {
        let c = coarse();
        let fitting = straight_cut_socket_fitting(&c, &StraightCut::default()).unwrap();
        let body = fitting.child("assembly").unwrap();
        // Between the thread and the socket the knob keeps a 2.15 mm bore.
        let band = Part::cylinder("band", 4.0, 6.0, 32).unwrap().translate(0.0, 0.0, 8.0);
        let kept = body.intersection(&band).volume();
        let expected = std::f64::consts::PI * (16.0 - 2.15 * 2.15) * 6.0;
        assert_relative_eq!(kept, expected, max_relative = 0.05);
    }

    /// Area of upward-facing faces lying on `z` within `radius` of the axis.
    fn capped_area(part: &Part, z: f64, radius: f64) -> f64 {
        part.solid()
            .polygons()
            .iter()
            .filter(|p| p.plane().normal.z > 0.99)
            .filter(|p| p.vertices().iter().all(|v| (v.z - z).abs() < 1e-6))
            .filter(|p| {
                let n = p.vertices().len() as f64;
                let (x, y) = p
                    .vertices()
                    .iter()
                    .fold((0.0, 0.0), |(x, y), v| (x + v.x / n, y + v.y / n));
                x.hypot(y) < radius
            })
            .map(|p| p.area())
            .sum()
    }

    #[test]
    fn test_connector_fitting_bores_are_open() {
        let c = coarse();
        let top = CUT_KNOB_LENGTH + 2.0 * c.wall_depth();
        let straight = straight_cut_connector_fitting(&c, &StraightCut::default()).unwrap();
        let taper = taper_cut_connector_fitting(&c, &TaperCut::default()).unwrap();
        for fitting in [&straight, &taper] {
            let body = fitting.child("assembly").unwrap();
            let (min, max) = body.bounding_box();
            assert_relative_eq!(max[2], top, epsilon = 1e-9);
            assert_relative_eq!(min[2], 0.0, epsilon = 1e-9);
            assert_relative_eq!(capped_area(body, top, 1.3), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_taper_connector_uses_fine_thread() {
        let c = coarse();
        let fitting = taper_cut_connector_fitting(&c, &TaperCut::default()).unwrap();
        assert_eq!(fitting.label, "Connector Fitting");
        let (_, max) = fitting.child("thread").unwrap().bounding_box();
        assert!(max[0] <= 10.1 / 2.0 + 1e-9);
        assert!(max[0] > 5.0 - 0.874);
    }
}
