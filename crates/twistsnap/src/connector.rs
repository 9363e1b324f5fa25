//! Twist-and-snap connector (plug) and socket solids.
//!
//! A tab is a ramp swept along the connector's bottom edge: full height at
//! the wall and half height at its tip. The socket carries an entry channel
//! for each tab and a longer, lower twist channel that the tab rotates
//! into, where a detent pin holds it.

use tracing::{debug, info};
use twistsnap_cad::Part;
use twistsnap_kernel_math::Point2;
use twistsnap_kernel_sweep::{extrude, sweep_arc, Profile2d};

use crate::config::TwistSnapConnector;
use crate::error::Result;
use crate::geometry::{
    angular_intersection, arc_span, clamp_fillet_radius, max_feasible, segments_for_sweep,
    CHANNEL_CLEARANCE, TWIST_CHANNEL_LEAD,
};
use crate::outline::{Notch, TabOutline};

/// Extra sweep past each end of a ramp before it is trimmed by its outline.
const ARC_OVERSHOOT_DEG: f64 = 1.0;

/// Bisection steps when fitting a corner fillet.
const FILLET_ITERATIONS: u32 = 40;

/// `(r, z)` profile of a ramp from `top` at `r_in` falling by `drop` at
/// `r_out`, padded by `pad` at both radii and running down to `floor`.
fn ramp_profile(
    r_in: f64,
    r_out: f64,
    top: f64,
    drop: f64,
    pad: f64,
    floor: f64,
) -> Result<Profile2d> {
    let slope = drop / (r_out - r_in);
    let z_tip = top - drop - slope * pad;
    Ok(Profile2d::new(vec![
        Point2::new(r_in - pad, floor),
        Point2::new(r_out + pad, floor),
        Point2::new(r_out + pad, z_tip),
        Point2::new(r_in, top),
        Point2::new(r_in - pad, top),
    ])?)
}

impl TwistSnapConnector {
    /// How far tabs and cutters reach past the surfaces they join.
    fn overlap(&self) -> f64 {
        0.25 * self.snapfit_radius_extension().min(self.connector_radius())
    }

    /// Largest fillet up to `e/8` the outline takes.
    fn fitted_fillet(&self, outline: impl Fn(f64) -> TabOutline) -> f64 {
        let wanted = self.snapfit_radius_extension() / 8.0;
        let fits = max_feasible(wanted, FILLET_ITERATIONS, |f| outline(f).is_valid());
        clamp_fillet_radius(wanted, fits)
    }

    /// Tab angular span in radians, centred on +Y.
    fn tab_span(&self, lead: f64, trail: f64) -> (f64, f64) {
        let (start, end) = arc_span(self.arc_percentage(), lead, trail, 90.0);
        (start.to_radians(), end.to_radians())
    }

    /// Ramp swept over `[start, end]` (plus overshoot) and trimmed by `outline`.
    fn trimmed_ramp(
        &self,
        name: &str,
        ramp: &Profile2d,
        outline: &TabOutline,
        z_range: (f64, f64),
    ) -> Result<Part> {
        let over = ARC_OVERSHOOT_DEG.to_radians();
        let (start, end) = (outline.start_angle - over, outline.end_angle + over);
        let segments = segments_for_sweep(end - start, self.circle_segments());
        let swept = Part::from_solid(name, sweep_arc(ramp, start, end, segments)?);
        let prism = Part::from_solid(
            name,
            extrude(&outline.profile()?, z_range.0, z_range.1)?,
        );
        Ok(swept.intersection(&prism).renamed(name))
    }

    /// One snap-fit tab, centred on +Y, with its notch and rounded corners.
    pub fn snapfit_tab(&self) -> Result<Part> {
        let r = self.connector_radius();
        let e = self.snapfit_radius_extension();
        let h = self.snapfit_height();
        let n = self.circle_segments();
        let pad = self.overlap();
        let (start, end) = self.tab_span(1.0, 1.0);

        let exact = Profile2d::new(vec![
            Point2::new(r, 0.0),
            Point2::new(r + e, 0.0),
            Point2::new(r + e, h / 2.0),
            Point2::new(r, h),
        ])?;
        let exact = Part::from_solid(
            "snapfit",
            sweep_arc(&exact, start, end, segments_for_sweep(end - start, n))?,
        );
        let com = exact.center_of_mass();
        let notch = Notch {
            center: Point2::new(com[0], com[1] + e / 2.0),
            radius: e / 2.0,
        };

        let outline = |fillet| TabOutline {
            inner_radius: r - pad,
            outer_radius: r + e,
            start_angle: start,
            end_angle: end,
            fillet_radius: fillet,
            notch: Some(notch),
            circle_segments: n,
        };
        let fillet = self.fitted_fillet(&outline);
        debug!(fillet, notch_y = notch.center.y, "snap-fit tab outline");

        let ramp = ramp_profile(r, r + e, h, h / 2.0, pad, 0.0)?;
        self.trimmed_ramp("snapfit", &ramp, &outline(fillet), (-pad, h + pad))
    }

    /// The plug: a short cylinder with `snapfit_count` tabs round its base.
    pub fn twist_snap_connector(&self) -> Result<Part> {
        self.validate()?;
        let body = Part::cylinder(
            "connector",
            self.connector_radius(),
            2.0 * self.wall_depth(),
            self.circle_segments(),
        )?;
        let tabs = self
            .snapfit_tab()?
            .polar_pattern(self.snapfit_count() as usize, 0.0);
        let connector = body.union(&tabs).renamed("twist-snap-connector");
        info!(
            radius = self.connector_radius(),
            tabs = self.snapfit_count(),
            polygons = connector.solid().num_polygons(),
            "built twist-snap connector"
        );
        Ok(connector)
    }

    /// Outline of a socket channel starting just inside the bore.
    fn channel_outline(&self, bore: f64, outer: f64, (start, end): (f64, f64)) -> TabOutline {
        TabOutline {
            inner_radius: bore - self.overlap(),
            outer_radius: outer,
            start_angle: start,
            end_angle: end,
            fillet_radius: 0.0,
            notch: None,
            circle_segments: self.circle_segments(),
        }
    }

    /// Outline with its corners rounded as far as `e/8`.
    fn filleted(&self, outline: TabOutline) -> TabOutline {
        let fillet = self.fitted_fillet(|f| TabOutline {
            fillet_radius: f,
            ..outline.clone()
        });
        TabOutline {
            fillet_radius: fillet,
            ..outline
        }
    }

    /// The socket: a ring with entry and twist channels and detent pins.
    pub fn twist_snap_socket(&self) -> Result<Part> {
        self.validate()?;
        let r = self.connector_radius();
        let e = self.snapfit_radius_extension();
        let h = self.snapfit_height();
        let t = self.tolerance();
        let n = self.circle_segments();
        let count = self.snapfit_count() as usize;
        let pad = self.overlap();
        let height = 2.0 * self.wall_depth();
        let bore = r + t;

        let outer = Part::cylinder("socket", r + self.wall_width() * 4.0 / 3.0, height, n)?;
        let bore_cut =
            Part::cylinder("bore", bore, height + 2.0 * pad, n)?.translate(0.0, 0.0, -pad);
        let shell = outer.difference(&bore_cut);

        let entry_span = self.tab_span(CHANNEL_CLEARANCE, CHANNEL_CLEARANCE);
        let entry_outline = self.filleted(self.channel_outline(bore, bore + e, entry_span));
        let entry_top = if 2.0 * h >= height { 2.0 * h + pad } else { 2.0 * h };
        let entry = Part::from_solid(
            "entry-channel",
            extrude(&entry_outline.profile()?, -pad, entry_top)?,
        )
        .polar_pattern(count, 0.0);

        let twist_span = self.tab_span(TWIST_CHANNEL_LEAD, CHANNEL_CLEARANCE);
        let twist_outline = self.filleted(self.channel_outline(bore, bore + e + t, twist_span));
        let twist_ramp = ramp_profile(bore, bore + e + t, h + t, h / 2.0, pad, -pad)?;
        let twist = self
            .trimmed_ramp("twist-channel", &twist_ramp, &twist_outline, (-pad, h + t + pad))?
            .polar_pattern(count, 0.0);
        debug!(
            entry_fillet = entry_outline.fillet_radius,
            twist_fillet = twist_outline.fillet_radius,
            "socket channel outlines"
        );

        let (x, y) = angular_intersection(r + e + 2.0 * t, -4.0 * self.arc_percentage());
        let pins = Part::cylinder("detent", e / 2.0, 2.0 * h, n)?
            .translate(x, y, 0.0)
            .polar_pattern(count, 0.0);

        let socket = shell
            .difference(&entry)
            .difference(&twist)
            .union(&pins)
            .renamed("twist-snap-socket");
        info!(
            bore,
            channels = count,
            polygons = socket.solid().num_polygons(),
            "built twist-snap socket"
        );
        Ok(socket)
    }
}
