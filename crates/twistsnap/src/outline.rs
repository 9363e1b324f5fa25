//! Top-view outlines of snap-fit tabs and socket channels.
//!
//! An outline is an annular sector in the XY plane. Its two outer corners
//! can be rounded, and a circular notch can be bitten out of the outer arc
//! with its own rounded corners. Extruding the outline and intersecting it
//! with a swept ramp gives a tab with vertical fillets.

use std::f64::consts::TAU;

use twistsnap_kernel_math::{Point2, Vec2};
use twistsnap_kernel_sweep::{arc_points, Profile2d};

use crate::error::OutlineError;
use crate::geometry::segments_for_sweep;

/// A circular notch cut into the outer arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Notch {
    /// Centre in the XY plane.
    pub center: Point2,
    /// Notch radius.
    pub radius: f64,
}

/// Annular sector outline with optional rounded corners and notch.
#[derive(Debug, Clone, PartialEq)]
pub struct TabOutline {
    /// Radius of the inner arc (may be zero).
    pub inner_radius: f64,
    /// Radius of the outer arc.
    pub outer_radius: f64,
    /// Start angle in radians.
    pub start_angle: f64,
    /// End angle in radians.
    pub end_angle: f64,
    /// Radius of every rounded corner; zero keeps them sharp.
    pub fillet_radius: f64,
    /// Optional notch in the outer arc.
    pub notch: Option<Notch>,
    /// Segments for a full circle; arcs get a proportional share.
    pub circle_segments: u32,
}

/// Angle of `v` from +X.
fn heading(v: Vec2) -> f64 {
    v.y.atan2(v.x)
}

fn polar(radius: f64, angle: f64) -> Point2 {
    Point2::new(radius * angle.cos(), radius * angle.sin())
}

/// Arc about `center` from `from` to `to`, endpoints exact.
fn arc_between(
    center: Point2,
    from: Point2,
    to: Point2,
    ccw: bool,
    circle_segments: u32,
) -> Vec<Point2> {
    let radius = (from - center).norm();
    let (a, b) = (heading(from - center), heading(to - center));
    let mut sweep = b - a;
    if ccw {
        sweep = sweep.rem_euclid(TAU);
    } else {
        sweep = -(-sweep).rem_euclid(TAU);
    }
    let n = segments_for_sweep(sweep, circle_segments);
    let mut pts = arc_points(center, radius, a, a + sweep, ccw, n);
    if let Some(first) = pts.first_mut() {
        *first = from;
    }
    if let Some(last) = pts.last_mut() {
        *last = to;
    }
    pts
}

/// Points on a circle about the origin between two angles (inclusive).
fn circle_span(radius: f64, from: f64, to: f64, circle_segments: u32) -> Vec<Point2> {
    let n = segments_for_sweep(to - from, circle_segments);
    (0..=n)
        .map(|i| polar(radius, from + (to - from) * i as f64 / n as f64))
        .collect()
}

/// A rounded corner between the outer circle and a radial edge.
struct SideFillet {
    center: Point2,
    /// Tangent point on the radial edge.
    on_edge: Point2,
    /// Angle of the tangent point on the outer circle.
    arc_angle: f64,
}

/// A rounded corner between the outer circle and the notch.
struct NotchFillet {
    center: Point2,
    on_outer: Point2,
    on_notch: Point2,
}

impl TabOutline {
    /// Build the closed outline, counter-clockwise.
    ///
    /// # Errors
    ///
    /// [`OutlineError`] when the sector is empty, the fillets do not fit,
    /// or the notch misses the outer arc or cuts too deep.
    pub fn profile(&self) -> Result<Profile2d, OutlineError> {
        let (r0, r1) = (self.inner_radius, self.outer_radius);
        let (ts, te) = (self.start_angle, self.end_angle);
        if !(r0 >= 0.0 && r1 > r0 && te > ts && te - ts < TAU) {
            return Err(OutlineError::EmptySector {
                inner: r0,
                outer: r1,
                start: ts,
                end: te,
            });
        }
        let f = self.fillet_radius;
        if !(f.is_finite() && f >= 0.0) {
            return Err(OutlineError::FilletTooLarge(f));
        }

        let (start_corner, end_corner) = self.side_fillets()?;
        let arc_lo = start_corner.as_ref().map_or(ts, |c| c.arc_angle);
        let arc_hi = end_corner.as_ref().map_or(te, |c| c.arc_angle);
        if arc_lo > arc_hi {
            return Err(OutlineError::FilletTooLarge(f));
        }

        let n = self.circle_segments;
        let mut pts = Vec::new();
        pts.push(polar(r0, ts));
        match &start_corner {
            Some(c) => {
                let on_arc = polar(r1, c.arc_angle);
                pts.extend(arc_between(c.center, c.on_edge, on_arc, true, n));
            }
            None => pts.push(polar(r1, ts)),
        }

        match self.notch {
            Some(notch) => {
                let (lo, hi, bite) = self.notch_path(notch, arc_lo, arc_hi)?;
                pts.extend(circle_span(r1, arc_lo, lo, n));
                pts.extend(bite);
                pts.extend(circle_span(r1, hi, arc_hi, n));
            }
            None => pts.extend(circle_span(r1, arc_lo, arc_hi, n)),
        }

        match &end_corner {
            Some(c) => {
                let on_arc = polar(r1, c.arc_angle);
                pts.extend(arc_between(c.center, on_arc, c.on_edge, true, n));
            }
            None => pts.push(polar(r1, te)),
        }
        if r0 > 0.0 {
            pts.extend(circle_span(r0, te, ts, n));
        } else {
            pts.push(Point2::origin());
        }

        Ok(Profile2d::new(pts)?)
    }

    /// True when [`TabOutline::profile`] succeeds.
    pub fn is_valid(&self) -> bool {
        self.profile().is_ok()
    }

    fn side_fillets(&self) -> Result<(Option<SideFillet>, Option<SideFillet>), OutlineError> {
        let f = self.fillet_radius;
        if f == 0.0 {
            return Ok((None, None));
        }
        let rho = self.outer_radius - f;
        if rho <= f {
            return Err(OutlineError::FilletTooLarge(f));
        }
        let alpha = (f / rho).asin();
        let foot = rho * alpha.cos();
        if foot <= self.inner_radius {
            return Err(OutlineError::FilletTooLarge(f));
        }
        let make = |edge: f64, toward: f64| SideFillet {
            center: polar(rho, edge + toward * alpha),
            on_edge: polar(foot, edge),
            arc_angle: edge + toward * alpha,
        };
        Ok((Some(make(self.start_angle, 1.0)), Some(make(self.end_angle, -1.0))))
    }

    /// Angles where the notch leaves and rejoins the outer circle, and the
    /// points in between (fillets and notch arc).
    fn notch_path(
        &self,
        notch: Notch,
        arc_lo: f64,
        arc_hi: f64,
    ) -> Result<(f64, f64, Vec<Point2>), OutlineError> {
        let (r1, rn, f) = (self.outer_radius, notch.radius, self.fillet_radius);
        let c = notch.center;
        let d = c.coords.norm();
        if !(rn > 0.0) || d <= (r1 - rn).abs() || d >= r1 + rn {
            return Err(OutlineError::NotchMissesArc);
        }
        if d - rn <= self.inner_radius {
            return Err(OutlineError::NotchTooDeep);
        }
        let psi = heading(c.coords);
        // Widest angular reach of the notch as seen from the origin.
        let reach = if rn < d { (rn / d).asin() } else { TAU };
        if psi - reach <= self.start_angle || psi + reach >= self.end_angle {
            return Err(OutlineError::NotchMissesArc);
        }

        let n = self.circle_segments;
        if f == 0.0 {
            let beta = ((d * d + r1 * r1 - rn * rn) / (2.0 * d * r1)).clamp(-1.0, 1.0).acos();
            let (lo, hi) = (psi - beta, psi + beta);
            if lo < arc_lo || hi > arc_hi {
                return Err(OutlineError::NotchMissesArc);
            }
            let bite = arc_between(c, polar(r1, lo), polar(r1, hi), false, n);
            return Ok((lo, hi, bite));
        }

        let [first, second] = self.notch_fillets(notch, d)?;
        let lo = heading(first.on_outer.coords);
        let hi = heading(second.on_outer.coords);
        if lo < arc_lo || hi > arc_hi {
            return Err(OutlineError::FilletTooLarge(f));
        }
        let mut bite = arc_between(first.center, first.on_outer, first.on_notch, true, n);
        bite.extend(arc_between(c, first.on_notch, second.on_notch, false, n));
        bite.extend(arc_between(second.center, second.on_notch, second.on_outer, true, n));
        Ok((lo, hi, bite))
    }

    /// Fillet circles tangent inside the outer circle and outside the notch.
    fn notch_fillets(&self, notch: Notch, d: f64) -> Result<[NotchFillet; 2], OutlineError> {
        let (r1, rn, g) = (self.outer_radius, notch.radius, self.fillet_radius);
        let (ra, rb) = (r1 - g, rn + g);
        let a = (d * d + ra * ra - rb * rb) / (2.0 * d);
        let h2 = ra * ra - a * a;
        if ra <= 0.0 || h2 <= 0.0 {
            return Err(OutlineError::FilletTooLarge(g));
        }
        let h = h2.sqrt();
        let u = notch.center.coords / d;
        let perp = Vec2::new(-u.y, u.x);
        let make = |side: f64| {
            let center = Point2::from(u * a + perp * (side * h));
            NotchFillet {
                center,
                on_outer: Point2::from(center.coords * (r1 / ra)),
                on_notch: notch.center + (center - notch.center) * (rn / rb),
            }
        };
        Ok([make(-1.0), make(1.0)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn sector(fillet: f64, notch: Option<Notch>) -> TabOutline {
        TabOutline {
            inner_radius: 4.0,
            outer_radius: 6.0,
            start_angle: 72f64.to_radians(),
            end_angle: 108f64.to_radians(),
            fillet_radius: fillet,
            notch,
            circle_segments: 128,
        }
    }

    fn sector_area(t: &TabOutline) -> f64 {
        0.5 * (t.end_angle - t.start_angle) * (t.outer_radius.powi(2) - t.inner_radius.powi(2))
    }

    fn middle_notch() -> Notch {
        Notch {
            center: Point2::new(0.0, 6.2),
            radius: 0.6,
        }
    }

    #[test]
    fn test_sharp_sector_area() {
        let t = sector(0.0, None);
        let p = t.profile().unwrap();
        assert!(p.is_ccw());
        assert_relative_eq!(p.signed_area(), sector_area(&t), max_relative = 1e-3);
    }

    #[test]
    fn test_fillets_remove_a_little() {
        let sharp = sector(0.0, None).profile().unwrap().signed_area();
        let round = sector(0.3, None).profile().unwrap().signed_area();
        assert!(round < sharp);
        // Each outer corner loses the wedge swept to the tangent point, less
        // the triangle to the fillet foot and the fillet's own sector.
        let (r, f) = (6.0, 0.3);
        let rho: f64 = r - f;
        let alpha = (f / rho).asin();
        let wedge = 0.5 * r * r * alpha;
        let kept = 0.5 * rho * alpha.cos() * f + 0.5 * f * f * (FRAC_PI_2 + alpha);
        assert_relative_eq!(sharp - round, 2.0 * (wedge - kept), max_relative = 0.03);
    }

    #[test]
    fn test_outline_stays_inside_sector() {
        let t = sector(0.25, Some(middle_notch()));
        let p = t.profile().unwrap();
        for q in p.points() {
            let r = q.coords.norm();
            assert!(r >= 4.0 - 1e-9 && r <= 6.0 + 1e-9, "radius {r}");
            let a = heading(q.coords);
            assert!(a >= t.start_angle - 1e-9 && a <= t.end_angle + 1e-9);
            assert!((q - middle_notch().center).norm() >= 0.6 - 1e-9);
        }
    }

    #[test]
    fn test_notch_removes_area() {
        let plain = sector(0.1, None).profile().unwrap().signed_area();
        let notched = sector(0.1, Some(middle_notch())).profile().unwrap().signed_area();
        assert!(notched < plain);
        // Less than the whole notch disc.
        assert!(plain - notched < std::f64::consts::PI * 0.36);
    }

    #[test]
    fn test_sharp_notch() {
        let p = sector(0.0, Some(middle_notch())).profile().unwrap();
        let nearest = p
            .points()
            .iter()
            .map(|q| q.coords.norm())
            .filter(|r| *r > 5.0)
            .fold(f64::INFINITY, f64::min);
        assert_relative_eq!(nearest, 5.6, epsilon = 1e-2);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            sector(1.5, None).profile(),
            Err(OutlineError::FilletTooLarge(_))
        ));
        let mut t = sector(0.0, None);
        t.end_angle = t.start_angle;
        assert!(matches!(t.profile(), Err(OutlineError::EmptySector { .. })));

        let far = Notch {
            center: Point2::new(0.0, 9.0),
            radius: 0.5,
        };
        assert!(matches!(
            sector(0.1, Some(far)).profile(),
            Err(OutlineError::NotchMissesArc)
        ));
        let deep = Notch {
            center: Point2::new(0.0, 5.5),
            radius: 1.6,
        };
        assert!(matches!(
            sector(0.1, Some(deep)).profile(),
            Err(OutlineError::NotchTooDeep)
        ));
        let wide = Notch {
            center: Point2::new(0.0, 6.0),
            radius: 3.0,
        };
        assert!(sector(0.1, Some(wide)).profile().is_err());
        assert!(!sector(0.1, Some(wide)).is_valid());
    }

    #[test]
    fn test_pie_slice() {
        let mut t = sector(0.1, None);
        t.inner_radius = 0.0;
        let p = t.profile().unwrap();
        assert!(p.points().iter().any(|q| q.coords.norm() < 1e-12));
    }
}
