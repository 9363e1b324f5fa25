//! Trapezoidal (ACME-style) screw threads.
//!
//! The thread is a trapezoid swept along a helix about +Z. Dimensions
//! follow the usual trapezoidal thread rules: depth is half the pitch,
//! and the flanks lean by half the thread angle.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use twistsnap_kernel_booleans::{boolean_op, BooleanOp};
use twistsnap_kernel_math::{Point2, Point3, Transform};
use twistsnap_kernel_mesh::{make_cylinder, Polygon, Solid};

use crate::extrude::cap_polygons;
use crate::sweep::sweep_arc;
use crate::{Profile2d, SweepError};

/// How the thread ends at z = 0 and z = length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndFinish {
    /// Full profile that stops short of both ends.
    Raw,
    /// Cut flat by the end planes.
    Square,
    /// Depth tapers to nothing over a quarter turn at each end.
    #[default]
    Fade,
    /// Cut flat by the end planes, then trimmed by a 45° cone at each end
    /// so the crest meets the end face at the root.
    Chamfer,
}

impl FromStr for EndFinish {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(Self::Raw),
            "square" => Ok(Self::Square),
            "fade" => Ok(Self::Fade),
            "chamfer" => Ok(Self::Chamfer),
            other => Err(SweepError::UnknownEndFinish(other.to_string())),
        }
    }
}

impl fmt::Display for EndFinish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Raw => "raw",
            Self::Square => "square",
            Self::Fade => "fade",
            Self::Chamfer => "chamfer",
        })
    }
}

/// Thread handedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    /// Counter-clockwise with rising z (seen from above).
    #[default]
    Right,
    /// Clockwise with rising z.
    Left,
}

impl FromStr for Hand {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "right" => Ok(Self::Right),
            "left" => Ok(Self::Left),
            other => Err(SweepError::UnknownHand(other.to_string())),
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Right => "right",
            Self::Left => "left",
        })
    }
}

/// A trapezoidal thread spanning z ∈ [0, length].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrapezoidalThread {
    /// Major diameter.
    pub diameter: f64,
    /// Axial distance between turns.
    pub pitch: f64,
    /// Overall length along Z.
    pub length: f64,
    /// Included flank angle in degrees.
    pub thread_angle: f64,
    /// External (bolt) or internal (nut) thread.
    pub external: bool,
    /// Handedness.
    pub hand: Hand,
    /// End treatment.
    pub end_finish: EndFinish,
}

impl TrapezoidalThread {
    /// Radial depth of the thread.
    pub fn depth(&self) -> f64 {
        self.pitch / 2.0
    }

    /// Axial width lost on each flank.
    pub fn shoulder_width(&self) -> f64 {
        (self.pitch / 2.0) * (self.thread_angle.to_radians() / 2.0).tan()
    }

    /// Axial width of the thread crest.
    pub fn apex_width(&self) -> f64 {
        self.pitch / 2.0 - self.shoulder_width()
    }

    /// Axial width where the thread meets its body.
    pub fn root_width(&self) -> f64 {
        self.pitch / 2.0 + self.shoulder_width()
    }

    /// Radius of the root (attached side).
    pub fn root_radius(&self) -> f64 {
        if self.external {
            self.diameter / 2.0 - self.depth()
        } else {
            self.diameter / 2.0
        }
    }

    /// Radius of the apex (free side).
    pub fn apex_radius(&self) -> f64 {
        if self.external {
            self.diameter / 2.0
        } else {
            self.diameter / 2.0 - self.depth()
        }
    }

    fn validate(&self) -> Result<(), SweepError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.diameter) || !positive(self.pitch) || !positive(self.length) {
            return Err(SweepError::InvalidThread(format!(
                "diameter, pitch and length must be positive (got {}, {}, {})",
                self.diameter, self.pitch, self.length
            )));
        }
        if !(self.thread_angle > 0.0 && self.apex_width() > 0.0) {
            return Err(SweepError::InvalidThread(format!(
                "thread angle {} leaves no crest",
                self.thread_angle
            )));
        }
        if self.depth() >= self.diameter / 2.0 {
            return Err(SweepError::InvalidThread(format!(
                "pitch {} too coarse for diameter {}",
                self.pitch, self.diameter
            )));
        }
        let clipped = matches!(self.end_finish, EndFinish::Square | EndFinish::Chamfer);
        if !clipped && self.root_width() > self.length {
            return Err(SweepError::InvalidThread(format!(
                "length {} shorter than one thread profile",
                self.length
            )));
        }
        Ok(())
    }

    /// Build the thread solid with `segments_per_turn` helix stations per turn.
    pub fn solid(&self, segments_per_turn: u32) -> Result<Solid, SweepError> {
        self.validate()?;
        let half_root = self.root_width() / 2.0;
        let (z_start, z_end) = match self.end_finish {
            EndFinish::Raw | EndFinish::Fade => (half_root, self.length - half_root),
            EndFinish::Square | EndFinish::Chamfer => (-self.pitch, self.length + self.pitch),
        };
        let fade = self.end_finish == EndFinish::Fade;
        let helix = self.helix(z_start, z_end, segments_per_turn.max(8), fade);

        tracing::debug!(
            polygons = helix.num_polygons(),
            finish = %self.end_finish,
            hand = %self.hand,
            "built thread helix"
        );
        let segments = segments_per_turn.max(8);
        let helix = match self.end_finish {
            EndFinish::Square | EndFinish::Chamfer => {
                let slab = make_cylinder(self.diameter / 2.0 + self.pitch, self.length, segments)?;
                boolean_op(&helix, &slab, BooleanOp::Intersection)
            }
            _ => helix,
        };
        let helix = match self.end_finish {
            EndFinish::Chamfer => self.chamfered(helix, segments)?,
            _ => helix,
        };

        Ok(match self.hand {
            Hand::Right => helix,
            Hand::Left => helix.transform(&Transform::scale(1.0, -1.0, 1.0)),
        })
    }

    /// Remove the crest side of a 45° line through the root at each end.
    fn chamfered(&self, thread: Solid, segments: u32) -> Result<Solid, SweepError> {
        let (root, apex, depth) = (self.root_radius(), self.apex_radius(), self.depth());
        let toward_apex = (apex - root).signum();
        let behind = root - toward_apex * depth;
        let beyond = apex + toward_apex * depth;
        let mut cut = thread;
        let ends = [
            (-depth, 2.0 * depth),
            (self.length + depth, self.length - 2.0 * depth),
        ];
        for (base, tip) in ends {
            let corner = Profile2d::new(vec![
                Point2::new(behind, base),
                Point2::new(beyond, base),
                Point2::new(beyond, tip),
            ])?;
            let cone = sweep_arc(&corner, 0.0, TAU, segments)?;
            cut = boolean_op(&cut, &cone, BooleanOp::Difference);
        }
        Ok(cut)
    }

    /// Right-handed helical sweep of the profile centre from `z_start` to `z_end`.
    fn helix(&self, z_start: f64, z_end: f64, segments_per_turn: u32, fade: bool) -> Solid {
        let turns_angle = TAU * (z_end - z_start) / self.pitch;
        let steps = ((segments_per_turn as f64 * turns_angle / TAU).ceil() as usize).max(2);

        let (r0, r1) = (self.root_radius(), self.apex_radius());
        let (hr, ha) = (self.root_width() / 2.0, self.apex_width() / 2.0);
        // Root edge then apex edge, wound CCW in (radial, z).
        let mut root_apex = [
            (Point2::new(r0, -hr), Point2::new(r1, -ha)),
            (Point2::new(r0, hr), Point2::new(r1, ha)),
        ];
        if r1 > r0 {
            root_apex.reverse();
        }

        let station = |i: usize| -> Vec<Point2> {
            let phi = turns_angle * i as f64 / steps as f64;
            let f = if fade {
                (phi / FRAC_PI_2).min((turns_angle - phi) / FRAC_PI_2).clamp(0.0, 1.0)
            } else {
                1.0
            };
            let lerp = |root: Point2, apex: Point2| root + (apex - root) * f;
            let [(ra, aa), (rb, ab)] = root_apex;
            vec![ra, rb, lerp(rb, ab), lerp(ra, aa)]
        };
        let place = |p: &Point2, i: usize| {
            let phi = turns_angle * i as f64 / steps as f64;
            let z = z_start + self.pitch * phi / TAU;
            Point3::new(p.x * phi.cos(), p.x * phi.sin(), p.y + z)
        };

        let rings: Vec<Vec<Point3>> = (0..=steps)
            .map(|i| station(i).iter().map(|p| place(p, i)).collect())
            .collect();

        let mut polygons = Vec::with_capacity(steps * 8 + 4);
        for s in 0..steps {
            let (here, there) = (&rings[s], &rings[s + 1]);
            for a in 0..4 {
                let b = (a + 1) % 4;
                polygons.extend(Polygon::new(vec![here[a], there[a], there[b]]));
                polygons.extend(Polygon::new(vec![here[a], there[b], here[b]]));
            }
        }

        for (i, reverse) in [(0, false), (steps, true)] {
            if let Ok(profile) = Profile2d::new(station(i)) {
                let profile = profile.to_ccw();
                polygons.extend(cap_polygons(&profile, |p| place(p, i), reverse));
            }
        }
        Solid::from_polygons(polygons)
    }
}
