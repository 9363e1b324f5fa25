//! Closed 2D profiles.

use std::f64::consts::TAU;

use twistsnap_kernel_math::{Point2, Vec2};
use twistsnap_kernel_mesh::signed_area_2d;

use crate::fillet::{fillet_corner, tangent_length};
use crate::{FilletError, SweepError};

/// Consecutive points closer than this are merged.
const MERGE_DISTANCE: f64 = 1e-9;

/// Drop consecutive repeats, including a last point equal to the first.
fn merge_points(points: Vec<Point2>) -> Vec<Point2> {
    let mut merged: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if merged
            .last()
            .map_or(true, |last| (p - last).norm() > MERGE_DISTANCE)
        {
            merged.push(p);
        }
    }
    while merged.len() > 1 && (merged[0] - merged[merged.len() - 1]).norm() <= MERGE_DISTANCE {
        merged.pop();
    }
    merged
}

/// A closed polygonal profile in a 2D sketch plane.
///
/// The closing edge from the last point back to the first is implicit.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile2d {
    points: Vec<Point2>,
}

impl Profile2d {
    /// Create a profile, merging repeated points.
    ///
    /// # Errors
    ///
    /// Fails with fewer than three distinct points or zero enclosed area.
    pub fn new(points: Vec<Point2>) -> Result<Self, SweepError> {
        let merged = merge_points(points);
        if merged.len() < 3 {
            return Err(SweepError::InvalidProfile(format!(
                "need at least 3 distinct points, got {}",
                merged.len()
            )));
        }
        if signed_area_2d(&merged).abs() < 1e-12 {
            return Err(SweepError::InvalidProfile("zero area".into()));
        }
        Ok(Self { points: merged })
    }

    /// Axis-aligned rectangle between two corners.
    pub fn rectangle(min: Point2, max: Point2) -> Result<Self, SweepError> {
        Self::new(vec![
            min,
            Point2::new(max.x, min.y),
            max,
            Point2::new(min.x, max.y),
        ])
    }

    /// Circle about the origin with vertex `k` at angle `2πk / segments`.
    pub fn circle(radius: f64, segments: u32) -> Result<Self, SweepError> {
        Self::regular_polygon(radius, segments, 0.0)
    }

    /// Regular polygon about the origin, first vertex at `rotation_deg`.
    pub fn regular_polygon(
        circumradius: f64,
        sides: u32,
        rotation_deg: f64,
    ) -> Result<Self, SweepError> {
        if !(circumradius.is_finite() && circumradius > 0.0) || sides < 3 {
            return Err(SweepError::InvalidProfile(format!(
                "regular polygon needs positive radius and 3+ sides, got r={circumradius}, n={sides}"
            )));
        }
        let rot = rotation_deg.to_radians();
        Self::new(
            (0..sides)
                .map(|k| {
                    let a = rot + TAU * k as f64 / sides as f64;
                    Point2::new(circumradius * a.cos(), circumradius * a.sin())
                })
                .collect(),
        )
    }

    /// Points in order.
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; profiles have at least three points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed area (positive when counter-clockwise).
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.points)
    }

    /// True when wound counter-clockwise.
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Same profile wound counter-clockwise.
    pub fn to_ccw(&self) -> Self {
        if self.is_ccw() {
            self.clone()
        } else {
            Self {
                points: self.points.iter().rev().copied().collect(),
            }
        }
    }

    /// Area centroid.
    pub fn centroid(&self) -> Point2 {
        let n = self.points.len();
        let mut c = Vec2::zeros();
        let mut a2 = 0.0;
        for i in 0..n {
            let p = &self.points[i];
            let q = &self.points[(i + 1) % n];
            let cross = p.x * q.y - q.x * p.y;
            a2 += cross;
            c += (p.coords + q.coords) * cross;
        }
        Point2::from(c / (3.0 * a2))
    }

    /// True when no corner turns against the winding (collinear allowed).
    pub fn is_convex(&self) -> bool {
        let sign = if self.is_ccw() { 1.0 } else { -1.0 };
        let n = self.points.len();
        (0..n).all(|i| {
            let a = &self.points[i];
            let b = &self.points[(i + 1) % n];
            let c = &self.points[(i + 2) % n];
            let cross = (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x);
            sign * cross >= -1e-12
        })
    }

    /// Translate every point.
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            points: self.points.iter().map(|p| p + offset).collect(),
        }
    }

    /// Resample with `n` rays from the origin at angles `2πk / n`.
    ///
    /// Each ray keeps its nearest boundary crossing. The profile must be
    /// star-shaped about the origin.
    pub fn resample_polar(&self, n: u32) -> Result<Self, SweepError> {
        if n < 3 {
            return Err(SweepError::InvalidProfile(format!(
                "polar resample needs 3+ rays, got {n}"
            )));
        }
        let m = self.points.len();
        let mut out = Vec::with_capacity(n as usize);
        for k in 0..n {
            let phi = TAU * k as f64 / n as f64;
            let d = Vec2::new(phi.cos(), phi.sin());
            let mut best: Option<f64> = None;
            for i in 0..m {
                let p = self.points[i].coords;
                let e = self.points[(i + 1) % m].coords - p;
                let denom = e.x * d.y - e.y * d.x;
                if denom.abs() < 1e-15 {
                    continue;
                }
                let s = -(p.x * d.y - p.y * d.x) / denom;
                if !(-1e-12..=1.0 + 1e-12).contains(&s) {
                    continue;
                }
                let t = (p + e * s).dot(&d);
                if t > 1e-12 && best.map_or(true, |b| t < b) {
                    best = Some(t);
                }
            }
            let t = best.ok_or_else(|| {
                SweepError::InvalidProfile("profile is not star-shaped about the origin".into())
            })?;
            out.push(Point2::from(d * t));
        }
        Self::new(out)
    }

    /// Round every corner with `radius`, using `segments` per arc.
    ///
    /// # Errors
    ///
    /// [`FilletError::TooLarge`] when two neighbouring fillets would
    /// overlap on their shared edge.
    pub fn fillet_vertices(&self, radius: f64, segments: u32) -> Result<Self, FilletError> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(FilletError::InvalidRadius(radius));
        }
        let n = self.points.len();
        let at = |i: usize| &self.points[i % n];

        // Tangent length per unit radius at each corner.
        let unit: Vec<f64> = (0..n)
            .map(|i| tangent_length(at(i + n - 1), at(i), at(i + 1), 1.0))
            .collect();
        for i in 0..n {
            let j = (i + 1) % n;
            let edge = (at(j) - at(i)).norm();
            if radius * (unit[i] + unit[j]) > edge + 1e-12 {
                let max = (0..n)
                    .map(|i| {
                        let j = (i + 1) % n;
                        (at(j) - at(i)).norm() / (unit[i] + unit[j])
                    })
                    .fold(f64::INFINITY, f64::min);
                return Err(FilletError::TooLarge { radius, max });
            }
        }

        let mut points = Vec::new();
        for i in 0..n {
            points.extend(fillet_corner(at(i + n - 1), at(i), at(i + 1), radius, segments)?);
        }
        Ok(Self {
            points: merge_points(points),
        })
    }
}
