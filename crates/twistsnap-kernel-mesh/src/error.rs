//! Error types for solid construction.

use thiserror::Error;

/// Errors raised while building primitive solids.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// A dimension that must be positive was zero, negative or not finite.
    #[error("invalid {name}: {value} (must be positive)")]
    InvalidDimension {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// Circular primitives need at least three segments.
    #[error("too few segments: {0} (need at least 3)")]
    TooFewSegments(u32),

    /// A triangle referred to a point that does not exist.
    #[error("triangle {triangle} uses point {index}, but there are only {points}")]
    IndexOutOfRange {
        /// Position of the triangle in its list.
        triangle: usize,
        /// Offending point index.
        index: usize,
        /// Number of points available.
        points: usize,
    },
}

impl MeshError {
    /// Fail unless `value` is finite and strictly positive.
    pub fn check_positive(name: &'static str, value: f64) -> Result<(), Self> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(Self::InvalidDimension { name, value })
        }
    }

    /// Fail unless `segments` describes a real polygon.
    pub fn check_segments(segments: u32) -> Result<(), Self> {
        if segments >= 3 {
            Ok(())
        } else {
            Err(Self::TooFewSegments(segments))
        }
    }
}
