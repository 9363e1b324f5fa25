use thiserror::Error;
use twistsnap_kernel_mesh::MeshError;

/// Errors from profile, sweep, loft and thread construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SweepError {
    /// A loft needs at least two sections.
    #[error("need at least 2 profiles, got {0}")]
    TooFewProfiles(usize),

    /// The profile cannot be used for the requested operation.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// Sweep angle is zero or exceeds a full turn.
    #[error("invalid sweep angle: {0} radians")]
    InvalidSweepAngle(f64),

    /// Extrusion or loft heights are not strictly increasing.
    #[error("invalid extent: {0} to {1}")]
    InvalidExtent(f64, f64),

    /// Thread dimensions are inconsistent.
    #[error("invalid thread: {0}")]
    InvalidThread(String),

    /// Unknown end finish name.
    #[error("end finish must be one of raw, square or fade, got {0:?}")]
    UnknownEndFinish(String),

    /// Unknown thread hand.
    #[error("hand must be right or left, got {0:?}")]
    UnknownHand(String),

    /// Propagated from primitive construction.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Errors from 2D corner filleting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilletError {
    /// The tangent points would run past an adjacent edge.
    #[error("fillet radius {radius} too large (max {max})")]
    TooLarge {
        /// Requested radius.
        radius: f64,
        /// Largest feasible radius.
        max: f64,
    },

    /// Radius is negative or not finite.
    #[error("invalid fillet radius {0}")]
    InvalidRadius(f64),
}
