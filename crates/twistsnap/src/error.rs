//! Error types for connector configuration, geometry and export.

use thiserror::Error;
use twistsnap_cad::CadError;
use twistsnap_kernel_sweep::{FilletError, SweepError};

/// Errors from loading, saving or validating a connector configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed.
    #[error("config I/O error at {path}: {source}")]
    Io {
        /// File involved.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The text is not valid TOML, or a known key has a non-numeric value.
    #[error("invalid config at {path}: {message}")]
    ParseError {
        /// File involved, or `<string>`.
        path: String,
        /// What went wrong.
        message: String,
    },

    /// The store could not be written as TOML.
    #[error("could not serialize config: {0}")]
    Serialize(String),

    /// A value parsed but is out of range.
    #[error("invalid {field}: {message}")]
    ValidationFailed {
        /// `section.key` of the offending value.
        field: String,
        /// Why it was rejected.
        message: String,
    },
}

/// Errors from building a tab outline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OutlineError {
    /// Radii or angles describe an empty sector.
    #[error("empty sector: radii {inner}..{outer}, angles {start}..{end}")]
    EmptySector {
        /// Inner radius.
        inner: f64,
        /// Outer radius.
        outer: f64,
        /// Start angle (radians).
        start: f64,
        /// End angle (radians).
        end: f64,
    },

    /// Corner fillets would overlap or run off their edges.
    #[error("fillet radius {0} does not fit the outline")]
    FilletTooLarge(f64),

    /// The notch circle does not cross the outer arc inside the sector.
    #[error("notch misses the outer arc")]
    NotchMissesArc,

    /// The notch reaches the inner radius.
    #[error("notch cuts through the inner radius")]
    NotchTooDeep,

    /// The finished outline is not a valid profile.
    #[error(transparent)]
    Profile(#[from] SweepError),
}

/// Top-level error for connector and fitting construction.
#[derive(Debug, Error)]
pub enum TwistSnapError {
    /// Configuration problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Tab outline could not be built.
    #[error(transparent)]
    Outline(#[from] OutlineError),

    /// Profile, sweep, loft or thread construction failed.
    #[error(transparent)]
    Sweep(#[from] SweepError),

    /// 2D fillet failed.
    #[error(transparent)]
    Fillet(#[from] FilletError),

    /// Part construction or export failed.
    #[error(transparent)]
    Cad(#[from] CadError),

    /// A fitting parameter is out of range.
    #[error("invalid fitting parameter {name}: {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// The catalog file could not be read or parsed.
    #[error("catalog error at {path}: {message}")]
    Catalog {
        /// File involved, or `<string>`.
        path: String,
        /// What went wrong.
        message: String,
    },

    /// No catalog entry has this name.
    #[error("unknown fitting {0:?}")]
    UnknownFitting(String),

    /// Unknown export format name.
    #[error("unknown export format {0:?} (expected stl or step)")]
    UnknownFormat(String),

    /// Creating an output directory failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path involved.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for this crate.
pub type Result<T, E = TwistSnapError> = std::result::Result<T, E>;
