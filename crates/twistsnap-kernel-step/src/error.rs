//! Error types for STEP file operations.

use thiserror::Error;

/// Errors that can occur while writing a STEP file.
#[derive(Error, Debug)]
pub enum StepError {
    /// I/O error writing the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A body, or the whole file, has no triangles to write.
    #[error("nothing to write for {0:?}: mesh has no faces")]
    EmptyMesh(String),
}
