#![warn(missing_docs)]

//! STEP file export for the twistsnap kernel.
//!
//! Writes triangle meshes as ISO 10303-21 exchange structures targeting
//! AP214 (Automotive Design). Each body becomes a `FACETED_BREP`: a closed
//! shell of planar triangular faces bounded by `POLY_LOOP`s.
//!
//! # Example
//!
//! ```no_run
//! use twistsnap_kernel_mesh::make_cylinder;
//! use twistsnap_kernel_step::{write_step, StepBody};
//!
//! let mesh = make_cylinder(5.0, 10.0, 32).unwrap().to_mesh();
//! let body = StepBody::new("cylinder", &mesh);
//! write_step("cylinder.step", "cylinder", &[body]).unwrap();
//! ```

mod entities;
mod error;
mod writer;

pub use error::StepError;
pub use writer::{write_step, write_step_to_buffer, StepBody};
