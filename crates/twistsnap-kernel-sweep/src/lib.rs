#![warn(missing_docs)]

//! Profile-driven solids for the twistsnap kernel.
//!
//! Everything here starts from a closed [`Profile2d`]:
//!
//! - [`extrude`] pushes a profile in the XY plane along +Z
//! - [`sweep_arc`] carries a `(radial, z)` profile around the Z axis
//! - [`loft`] joins horizontal sections with ruled faces
//! - [`TrapezoidalThread`] sweeps a trapezoid along a helix
//!
//! Corners are rounded in 2D with [`Profile2d::fillet_vertices`] or
//! [`fillet_corner`] before the profile becomes a solid.

mod error;
mod extrude;
mod fillet;
mod loft;
mod profile;
mod sweep;
mod thread;

pub use error::{FilletError, SweepError};
pub use extrude::extrude;
pub use fillet::{arc_points, fillet_corner, max_corner_fillet};
pub use loft::{loft, LoftOptions};
pub use profile::Profile2d;
pub use sweep::sweep_arc;
pub use thread::{EndFinish, Hand, TrapezoidalThread};
