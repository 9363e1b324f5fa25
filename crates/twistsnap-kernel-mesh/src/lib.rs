#![warn(missing_docs)]

//! Polygon solids for the twistsnap kernel.
//!
//! A [`Solid`] is a closed soup of convex planar [`Polygon`]s wound
//! counter-clockwise when seen from outside. This is the representation the
//! BSP booleans operate on; [`Solid::to_mesh`] welds it into an indexed
//! [`TriangleMesh`] for export.
//!
//! Circular primitives place vertex `k` at angle `2πk / segments`, so two
//! primitives with the same radius and segment count share their rims.

mod aabb;
mod error;
mod mesh;
mod polygon;
mod primitives;
mod solid;
mod triangulate;

pub use aabb::Aabb;
pub use error::MeshError;
pub use mesh::TriangleMesh;
pub use polygon::{Plane, Polygon, Split};
pub use primitives::{make_box, make_cone, make_cylinder};
pub use solid::Solid;
pub use triangulate::{ear_clip, signed_area_2d};

pub use twistsnap_kernel_math as math;
