#![warn(missing_docs)]

//! CSG boolean operations on polygon solids for the twistsnap kernel.
//!
//! Implements union, difference, and intersection with the BSP-tree
//! algorithm from csg.js:
//! 1. **AABB filter**: disjoint operands take a shortcut
//! 2. **Build**: each operand becomes a BSP tree of its own polygons
//! 3. **Clip**: each tree removes the other's polygons on the wrong side
//! 4. **Collect**: surviving polygons form the result solid
//!
//! Trees live in an arena and every traversal is iterative.

mod api;
pub mod bsp;

pub use api::{boolean_op, union_all, BooleanOp};
