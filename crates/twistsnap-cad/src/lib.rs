#![warn(missing_docs)]

//! Named parts and assemblies on the twistsnap kernel.
//!
//! CSG modeling with STL and STEP export.
//!
//! # Example
//!
//! ```rust,no_run
//! use twistsnap_cad::{centered_cylinder, Part};
//!
//! let body = Part::cylinder("body", 10.0, 4.0, 64).unwrap();
//! let bore = centered_cylinder("bore", 5.0, 10.0, 64).unwrap();
//! let tube = body.difference(&bore);
//! tube.write_stl("tube.stl").unwrap();
//! ```

use nalgebra::Vector3;
use thiserror::Error;
use twistsnap_kernel_booleans::{boolean_op, union_all, BooleanOp};
use twistsnap_kernel_math::Transform;
use twistsnap_kernel_mesh::{make_box, make_cone, make_cylinder, MeshError, Solid, TriangleMesh};
use twistsnap_kernel_step::StepError;

pub mod export;

pub use export::Exportable;

/// Errors returned by CAD operations.
#[derive(Error, Debug)]
pub enum CadError {
    /// An I/O error occurred during export.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The geometry is empty (no triangles).
    #[error("Empty geometry")]
    EmptyGeometry,
    /// Primitive construction failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),
    /// STEP writing failed.
    #[error(transparent)]
    Step(#[from] StepError),
}

/// A named part with geometry.
///
/// Parts are the primary building block. Create primitives with
/// [`Part::cube`], [`Part::cylinder`] or [`Part::cone`], or wrap a kernel
/// solid with [`Part::from_solid`], then combine them with CSG operations
/// ([`Part::union`], [`Part::difference`], [`Part::intersection`]) or the
/// operator shorthands (`+`, `-`, `&`).
#[derive(Debug, Clone)]
pub struct Part {
    /// Human-readable name for this part (used in export file names and bodies).
    pub name: String,
    solid: Solid,
}

impl Part {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create an empty part.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::from_solid(name, Solid::empty())
    }

    /// Wrap a kernel solid.
    pub fn from_solid(name: impl Into<String>, solid: Solid) -> Self {
        Self {
            name: name.into(),
            solid,
        }
    }

    /// Create a box with one corner at the origin.
    pub fn cube(name: impl Into<String>, x: f64, y: f64, z: f64) -> Result<Self, CadError> {
        Ok(Self::from_solid(name, make_box(x, y, z)?))
    }

    /// Create a cylinder along Z with its base on z = 0.
    pub fn cylinder(
        name: impl Into<String>,
        radius: f64,
        height: f64,
        segments: u32,
    ) -> Result<Self, CadError> {
        Ok(Self::from_solid(name, make_cylinder(radius, height, segments)?))
    }

    /// Create a cone/tapered cylinder with its base on z = 0.
    pub fn cone(
        name: impl Into<String>,
        radius_bottom: f64,
        radius_top: f64,
        height: f64,
        segments: u32,
    ) -> Result<Self, CadError> {
        Ok(Self::from_solid(
            name,
            make_cone(radius_bottom, radius_top, height, segments)?,
        ))
    }

    /// The underlying kernel solid.
    pub fn solid(&self) -> &Solid {
        &self.solid
    }

    /// Consume the part, returning its solid.
    pub fn into_solid(self) -> Solid {
        self.solid
    }

    /// Same geometry under a new name.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    // =========================================================================
    // CSG operations
    // =========================================================================

    /// Boolean difference (self - other).
    pub fn difference(&self, other: &Part) -> Self {
        Self::from_solid(
            format!("{}-diff", self.name),
            boolean_op(&self.solid, &other.solid, BooleanOp::Difference),
        )
    }

    /// Boolean union (self + other).
    pub fn union(&self, other: &Part) -> Self {
        Self::from_solid(
            format!("{}-union", self.name),
            boolean_op(&self.solid, &other.solid, BooleanOp::Union),
        )
    }

    /// Boolean intersection.
    pub fn intersection(&self, other: &Part) -> Self {
        Self::from_solid(
            format!("{}-intersect", self.name),
            boolean_op(&self.solid, &other.solid, BooleanOp::Intersection),
        )
    }

    // =========================================================================
    // Transforms
    // =========================================================================

    /// Apply an arbitrary affine transform.
    pub fn transform(&self, t: &Transform) -> Self {
        Self::from_solid(self.name.clone(), self.solid.transform(t))
    }

    /// Translate the part.
    pub fn translate(&self, x: f64, y: f64, z: f64) -> Self {
        Self::from_solid(self.name.clone(), self.solid.translate(x, y, z))
    }

    /// Translate by vector.
    pub fn translate_vec(&self, v: Vector3<f64>) -> Self {
        self.translate(v.x, v.y, v.z)
    }

    /// Rotate the part (angles in degrees, about X then Y then Z).
    pub fn rotate(&self, x_deg: f64, y_deg: f64, z_deg: f64) -> Self {
        Self::from_solid(self.name.clone(), self.solid.rotate_deg(x_deg, y_deg, z_deg))
    }

    /// Rotate about the Y axis (degrees).
    pub fn rotate_about_y(&self, deg: f64) -> Self {
        self.rotate(0.0, deg, 0.0)
    }

    /// Scale the part.
    pub fn scale(&self, x: f64, y: f64, z: f64) -> Self {
        Self::from_solid(self.name.clone(), self.solid.scale(x, y, z))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Check if geometry is empty.
    pub fn is_empty(&self) -> bool {
        self.solid.is_empty()
    }

    /// Get the welded triangle mesh.
    pub fn to_mesh(&self) -> TriangleMesh {
        self.solid.to_mesh()
    }

    /// Export to binary STL bytes (delegates to [`export::stl::to_stl_bytes`]).
    pub fn to_stl(&self) -> Result<Vec<u8>, CadError> {
        export::stl::to_stl_bytes(self)
    }

    /// Write STL to file (delegates to [`export::stl::export_stl`]).
    pub fn write_stl(&self, path: impl AsRef<std::path::Path>) -> Result<(), CadError> {
        export::stl::export_stl(self, path)
    }

    /// Write a faceted STEP file (delegates to [`export::step::export_step`]).
    pub fn write_step(&self, path: impl AsRef<std::path::Path>) -> Result<(), CadError> {
        export::step::export_step(self, path)
    }
}

/// Helper to create a cylinder centered on the origin.
pub fn centered_cylinder(
    name: impl Into<String>,
    radius: f64,
    height: f64,
    segments: u32,
) -> Result<Part, CadError> {
    Ok(Part::cylinder(name, radius, height, segments)?.translate(0.0, 0.0, -height / 2.0))
}

// =============================================================================
// Operator overloads for ergonomic CSG
// =============================================================================

/// Union: `&a + &b`
impl std::ops::Add for &Part {
    type Output = Part;
    fn add(self, rhs: &Part) -> Part {
        self.union(rhs)
    }
}

/// Union: `a + b`
impl std::ops::Add for Part {
    type Output = Part;
    fn add(self, rhs: Part) -> Part {
        self.union(&rhs)
    }
}

/// Difference: `&a - &b`
impl std::ops::Sub for &Part {
    type Output = Part;
    fn sub(self, rhs: &Part) -> Part {
        self.difference(rhs)
    }
}

/// Difference: `a - b`
impl std::ops::Sub for Part {
    type Output = Part;
    fn sub(self, rhs: Part) -> Part {
        self.difference(&rhs)
    }
}

/// Intersection: `&a & &b`
impl std::ops::BitAnd for &Part {
    type Output = Part;
    fn bitand(self, rhs: &Part) -> Part {
        self.intersection(rhs)
    }
}

/// Intersection: `a & b`
impl std::ops::BitAnd for Part {
    type Output = Part;
    fn bitand(self, rhs: Part) -> Part {
        self.intersection(&rhs)
    }
}

// =============================================================================
// Mass properties
// =============================================================================

impl Part {
    /// Enclosed volume.
    pub fn volume(&self) -> f64 {
        self.solid.volume()
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        self.solid.surface_area()
    }

    /// Axis-aligned bounding box as `(min, max)`; zeros when empty.
    pub fn bounding_box(&self) -> ([f64; 3], [f64; 3]) {
        match self.solid.bounding_box() {
            Some(b) => ([b.min.x, b.min.y, b.min.z], [b.max.x, b.max.y, b.max.z]),
            None => ([0.0; 3], [0.0; 3]),
        }
    }

    /// Geometric centroid (uniform density); the origin when empty.
    pub fn center_of_mass(&self) -> [f64; 3] {
        self.solid
            .center_of_mass()
            .map_or([0.0; 3], |c| [c.x, c.y, c.z])
    }

    /// Number of triangles in the exported mesh.
    pub fn num_triangles(&self) -> usize {
        self.to_mesh().num_triangles()
    }
}

// =============================================================================
// Mirror and pattern transforms
// =============================================================================

impl Part {
    /// Mirror across the YZ plane (negate X).
    pub fn mirror_x(&self) -> Part {
        self.scale(-1.0, 1.0, 1.0)
    }

    /// Mirror across the XZ plane (negate Y).
    pub fn mirror_y(&self) -> Part {
        self.scale(1.0, -1.0, 1.0)
    }

    /// Mirror across the XY plane (negate Z).
    pub fn mirror_z(&self) -> Part {
        self.scale(1.0, 1.0, -1.0)
    }

    /// Union of `count` copies rotated about the Z axis.
    ///
    /// Copy `k` is rotated by `start_angle_deg + 360° * k / count`. The
    /// part is not moved outward first; place it at its radius beforehand.
    pub fn polar_pattern(&self, count: usize, start_angle_deg: f64) -> Part {
        let copies: Vec<Solid> = (0..count)
            .map(|k| {
                let angle = start_angle_deg + 360.0 * k as f64 / count as f64;
                self.solid.rotate_deg(0.0, 0.0, angle)
            })
            .collect();
        Self::from_solid(format!("{}-polar", self.name), union_all(&copies))
    }
}

// =============================================================================
// Assembly (labelled compound)
// =============================================================================

/// A labelled group of parts that stay separate bodies.
///
/// Unlike [`Part::union`], which merges geometry into one solid, an
/// assembly keeps each child so STEP export can write one body per child.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// Label of the compound (used as the STEP product name).
    pub label: String,
    /// Child parts in order.
    pub children: Vec<Part>,
}

impl Assembly {
    /// Create an empty assembly.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// Create an assembly from existing parts.
    pub fn with_children(label: impl Into<String>, children: Vec<Part>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    /// Append a part.
    pub fn add(&mut self, part: Part) {
        self.children.push(part);
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True when there are no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&Part> {
        self.children.iter().find(|p| p.name == name)
    }

    /// Sum of the children's volumes.
    pub fn volume(&self) -> f64 {
        self.children.iter().map(Part::volume).sum()
    }

    /// Sum of the children's surface areas.
    pub fn surface_area(&self) -> f64 {
        self.children.iter().map(Part::surface_area).sum()
    }

    /// Bounding box over all children; zeros when every child is empty.
    pub fn bounding_box(&self) -> ([f64; 3], [f64; 3]) {
        self.children
            .iter()
            .filter_map(|p| p.solid().bounding_box())
            .reduce(|a, b| a.union(&b))
            .map_or(([0.0; 3], [0.0; 3]), |b| {
                ([b.min.x, b.min.y, b.min.z], [b.max.x, b.max.y, b.max.z])
            })
    }

    /// All children merged into one mesh.
    pub fn to_mesh(&self) -> TriangleMesh {
        let mut mesh = TriangleMesh::new();
        for child in &self.children {
            mesh.merge(&child.to_mesh());
        }
        mesh
    }

    /// Triangle count over all children.
    pub fn num_triangles(&self) -> usize {
        self.children.iter().map(Part::num_triangles).sum()
    }

    /// Write every child into one STL file.
    pub fn write_stl(&self, path: impl AsRef<std::path::Path>) -> Result<(), CadError> {
        export::stl::export_stl(self, path)
    }

    /// Write a STEP file with one body per child.
    pub fn write_step(&self, path: impl AsRef<std::path::Path>) -> Result<(), CadError> {
        export::step::export_step(self, path)
    }
}

impl From<Part> for Assembly {
    fn from(part: Part) -> Self {
        Self::with_children(part.name.clone(), vec![part])
    }
}
