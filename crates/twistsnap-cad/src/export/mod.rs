//! Export formats.
//!
//! Both [`Part`](crate::Part) and [`Assembly`](crate::Assembly) implement
//! [`Exportable`], so every writer accepts either.

pub mod step;
pub mod stl;

use twistsnap_kernel_mesh::TriangleMesh;

use crate::{Assembly, Part};

/// Something that can be written out as one or more named meshes.
pub trait Exportable {
    /// Name used for the file's product or header.
    fn export_name(&self) -> &str;

    /// One `(body name, mesh)` pair per body.
    fn bodies(&self) -> Vec<(String, TriangleMesh)>;
}

impl Exportable for Part {
    fn export_name(&self) -> &str {
        &self.name
    }

    fn bodies(&self) -> Vec<(String, TriangleMesh)> {
        vec![(self.name.clone(), self.to_mesh())]
    }
}

impl Exportable for Assembly {
    fn export_name(&self) -> &str {
        &self.label
    }

    fn bodies(&self) -> Vec<(String, TriangleMesh)> {
        self.children
            .iter()
            .map(|p| (p.name.clone(), p.to_mesh()))
            .collect()
    }
}
