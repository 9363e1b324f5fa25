//! Faceted STEP export.

use std::path::Path;

use twistsnap_kernel_mesh::TriangleMesh;
use twistsnap_kernel_step::{write_step_to_buffer, StepBody};

use super::Exportable;
use crate::CadError;

fn bodies_to_step(product: &str, bodies: &[(String, TriangleMesh)]) -> Result<String, CadError> {
    let refs: Vec<StepBody<'_>> = bodies
        .iter()
        .map(|(name, mesh)| StepBody::new(name, mesh))
        .collect();
    Ok(write_step_to_buffer(product, &refs)?)
}

/// STEP text with one faceted body per [`Exportable::bodies`] entry.
pub fn to_step_string(item: &impl Exportable) -> Result<String, CadError> {
    bodies_to_step(item.export_name(), &item.bodies())
}

/// Write a STEP file.
pub fn export_step(item: &impl Exportable, path: impl AsRef<Path>) -> Result<(), CadError> {
    let path = path.as_ref();
    let bodies = item.bodies();
    let text = bodies_to_step(item.export_name(), &bodies)?;
    std::fs::write(path, &text)?;
    tracing::info!(
        name = item.export_name(),
        path = %path.display(),
        bodies = bodies.len(),
        "wrote STEP"
    );
    Ok(())
}
