//! Binary STL export.

use std::path::Path;

use twistsnap_kernel_mesh::TriangleMesh;

use super::Exportable;
use crate::CadError;

/// Serialise a mesh as binary STL.
///
/// Facet normals are recomputed from the winding.
pub fn mesh_to_stl_bytes(mesh: &TriangleMesh) -> Vec<u8> {
    let num_triangles = mesh.num_triangles();
    let mut data = Vec::with_capacity(84 + num_triangles * 50);

    let mut header = [b' '; 80];
    let label = b"twistsnap STL export";
    header[..label.len()].copy_from_slice(label);
    data.extend_from_slice(&header);
    data.extend_from_slice(&(num_triangles as u32).to_le_bytes());

    for [i0, i1, i2] in mesh.triangles() {
        let v0 = mesh.vertex(i0 as usize);
        let v1 = mesh.vertex(i1 as usize);
        let v2 = mesh.vertex(i2 as usize);

        let e1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
        let e2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
        let nx = e1[1] * e2[2] - e1[2] * e2[1];
        let ny = e1[2] * e2[0] - e1[0] * e2[2];
        let nz = e1[0] * e2[1] - e1[1] * e2[0];
        let len = (nx * nx + ny * ny + nz * nz).sqrt();
        let normal = if len > 1e-10 {
            [nx / len, ny / len, nz / len]
        } else {
            [0.0, 0.0, 1.0]
        };

        for v in [normal, v0, v1, v2] {
            data.extend_from_slice(&v[0].to_le_bytes());
            data.extend_from_slice(&v[1].to_le_bytes());
            data.extend_from_slice(&v[2].to_le_bytes());
        }
        // Attribute byte count
        data.extend_from_slice(&0u16.to_le_bytes());
    }
    data
}

/// Binary STL bytes with every body merged into one mesh.
///
/// # Errors
///
/// [`CadError::EmptyGeometry`] when there are no triangles.
pub fn to_stl_bytes(item: &impl Exportable) -> Result<Vec<u8>, CadError> {
    let mut mesh = TriangleMesh::new();
    for (_, body) in item.bodies() {
        mesh.merge(&body);
    }
    if mesh.is_empty() {
        return Err(CadError::EmptyGeometry);
    }
    Ok(mesh_to_stl_bytes(&mesh))
}

/// Write binary STL to a file.
pub fn export_stl(item: &impl Exportable, path: impl AsRef<Path>) -> Result<(), CadError> {
    let path = path.as_ref();
    let bytes = to_stl_bytes(item)?;
    std::fs::write(path, &bytes)?;
    tracing::info!(
        name = item.export_name(),
        path = %path.display(),
        bytes = bytes.len(),
        "wrote STL"
    );
    Ok(())
}
