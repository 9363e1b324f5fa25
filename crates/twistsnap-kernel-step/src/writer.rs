//! STEP exchange-structure writer.

use std::fmt::Write as _;
use std::path::Path;

use twistsnap_kernel_mesh::TriangleMesh;

use crate::entities::*;
use crate::error::StepError;

/// A named triangle mesh to be written as one faceted body.
#[derive(Debug, Clone, Copy)]
pub struct StepBody<'a> {
    /// Body name, written on its `FACETED_BREP`.
    pub name: &'a str,
    /// Closed triangle mesh.
    pub mesh: &'a TriangleMesh,
}

impl<'a> StepBody<'a> {
    /// Pair a name with a mesh.
    pub fn new(name: &'a str, mesh: &'a TriangleMesh) -> Self {
        Self { name, mesh }
    }
}

/// Accumulates numbered entities.
struct EntityTable {
    lines: Vec<String>,
}

impl EntityTable {
    fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Append an entity and return its id.
    fn add(&mut self, entity: String) -> u64 {
        self.lines.push(entity);
        self.lines.len() as u64
    }
}

/// Write the product, context and unit entities; returns
/// `(product_definition_shape, representation_context, origin_placement)`.
fn write_context(table: &mut EntityTable, product_name: &str) -> (u64, u64, u64) {
    let name = step_string(product_name);
    let app = table.add("APPLICATION_CONTEXT('automotive design')".into());
    table.add(format!(
        "APPLICATION_PROTOCOL_DEFINITION('international standard', 'automotive_design', 2000, #{app})"
    ));
    let product_ctx = table.add(format!("PRODUCT_CONTEXT('', #{app}, 'mechanical')"));
    let def_ctx = table.add(format!(
        "PRODUCT_DEFINITION_CONTEXT('part definition', #{app}, 'design')"
    ));
    let product = table.add(format!("PRODUCT({name}, {name}, '', (#{product_ctx}))"));
    table.add(format!(
        "PRODUCT_RELATED_PRODUCT_CATEGORY('part', $, (#{product}))"
    ));
    let formation = table.add(format!("PRODUCT_DEFINITION_FORMATION('', '', #{product})"));
    let definition = table.add(format!(
        "PRODUCT_DEFINITION('design', '', #{formation}, #{def_ctx})"
    ));
    let shape = table.add(format!("PRODUCT_DEFINITION_SHAPE('', '', #{definition})"));

    let length = table.add("(LENGTH_UNIT() NAMED_UNIT(*) SI_UNIT(.MILLI., .METRE.))".into());
    let angle = table.add("(NAMED_UNIT(*) PLANE_ANGLE_UNIT() SI_UNIT($, .RADIAN.))".into());
    let solid_angle = table.add("(NAMED_UNIT(*) SI_UNIT($, .STERADIAN.) SOLID_ANGLE_UNIT())".into());
    let uncertainty = table.add(format!(
        "UNCERTAINTY_MEASURE_WITH_UNIT(LENGTH_MEASURE(1.E-06), #{length}, 'distance_accuracy_value', 'confusion accuracy')"
    ));
    let context = table.add(format!(
        "(GEOMETRIC_REPRESENTATION_CONTEXT(3) GLOBAL_UNCERTAINTY_ASSIGNED_CONTEXT((#{uncertainty})) \
         GLOBAL_UNIT_ASSIGNED_CONTEXT((#{length}, #{angle}, #{solid_angle})) REPRESENTATION_CONTEXT('', ''))"
    ));

    let origin = table.add(write_cartesian_point([0.0, 0.0, 0.0]));
    let z = table.add(write_direction([0.0, 0.0, 1.0]));
    let x = table.add(write_direction([1.0, 0.0, 0.0]));
    let placement = table.add(write_axis2_placement_3d(origin, z, x));
    (shape, context, placement)
}

/// Write one body as a FACETED_BREP and return its id, or `None` when the
/// mesh has no non-degenerate triangles.
fn write_body(table: &mut EntityTable, body: &StepBody<'_>) -> Option<u64> {
    let mesh = body.mesh;
    let faces: Vec<[u32; 3]> = mesh
        .triangles()
        .filter(|[a, b, c]| a != b && b != c && a != c)
        .collect();
    if faces.is_empty() {
        return None;
    }

    // Points are shared through the mesh indices; ids are assigned lazily so
    // unused vertices are skipped.
    let mut point_ids: Vec<Option<u64>> = vec![None; mesh.num_vertices()];
    let mut face_ids = Vec::with_capacity(faces.len());
    for tri in &faces {
        let mut corners = [0u64; 3];
        for (slot, &index) in corners.iter_mut().zip(tri) {
            let i = index as usize;
            *slot = match point_ids[i] {
                Some(id) => id,
                None => {
                    let [x, y, z] = mesh.vertex(i);
                    let id = table.add(write_cartesian_point([x as f64, y as f64, z as f64]));
                    point_ids[i] = Some(id);
                    id
                }
            };
        }
        let poly_loop = table.add(write_poly_loop(&corners));
        let bound = table.add(write_face_outer_bound(poly_loop));
        face_ids.push(table.add(write_face(bound)));
    }
    let shell = table.add(write_closed_shell(&face_ids));
    Some(table.add(write_faceted_brep(body.name, shell)))
}

/// Write bodies to a STEP string.
///
/// All bodies share one `FACETED_BREP_SHAPE_REPRESENTATION` attached to a
/// single product named `product_name`. Bodies without faces are skipped.
///
/// # Errors
///
/// [`StepError::EmptyMesh`] when no body has any faces.
pub fn write_step_to_buffer(product_name: &str, bodies: &[StepBody<'_>]) -> Result<String, StepError> {
    let mut table = EntityTable::new();
    let (shape, context, placement) = write_context(&mut table, product_name);

    let mut items = vec![placement];
    for body in bodies {
        if let Some(brep) = write_body(&mut table, body) {
            items.push(brep);
        }
    }
    if items.len() == 1 {
        return Err(StepError::EmptyMesh(product_name.to_string()));
    }

    let representation = table.add(format!(
        "FACETED_BREP_SHAPE_REPRESENTATION({}, {}, #{context})",
        step_string(product_name),
        ref_list(&items)
    ));
    table.add(format!(
        "SHAPE_DEFINITION_REPRESENTATION(#{shape}, #{representation})"
    ));

    let mut out = String::new();
    out.push_str("ISO-10303-21;\nHEADER;\n");
    out.push_str("FILE_DESCRIPTION(('twistsnap faceted model'), '2;1');\n");
    let name = step_string(product_name);
    // Infallible: writing into a String.
    let _ = writeln!(
        out,
        "FILE_NAME({name}, '', (''), (''), 'twistsnap', 'twistsnap', '');"
    );
    out.push_str("FILE_SCHEMA(('AUTOMOTIVE_DESIGN { 1 0 10303 214 1 1 1 1 }'));\n");
    out.push_str("ENDSEC;\nDATA;\n");
    for (i, line) in table.lines.iter().enumerate() {
        let _ = writeln!(out, "#{}={};", i + 1, line);
    }
    out.push_str("ENDSEC;\nEND-ISO-10303-21;\n");
    Ok(out)
}

/// Write bodies to a STEP file.
///
/// # Errors
///
/// Fails like [`write_step_to_buffer`], or on I/O errors.
pub fn write_step(
    path: impl AsRef<Path>,
    product_name: &str,
    bodies: &[StepBody<'_>],
) -> Result<(), StepError> {
    let text = write_step_to_buffer(product_name, bodies)?;
    std::fs::write(path, text)?;
    Ok(())
}
