//! Formatting of individual STEP entities.
//!
//! Each function returns the entity body without the `#id=` prefix or the
//! trailing semicolon; the writer adds both.

/// Quote a string for a STEP file, doubling embedded apostrophes.
pub fn step_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Format a list of entity references as `(#1, #2, ...)`.
pub fn ref_list(ids: &[u64]) -> String {
    let refs: Vec<String> = ids.iter().map(|id| format!("#{id}")).collect();
    format!("({})", refs.join(", "))
}

/// Write a CARTESIAN_POINT to STEP format.
pub fn write_cartesian_point(p: [f64; 3]) -> String {
    format!(
        "CARTESIAN_POINT('', ({:.15E}, {:.15E}, {:.15E}))",
        p[0], p[1], p[2]
    )
}

/// Write a DIRECTION to STEP format.
pub fn write_direction(d: [f64; 3]) -> String {
    format!(
        "DIRECTION('', ({:.15E}, {:.15E}, {:.15E}))",
        d[0], d[1], d[2]
    )
}

/// Write an AXIS2_PLACEMENT_3D to STEP format.
pub fn write_axis2_placement_3d(loc_id: u64, axis_id: u64, ref_id: u64) -> String {
    format!("AXIS2_PLACEMENT_3D('', #{loc_id}, #{axis_id}, #{ref_id})")
}

/// Write a POLY_LOOP to STEP format.
pub fn write_poly_loop(point_ids: &[u64]) -> String {
    format!("POLY_LOOP('', {})", ref_list(point_ids))
}

/// Write a FACE_OUTER_BOUND to STEP format.
pub fn write_face_outer_bound(loop_id: u64) -> String {
    format!("FACE_OUTER_BOUND('', #{loop_id}, .T.)")
}

/// Write a FACE to STEP format.
pub fn write_face(bound_id: u64) -> String {
    format!("FACE('', (#{bound_id}))")
}

/// Write a CLOSED_SHELL to STEP format.
pub fn write_closed_shell(face_ids: &[u64]) -> String {
    format!("CLOSED_SHELL('', {})", ref_list(face_ids))
}

/// Write a FACETED_BREP to STEP format.
pub fn write_faceted_brep(name: &str, shell_id: u64) -> String {
    format!("FACETED_BREP({}, #{shell_id})", step_string(name))
}
