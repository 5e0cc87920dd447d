use glam::DMat4;

/// Format a 4×4 matrix row by row with fixed-width 6-decimal entries.
///
/// Debugging aid for console reports, not a stable wire format.
pub fn format_mat4(m: &DMat4) -> String {
    let mut out = String::new();
    for r in 0..4 {
        let row = m.row(r);
        out.push_str(&format!(
            "[ {:.6}  {:.6}  {:.6}  {:.6} ]",
            row.x, row.y, row.z, row.w
        ));
        if r < 3 {
            out.push('\n');
        }
    }
    out
}

/// Format an optional matrix, rendering absence as `none`.
pub fn format_opt_mat4(m: Option<&DMat4>) -> String {
    match m {
        Some(m) => format_mat4(m),
        None => "none".to_string(),
    }
}
