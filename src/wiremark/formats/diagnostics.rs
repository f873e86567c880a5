//! Diagnostic list formats

use crate::wiremark::diagnostics::{worst_severity, Diagnostic};

/// One diagnostic per line, prefixed with `path` when given, then a summary line.
pub fn to_simple_str(diagnostics: &[Diagnostic], path: Option<&str>) -> String {
    let mut output = String::new();
    for diagnostic in diagnostics {
        if let Some(path) = path {
            output.push_str(path);
            output.push(':');
        }
        output.push_str(&diagnostic.to_string());
        output.push('\n');
    }
    match worst_severity(diagnostics) {
        None => output.push_str("no problems\n"),
        Some(worst) => output.push_str(&format!(
            "{} problem(s), worst: {}\n",
            diagnostics.len(),
            worst
        )),
    }
    output
}

pub fn to_json_str(diagnostics: &[Diagnostic], pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(diagnostics)
    } else {
        serde_json::to_string(diagnostics)
    }
}
