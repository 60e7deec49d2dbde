//! Externs name-map loading.
//!
//! A JSON object mapping extern type names (as written in JavaScript) to
//! their TypeScript equivalents. An absent file is an empty map; a
//! malformed one is a diagnostic.

use std::path::Path;

use indexmap::IndexMap;
use typeshift_common::Diagnostic;

pub type ExternsMap = IndexMap<String, String>;

pub fn load_externs_map(path: Option<&Path>) -> Result<ExternsMap, Diagnostic> {
    let Some(path) = path else {
        return Ok(ExternsMap::new());
    };
    if !path.exists() {
        return Ok(ExternsMap::new());
    }
    let display = path.display().to_string();
    let text = std::fs::read_to_string(path)
        .map_err(|e| Diagnostic::file_error(&display, format!("failed to read externs map: {e}")))?;
    serde_json::from_str(&text)
        .map_err(|e| Diagnostic::file_error(&display, format!("malformed externs map: {e}")))
}
