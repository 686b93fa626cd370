mod proc_errors;
mod replacements;

use std::path::{Path, PathBuf};

// Re-export errors
pub use proc_errors::{
    TemplateError,
    ProcResult,
    err_str,
};
// Re-export replacement map handling
pub use replacements::{
    Layer,
    LayeredReplacements,
    ReplacementMap,
    config_token,
    flatten_parameters,
    is_reserved_token,
};

/// Replace every key of the map in `text`, literally.
/// Keys are applied in map order. `LayeredReplacements::build` guarantees no value contains a key,
/// so the order doesn't change the result.
pub fn substitute(text: &str, map: &ReplacementMap) -> String {
    let mut out = text.to_string();
    for (key, value) in map.iter() {
        if out.contains(key) {
            out = out.replace(key, value);
        }
    }
    out
}

/// Mesh files are never rewritten.
pub fn is_mesh_file(path: &Path) -> bool {
    path.extension().map(|ext| ext.eq_ignore_ascii_case("msh")).unwrap_or(false)
}

/// Substitute in one file, writing it back only if something changed.
/// Files that aren't UTF-8 text are left alone. Returns whether the file was rewritten.
pub fn substitute_file(path: &Path, map: &ReplacementMap) -> ProcResult<bool> {
    let text = match crate::io::read_text(path)? {
        Some(text) => text,
        None => {
            log::debug!("Skipping non-text file {}", path.display());
            return Ok(false);
        },
    };
    let replaced = substitute(&text, map);
    if replaced == text {
        return Ok(false);
    }
    crate::io::write_to_file(path, &replaced)?;
    log::debug!("Substituted placeholders in {}", path.display());
    Ok(true)
}

/// Files touched by a tree substitution.
#[derive(Debug, Default)]
pub struct SubstitutionReport {
    /// Files that were rewritten.
    pub rewritten: Vec<PathBuf>,
    /// Files visited, mesh files excluded.
    pub visited: usize,
}

/// Substitute in every regular file under `root`, skipping mesh files by name.
pub fn substitute_tree(root: &Path, map: &ReplacementMap) -> ProcResult<SubstitutionReport> {
    let mut report = SubstitutionReport::default();
    for path in crate::io::walk_files(root)? {
        if is_mesh_file(&path) {
            continue;
        }
        report.visited += 1;
        if substitute_file(&path, map)? {
            report.rewritten.push(path);
        }
    }
    Ok(report)
}
