use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::generate::coupling;
use crate::mesh;
use crate::template;

/// Files every generated project must have, relative to its root.
pub const REQUIRED_FILES: &[&str] = &[
    "calculix/nozzle.inp",
    "openfoam/interior/mesh.msh",
    "openfoam/exterior/mesh.msh",
    "openfoam/cooling_channel/mesh.msh",
    "precice-config.xml",
    "Allrun",
    "Allclean",
    "README.md",
];

const PLACEHOLDER: &str = r"\{\{[^{}]*\}\}";

/// Check a generated project. Every check runs; an empty result means the project is valid.
/// `mesh_files` are the input meshes whose physical names the coupling interfaces must come from.
pub fn validate_project(root: &Path, mesh_files: &[PathBuf]) -> Vec<String> {
    let mut errors = Vec::new();
    check_required_files(root, &mut errors);
    check_placeholders(root, &mut errors);
    check_interfaces(root, mesh_files, &mut errors);

    if errors.is_empty() {
        log::info!("Project {} is valid", root.display());
    } else {
        log::warn!("Project {} has {} problems", root.display(), errors.len());
    }
    errors
}

fn check_required_files(root: &Path, errors: &mut Vec<String>) {
    for relative in REQUIRED_FILES.iter() {
        if !root.join(relative).is_file() {
            errors.push(format!("Missing required file: {}", relative));
        }
    }
}

/// Leftover `{{...}}` tokens in any text file, mesh files excluded.
fn check_placeholders(root: &Path, errors: &mut Vec<String>) {
    let placeholder = match Regex::new(PLACEHOLDER) {
        Ok(placeholder) => placeholder,
        Err(error) => {
            errors.push(format!("Placeholder scan failed: {}", error));
            return;
        },
    };
    let files = match crate::io::walk_files(root) {
        Ok(files) => files,
        Err(error) => {
            errors.push(format!("Could not scan the project tree:\n{}", error));
            return;
        },
    };

    for path in files.iter().filter(|path| !template::is_mesh_file(path)) {
        let text = match crate::io::read_text(path) {
            Ok(Some(text)) => text,
            Ok(None) => continue,
            Err(error) => {
                errors.push(format!("{}", error));
                continue;
            },
        };
        let leftovers: BTreeSet<&str> = placeholder.find_iter(&text).map(|m| m.as_str()).collect();
        if !leftovers.is_empty() {
            let relative = path.strip_prefix(root).unwrap_or(path);
            errors.push(format!(
                "Unreplaced placeholders in {}: {}",
                relative.display(),
                leftovers.into_iter().collect::<Vec<_>>().join(", ")
            ));
        }
    }
}

/// Every interface declared in the coupling document must be a physical name of some input mesh.
fn check_interfaces(root: &Path, mesh_files: &[PathBuf], errors: &mut Vec<String>) {
    let text = match crate::io::read_text(&root.join(coupling::COUPLING_DOCUMENT)) {
        Ok(Some(text)) => text,
        // Already reported as missing
        Ok(None) | Err(_) => return,
    };

    let mut known = BTreeSet::new();
    for path in mesh_files.iter() {
        match mesh::load_mesh(path, None) {
            Ok(loaded) => known.extend(loaded.names.value().names().map(|name| name.to_string())),
            Err(error) => log::warn!("Interface check can't read {}:\n{}", path.display(), error),
        }
    }

    for name in coupling::declared_interfaces(&text) {
        if known.contains(&name) {
            continue;
        }
        if name.starts_with("MISSING_") {
            errors.push(format!("{}: unresolved interface {}", coupling::COUPLING_DOCUMENT, name));
        } else {
            errors.push(format!("{}: interface {} is not a physical name of any input mesh", coupling::COUPLING_DOCUMENT, name));
        }
    }
}
