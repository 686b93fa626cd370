use std::path::Path;

use regex::Regex;

use crate::template::{
    self,
    Layer,
    LayeredReplacements,
    ReplacementMap,
};

/// Relative location of the coupling document inside the project.
pub const COUPLING_DOCUMENT: &str = "precice-config.xml";

/// Interface mesh declaration, `<mesh name="NAME-Fluid-Mesh"` or `-Solid-Mesh`.
const INTERFACE_DECLARATION: &str = r#"<mesh\s+name="([^"]+?)-(?:Fluid|Solid)-Mesh""#;

/// Rewrite the coupling document in two passes: mesh paths first, then interface names.
/// Each pass only carries the keys of its layer, with values taken from the merged map so
/// user overrides still apply. Returns whether the file changed.
pub fn rewrite_coupling(path: &Path, layers: &LayeredReplacements, merged: &ReplacementMap) -> template::ProcResult<bool> {
    let mut changed = false;
    for layer in [Layer::MeshPath, Layer::Interface] {
        let pass = pass_map(&layers.layer(layer), merged);
        if template::substitute_file(path, &pass)? {
            log::debug!("Coupling document: {} pass applied", layer);
            changed = true;
        }
    }
    Ok(changed)
}

fn pass_map(layer: &ReplacementMap, merged: &ReplacementMap) -> ReplacementMap {
    layer.iter()
        .map(|(key, value)| (key.to_string(), merged.get(key).unwrap_or(value).to_string()))
        .collect()
}

/// Interface names declared in a coupling document, in document order.
/// A name can be declared once per side; it is listed once.
pub fn declared_interfaces(text: &str) -> Vec<String> {
    let declaration = match Regex::new(INTERFACE_DECLARATION) {
        Ok(declaration) => declaration,
        Err(_) => return Vec::new(),
    };
    let mut names: Vec<String> = Vec::new();
    for captures in declaration.captures_iter(text) {
        let name = &captures[1];
        if !names.iter().any(|known| known == name) {
            names.push(name.to_string());
        }
    }
    names
}
