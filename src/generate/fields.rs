use std::path::PathBuf;

use crate::resolve::Domain;

/// Where a boundary fragment of a fluid domain goes, relative to the project root.
pub fn fragment_path(domain: Domain, field: &str) -> Option<PathBuf> {
    domain.fluid_region()
        .map(|region| PathBuf::from(format!("openfoam/{}/0/{}.boundaryField", region, field)))
}

/// `boundaryField` block giving every patch the same type.
pub fn boundary_field(patches: &[String], patch_type: &str) -> String {
    let mut fragment = String::from("boundaryField\n{\n");
    for patch in patches.iter() {
        fragment.push_str(&format!("    {}\n    {{\n        type            {};\n    }}\n", patch, patch_type));
    }
    fragment.push_str("}\n");
    fragment
}
