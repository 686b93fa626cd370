use std::path::{Path, PathBuf};

use strum::IntoEnumIterator;

use crate::io::{
    self,
    IoResult,
};
use crate::resolve::Domain;

/// Built-in project files, relative path and content.
const BUILTIN: &[(&str, &str)] = &[
    ("precice-config.xml", include_str!("../../templates/precice-config.xml")),
    ("Allrun", include_str!("../../templates/Allrun")),
    ("Allclean", include_str!("../../templates/Allclean")),
    ("README.md", include_str!("../../templates/README.md")),
];

/// Scripts that get the executable bit.
const SCRIPTS: &[&str] = &["Allrun", "Allclean"];

const CONTROL_DICT: &str = include_str!("../../templates/openfoam/controlDict");

/// Chemistry set for reacting flow in the interior domain.
const CHEMISTRY: &[(&str, &str)] = &[
    ("thermophysicalProperties", include_str!("../../templates/chemistry/thermophysicalProperties")),
    ("reactions", include_str!("../../templates/chemistry/reactions")),
    ("chemistryProperties", include_str!("../../templates/chemistry/chemistryProperties")),
];
const CHEMISTRY_DIR: &str = "openfoam/interior/constant";

/// Write the built-in skeleton into `root`. Returns the written files.
pub fn write_builtin_skeleton(root: &Path) -> IoResult<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (relative, content) in BUILTIN.iter() {
        let path = root.join(relative);
        io::write_to_file(&path, content)?;
        written.push(path);
    }
    for domain in Domain::fluids() {
        if let Some(region) = domain.fluid_region() {
            let path = root.join("openfoam").join(region).join("system/controlDict");
            io::write_to_file(&path, CONTROL_DICT)?;
            written.push(path);
        }
    }
    for script in SCRIPTS.iter() {
        make_executable(&root.join(script))?;
    }
    Ok(written)
}

/// Copy a user skeleton into `root`, merging with whatever is there.
pub fn copy_skeleton(template_dir: &Path, root: &Path) -> IoResult<Vec<PathBuf>> {
    let copied = io::copy_dir_recursive(template_dir, root)?;
    for script in SCRIPTS.iter() {
        let path = root.join(script);
        if path.is_file() {
            make_executable(&path)?;
        }
    }
    Ok(copied)
}

/// Copy each given domain mesh to its fixed destination. Returns the placed destinations.
/// A mesh that can't be copied is logged and skipped, the validator reports it as missing.
pub fn place_meshes<F>(root: &Path, mesh_for: F) -> Vec<(Domain, PathBuf)>
where F: Fn(Domain) -> Option<PathBuf>
{
    let mut placed = Vec::new();
    for domain in Domain::iter() {
        let source = match mesh_for(domain) {
            Some(source) => source,
            None => {
                log::warn!("No {} mesh given", domain);
                continue;
            },
        };
        let destination = root.join(domain.mesh_destination());
        match io::copy_file(&source, &destination) {
            Ok(()) => {
                log::info!("Placed {} mesh at {}", domain, destination.display());
                placed.push((domain, destination));
            },
            Err(error) => log::warn!("Could not place {} mesh:\n{}", domain, error),
        }
    }
    placed
}

/// Write the chemistry set for the interior domain.
pub fn write_chemistry(root: &Path) -> IoResult<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (name, content) in CHEMISTRY.iter() {
        let path = root.join(CHEMISTRY_DIR).join(name);
        io::write_to_file(&path, content)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> IoResult<()> {
    use std::os::unix::fs::PermissionsExt;
    let metadata = std::fs::metadata(path).map_err(|error| io::IoError::file(path, error))?;
    let mut permissions = metadata.permissions();
    permissions.set_mode(permissions.mode() | 0o755);
    std::fs::set_permissions(path, permissions).map_err(|error| io::IoError::file(path, error))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> IoResult<()> {
    Ok(())
}
