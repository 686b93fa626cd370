mod cfg;
mod proc_errors;
pub mod deck;
pub mod fields;
pub mod coupling;
pub mod skeleton;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use strum::IntoEnumIterator;

use crate::io;
use crate::mesh::{
    self,
    LoadedMesh,
    PhysicalNameTable,
};
use crate::resolve::{
    self,
    Domain,
    InterfaceMatch,
};
use crate::template::{
    self,
    Layer,
    LayeredReplacements,
    ReplacementMap,
};
use crate::validate;

// Re-export errors
pub use proc_errors::{
    GenError,
    ProcResult,
    err_str,
};
// Re-export config
pub use cfg::{
    BoundaryFieldSpec,
    MeshFiles,
    ProjectCfg,
};

/// Solver used by every fluid participant.
pub fn fluid_solver(combustion: bool) -> &'static str {
    if combustion { "reactingFoam" } else { "rhoPimpleFoam" }
}

/// What a generation run produced.
#[derive(Debug)]
pub struct GenerationReport {
    pub output_dir: PathBuf,
    /// Meshes that could be read, by domain.
    pub meshes: BTreeMap<Domain, LoadedMesh>,
    pub interfaces: Vec<InterfaceMatch>,
    pub replacements: ReplacementMap,
    /// Files changed by the final substitution pass.
    pub rewritten: Vec<PathBuf>,
    /// Validator findings. Advisory, generation still succeeded.
    pub validation_errors: Vec<String>,
}
impl GenerationReport {
    /// Parse diagnostics of every mesh, prefixed with the domain.
    pub fn mesh_diagnostics(&self) -> Vec<String> {
        self.meshes.iter()
            .flat_map(|(domain, loaded)| loaded.diagnostics().map(move |diagnostic| format!("{} mesh: {}", domain, diagnostic)))
            .collect()
    }

    pub fn missing_interfaces(&self) -> Vec<&InterfaceMatch> {
        self.interfaces.iter().filter(|m| m.is_missing()).collect()
    }
}

/// Build all four replacement layers.
pub fn build_replacements(cfg: &ProjectCfg, interfaces: &[InterfaceMatch]) -> ProcResult<LayeredReplacements> {
    let token = |name: &str| format!("{{{{{}}}}}", name);
    let mut layers = LayeredReplacements::new();

    layers.add_layer(Layer::Base, vec![
        (token("PROJECT_NAME"), cfg.project_name.clone()),
        (token("FRACTION_OF_PI"), cfg.fraction_of_pi.to_string()),
        (token("FLUID_SOLVER"), fluid_solver(cfg.combustion).to_string()),
        (token("END_TIME"), cfg.end_time.to_string()),
        (token("TIME_WINDOW"), cfg.time_window.to_string()),
        (token("INERT_SPECIE"), cfg.inert_specie.clone()),
    ])?;

    layers.add_layer(Layer::MeshPath, Domain::iter()
        .map(|domain| (domain.mesh_token().to_string(), domain.mesh_destination().to_string()))
        .collect())?;

    layers.add_layer(Layer::Interface, interfaces.iter()
        .map(|m| (m.role.placeholder(), m.canonical()))
        .collect())?;

    layers.add_layer(Layer::UserConfig, template::flatten_parameters(&cfg.parameters)
        .into_iter()
        .map(|(path, value)| (template::config_token(&path), value))
        .collect())?;

    Ok(layers)
}

/// Generate a coupled project from the config.
/// Configuration problems fail before anything is written. Once output starts, only I/O on
/// the output tree is fatal; missing meshes, parse diagnostics, and unresolved roles are logged
/// and end up in the validation report.
pub fn generate_project(cfg: &ProjectCfg) -> ProcResult<GenerationReport> {
    resolve::check_roles(&cfg.roles)?;
    for role in cfg.roles.iter() {
        role.regex()?;
    }

    let root = cfg.output_path();
    io::create_dir_all(&root)?;

    // 1. Skeleton
    let skeleton = match cfg.template_dir.as_ref() {
        Some(template_dir) => {
            println!("Copying project skeleton from {}...", template_dir);
            skeleton::copy_skeleton(Path::new(template_dir), &root)?
        },
        None => {
            println!("Writing built-in project skeleton...");
            skeleton::write_builtin_skeleton(&root)?
        },
    };
    log::info!("Skeleton: {} files", skeleton.len());

    // 2. Meshes
    println!("Placing meshes...");
    skeleton::place_meshes(&root, |domain| cfg.meshes.get(domain).map(PathBuf::from));

    let mut meshes = BTreeMap::new();
    for domain in Domain::iter() {
        let path = match cfg.meshes.get(domain) {
            Some(path) => PathBuf::from(path),
            None => continue,
        };
        match mesh::load_mesh(&path, None) {
            Ok(loaded) => {
                log::info!("{} mesh: {} nodes, {} elements, {} physical names",
                    domain, loaded.mesh.value().n_nodes(), loaded.mesh.value().n_elements(), loaded.names.value().len());
                meshes.insert(domain, loaded);
            },
            Err(error) => log::warn!("Could not read {} mesh, treating it as missing:\n{}", domain, error),
        }
    }

    // 3. Interfaces
    println!("Resolving interfaces...");
    let names: BTreeMap<Domain, PhysicalNameTable> = meshes.iter()
        .map(|(domain, loaded)| (*domain, loaded.names.value().clone()))
        .collect();
    let interfaces = resolve::resolve_interfaces(&cfg.roles, &names)?;

    let layers = build_replacements(cfg, &interfaces)?;
    let replacements = layers.build()?;

    // 4. Artifacts
    println!("Writing artifacts...");
    match meshes.get(&Domain::Solid) {
        Some(solid) => {
            let deck = deck::write_deck(solid.mesh.value(), solid.names.value(), &format!("{} solid", cfg.project_name));
            io::write_to_file(&root.join(deck::DECK_FILE), &deck)?;
        },
        None => log::warn!("No solid mesh, skipping {}", deck::DECK_FILE),
    }

    for domain in Domain::fluids() {
        let patches = resolve::domain_patches(&interfaces, domain);
        for spec in cfg.boundary_fields.iter() {
            if let Some(relative) = fields::fragment_path(domain, &spec.field) {
                io::write_to_file(&root.join(relative), &fields::boundary_field(&patches, &spec.patch_type))?;
            }
        }
    }

    let coupling_path = root.join(coupling::COUPLING_DOCUMENT);
    if coupling_path.is_file() {
        coupling::rewrite_coupling(&coupling_path, &layers, &replacements)?;
    } else {
        log::warn!("Skeleton has no {}", coupling::COUPLING_DOCUMENT);
    }

    if cfg.combustion {
        skeleton::write_chemistry(&root)?;
    }

    // 5. Substitution
    println!("Substituting placeholders...");
    let substitution = template::substitute_tree(&root, &replacements)?;
    log::info!("Rewrote {} of {} files", substitution.rewritten.len(), substitution.visited);

    // 6. Validation
    println!("Validating project...");
    let validation_errors = validate::validate_project(&root, &cfg.meshes.paths());

    Ok(GenerationReport{
        output_dir: root,
        meshes,
        interfaces,
        replacements,
        rewritten: substitution.rewritten,
        validation_errors,
    })
}
