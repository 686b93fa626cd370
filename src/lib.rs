pub mod args;
pub mod io;
pub mod mesh;
pub mod resolve;
pub mod template;
pub mod generate;
pub mod validate;
pub mod logger;
mod example;
mod crate_errors;

use std::path::{Path, PathBuf};

use mesh::MeshParser;

pub use crate_errors::{
    MeshcoupleError,
    MeshcoupleResult,
    err_str,
};
pub use example::example_config;

/// Run one subcommand.
pub fn run(cli: args::MeshcoupleCli) -> MeshcoupleResult<()> {
    match cli.command {
        args::Command::Generate(generate_args) => run_generate(generate_args),
        args::Command::Inspect(inspect_args) => run_inspect(inspect_args),
        args::Command::Validate(validate_args) => run_validate(validate_args),
        args::Command::Example(example_args) => example_config(example_args),
    }
}

/// Load the project config and apply the CLI overrides.
pub fn load_project_cfg(generate_args: &args::GenerateCli) -> MeshcoupleResult<generate::ProjectCfg> {
    println!("Loading project config file: {}...", generate_args.cfg_file);
    let mut cfg = generate::ProjectCfg::from_cfg_file(Path::new(&generate_args.cfg_file))?;
    if let Some(output_dir) = generate_args.output_dir.as_ref() {
        cfg.output_dir = output_dir.clone();
    }
    cfg.combustion |= generate_args.combustion;
    cfg.check()?;
    Ok(cfg)
}

fn run_generate(generate_args: args::GenerateCli) -> MeshcoupleResult<()> {
    let cfg = load_project_cfg(&generate_args)?;

    println!();
    println!("######################");
    println!("Generating project...");
    println!("######################");
    println!();
    let report = generate::generate_project(&cfg)?;

    println!();
    println!("Project written to {}", report.output_dir.display());

    let diagnostics = report.mesh_diagnostics();
    if !diagnostics.is_empty() {
        println!("Mesh diagnostics ({}):", diagnostics.len());
        for diagnostic in diagnostics.iter() {
            println!("  {}", diagnostic);
        }
    }

    println!("Interfaces:");
    for interface in report.interfaces.iter() {
        match interface.matches.len() {
            0 => println!("  {} -> {} (unresolved)", interface.role.name, interface.canonical()),
            1 => println!("  {} -> {}", interface.role.name, interface.canonical()),
            n => println!("  {} -> {} (+{} more)", interface.role.name, interface.canonical(), n - 1),
        }
    }

    print_validation(&report.validation_errors);
    Ok(())
}

fn run_inspect(inspect_args: args::InspectCli) -> MeshcoupleResult<()> {
    let loaded = mesh::load_mesh(Path::new(&inspect_args.mesh_path), inspect_args.format.construct())?;
    let topology = loaded.mesh.value();

    println!("Mesh: {}", loaded.path.display());
    println!("Format: {}", loaded.format.format_name());
    println!("Nodes: {}", topology.n_nodes());
    println!("Elements: {} ({} tetrahedra)", topology.n_elements(), topology.elements_of_type(mesh::TETRAHEDRON).count());
    println!("Physical names ({}):", loaded.names.value().len());
    for name in loaded.names.value().iter() {
        let members = topology.physical_sets.get(&name.id).map(|set| set.len()).unwrap_or(0);
        match name.dimension {
            Some(dimension) => println!("  {} (dim {}) \"{}\": {} elements", name.id, dimension, name.name, members),
            None => println!("  {} \"{}\": {} elements", name.id, name.name, members),
        }
    }

    if loaded.is_complete() {
        println!("Parse complete");
    } else {
        println!("Parse partial:");
        for diagnostic in loaded.diagnostics() {
            println!("  {}", diagnostic);
        }
    }
    Ok(())
}

fn run_validate(validate_args: args::ValidateCli) -> MeshcoupleResult<()> {
    println!("Loading project config file: {}...", validate_args.cfg_file);
    let cfg = generate::ProjectCfg::from_cfg_file(Path::new(&validate_args.cfg_file))?;
    let root = match validate_args.project_dir.as_ref() {
        Some(project_dir) => PathBuf::from(project_dir),
        None => cfg.output_path(),
    };
    if !root.is_dir() {
        return err_str(&format!("Project directory not found: {}", root.display()));
    }

    println!("Validating {}...", root.display());
    print_validation(&validate::validate_project(&root, &cfg.meshes.paths()));
    Ok(())
}

fn print_validation(errors: &[String]) {
    if errors.is_empty() {
        println!("Validation passed");
        return;
    }
    println!("Validation found {} problems:", errors.len());
    for error in errors.iter() {
        println!("  {}", error);
    }
}
