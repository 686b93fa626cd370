mod proc_errors;

use clap::{
    Args,
    Parser,
    Subcommand,
    ValueEnum,
};

use crate::mesh;

// Re-export errors
pub use proc_errors::{
    ArgError,
    ProcResult,
    err_str,
};

/// GMSH mesh import and coupled-project generation for CalculiX, OpenFOAM and preCICE.
#[derive(Debug, Parser)]
#[command(name = "meshcouple", version)]
pub struct MeshcoupleCli {
    #[arg(long, global = true)]
    /// Log level (error, warn, info, debug, trace). Falls back to RUST_LOG, then warn.
    pub log_level: Option<String>,

    #[clap(subcommand)]
    pub command: Command,
}

/// Parser for the subcommands of the meshcouple binary using clap.
#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(name = "generate")]
    /// Generate a coupled project from a config file, then validate it.
    Generate(GenerateCli),

    #[command(name = "inspect")]
    /// Parse one mesh file and print its contents and diagnostics.
    Inspect(InspectCli),

    #[command(name = "validate")]
    /// Validate an existing generated project.
    Validate(ValidateCli),

    #[command(name = "example")]
    /// Print an example project config.
    Example(ExampleCli),
}

/// Compiled arguments for the generate command. Compiled with clap.
#[derive(Debug, Args)]
pub struct GenerateCli {
    #[arg(short, long = "config")]
    /// Path to the project config file (.json, .toml, .yaml/.yml).
    pub cfg_file: String,

    #[arg(short, long = "output")]
    /// Output directory, overrides the config.
    pub output_dir: Option<String>,

    #[arg(long)]
    /// Generate a reacting-flow project, overrides the config.
    pub combustion: bool,
}

/// Compiled arguments for the inspect command. Compiled with clap.
#[derive(Debug, Args)]
pub struct InspectCli {
    /// Path to the GMSH mesh file.
    pub mesh_path: String,

    #[arg(short, long, value_enum, default_value_t = mesh::FormatCliEnum::Auto)]
    /// Mesh format.
    pub format: mesh::FormatCliEnum,
}

/// Compiled arguments for the validate command. Compiled with clap.
#[derive(Debug, Args)]
pub struct ValidateCli {
    #[arg(short, long = "config")]
    /// Path to the project config file the project was generated from.
    pub cfg_file: String,

    #[arg(short, long = "project")]
    /// Project directory, defaults to the config's output directory.
    pub project_dir: Option<String>,
}

/// Compiled arguments for the example command. Compiled with clap.
#[derive(Debug, Args)]
pub struct ExampleCli {
    #[arg(short, long, value_enum, default_value_t = CfgFormat::Yaml)]
    /// Output format of the example config.
    pub format: CfgFormat,
}

/// Config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CfgFormat {
    Yaml,
    Json,
    Toml,
}
