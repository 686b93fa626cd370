use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::args;
use crate::resolve::{
    Domain,
    InterfaceRole,
    default_roles,
};

/// Input mesh paths, one per domain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshFiles {
    #[serde(default)]
    pub solid: Option<String>,
    #[serde(default, alias = "interior")]
    pub interior_fluid: Option<String>,
    #[serde(default, alias = "exterior")]
    pub exterior_fluid: Option<String>,
    #[serde(default, alias = "cooling_channel")]
    pub cooling_channel_fluid: Option<String>,
}
impl MeshFiles {
    /// Mesh path of a domain, if one was given.
    pub fn get(&self, domain: Domain) -> Option<&str> {
        match domain {
            Domain::Solid => self.solid.as_deref(),
            Domain::InteriorFluid => self.interior_fluid.as_deref(),
            Domain::ExteriorFluid => self.exterior_fluid.as_deref(),
            Domain::CoolingChannelFluid => self.cooling_channel_fluid.as_deref(),
        }
    }

    /// Every given mesh path, in domain order.
    pub fn paths(&self) -> Vec<PathBuf> {
        [&self.solid, &self.interior_fluid, &self.exterior_fluid, &self.cooling_channel_fluid]
            .into_iter()
            .flatten()
            .map(PathBuf::from)
            .collect()
    }
}

/// One generated boundary field and the type given to every FSI patch in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryFieldSpec {
    pub field: String,
    #[serde(rename = "type", alias = "patch_type")]
    pub patch_type: String,
}

/// Project generation config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCfg {
    /// Name used in generated headers and the readme.
    #[serde(default = "ProjectCfg::default_project_name", alias = "name")]
    pub project_name: String,

    /// Directory the project is generated into.
    #[serde(alias = "output", alias = "out", alias = "o")]
    pub output_dir: String,

    /// The four domain meshes.
    pub meshes: MeshFiles,

    /// Project skeleton to copy. The built-in skeleton is used when absent.
    #[serde(default, alias = "templates")]
    pub template_dir: Option<String>,

    /// Reacting flow in the interior domain.
    #[serde(default)]
    pub combustion: bool,

    /// Angular portion of the nozzle, as a fraction of pi.
    #[serde(default = "ProjectCfg::default_fraction_of_pi", alias = "fraction")]
    pub fraction_of_pi: f64,

    /// Coupled end time in seconds.
    #[serde(default = "ProjectCfg::default_end_time")]
    pub end_time: f64,

    /// Coupling time window in seconds.
    #[serde(default = "ProjectCfg::default_time_window")]
    pub time_window: f64,

    /// Inert species for the combustion chemistry.
    #[serde(default = "ProjectCfg::default_inert_specie")]
    pub inert_specie: String,

    #[serde(default = "default_roles")]
    pub roles: Vec<InterfaceRole>,

    #[serde(default = "ProjectCfg::default_boundary_fields", alias = "fields")]
    pub boundary_fields: Vec<BoundaryFieldSpec>,

    /// Free-form values, flattened to `{{dotted.path}}` placeholders.
    #[serde(default, skip_serializing_if = "serde_yaml::Value::is_null")]
    pub parameters: serde_yaml::Value,
}
impl ProjectCfg {
    pub fn default_project_name() -> String {
        "nozzle".to_string()
    }
    pub fn default_fraction_of_pi() -> f64 {
        1.0
    }
    pub fn default_end_time() -> f64 {
        1e-3
    }
    pub fn default_time_window() -> f64 {
        1e-5
    }
    pub fn default_inert_specie() -> String {
        "N2".to_string()
    }
    pub fn default_boundary_fields() -> Vec<BoundaryFieldSpec> {
        vec![
            BoundaryFieldSpec{field: "pointDisplacement".to_string(), patch_type: "fixedValue".to_string()},
            BoundaryFieldSpec{field: "T".to_string(), patch_type: "fixedValue".to_string()},
        ]
    }

    /// Config with default values and placeholder paths.
    pub fn example() -> Self {
        ProjectCfg{
            project_name: Self::default_project_name(),
            output_dir: "PATH/TO/OUTPUT/DIR".to_string(),
            meshes: MeshFiles{
                solid: Some("PATH/TO/solid.msh".to_string()),
                interior_fluid: Some("PATH/TO/interior.msh".to_string()),
                exterior_fluid: Some("PATH/TO/exterior.msh".to_string()),
                cooling_channel_fluid: Some("PATH/TO/cooling_channel.msh".to_string()),
            },
            template_dir: None,
            combustion: false,
            fraction_of_pi: Self::default_fraction_of_pi(),
            end_time: Self::default_end_time(),
            time_window: Self::default_time_window(),
            inert_specie: Self::default_inert_specie(),
            roles: default_roles(),
            boundary_fields: Self::default_boundary_fields(),
            parameters: serde_yaml::Value::Null,
        }
    }

    /// Load and check a config file (json, toml, or yaml).
    pub fn from_cfg_file(cfg_file: &Path) -> args::ProcResult<Self> {
        let cfg: ProjectCfg = crate::io::read_cfg_file(cfg_file)?;
        cfg.check()?;
        Ok(cfg)
    }

    /// Reject values generation can't work with.
    pub fn check(&self) -> args::ProcResult<()> {
        if self.output_dir.trim().is_empty() {
            return args::err_str("Output directory must not be empty");
        }
        if !(self.fraction_of_pi > 0.0 && self.fraction_of_pi <= 2.0) {
            return args::err_str(&format!("fraction_of_pi must be in (0, 2], got {}", self.fraction_of_pi));
        }
        if !(self.time_window > 0.0 && self.time_window <= self.end_time) {
            return args::err_str(&format!("time_window must be positive and at most end_time, got {} (end_time {})", self.time_window, self.end_time));
        }
        if let Some(template_dir) = self.template_dir.as_ref() {
            if !Path::new(template_dir).is_dir() {
                return args::err_str(&format!("Template directory not found: {}", template_dir));
            }
        }
        if self.boundary_fields.iter().any(|spec| spec.field.trim().is_empty()) {
            return args::err_str("Boundary field names must not be empty");
        }
        Ok(())
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }
}
