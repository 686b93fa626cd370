mod proc_errors;

use std::collections::BTreeMap;

use itertools::Itertools;
use regex::Regex;
use serde::{Serialize, Deserialize};
use strum::{EnumIter, IntoEnumIterator};

use crate::mesh::PhysicalNameTable;

// Re-export errors
pub use proc_errors::{
    ResolveError,
    ProcResult,
    err_str,
};

/// The four mesh domains of a coupled nozzle project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Solid,
    InteriorFluid,
    ExteriorFluid,
    CoolingChannelFluid,
}
impl Domain {
    /// Config key of the domain.
    pub fn key(&self) -> &'static str {
        match self {
            Domain::Solid => "solid",
            Domain::InteriorFluid => "interior_fluid",
            Domain::ExteriorFluid => "exterior_fluid",
            Domain::CoolingChannelFluid => "cooling_channel_fluid",
        }
    }

    /// Where the domain's mesh is placed inside the project.
    pub fn mesh_destination(&self) -> &'static str {
        match self {
            Domain::Solid => "calculix/mesh.msh",
            Domain::InteriorFluid => "openfoam/interior/mesh.msh",
            Domain::ExteriorFluid => "openfoam/exterior/mesh.msh",
            Domain::CoolingChannelFluid => "openfoam/cooling_channel/mesh.msh",
        }
    }

    /// Bare placeholder token replaced by the mesh path in the coupling document.
    pub fn mesh_token(&self) -> &'static str {
        match self {
            Domain::Solid => "SOLID_MESH_FILE",
            Domain::InteriorFluid => "INTERIOR_FLUID_MESH_FILE",
            Domain::ExteriorFluid => "EXTERIOR_FLUID_MESH_FILE",
            Domain::CoolingChannelFluid => "COOLING_CHANNEL_FLUID_MESH_FILE",
        }
    }

    /// Fluid case directory under `openfoam/`, `None` for the solid.
    pub fn fluid_region(&self) -> Option<&'static str> {
        match self {
            Domain::Solid => None,
            Domain::InteriorFluid => Some("interior"),
            Domain::ExteriorFluid => Some("exterior"),
            Domain::CoolingChannelFluid => Some("cooling_channel"),
        }
    }

    /// The three fluid domains.
    pub fn fluids() -> impl Iterator<Item = Domain> {
        Domain::iter().filter(|domain| domain.fluid_region().is_some())
    }
}
impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A semantic interface category looked up by pattern among a domain's physical names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceRole {
    /// Upper-snake role id, e.g. `INTERIOR_FSI`.
    pub name: String,
    /// Domain whose mesh is searched.
    pub domain: Domain,
    /// Regular expression searched for in each physical name.
    pub pattern: String,
}
impl InterfaceRole {
    pub fn new(name: &str, domain: Domain, pattern: &str) -> Self {
        InterfaceRole{name: name.to_string(), domain, pattern: pattern.to_string()}
    }

    /// `{{NAME}}`
    pub fn placeholder(&self) -> String {
        format!("{{{{{}}}}}", self.name)
    }

    /// Value used when nothing matches.
    pub fn sentinel(&self) -> String {
        format!("MISSING_{}", self.name)
    }

    /// Fluid-structure interface roles are named `*_FSI`.
    pub fn is_fsi(&self) -> bool {
        self.name.ends_with("_FSI")
    }

    pub fn regex(&self) -> ProcResult<Regex> {
        Regex::new(&self.pattern).map_err(|error| ResolveError::InvalidPattern{role: self.name.clone(), error})
    }
}

/// Roles used when the configuration doesn't override them.
pub fn default_roles() -> Vec<InterfaceRole> {
    vec![
        InterfaceRole::new("SOLID_INNER_WALL", Domain::Solid, r"Nozzle_Inner_Wall"),
        InterfaceRole::new("SOLID_OUTER_WALL", Domain::Solid, r"Nozzle_Outer_Wall"),
        InterfaceRole::new("SOLID_COOLING_WALL", Domain::Solid, r"Cooling_Channel_\d+_Wall"),
        InterfaceRole::new("INTERIOR_FSI", Domain::InteriorFluid, r"Nozzle_Inner_Wall"),
        InterfaceRole::new("EXTERIOR_FSI", Domain::ExteriorFluid, r"Nozzle_Outer_Wall"),
        InterfaceRole::new("COOLING_CHANNEL_ENTRY", Domain::CoolingChannelFluid, r"Cooling_Channel_\d+_Entry_Wall"),
        InterfaceRole::new("COOLING_CHANNEL_EXIT", Domain::CoolingChannelFluid, r"Cooling_Channel_\d+_Exit_Wall"),
        InterfaceRole::new("COOLING_FSI", Domain::CoolingChannelFluid, r"Cooling_Channel_\d+_Wall"),
    ]
}

/// Every name containing a match for `pattern`, in the names' original order.
/// Plain search: no anchoring, normalization, or case folding.
pub fn match_names<'a, I>(names: I, pattern: &Regex) -> Vec<String>
where I: IntoIterator<Item = &'a str>
{
    names.into_iter()
        .filter(|name| pattern.is_match(name))
        .map(|name| name.to_string())
        .collect()
}

/// The names found for one role.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceMatch {
    pub role: InterfaceRole,
    pub matches: Vec<String>,
}
impl InterfaceMatch {
    /// First match in declaration order, or the role's sentinel.
    pub fn canonical(&self) -> String {
        match self.matches.first() {
            Some(name) => name.clone(),
            None => self.role.sentinel(),
        }
    }

    pub fn is_missing(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Match every role against the physical names of its domain.
/// A domain without a name table resolves all of its roles to sentinels.
pub fn resolve_interfaces(
    roles: &[InterfaceRole],
    names: &BTreeMap<Domain, PhysicalNameTable>,
) -> ProcResult<Vec<InterfaceMatch>> {
    let mut resolved = Vec::with_capacity(roles.len());
    for role in roles.iter() {
        let pattern = role.regex()?;
        let matches = match names.get(&role.domain) {
            Some(table) => match_names(table.names(), &pattern),
            None => Vec::new(),
        };

        match matches.len() {
            0 => log::warn!("No physical name in the {} mesh matches {} ('{}'), using {}", role.domain, role.name, role.pattern, role.sentinel()),
            1 => log::info!("{} -> {}", role.name, matches[0]),
            n => log::info!("{} -> {} ({} matches, first one is canonical)", role.name, matches[0], n),
        }
        resolved.push(InterfaceMatch{role: role.clone(), matches});
    }
    Ok(resolved)
}

/// Every matched name of the FSI roles belonging to `domain`, first-seen order, no repeats.
pub fn domain_patches(resolved: &[InterfaceMatch], domain: Domain) -> Vec<String> {
    resolved.iter()
        .filter(|m| m.role.domain == domain && m.role.is_fsi())
        .flat_map(|m| m.matches.iter().cloned())
        .unique()
        .collect()
}

/// Reject duplicate role names before anything is resolved.
pub fn check_roles(roles: &[InterfaceRole]) -> ProcResult<()> {
    if let Some(name) = roles.iter().map(|role| role.name.as_str()).duplicates().next() {
        return err_str(&format!("Interface role declared twice: {}", name));
    }
    Ok(())
}
