mod proc_errors;
mod section;
mod entities;
mod formats;
mod physical_names;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// Re-export errors
pub use proc_errors::{
    MeshError,
    ProcResult,
    err_str,
};
// Re-export section scanning
pub use section::{
    Diagnostic,
    Section,
    find_section,
};
// Re-export format handling
pub use formats::{
    FormatCliEnum,
    MeshFormat,
    MeshParser,
    parse_mesh,
};
pub use entities::{
    EntityTable,
    parse_entities,
};
pub use physical_names::{
    PhysicalName,
    PhysicalNameTable,
    parse_physical_names,
};

/// GMSH element type code for a 4-node tetrahedron.
pub const TETRAHEDRON: u32 = 4;

/// A single mesh element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: u64,
    /// GMSH element type code.
    pub element_type: u32,
    /// Physical group the element belongs to.
    pub physical: i64,
    /// Connectivity, in file order.
    pub nodes: Vec<u64>,
}

/// Mesh struct.
/// Nodes keyed by their (not necessarily contiguous) id, elements in file order,
/// and the element ids grouped by physical group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub nodes: BTreeMap<u64, [f64; 3]>,
    pub elements: Vec<Element>,
    pub physical_sets: BTreeMap<i64, Vec<u64>>,
}
impl Mesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Mesh::default()
    }

    /// Insert a node, replacing any previous node with the same id.
    pub fn push_node(&mut self, id: u64, coords: [f64; 3]) {
        self.nodes.insert(id, coords);
    }

    /// Append an element and register it in its physical group.
    pub fn push_element(&mut self, element: Element) {
        self.physical_sets.entry(element.physical).or_default().push(element.id);
        self.elements.push(element);
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_elements(&self) -> usize {
        self.elements.len()
    }

    /// Iterate over the elements of one GMSH type.
    pub fn elements_of_type(&self, element_type: u32) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(move |element| element.element_type == element_type)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.elements.is_empty()
    }
}

/// Result of a best-effort parse.
/// `Partial` still carries everything that was read before each failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome<T> {
    Complete(T),
    Partial {
        value: T,
        diagnostics: Vec<Diagnostic>,
    },
}
impl<T> ParseOutcome<T> {
    /// Build an outcome from a value and the diagnostics collected while reading it.
    pub fn from_parts(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        if diagnostics.is_empty() {
            ParseOutcome::Complete(value)
        } else {
            ParseOutcome::Partial{value, diagnostics}
        }
    }

    pub fn value(&self) -> &T {
        match self {
            ParseOutcome::Complete(value) => value,
            ParseOutcome::Partial{value, ..} => value,
        }
    }

    pub fn into_value(self) -> T {
        self.into_parts().0
    }

    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        match self {
            ParseOutcome::Complete(value) => (value, Vec::new()),
            ParseOutcome::Partial{value, diagnostics} => (value, diagnostics),
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            ParseOutcome::Complete(_) => &[],
            ParseOutcome::Partial{diagnostics, ..} => diagnostics,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, ParseOutcome::Complete(_))
    }
}

/// A mesh file after parsing: topology and physical names, each with its own outcome.
#[derive(Debug, Clone)]
pub struct LoadedMesh {
    pub path: PathBuf,
    pub format: MeshFormat,
    pub mesh: ParseOutcome<Mesh>,
    pub names: ParseOutcome<PhysicalNameTable>,
}
impl LoadedMesh {
    /// True when neither the topology nor the name table needed recovery.
    pub fn is_complete(&self) -> bool {
        self.mesh.is_complete() && self.names.is_complete()
    }

    /// All diagnostics, topology first.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.mesh.diagnostics().iter().chain(self.names.diagnostics().iter())
    }
}

/// Parse already-decoded mesh text.
/// `format` forces a variant; `None` sniffs it from the `$MeshFormat` header.
pub fn parse_mesh_text(path: &Path, text: &str, format: Option<MeshFormat>) -> LoadedMesh {
    let (format, mut header_diagnostics) = match format {
        Some(format) => (format, Vec::new()),
        None => MeshFormat::detect(text),
    };
    log::debug!("Parsing {} as {} GMSH", path.display(), format.format_name());

    let (mesh, diagnostics) = parse_mesh(text, &format).into_parts();
    header_diagnostics.extend(diagnostics);
    let mesh = ParseOutcome::from_parts(mesh, header_diagnostics);
    let names = parse_physical_names(text);

    for diagnostic in mesh.diagnostics().iter().chain(names.diagnostics()) {
        log::warn!("{}: {}", path.display(), diagnostic);
    }

    LoadedMesh{path: path.to_path_buf(), format, mesh, names}
}

/// Load a mesh file.
/// Invalid UTF-8 is replaced rather than rejected; only an unreadable file is an error.
pub fn load_mesh(path: &Path, format: Option<MeshFormat>) -> ProcResult<LoadedMesh> {
    if path.is_dir() {
        return err_str(&format!("Mesh path is a directory: {}", path.display()));
    }
    let text = crate::io::read_lossy(path)?;
    Ok(parse_mesh_text(path, &text, format))
}
