/*!
 * This is the mesh formats module.
 * Each on-disk GMSH encoding is a parser strategy behind `MeshParser`.
 *
 * New formats need:
 * - A struct implementing `MeshParser`
 * - An enum variant containing that struct in `MeshFormat`
 * - A version match arm in `MeshFormat::detect`
 * - A variant in `FormatCliEnum` to force it from the command line
 *
 */

use clap::ValueEnum;
use enum_dispatch::enum_dispatch;

use crate::mesh::{
    Diagnostic,
    EntityTable,
    Mesh,
    ParseOutcome,
    Section,
    find_section,
};

//
// ------------------------------------------------------------
// Code that requires modification to add a new mesh format
//      |
//      V
//

// Source files for the mesh formats
mod legacy;
mod modern;

/// Mesh formats enum.
/// To add a new format:
/// include it here,
/// add its version handling in `MeshFormat::detect`,
/// and implement the `MeshParser` trait for it.
#[derive(Debug, Clone, PartialEq)]
#[enum_dispatch(MeshParser)]
pub enum MeshFormat {
    /// GMSH 2.x flat counted lists.
    Legacy(legacy::Parser),
    /// GMSH 4.x entity blocks.
    Modern(modern::Parser),
}

impl MeshFormat {
    pub fn legacy() -> Self {
        MeshFormat::Legacy(legacy::Parser::new())
    }

    pub fn modern() -> Self {
        MeshFormat::Modern(modern::Parser::new(modern::Revision::V41))
    }

    /// Pick the format from the `$MeshFormat` version token.
    /// Anything that can't be identified falls back to legacy, with a diagnostic.
    pub fn detect(text: &str) -> (Self, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let mut section = match find_section(text, "MeshFormat") {
            Some(section) => section,
            None => {
                diagnostics.push(Diagnostic::new("MeshFormat", None, "header not found, assuming legacy format"));
                return (MeshFormat::legacy(), diagnostics);
            },
        };

        let header = match section.next_line("format header") {
            Ok(header) => header,
            Err(diagnostic) => {
                diagnostics.push(diagnostic);
                return (MeshFormat::legacy(), diagnostics);
            },
        };
        let mut fields = header.split_whitespace();
        let version = fields.next().unwrap_or_default();
        if fields.next() == Some("1") {
            diagnostics.push(section.diagnostic("binary mesh files are not supported, reading as ASCII"));
        }

        let mut version_parts = version.split('.');
        let major = version_parts.next().unwrap_or_default();
        let minor = version_parts.next().unwrap_or("0");
        let format = match (major, minor) {
            ("4", "0") => MeshFormat::Modern(modern::Parser::new(modern::Revision::V40)),
            ("4", _) => MeshFormat::Modern(modern::Parser::new(modern::Revision::V41)),
            ("2", _) | ("3", _) => MeshFormat::legacy(),
            _ => {
                diagnostics.push(section.diagnostic(&format!("unknown version '{}', assuming legacy format", version)));
                MeshFormat::legacy()
            },
        };
        (format, diagnostics)
    }
}

/// Mesh format CLI enum.
/// Add a new format here to make it selectable from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "kebab_case")]
pub enum FormatCliEnum {
    /// Detect the format from the file header.
    Auto,
    /// Force the GMSH 2.x reader.
    Legacy,
    /// Force the GMSH 4.1 reader.
    Modern,
}

impl FormatCliEnum {
    /// Construct the forced format, `None` meaning detection.
    pub fn construct(&self) -> Option<MeshFormat> {
        match self {
            FormatCliEnum::Auto => None,
            FormatCliEnum::Legacy => Some(MeshFormat::legacy()),
            FormatCliEnum::Modern => Some(MeshFormat::modern()),
        }
    }
}

//
// ------------------------------------------------------------
// Traits that don't need modification,
// but are references for adding a new mesh format
//      |
//      V
//

/// Mesh parser trait.
/// Each method reads one section into the mesh being built.
/// An `Err` stops that section only; everything already added to the mesh is kept.
#[enum_dispatch]
pub trait MeshParser {
    /// Short name of the format.
    fn format_name(&self) -> &'static str;

    /// Read the geometric entity table, if the format has one.
    fn read_entities(&self, text: &str) -> ParseOutcome<EntityTable>;

    /// Read the `$Nodes` section body.
    fn read_nodes(&self, section: &mut Section<'_>, mesh: &mut Mesh) -> Result<(), Diagnostic>;

    /// Read the `$Elements` section body.
    fn read_elements(&self, section: &mut Section<'_>, entities: &EntityTable, mesh: &mut Mesh) -> Result<(), Diagnostic>;
}

//
// ------------------------------------------------------------
// Functions with no modification needed
//      |
//      V
//

/// Parse the topology of a mesh with the given format.
/// Every section is attempted even if an earlier one failed.
pub fn parse_mesh(text: &str, format: &MeshFormat) -> ParseOutcome<Mesh> {
    let mut mesh = Mesh::new();
    let (entities, mut diagnostics) = format.read_entities(text).into_parts();

    match find_section(text, "Nodes") {
        Some(mut section) => {
            if let Err(diagnostic) = format.read_nodes(&mut section, &mut mesh) {
                diagnostics.push(diagnostic);
            }
        },
        None => diagnostics.push(Diagnostic::new("Nodes", None, "section not found")),
    }

    match find_section(text, "Elements") {
        Some(mut section) => {
            if let Err(diagnostic) = format.read_elements(&mut section, &entities, &mut mesh) {
                diagnostics.push(diagnostic);
            }
        },
        None => diagnostics.push(Diagnostic::new("Elements", None, "section not found")),
    }

    ParseOutcome::from_parts(mesh, diagnostics)
}

/// Parse an `id x y z ...` node line. Extra trailing fields are ignored.
fn parse_node_line(line: &str) -> Option<(u64, [f64; 3])> {
    let mut fields = line.split_whitespace();
    let id = fields.next()?.parse::<u64>().ok()?;
    let mut coords = [0.0; 3];
    for coord in coords.iter_mut() {
        *coord = fields.next()?.parse::<f64>().ok()?;
    }
    Some((id, coords))
}

/// Parse a coordinate-only `x y z ...` line.
fn parse_coord_line(line: &str) -> Option<[f64; 3]> {
    let mut fields = line.split_whitespace();
    let mut coords = [0.0; 3];
    for coord in coords.iter_mut() {
        *coord = fields.next()?.parse::<f64>().ok()?;
    }
    Some(coords)
}

/// Parse a line of non-negative ids.
fn parse_id_line(line: &str) -> Option<Vec<u64>> {
    line.split_whitespace().map(|field| field.parse::<u64>().ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(version: &str) -> String {
        format!("$MeshFormat\n{} 0 8\n$EndMeshFormat\n", version)
    }

    #[test]
    fn detects_version_from_header() {
        let (format, diagnostics) = MeshFormat::detect(&header("2.2"));
        assert_eq!(format, MeshFormat::legacy());
        assert!(diagnostics.is_empty());

        let (format, diagnostics) = MeshFormat::detect(&header("4.1"));
        assert_eq!(format, MeshFormat::modern());
        assert!(diagnostics.is_empty());

        let (format, _) = MeshFormat::detect(&header("4"));
        assert_eq!(format.format_name(), "modern");
        assert_ne!(format, MeshFormat::modern());
    }

    #[test]
    fn unknown_or_missing_header_falls_back_to_legacy() {
        let (format, diagnostics) = MeshFormat::detect(&header("9.9"));
        assert_eq!(format, MeshFormat::legacy());
        assert_eq!(diagnostics.len(), 1);

        let (format, diagnostics) = MeshFormat::detect("$Nodes\n0\n$EndNodes\n");
        assert_eq!(format, MeshFormat::legacy());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn binary_flag_is_reported() {
        let (_, diagnostics) = MeshFormat::detect("$MeshFormat\n4.1 1 8\n$EndMeshFormat\n");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("binary"));
    }

    #[test]
    fn missing_sections_are_diagnostics() {
        let outcome = parse_mesh(&header("2.2"), &MeshFormat::legacy());
        assert!(outcome.value().is_empty());
        assert_eq!(outcome.diagnostics().len(), 2);
    }

    #[test]
    fn line_helpers() {
        assert_eq!(parse_node_line("12 1.0 -2.5 3e-3 0 0"), Some((12, [1.0, -2.5, 0.003])));
        assert_eq!(parse_node_line("12 1.0 -2.5"), None);
        assert_eq!(parse_coord_line("0.5 0.25 0"), Some([0.5, 0.25, 0.0]));
        assert_eq!(parse_id_line("1 2 3"), Some(vec![1, 2, 3]));
        assert_eq!(parse_id_line("1 -2 3"), None);
    }

    #[test]
    fn cli_enum_forces_format() {
        assert_eq!(FormatCliEnum::Auto.construct(), None);
        assert_eq!(FormatCliEnum::Legacy.construct(), Some(MeshFormat::legacy()));
        assert_eq!(FormatCliEnum::Modern.construct(), Some(MeshFormat::modern()));
    }
}
