use crate::mesh::{
    Diagnostic,
    Element,
    EntityTable,
    Mesh,
    ParseOutcome,
    Section,
};
use super::{
    MeshParser,
    parse_node_line,
};

/// Legacy (2.x) format parser.
/// Nodes and elements are flat lists behind a single count line.
#[derive(Debug, Clone, PartialEq)]
pub struct Parser {}
impl Parser {
    pub fn new() -> Self {
        Parser{}
    }
}

impl MeshParser for Parser {
    fn format_name(&self) -> &'static str {
        "legacy"
    }

    /// Legacy files have no entity table.
    fn read_entities(&self, _text: &str) -> ParseOutcome<EntityTable> {
        ParseOutcome::Complete(EntityTable::new())
    }

    /// `count`, then `id x y z` per node.
    fn read_nodes(&self, section: &mut Section<'_>, mesh: &mut Mesh) -> Result<(), Diagnostic> {
        let count = section.next_count("node count")?;
        for _ in 0..count {
            let line = section.next_line("node")?;
            let (id, coords) = parse_node_line(line)
                .ok_or_else(|| section.diagnostic(&format!("invalid node: '{}'", line)))?;
            mesh.push_node(id, coords);
        }
        Ok(())
    }

    /// `count`, then `id type ntags tag1 .. tagN node ..` per element.
    /// The physical group is the first tag, or 0 for an untagged element.
    fn read_elements(&self, section: &mut Section<'_>, _entities: &EntityTable, mesh: &mut Mesh) -> Result<(), Diagnostic> {
        let count = section.next_count("element count")?;
        for _ in 0..count {
            let line = section.next_line("element")?;
            let element = parse_element_line(line)
                .ok_or_else(|| section.diagnostic(&format!("invalid element: '{}'", line)))?;
            mesh.push_element(element);
        }
        Ok(())
    }
}

fn parse_element_line(line: &str) -> Option<Element> {
    let fields = line.split_whitespace()
        .map(|field| field.parse::<i64>().ok())
        .collect::<Option<Vec<i64>>>()?;
    if fields.len() < 3 {
        return None;
    }

    let id = u64::try_from(fields[0]).ok()?;
    let element_type = u32::try_from(fields[1]).ok()?;
    let n_tags = usize::try_from(fields[2]).ok()?;
    let node_start = 3 + n_tags;
    if fields.len() < node_start {
        return None;
    }

    let physical = if n_tags > 0 { fields[3] } else { 0 };
    let nodes = fields[node_start..]
        .iter()
        .map(|node| u64::try_from(*node).ok())
        .collect::<Option<Vec<u64>>>()?;

    Some(Element{id, element_type, physical, nodes})
}
