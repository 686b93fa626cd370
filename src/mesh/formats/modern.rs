use crate::mesh::{
    Diagnostic,
    Element,
    EntityTable,
    Mesh,
    ParseOutcome,
    Section,
    parse_entities,
};
use super::{
    MeshParser,
    parse_coord_line,
    parse_id_line,
    parse_node_line,
};

/// Revision of the 4.x layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revision {
    /// 4.0: block headers start with the entity tag, node lines carry their own id.
    V40,
    /// 4.1: block headers start with the dimension, node ids precede the coordinates.
    V41,
}

/// Modern (4.x) format parser.
/// Nodes and elements come in entity blocks, each with its own header and count.
#[derive(Debug, Clone, PartialEq)]
pub struct Parser {
    revision: Revision,
}
impl Parser {
    pub fn new(revision: Revision) -> Self {
        Parser{revision}
    }

    /// Split a block header into `(dimension, entity tag, third field, count)`.
    fn block_header(&self, section: &mut Section<'_>, what: &str) -> Result<(u32, i64, i64, usize), Diagnostic> {
        let fields = section.next_fields::<i64>(what, 4)?;
        let (dimension, tag) = match self.revision {
            Revision::V40 => (fields[1], fields[0]),
            Revision::V41 => (fields[0], fields[1]),
        };
        let dimension = u32::try_from(dimension)
            .map_err(|_| section.diagnostic(&format!("invalid entity dimension {}", dimension)))?;
        let count = usize::try_from(fields[3])
            .map_err(|_| section.diagnostic(&format!("invalid block count {}", fields[3])))?;
        Ok((dimension, tag, fields[2], count))
    }
}

impl MeshParser for Parser {
    fn format_name(&self) -> &'static str {
        "modern"
    }

    fn read_entities(&self, text: &str) -> ParseOutcome<EntityTable> {
        parse_entities(text, self.revision == Revision::V40)
    }

    /// `numBlocks numNodes ..`, then per block a header and its nodes.
    fn read_nodes(&self, section: &mut Section<'_>, mesh: &mut Mesh) -> Result<(), Diagnostic> {
        let header = section.next_fields::<u64>("node header", 2)?;
        for _ in 0..header[0] {
            let (_, _, _, count) = self.block_header(section, "node block header")?;
            match self.revision {
                Revision::V40 => {
                    for _ in 0..count {
                        let line = section.next_line("node")?;
                        let (id, coords) = parse_node_line(line)
                            .ok_or_else(|| section.diagnostic(&format!("invalid node: '{}'", line)))?;
                        mesh.push_node(id, coords);
                    }
                },
                Revision::V41 => {
                    // Declared counts can exceed the data present
                    let mut ids = Vec::with_capacity(count.min(section.remaining()));
                    while ids.len() < count {
                        let line = section.next_line("node tag")?;
                        let tags = parse_id_line(line)
                            .ok_or_else(|| section.diagnostic(&format!("invalid node tag: '{}'", line)))?;
                        ids.extend(tags);
                    }
                    for id in ids {
                        let line = section.next_line("node coordinates")?;
                        let coords = parse_coord_line(line)
                            .ok_or_else(|| section.diagnostic(&format!("invalid node coordinates: '{}'", line)))?;
                        mesh.push_node(id, coords);
                    }
                },
            }
        }
        Ok(())
    }

    /// `numBlocks numElements ..`, then per block `dim tag type count` and its elements.
    /// The physical group comes from the entity table when the entity has one,
    /// otherwise the entity tag stands in for it.
    fn read_elements(&self, section: &mut Section<'_>, entities: &EntityTable, mesh: &mut Mesh) -> Result<(), Diagnostic> {
        let header = section.next_fields::<u64>("element header", 2)?;
        let mut fallback_blocks = 0;

        for _ in 0..header[0] {
            let (dimension, tag, element_type, count) = self.block_header(section, "element block header")?;
            let element_type = u32::try_from(element_type)
                .map_err(|_| section.diagnostic(&format!("invalid element type {}", element_type)))?;
            let physical = match entities.physical_for(dimension, tag) {
                Some(physical) => physical,
                None => {
                    fallback_blocks += 1;
                    tag
                },
            };

            for _ in 0..count {
                let line = section.next_line("element")?;
                let ids = parse_id_line(line)
                    .filter(|ids| ids.len() >= 2)
                    .ok_or_else(|| section.diagnostic(&format!("invalid element: '{}'", line)))?;
                mesh.push_element(Element{
                    id: ids[0],
                    element_type,
                    physical,
                    nodes: ids[1..].to_vec(),
                });
            }
        }

        if fallback_blocks > 0 {
            log::warn!("{} element block(s) without a physical group in $Entities, using entity tags as physical ids", fallback_blocks);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{parse_mesh, parse_physical_names, MeshFormat, TETRAHEDRON};

    const COOLING: &str = concat!(
        "$MeshFormat\n4.1 0 8\n$EndMeshFormat\n",
        "$PhysicalNames\n2\n",
        "2 5 \"Cooling_Channel_1_Entry_Wall\"\n",
        "2 6 \"Cooling_Channel_2_Entry_Wall\"\n",
        "$EndPhysicalNames\n",
        "$Nodes\n2 5 1 5\n",
        "2 5 0 3\n",
        "1\n2\n3\n",
        "0 0 0\n1 0 0\n0 1 0\n",
        "3 1 0 2\n",
        "4\n5\n",
        "0 0 1\n1 1 1\n",
        "$EndNodes\n",
        "$Elements\n2 3 1 3\n",
        "2 5 2 1\n",
        "1 1 2 3\n",
        "3 1 4 2\n",
        "2 1 2 3 4\n",
        "3 2 3 4 5\n",
        "$EndElements\n",
    );

    #[test]
    fn counts_match_block_headers() {
        let outcome = parse_mesh(COOLING, &MeshFormat::modern());
        assert!(outcome.is_complete(), "{:?}", outcome.diagnostics());

        let mesh = outcome.value();
        assert_eq!(mesh.n_nodes(), 3 + 2);
        assert_eq!(mesh.n_elements(), 1 + 2);
        assert_eq!(mesh.nodes[&5], [1.0, 1.0, 1.0]);
        assert_eq!(mesh.elements_of_type(TETRAHEDRON).count(), 2);
    }

    #[test]
    fn entity_tag_stands_in_without_entities_section() {
        let mesh = parse_mesh(COOLING, &MeshFormat::modern()).into_value();
        assert_eq!(mesh.physical_sets[&5], vec![1]);
        assert_eq!(mesh.physical_sets[&1], vec![2, 3]);

        let names = parse_physical_names(COOLING).into_value();
        assert_eq!(names.get(5), Some("Cooling_Channel_1_Entry_Wall"));
    }

    #[test]
    fn entities_section_supplies_physical_ids() {
        let entities = concat!(
            "$Entities\n0 0 1 1\n",
            "5 0 0 0 1 1 0 1 6 0\n",
            "1 0 0 0 1 1 1 1 40 0\n",
            "$EndEntities\n",
        );
        let text = COOLING.replace("$Nodes\n", &format!("{}$Nodes\n", entities));
        let mesh = parse_mesh(&text, &MeshFormat::modern()).into_value();
        assert_eq!(mesh.physical_sets[&6], vec![1]);
        assert_eq!(mesh.physical_sets[&40], vec![2, 3]);
        assert!(mesh.physical_sets.get(&5).is_none());
    }

    #[test]
    fn revision_40_layout() {
        let text = concat!(
            "$MeshFormat\n4 0 8\n$EndMeshFormat\n",
            "$Nodes\n1 2\n",
            "9 2 0 2\n",
            "1 0 0 0\n",
            "2 1 0 0\n",
            "$EndNodes\n",
            "$Elements\n1 1\n",
            "9 2 1 1\n",
            "1 1 2\n",
            "$EndElements\n",
        );
        let (format, _) = MeshFormat::detect(text);
        let outcome = parse_mesh(text, &format);
        assert!(outcome.is_complete(), "{:?}", outcome.diagnostics());
        let mesh = outcome.value();
        assert_eq!(mesh.n_nodes(), 2);
        assert_eq!(mesh.physical_sets[&9], vec![1]);
    }

    #[test]
    fn truncated_block_keeps_earlier_blocks() {
        let text = COOLING.replace("3 2 3 4 5\n", "");
        let outcome = parse_mesh(&text, &MeshFormat::modern());
        assert!(!outcome.is_complete());
        assert_eq!(outcome.value().n_nodes(), 5);
        assert_eq!(outcome.value().n_elements(), 2);
    }

    fn sections(outcome: &ParseOutcome<Mesh>) -> Vec<&str> {
        outcome.diagnostics().iter().map(|diagnostic| diagnostic.section.as_str()).collect()
    }

    #[test]
    fn huge_node_block_count_is_a_diagnostic() {
        let text = concat!(
            "$MeshFormat\n4.1 0 8\n$EndMeshFormat\n",
            "$Nodes\n1 1 1 1\n",
            "2 5 0 9223372036854775807\n",
            "1\n0 0 0\n",
            "$EndNodes\n",
        );
        let loaded = crate::mesh::parse_mesh_text(std::path::Path::new("huge.msh"), text, None);
        assert!(!loaded.mesh.is_complete());
        assert_eq!(loaded.mesh.value().n_nodes(), 0);
        assert!(sections(&loaded.mesh).contains(&"Nodes"), "{:?}", loaded.mesh.diagnostics());
    }

    #[test]
    fn negative_block_count_stops_only_that_section() {
        let text = COOLING.replace("3 1 0 2\n", "3 1 0 -2\n");
        let outcome = parse_mesh(&text, &MeshFormat::modern());
        assert_eq!(sections(&outcome), vec!["Nodes"]);
        assert!(outcome.diagnostics()[0].message.contains("invalid block count -2"));
        assert_eq!(outcome.value().n_nodes(), 3);
        assert_eq!(outcome.value().n_elements(), 3);
    }

    #[test]
    fn oversized_block_totals_keep_every_block_present() {
        let text = COOLING.replace("$Nodes\n2 5 1 5\n", "$Nodes\n18446744073709551615 5 1 5\n");
        let outcome = parse_mesh(&text, &MeshFormat::modern());
        assert_eq!(sections(&outcome), vec!["Nodes"]);
        assert_eq!(outcome.value().n_nodes(), 5);
        assert_eq!(outcome.value().n_elements(), 3);

        let text = COOLING.replace("$Elements\n2 3 1 3\n", "$Elements\n4000000000 3 1 3\n");
        let outcome = parse_mesh(&text, &MeshFormat::modern());
        assert_eq!(sections(&outcome), vec!["Elements"]);
        assert_eq!(outcome.value().n_elements(), 3);

        let text = COOLING.replace("$Nodes\n2 5 1 5\n", "$Nodes\n99999999999999999999 5 1 5\n");
        let outcome = parse_mesh(&text, &MeshFormat::modern());
        assert_eq!(sections(&outcome), vec!["Nodes"]);
        assert_eq!(outcome.value().n_nodes(), 0);
    }

    #[test]
    fn element_count_beyond_data_keeps_what_was_read() {
        let text = COOLING.replace("3 1 4 2\n", "3 1 4 9000000000\n");
        let outcome = parse_mesh(&text, &MeshFormat::modern());
        assert_eq!(sections(&outcome), vec!["Elements"]);
        assert!(outcome.diagnostics()[0].message.contains("unexpected end of section"));
        assert_eq!(outcome.value().n_nodes(), 5);
        assert_eq!(outcome.value().n_elements(), 3);
    }
}
