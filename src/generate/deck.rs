use itertools::Itertools;

use crate::mesh::{
    Mesh,
    PhysicalNameTable,
    TETRAHEDRON,
};

/// Relative location of the structural deck inside the project.
pub const DECK_FILE: &str = "calculix/nozzle.inp";

/// Element set holding every tetrahedron.
const ALL_ELEMENTS: &str = "Eall";
const MATERIAL: &str = "NozzleMaterial";
const IDS_PER_LINE: usize = 16;

/// Write the CalculiX input deck for the solid mesh.
/// Only tetrahedra go into the element block; every named physical group gets an element set.
/// The material and step blocks are placeholders to be filled in by the user.
pub fn write_deck(mesh: &Mesh, names: &PhysicalNameTable, heading: &str) -> String {
    let mut lines = vec!["*Heading".to_string(), heading.to_string()];

    lines.push("*Node".to_string());
    lines.extend(mesh.nodes.iter().map(|(id, [x, y, z])| format!("{}, {}, {}, {}", id, x, y, z)));

    let mut tetrahedra = mesh.elements_of_type(TETRAHEDRON).peekable();
    if tetrahedra.peek().is_some() {
        lines.push(format!("*Element, type=C3D4, elset={}", ALL_ELEMENTS));
        lines.extend(tetrahedra.map(|element| format!("{}, {}", element.id, element.nodes.iter().join(", "))));
    } else {
        log::warn!("Solid mesh has no tetrahedra, the deck has no element block");
    }

    for (physical, members) in mesh.physical_sets.iter() {
        let name = match names.get(*physical) {
            Some(name) => elset_name(name),
            None => continue,
        };
        lines.push(format!("*Elset, elset={}", name));
        lines.extend(members.chunks(IDS_PER_LINE).map(|chunk| chunk.iter().join(", ")));
    }

    lines.push(format!("*Material, name={}", MATERIAL));
    lines.extend(["*Elastic", "200000, 0.3", "*Density", "7.8e-09"].map(String::from));
    lines.push(format!("*Solid Section, elset={}, material={}", ALL_ELEMENTS, MATERIAL));
    lines.extend(["*Step", "*Static", "*End Step"].map(String::from));

    let mut deck = lines.join("\n");
    deck.push('\n');
    deck
}

/// Element set names can't contain whitespace or commas.
fn elset_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() || c == ',' { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Element;

    fn solid() -> (Mesh, PhysicalNameTable) {
        let mut mesh = Mesh::new();
        for (id, coords) in [(1, [0.0, 0.0, 0.0]), (2, [1.0, 0.0, 0.0]), (3, [0.0, 1.0, 0.0]), (4, [0.0, 0.0, 1.0]), (5, [1.0, 1.0, 1.5])] {
            mesh.push_node(id, coords);
        }
        mesh.push_element(Element{id: 11, element_type: TETRAHEDRON, physical: 3, nodes: vec![1, 2, 3, 4]});
        mesh.push_element(Element{id: 12, element_type: 2, physical: 8, nodes: vec![1, 2, 3]});
        mesh.push_element(Element{id: 13, element_type: TETRAHEDRON, physical: 3, nodes: vec![2, 3, 4, 5]});

        let mut names = PhysicalNameTable::new();
        names.insert(Some(3), 3, "Nozzle_Outer_Wall");
        (mesh, names)
    }

    #[test]
    fn named_group_gets_element_set() {
        let (mesh, names) = solid();
        let deck = write_deck(&mesh, &names, "test");

        assert!(deck.contains("*Elset, elset=Nozzle_Outer_Wall\n11, 13\n"));
        assert!(!deck.contains("elset=8"));
    }

    #[test]
    fn element_block_only_has_tetrahedra() {
        let (mesh, names) = solid();
        let deck = write_deck(&mesh, &names, "test");

        assert!(deck.contains("*Element, type=C3D4, elset=Eall\n11, 1, 2, 3, 4\n13, 2, 3, 4, 5\n*Elset"));
        assert!(!deck.contains("12, 1, 2, 3\n"));
        assert!(deck.contains("*Node\n1, 0, 0, 0\n"));
        assert!(deck.contains("5, 1, 1, 1.5\n"));
        assert!(deck.starts_with("*Heading\ntest\n"));
        assert!(deck.ends_with("*Step\n*Static\n*End Step\n"));
    }

    #[test]
    fn long_sets_wrap_lines() {
        let mut mesh = Mesh::new();
        for id in 1..=20 {
            mesh.push_element(Element{id, element_type: TETRAHEDRON, physical: 1, nodes: vec![1, 2, 3, 4]});
        }
        let mut names = PhysicalNameTable::new();
        names.insert(Some(3), 1, "Solid Volume");
        let deck = write_deck(&mesh, &names, "test");

        let set = deck.split("*Elset, elset=Solid_Volume\n").nth(1).unwrap();
        let lines: Vec<&str> = set.lines().take(2).collect();
        assert_eq!(lines[0].split(", ").count(), 16);
        assert_eq!(lines[1], "17, 18, 19, 20");
    }
}
