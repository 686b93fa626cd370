use std::collections::HashMap;
use std::str::FromStr;

use crate::mesh::{
    Diagnostic,
    ParseOutcome,
    Section,
    find_section,
};

/// Physical tags of the geometric entities declared in a modern `$Entities` section.
/// Keyed by `(dimension, entity tag)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityTable {
    physicals: HashMap<(u32, i64), Vec<i64>>,
}
impl EntityTable {
    pub fn new() -> Self {
        EntityTable::default()
    }

    pub fn insert(&mut self, dimension: u32, tag: i64, physicals: Vec<i64>) {
        self.physicals.insert((dimension, tag), physicals);
    }

    /// First physical group of an entity, if it has any.
    pub fn physical_for(&self, dimension: u32, tag: i64) -> Option<i64> {
        self.physicals.get(&(dimension, tag)).and_then(|tags| tags.first().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.physicals.is_empty()
    }
}

/// Parse the `$Entities` section of a modern file.
/// `inline_point_bounds` selects the 4.0 layout, where points carry a bounding box like
/// every other entity instead of a single coordinate triple.
pub fn parse_entities(text: &str, inline_point_bounds: bool) -> ParseOutcome<EntityTable> {
    let mut table = EntityTable::new();
    let mut section = match find_section(text, "Entities") {
        Some(section) => section,
        None => return ParseOutcome::Complete(table),
    };

    let mut diagnostics = Vec::new();
    if let Err(diagnostic) = read_entities(&mut section, inline_point_bounds, &mut table) {
        diagnostics.push(diagnostic);
    }
    ParseOutcome::from_parts(table, diagnostics)
}

fn read_entities(section: &mut Section<'_>, inline_point_bounds: bool, table: &mut EntityTable) -> Result<(), Diagnostic> {
    let counts = section.next_fields::<usize>("entity counts", 4)?;

    for (dimension, count) in counts.iter().take(4).enumerate() {
        // Points: tag x y z, curves and up: tag minX minY minZ maxX maxY maxZ
        let coord_fields = if dimension == 0 && !inline_point_bounds { 3 } else { 6 };
        for _ in 0..*count {
            let fields = section.next_fields::<String>("entity", coord_fields + 2)?;
            let tag: i64 = parse_field(section, &fields[0], "entity tag")?;
            for coord in fields[1..=coord_fields].iter() {
                parse_field::<f64>(section, coord, "entity bounds")?;
            }
            let n_physicals: usize = parse_field(section, &fields[coord_fields + 1], "physical tag count")?;
            let physicals_start = coord_fields + 2;
            let physicals_end = physicals_start.checked_add(n_physicals)
                .filter(|end| *end <= fields.len())
                .ok_or_else(|| section.diagnostic(&format!("entity {} declares {} physical tags but lists fewer", tag, n_physicals)))?;
            let physicals = fields[physicals_start..physicals_end]
                .iter()
                .map(|field| parse_field::<i64>(section, field, "physical tag"))
                .collect::<Result<Vec<_>, _>>()?;
            table.insert(dimension as u32, tag, physicals);
        }
    }
    Ok(())
}

fn parse_field<T: FromStr>(section: &Section<'_>, field: &str, what: &str) -> Result<T, Diagnostic> {
    field.parse::<T>().map_err(|_| section.diagnostic(&format!("invalid {}: '{}'", what, field)))
}
