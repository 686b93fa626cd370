use crate::mesh::{
    Diagnostic,
    ParseOutcome,
    find_section,
};

/// One `$PhysicalNames` record.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalName {
    /// Dimension of the group, when the record declares one.
    pub dimension: Option<u32>,
    pub id: i64,
    pub name: String,
}

/// Physical group names in declaration order.
/// Ids referenced by elements but never named are simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhysicalNameTable {
    entries: Vec<PhysicalName>,
}
impl PhysicalNameTable {
    pub fn new() -> Self {
        PhysicalNameTable::default()
    }

    /// Add a name. A re-declared id takes the new name but keeps its original position.
    pub fn insert(&mut self, dimension: Option<u32>, id: i64, name: &str) {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.dimension = dimension;
                entry.name = name.to_string();
            },
            None => self.entries.push(PhysicalName{dimension, id, name: name.to_string()}),
        }
    }

    /// Name of a physical group id.
    pub fn get(&self, id: i64) -> Option<&str> {
        self.entries.iter().find(|entry| entry.id == id).map(|entry| entry.name.as_str())
    }

    /// Names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhysicalName> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }
}

/// Parse the `$PhysicalNames` section.
/// Reads exactly the declared number of records and ignores anything after them.
/// A file without the section yields an empty, complete table.
pub fn parse_physical_names(text: &str) -> ParseOutcome<PhysicalNameTable> {
    let mut table = PhysicalNameTable::new();
    let mut section = match find_section(text, "PhysicalNames") {
        Some(section) => section,
        None => return ParseOutcome::Complete(table),
    };

    let mut diagnostics = Vec::new();
    if let Err(diagnostic) = read_records(&mut section, &mut table) {
        diagnostics.push(diagnostic);
    }
    ParseOutcome::from_parts(table, diagnostics)
}

fn read_records(section: &mut crate::mesh::Section<'_>, table: &mut PhysicalNameTable) -> Result<(), Diagnostic> {
    let count = section.next_count("physical name count")?;
    for _ in 0..count {
        let line = section.next_line("physical name")?;
        let (dimension, id, name) = split_record(line)
            .ok_or_else(|| section.diagnostic(&format!("invalid physical name record: '{}'", line)))?;
        table.insert(dimension, id, name);
    }
    Ok(())
}

/// Split `dim id "name"` or `id "name"` into its parts, stripping the quotes.
fn split_record(line: &str) -> Option<(Option<u32>, i64, &str)> {
    let (head, name) = match line.find('"') {
        Some(quote) => (&line[..quote], line[quote..].trim()),
        None => {
            let split = line.rfind(char::is_whitespace)?;
            (&line[..split], line[split..].trim())
        },
    };
    let numbers = head.split_whitespace()
        .map(|field| field.parse::<i64>().ok())
        .collect::<Option<Vec<i64>>>()?;
    let name = name.trim_matches('"');

    match numbers.as_slice() {
        [dimension, id] => Some((u32::try_from(*dimension).ok(), *id, name)),
        [id] => Some((None, *id, name)),
        _ => None,
    }
}
