use std::str::FromStr;

/// A problem found while scanning a mesh section.
/// Reported alongside whatever was parsed, never raised.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Section name without the leading `$`.
    pub section: String,
    /// 1-based line number in the file, if known.
    pub line: Option<usize>,
    pub message: String,
}
impl Diagnostic {
    pub fn new(section: &str, line: Option<usize>, message: &str) -> Self {
        Diagnostic{section: section.to_string(), line, message: message.to_string()}
    }
}
impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "${} (line {}): {}", self.section, line, self.message),
            None => write!(f, "${}: {}", self.section, self.message),
        }
    }
}

/// Body lines of one `$Name ... $EndName` section, with a read cursor.
#[derive(Debug)]
pub struct Section<'a> {
    name: String,
    lines: Vec<(usize, &'a str)>,
    pos: usize,
}

/// Locate the first `$<name>` section in the text.
/// A missing `$End<name>` marker is tolerated, the body then runs to the end of the text.
pub fn find_section<'a>(text: &'a str, name: &str) -> Option<Section<'a>> {
    let start_marker = format!("${}", name);
    let end_marker = format!("$End{}", name);

    let mut numbered = text.lines().enumerate().map(|(i, line)| (i + 1, line));
    numbered.by_ref().find(|(_, line)| line.trim() == start_marker)?;

    let lines = numbered
        .take_while(|(_, line)| line.trim() != end_marker)
        .filter(|(_, line)| !line.trim().is_empty())
        .collect();

    Some(Section{name: name.to_string(), lines, pos: 0})
}

impl<'a> Section<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True once every body line has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// Number of body lines not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lines.len().saturating_sub(self.pos)
    }

    /// Line number of the most recently consumed line.
    pub fn current_line(&self) -> Option<usize> {
        self.pos.checked_sub(1).and_then(|i| self.lines.get(i)).map(|(n, _)| *n)
    }

    /// Build a diagnostic for this section at the current line.
    pub fn diagnostic(&self, message: &str) -> Diagnostic {
        Diagnostic::new(&self.name, self.current_line(), message)
    }

    /// Consume the next non-blank line.
    pub fn next_line(&mut self, what: &str) -> Result<&'a str, Diagnostic> {
        match self.lines.get(self.pos) {
            Some((_, line)) => {
                self.pos += 1;
                Ok(line.trim())
            },
            None => Err(Diagnostic::new(
                &self.name,
                self.lines.last().map(|(n, _)| *n),
                &format!("unexpected end of section while reading {}", what),
            )),
        }
    }

    /// Consume the next line and parse every whitespace-separated field as `T`.
    /// Fails if any field does not parse or there are fewer than `min` fields.
    pub fn next_fields<T: FromStr>(&mut self, what: &str, min: usize) -> Result<Vec<T>, Diagnostic> {
        let line = self.next_line(what)?;
        let fields = line.split_whitespace()
            .map(|field| field.parse::<T>())
            .collect::<Result<Vec<T>, _>>()
            .map_err(|_| self.diagnostic(&format!("invalid {}: '{}'", what, line)))?;
        if fields.len() < min {
            return Err(self.diagnostic(&format!("{} needs at least {} fields: '{}'", what, min, line)));
        }
        Ok(fields)
    }

    /// Consume the next line and parse a single leading count.
    pub fn next_count(&mut self, what: &str) -> Result<usize, Diagnostic> {
        let line = self.next_line(what)?;
        line.split_whitespace()
            .next()
            .and_then(|field| field.parse::<usize>().ok())
            .ok_or_else(|| self.diagnostic(&format!("invalid {}: '{}'", what, line)))
    }
}
