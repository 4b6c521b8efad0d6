//! INI dialect parser.
//!
//! Accepts the dialect produced by common license tooling:
//! - optional UTF-8 byte order mark
//! - `;` and `#` comments at the start of a line
//! - `;` inline comments when preceded by whitespace
//! - `name=value` or `name:value` pairs, whitespace-trimmed
//! - section and key names matched case-insensitively
//!
//! Parsing never fails. Lines that fit none of the shapes above are skipped.

const BOM: char = '\u{feff}';

/// A named group of `key=value` bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Returns the section name as written in the file.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the first value bound to `key`, ignoring ASCII case.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over all bindings in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of bindings, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the section has no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A parsed INI document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<Section>,
}

impl IniDocument {
    /// Parses INI text. Never fails.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix(BOM).unwrap_or(text);
        let mut sections: Vec<Section> = Vec::new();

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let end = find_char_or_comment(rest, ']');
                if rest[end..].starts_with(']') {
                    sections.push(Section::new(rest[..end].trim()));
                }
                continue;
            }

            // Bindings before the first header belong to no section.
            let Some(section) = sections.last_mut() else {
                continue;
            };

            if let Some((name, value)) = split_binding(line) {
                section.entries.push((name.to_string(), value.to_string()));
            }
        }

        Self { sections }
    }

    /// Returns the first section named `name`, ignoring ASCII case.
    ///
    /// Later sections with the same name are never consulted.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Iterates over all sections in file order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }
}

/// Splits `name=value` (or `name:value`) with inline comments removed.
fn split_binding(line: &str) -> Option<(&str, &str)> {
    let mut end = find_char_or_comment(line, '=');
    if !line[end..].starts_with('=') {
        end = find_char_or_comment(line, ':');
    }
    let sep = line[end..].chars().next()?;
    if sep != '=' && sep != ':' {
        return None;
    }

    let name = line[..end].trim_end();
    let value = line[end + 1..].trim_start();
    let value = &value[..find_char_or_comment(value, '\0')];
    Some((name, value.trim_end()))
}

/// Byte offset of the first `c`, or of a `;` that follows whitespace,
/// or the end of `s` if neither occurs.
fn find_char_or_comment(s: &str, c: char) -> usize {
    let mut was_whitespace = false;
    for (i, ch) in s.char_indices() {
        if ch == c || (was_whitespace && ch == ';') {
            return i;
        }
        was_whitespace = ch.is_whitespace();
    }
    s.len()
}
