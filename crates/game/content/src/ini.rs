//! The `Key=Value` text format shared by character and level files.
//!
//! ```text
//! ; comment
//! [Init]
//! Name=Guard
//! Kind=1
//! ```
//!
//! Lines before the first header belong to an unnamed section. Blank lines and
//! lines starting with `;` or `#` are skipped, as are lines without `=`.
//! Keys and values are trimmed; keys keep their case.

/// One `[Header]` block and its entries in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IniSection {
    pub name: Option<String>,
    pub entries: Vec<(String, String)>,
}

impl IniSection {
    /// Last value written for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<IniSection>,
}

impl IniDocument {
    pub fn parse(text: &str) -> Self {
        let mut sections = vec![IniSection::default()];
        for (number, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if let Some(header) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
                sections.push(IniSection {
                    name: Some(header.trim().to_string()),
                    entries: Vec::new(),
                });
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                tracing::debug!("line {}: no '=' in {:?}, skipped", number + 1, line);
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            if let Some(section) = sections.last_mut() {
                section.entries.push((key.to_string(), value.trim().to_string()));
            }
        }
        if sections.first().is_some_and(|first| first.entries.is_empty()) {
            sections.remove(0);
        }
        Self { sections }
    }

    pub fn sections(&self) -> &[IniSection] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections
            .iter()
            .find(|section| section.name.as_deref() == Some(name))
    }

    /// All entries regardless of section, in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sections.iter().flat_map(|section| {
            section
                .entries
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sections_comments_and_loose_lines() {
        let document = IniDocument::parse(
            "; header comment\n\
             Loose=1\n\
             [Init]\n\
             Name = Guard \n\
             # another comment\n\
             not a pair\n\
             Kind=1\n\
             Kind=2\n\
             [Empty]\n",
        );
        assert_eq!(document.sections().len(), 3);
        assert_eq!(document.sections()[0].name, None);
        let init = document.section("Init").unwrap();
        assert_eq!(init.get("Name"), Some("Guard"));
        assert_eq!(init.get("Kind"), Some("2"));
        assert_eq!(init.get("name"), None);
        assert!(document.section("Empty").unwrap().entries.is_empty());
        assert_eq!(document.entries().count(), 4);
    }

    #[test]
    fn values_may_contain_equals_signs() {
        let document = IniDocument::parse("Script=a=b.txt");
        assert_eq!(document.sections()[0].get("Script"), Some("a=b.txt"));
    }
}
