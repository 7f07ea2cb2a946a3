//! In-memory document implementation.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Document, DocumentError, ReadonlyDocument};

/// A single `key = value` line of a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entry {
    /// Key or key pattern, e.g. `network` or `**.node[*].power`
    pub key: String,
    /// Raw (unevaluated) value text
    pub value: String,
    /// Trailing comment, including its leading `#`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Entry {
    /// Creates an entry without a comment.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            comment: None,
        }
    }
}

/// A named section with its entries in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    /// Section name, e.g. `General` or `Config Wireless`
    pub name: String,
    /// Entries in document order
    #[serde(default, rename = "entry")]
    pub entries: Vec<Entry>,
}

impl Section {
    /// Creates an empty section.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Appends an entry (builder pattern).
    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push(Entry::new(key, value));
        self
    }

    fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key == key)
    }

    fn entry_index(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }
}

/// An in-memory, ordered inifile document.
///
/// Loadable from a TOML snapshot of the already-tokenized inifile:
///
/// ```
/// use ini_resolve::document::{MemoryDocument, ReadonlyDocument};
///
/// let doc = MemoryDocument::parse(r#"
///     [[section]]
///     name = "General"
///     entry = [{ key = "network", value = "Net" }]
///
///     [[section]]
///     name = "Config Fast"
///     entry = [{ key = "sim-time-limit", value = "10s" }]
/// "#).unwrap();
///
/// assert_eq!(doc.section_names(), ["General", "Config Fast"]);
/// assert_eq!(doc.value("General", "network"), Some("Net"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryDocument {
    #[serde(default, rename = "section")]
    sections: Vec<Section>,
}

impl MemoryDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document from sections, rejecting duplicates.
    ///
    /// # Errors
    ///
    /// Returns an error if two sections share a name or a section repeats a key.
    pub fn from_sections(sections: Vec<Section>) -> Result<Self, DocumentError> {
        let doc = Self { sections };
        doc.validate()?;
        Ok(doc)
    }

    /// Parses a document from a TOML snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or contains duplicates.
    pub fn parse(content: &str) -> Result<Self, DocumentError> {
        let doc: Self = toml::from_str(content)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Loads a document from a TOML snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path).map_err(|e| DocumentError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Returns the sections in document order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    fn validate(&self) -> Result<(), DocumentError> {
        let mut names = HashSet::new();
        for section in &self.sections {
            if !names.insert(section.name.as_str()) {
                return Err(DocumentError::DuplicateSection(section.name.clone()));
            }
            let mut keys = HashSet::new();
            for entry in &section.entries {
                if !keys.insert(entry.key.as_str()) {
                    return Err(DocumentError::DuplicateKey {
                        section: section.name.clone(),
                        key: entry.key.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    fn section_index(&self, name: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.name == name)
    }

    fn section_mut(&mut self, name: &str) -> Result<&mut Section, DocumentError> {
        self.sections
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| DocumentError::SectionNotFound(name.to_string()))
    }

    fn entry_mut(&mut self, section: &str, key: &str) -> Result<&mut Entry, DocumentError> {
        self.section_mut(section)?
            .entries
            .iter_mut()
            .find(|e| e.key == key)
            .ok_or_else(|| key_not_found(section, key))
    }
}

fn key_not_found(section: &str, key: &str) -> DocumentError {
    DocumentError::KeyNotFound {
        section: section.to_string(),
        key: key.to_string(),
    }
}

impl ReadonlyDocument for MemoryDocument {
    fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    fn contains_section(&self, section: &str) -> bool {
        self.section(section).is_some()
    }

    fn contains_key(&self, section: &str, key: &str) -> bool {
        self.section(section).is_some_and(|s| s.entry(key).is_some())
    }

    fn value(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)
            .and_then(|s| s.entry(key))
            .map(|e| e.value.as_str())
    }

    fn keys(&self, section: &str) -> Vec<&str> {
        self.section(section)
            .map(|s| s.entries.iter().map(|e| e.key.as_str()).collect())
            .unwrap_or_default()
    }
}

impl Document for MemoryDocument {
    fn add_section(&mut self, name: &str, before: Option<&str>) -> Result<(), DocumentError> {
        if self.contains_section(name) {
            return Err(DocumentError::DuplicateSection(name.to_string()));
        }
        let index = match before {
            Some(anchor) => self
                .section_index(anchor)
                .ok_or_else(|| DocumentError::SectionNotFound(anchor.to_string()))?,
            None => self.sections.len(),
        };
        self.sections.insert(index, Section::new(name));
        Ok(())
    }

    fn add_entry(
        &mut self,
        section: &str,
        key: &str,
        value: &str,
        comment: Option<&str>,
        before: Option<&str>,
    ) -> Result<(), DocumentError> {
        let target = self.section_mut(section)?;
        if target.entry(key).is_some() {
            return Err(DocumentError::DuplicateKey {
                section: section.to_string(),
                key: key.to_string(),
            });
        }
        let index = match before {
            Some(anchor) => target
                .entry_index(anchor)
                .ok_or_else(|| key_not_found(section, anchor))?,
            None => target.entries.len(),
        };
        target.entries.insert(
            index,
            Entry {
                key: key.to_string(),
                value: value.to_string(),
                comment: comment.map(str::to_string),
            },
        );
        Ok(())
    }

    fn set_raw_value(
        &mut self,
        section: &str,
        key: &str,
        value: &str,
    ) -> Result<(), DocumentError> {
        value.clone_into(&mut self.entry_mut(section, key)?.value);
        Ok(())
    }

    fn remove_key(&mut self, section: &str, key: &str) -> Result<(), DocumentError> {
        let target = self.section_mut(section)?;
        let index = target
            .entry_index(key)
            .ok_or_else(|| key_not_found(section, key))?;
        target.entries.remove(index);
        Ok(())
    }

    fn rename_section(&mut self, old: &str, new: &str) -> Result<(), DocumentError> {
        if old != new && self.contains_section(new) {
            return Err(DocumentError::DuplicateSection(new.to_string()));
        }
        new.clone_into(&mut self.section_mut(old)?.name);
        Ok(())
    }
}
