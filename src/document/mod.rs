//! Document layer: the tokenized inifile the resolvers read from.
//!
//! This module provides:
//! - The read-only query interface ([`ReadonlyDocument`])
//! - The mutation interface used by editing helpers ([`Document`])
//! - An in-memory implementation loadable from TOML snapshots ([`MemoryDocument`])
//!
//! The inifile text syntax is not parsed here. A document is already a list
//! of sections holding `(key, raw value, comment)` entries.

mod memory;

#[cfg(test)]
mod memory_tests;

pub use memory::{Entry, MemoryDocument, Section};

use std::path::PathBuf;

use thiserror::Error;

/// Error type for document queries and mutations.
///
/// Describes what went wrong without dictating recovery strategy.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The named section does not exist.
    #[error("No such section: [{0}]")]
    SectionNotFound(String),

    /// The key does not exist in the section.
    #[error("No such key in [{section}]: {key}")]
    KeyNotFound {
        /// Section that was searched
        section: String,
        /// Missing key
        key: String,
    },

    /// A section with this name already exists.
    #[error("Section already exists: [{0}]")]
    DuplicateSection(String),

    /// The key already exists in the section.
    #[error("Key already exists in [{section}]: {key}")]
    DuplicateKey {
        /// Section holding the key
        section: String,
        /// Duplicated key
        key: String,
    },

    /// Failed to read a document snapshot.
    #[error("Failed to read document '{}': {source}", path.display())]
    FileRead {
        /// Path to the snapshot
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a document snapshot.
    #[error("Failed to parse document snapshot: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Read access to a tokenized inifile.
///
/// All resolvers in this crate consume documents through this trait only.
/// Implementations must return sections and keys in document order.
pub trait ReadonlyDocument {
    /// Returns the section names in document order.
    fn section_names(&self) -> Vec<&str>;

    /// Returns true if the section exists.
    fn contains_section(&self, section: &str) -> bool;

    /// Returns true if the section exists and defines the key.
    fn contains_key(&self, section: &str, key: &str) -> bool;

    /// Returns the raw value of the entry, or `None` if absent.
    fn value(&self, section: &str, key: &str) -> Option<&str>;

    /// Returns the keys of the section in document order.
    ///
    /// A missing section has no keys.
    fn keys(&self, section: &str) -> Vec<&str>;
}

/// Mutation access to a tokenized inifile.
///
/// `before` arguments name the section (or key) the new item is inserted
/// in front of; `None` appends. Callers must serialize structural edits.
pub trait Document: ReadonlyDocument {
    /// Inserts a new, empty section.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::DuplicateSection`] if the section exists, or
    /// [`DocumentError::SectionNotFound`] if `before` names no section.
    fn add_section(&mut self, name: &str, before: Option<&str>) -> Result<(), DocumentError>;

    /// Inserts a new entry into an existing section.
    ///
    /// # Errors
    ///
    /// Returns an error if the section is missing, the key already exists,
    /// or `before` names no key of the section.
    fn add_entry(
        &mut self,
        section: &str,
        key: &str,
        value: &str,
        comment: Option<&str>,
        before: Option<&str>,
    ) -> Result<(), DocumentError>;

    /// Replaces the raw value of an existing entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the section or the key is missing.
    fn set_raw_value(&mut self, section: &str, key: &str, value: &str)
    -> Result<(), DocumentError>;

    /// Removes an entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the section or the key is missing.
    fn remove_key(&mut self, section: &str, key: &str) -> Result<(), DocumentError>;

    /// Renames a section in place, keeping its position and entries.
    ///
    /// # Errors
    ///
    /// Returns an error if `old` is missing or `new` already exists.
    fn rename_section(&mut self, old: &str, new: &str) -> Result<(), DocumentError>;
}
