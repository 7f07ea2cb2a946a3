//! Placement of new sections and entries.
//!
//! Ordering is an editorial convention only; resolution never depends on
//! it. [`CanonicalOrdering`] keeps `[General]` first and sorts the rest,
//! [`AppendOrdering`] turns ordering off.

use std::cmp::Ordering;

use crate::document::ReadonlyDocument;
use crate::registry::{CFG_DESCRIPTION, CFG_EXTENDS, CFG_NETWORK, GENERAL, KeyType};

/// Position class of a key within its section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyRank {
    /// `extends`
    Extends = 1,
    /// `description`
    Description = 2,
    /// `network`
    Network = 3,
    /// Any other section-level option
    Config = 4,
    /// Per-object option (`**.vector-recording`)
    PerObjectConfig = 5,
    /// Parameter assignment
    Param = 6,
}

impl KeyRank {
    /// Ranks a key.
    ///
    /// # Examples
    ///
    /// ```
    /// use ini_resolve::ordering::KeyRank;
    ///
    /// assert!(KeyRank::of("extends") < KeyRank::of("network"));
    /// assert!(KeyRank::of("sim-time-limit") < KeyRank::of("**.power"));
    /// ```
    #[must_use]
    pub fn of(key: &str) -> Self {
        match key {
            k if k == CFG_EXTENDS.name => Self::Extends,
            k if k == CFG_DESCRIPTION.name => Self::Description,
            k if k == CFG_NETWORK.name => Self::Network,
            k => match KeyType::of(k) {
                KeyType::Config => Self::Config,
                KeyType::PerObjectConfig => Self::PerObjectConfig,
                KeyType::Param => Self::Param,
            },
        }
    }
}

/// Case-insensitive comparison of names.
fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Returns true if `a` should come before `b` within a section.
fn precedes_key(a: &str, b: &str) -> bool {
    KeyRank::of(a)
        .cmp(&KeyRank::of(b))
        .then_with(|| compare_ignore_case(a, b))
        .is_lt()
}

/// Decides where new sections and entries go.
///
/// Both methods return the name of the existing item the new one is
/// inserted in front of, or `None` to append.
pub trait OrderingPolicy {
    /// Returns the section a new section is inserted before.
    fn section_insertion_point(&self, doc: &dyn ReadonlyDocument, new_section: &str)
    -> Option<String>;

    /// Returns the key a new key is inserted before.
    ///
    /// The key must not exist in the section yet.
    fn key_insertion_point(
        &self,
        doc: &dyn ReadonlyDocument,
        section: &str,
        new_key: &str,
    ) -> Option<String>;
}

/// `[General]` first, then sections alphabetically; keys by [`KeyRank`],
/// then alphabetically.
///
/// # Examples
///
/// ```
/// use ini_resolve::document::{MemoryDocument, Section};
/// use ini_resolve::ordering::{CanonicalOrdering, OrderingPolicy};
///
/// let doc = MemoryDocument::from_sections(vec![
///     Section::new("General"),
///     Section::new("Config Alpha"),
///     Section::new("Config Gamma"),
/// ]).unwrap();
///
/// assert_eq!(
///     CanonicalOrdering.section_insertion_point(&doc, "Config Beta").as_deref(),
///     Some("Config Gamma")
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalOrdering;

impl OrderingPolicy for CanonicalOrdering {
    fn section_insertion_point(
        &self,
        doc: &dyn ReadonlyDocument,
        new_section: &str,
    ) -> Option<String> {
        let sections = doc.section_names();
        if new_section == GENERAL {
            return sections.first().map(ToString::to_string);
        }
        sections
            .into_iter()
            .find(|s| *s != GENERAL && compare_ignore_case(s, new_section).is_gt())
            .map(str::to_string)
    }

    fn key_insertion_point(
        &self,
        doc: &dyn ReadonlyDocument,
        section: &str,
        new_key: &str,
    ) -> Option<String> {
        doc.keys(section)
            .into_iter()
            .find(|key| precedes_key(new_key, key))
            .map(str::to_string)
    }
}

/// Appends everything at the end.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppendOrdering;

impl OrderingPolicy for AppendOrdering {
    fn section_insertion_point(&self, _doc: &dyn ReadonlyDocument, _new_section: &str) -> Option<String> {
        None
    }

    fn key_insertion_point(
        &self,
        _doc: &dyn ReadonlyDocument,
        _section: &str,
        _new_key: &str,
    ) -> Option<String> {
        None
    }
}
