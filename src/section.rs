//! Section inheritance: `extends=` parsing and fallback-chain resolution.
//!
//! Every section except `[General]` falls back to the sections named in its
//! `extends=` list, or to `[General]` when it has none. The fallback chain
//! lists the sections consulted for a lookup, most specific first.
//!
//! # Chain Order
//!
//! The chain is the depth-first concatenation of the base sections' chains
//! in `extends=` order. A section already in the chain is never added again,
//! which suppresses both diamond duplicates and cycles. `[General]` is held
//! back until the walk completes so that it always closes the chain.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::document::ReadonlyDocument;
use crate::lookup::lookup_config;
use crate::registry::{CFG_ABSTRACT, CFG_REPEAT, CONFIG_PREFIX, EXTENDS, GENERAL};

#[cfg(test)]
#[path = "section_tests.rs"]
mod tests;

/// Separators of an `extends=` list.
pub(crate) static EXTENDS_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[, \t]").expect("valid separator regex"));

/// Everything up to and including the last run of spaces of a section name.
static SECTION_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".+ +").expect("valid prefix regex"));

/// Splits an `extends=` value into config names.
///
/// The list is comma or whitespace separated; empty names are dropped.
///
/// # Examples
///
/// ```
/// use ini_resolve::section::parse_extends_list;
///
/// assert_eq!(parse_extends_list(Some(" foo,, bar  baz ")), ["foo", "bar", "baz"]);
/// assert!(parse_extends_list(None).is_empty());
/// ```
#[must_use]
pub fn parse_extends_list(value: Option<&str>) -> Vec<String> {
    value.map_or_else(Vec::new, |v| {
        EXTENDS_SEPARATOR
            .split(v)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    })
}

/// Formats config names as an `extends=` value.
#[must_use]
pub fn format_extends_list<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",")
}

/// Chops off a potential `Config ` prefix from a section name.
#[must_use]
pub fn remove_section_name_prefix(section: &str) -> String {
    SECTION_PREFIX.replace(section, "").into_owned()
}

/// Returns the config name of a section; empty for `[General]`.
#[must_use]
pub fn section_name_to_config_name(section: &str) -> String {
    if section == GENERAL {
        String::new()
    } else {
        remove_section_name_prefix(section)
    }
}

/// Returns the config names of the given sections, skipping `[General]`.
#[must_use]
pub fn section_names_to_config_names<S: AsRef<str>>(sections: &[S]) -> Vec<String> {
    sections
        .iter()
        .map(|s| section_name_to_config_name(s.as_ref()))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Returns the section name for a config name (`Foo` → `Config Foo`).
#[must_use]
pub fn config_name_to_section_name(config: &str) -> String {
    if config == GENERAL {
        GENERAL.to_string()
    } else {
        format!("{CONFIG_PREFIX}{config}")
    }
}

/// Returns the sections the given section directly extends.
///
/// `[General]` extends nothing. Names that correspond to no existing
/// section are dropped; each name is tried verbatim and then with the
/// `Config ` prefix. Without an `extends=` list the base is `[General]`,
/// but only if that section really exists.
pub fn resolve_base_sections<D>(doc: &D, section: &str) -> Vec<String>
where
    D: ReadonlyDocument + ?Sized,
{
    if section == GENERAL {
        return Vec::new();
    }

    let names = parse_extends_list(doc.value(section, EXTENDS));
    if names.is_empty() {
        return if doc.contains_section(GENERAL) {
            vec![GENERAL.to_string()]
        } else {
            Vec::new()
        };
    }

    names
        .iter()
        .filter_map(|name| existing_section(doc, name))
        .collect()
}

fn existing_section<D>(doc: &D, name: &str) -> Option<String>
where
    D: ReadonlyDocument + ?Sized,
{
    if doc.contains_section(name) {
        return Some(name.to_string());
    }
    let prefixed = config_name_to_section_name(name);
    doc.contains_section(&prefixed).then_some(prefixed)
}

/// Same as [`resolve_base_sections`], but returns `[General]` for a section
/// without an `extends=` key even when no `[General]` section exists.
///
/// Supports previews of what a section would inherit.
pub fn resolve_base_sections_pretending_general_exists<D>(doc: &D, section: &str) -> Vec<String>
where
    D: ReadonlyDocument + ?Sized,
{
    let bases = resolve_base_sections(doc, section);
    if bases.is_empty() && section != GENERAL && !doc.contains_key(section, EXTENDS) {
        vec![GENERAL.to_string()]
    } else {
        bases
    }
}

/// Returns the fallback chain of `section`, starting with the section itself.
///
/// The result never contains duplicates and is finite even if `extends=`
/// describes a cycle.
///
/// # Examples
///
/// ```
/// use ini_resolve::document::{MemoryDocument, Section};
/// use ini_resolve::section::section_chain;
///
/// let doc = MemoryDocument::from_sections(vec![
///     Section::new("General"),
///     Section::new("Config A").with_entry("extends", "B"),
///     Section::new("Config B"),
/// ]).unwrap();
///
/// assert_eq!(section_chain(&doc, "Config A"), ["Config A", "Config B", "General"]);
/// ```
pub fn section_chain<D>(doc: &D, section: &str) -> Vec<String>
where
    D: ReadonlyDocument + ?Sized,
{
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut reaches_general = section == GENERAL;
    walk_chain(doc, section, &mut chain, &mut seen, &mut reaches_general);
    if reaches_general {
        chain.push(GENERAL.to_string());
    }
    tracing::debug!(section, ?chain, "Resolved section chain");
    chain
}

fn walk_chain<D>(
    doc: &D,
    section: &str,
    chain: &mut Vec<String>,
    seen: &mut HashSet<String>,
    reaches_general: &mut bool,
) where
    D: ReadonlyDocument + ?Sized,
{
    if !seen.insert(section.to_string()) {
        return;
    }
    if section != GENERAL {
        chain.push(section.to_string());
    }
    for base in resolve_base_sections(doc, section) {
        if base == GENERAL {
            *reaches_general = true;
        } else {
            walk_chain(doc, &base, chain, seen, reaches_general);
        }
    }
}

/// Returns true if `section` appears in the chain of `chain_start`.
///
/// `section_chain_contains(doc, base, derived)` detects that making
/// `derived` extend `base` would close a cycle.
pub fn section_chain_contains<D>(doc: &D, chain_start: &str, section: &str) -> bool
where
    D: ReadonlyDocument + ?Sized,
{
    section_chain(doc, chain_start).iter().any(|s| s == section)
}

/// Overview of one section, as shown in section lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSummary {
    /// Section name
    pub name: String,
    /// Whether the section exists in the document
    pub exists: bool,
    /// Whether the section sets `abstract = true`
    pub is_abstract: bool,
    /// Whether the section or one of its bases sets `repeat`
    pub has_repeat: bool,
    /// Direct base sections
    pub bases: Vec<String>,
}

/// Summarizes a section for display.
///
/// A section that does not exist (e.g. a dangling `extends=` target) is
/// reported with `exists == false` and no other flags.
pub fn section_summary<D>(doc: &D, section: &str) -> SectionSummary
where
    D: ReadonlyDocument + ?Sized,
{
    let exists = doc.contains_section(section);
    let (is_abstract, has_repeat, bases) = if exists {
        let chain = section_chain(doc, section);
        (
            doc.value(section, CFG_ABSTRACT.name) == Some("true"),
            lookup_config(&chain, CFG_REPEAT.name, doc, None).is_some(),
            resolve_base_sections(doc, section),
        )
    } else {
        (false, false, Vec::new())
    };

    SectionSummary {
        name: section.to_string(),
        exists,
        is_abstract,
        has_repeat,
        bases,
    }
}
