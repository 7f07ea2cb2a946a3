//! Value lookups along a section fallback chain.
//!
//! This module provides:
//! - Scalar option lookups ([`lookup_config`], [`lookup_network`])
//! - Parameter-path lookups returning every matching entry ([`lookup_parameter`])
//!
//! Chains are ordered most specific first, so the nearest section that
//! defines a key always wins.

use std::fmt;

use serde::Serialize;

use crate::document::ReadonlyDocument;
use crate::key::KeyMatcherCache;
use crate::registry::{CFG_NETWORK, DEFAULT};
use crate::section::section_chain;

#[cfg(test)]
#[path = "lookup_tests.rs"]
mod tests;

/// Identifies one entry of the document: a section and a key in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SectionKey {
    /// Section name
    pub section: String,
    /// Key or key pattern
    pub key: String,
}

impl SectionKey {
    /// Creates a section/key pair.
    #[must_use]
    pub fn new(section: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] / {}", self.section, self.key)
    }
}

/// Looks up a configuration value along a fallback chain.
///
/// Returns the value from the first section in `chain` that defines `key`,
/// or `default` if none does.
#[must_use]
pub fn lookup_config<S, D>(chain: &[S], key: &str, doc: &D, default: Option<&str>) -> Option<String>
where
    S: AsRef<str>,
    D: ReadonlyDocument + ?Sized,
{
    chain
        .iter()
        .find_map(|section| doc.value(section.as_ref(), key))
        .or(default)
        .map(str::to_string)
}

/// Looks up a configuration value in `section` or its fallback sections.
#[must_use]
pub fn lookup_config_in_section<D>(
    doc: &D,
    section: &str,
    key: &str,
    default: Option<&str>,
) -> Option<String>
where
    D: ReadonlyDocument + ?Sized,
{
    lookup_config(&section_chain(doc, section), key, doc, default)
}

/// Looks up the network name of a section.
#[must_use]
pub fn lookup_network<D>(doc: &D, section: &str) -> Option<String>
where
    D: ReadonlyDocument + ?Sized,
{
    lookup_config_in_section(doc, section, CFG_NETWORK.name, CFG_NETWORK.default)
}

/// Parses a boolean configuration value.
///
/// `yes`, `true`, `on` and `1` are true; anything else, including
/// unrecognized text, is false.
#[must_use]
pub fn parse_as_bool(value: &str) -> bool {
    matches!(value, "yes" | "true" | "on" | "1")
}

/// Returns the entries that assign the parameter `param_full_path`.
///
/// Sections are scanned in chain order and keys in document order, so the
/// result lists the most specific section first. Entries whose value is the
/// `default` placeholder are skipped unless `include_ned_defaults` is set.
///
/// Several entries may match because of keys like `*.node[0].power`,
/// `*.node[1..5].power` and `Net.node[6..].power` when the path contains a
/// wildcard index. Scanning stops at the first recorded match that covers
/// every instance of the path (see [`KeyMatcher::covers_all_instances`]):
/// nothing after it can match anything new.
///
/// [`KeyMatcher::covers_all_instances`]: crate::key::KeyMatcher::covers_all_instances
#[must_use]
pub fn lookup_parameter<S, D>(
    matchers: &KeyMatcherCache,
    param_full_path: &str,
    include_ned_defaults: bool,
    chain: &[S],
    doc: &D,
) -> Vec<SectionKey>
where
    S: AsRef<str>,
    D: ReadonlyDocument + ?Sized,
{
    let mut result = Vec::new();
    for section in chain.iter().map(AsRef::as_ref) {
        for key in doc.keys(section) {
            let matcher = matchers.get(key);
            if !matcher.matches(param_full_path) {
                continue;
            }
            if !include_ned_defaults && doc.value(section, key) == Some(DEFAULT) {
                tracing::trace!(section, key, "Skipping default placeholder");
                continue;
            }
            result.push(SectionKey::new(section, key));
            if matcher.covers_all_instances(param_full_path) {
                tracing::trace!(section, key, "Match shadows the rest of the chain");
                return result;
            }
        }
    }
    result
}
