//! Wildcard key matching for inifile parameter keys.
//!
//! This module provides:
//! - Compiled key patterns ([`KeyMatcher`])
//! - A shared, read-mostly cache of compiled patterns ([`KeyMatcherCache`])
//! - Key-shape helpers ([`find_last_dot`], [`generalize_key`],
//!   [`is_total_param_assignment`])
//!
//! # Generality
//!
//! A key is *fully general* when all of its index positions are `[*]`
//! (`**.power`, `*.node[*].power`). Such a key addresses every element of
//! every vector it passes through, so once it matches a path, no later entry
//! can contribute additional instances.

mod pattern;

#[cfg(test)]
mod pattern_tests;

pub use pattern::{Pattern, PatternError};

use std::sync::Arc;

use dashmap::DashMap;

/// Path-side index meaning "every element of this vector".
const WILDCARD_INDEX: &str = "[*]";

/// A compiled inifile key, ready to be matched against parameter paths.
///
/// Compilation never fails from the caller's point of view: a malformed key
/// yields a matcher that matches nothing.
///
/// # Examples
///
/// ```
/// use ini_resolve::key::KeyMatcher;
///
/// let matcher = KeyMatcher::new("**.node[1..5].power");
///
/// assert!(matcher.matches("Net.node[3].power"));
/// assert!(!matcher.matches("Net.node[7].power"));
/// assert!(!matcher.is_fully_general());
/// assert_eq!(matcher.generalized_key(), "**.node[*].power");
/// ```
#[derive(Debug, Clone)]
pub struct KeyMatcher {
    key: String,
    generalized_key: String,
    pattern: Result<Pattern, PatternError>,
}

impl KeyMatcher {
    /// Compiles a key.
    #[must_use]
    pub fn new(key: &str) -> Self {
        let pattern = Pattern::compile(key);
        if let Err(e) = &pattern {
            tracing::debug!(key, error = %e, "Malformed key pattern never matches");
        }
        Self {
            key: key.to_string(),
            generalized_key: generalize_key(key),
            pattern,
        }
    }

    /// Returns the key this matcher was compiled from.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the key with every index replaced by `[*]`.
    #[must_use]
    pub fn generalized_key(&self) -> &str {
        &self.generalized_key
    }

    /// Returns the compilation error of a malformed key.
    #[must_use]
    pub fn error(&self) -> Option<&PatternError> {
        self.pattern.as_ref().err()
    }

    /// Returns true if the key matches the whole parameter path.
    ///
    /// Paths may contain the wildcard index `[*]`; any index pattern matches
    /// it because the key then addresses at least some elements.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.pattern.as_ref().is_ok_and(|p| p.matches(path))
    }

    /// Returns true if the key equals its generalized form.
    #[must_use]
    pub fn is_fully_general(&self) -> bool {
        self.pattern.is_ok() && self.key == self.generalized_key
    }

    /// Returns true if a match of this key against `path` shadows every
    /// later entry that could match the same path.
    ///
    /// Holds for fully general keys, and for any key when the path has no
    /// wildcard index (a concrete path has a single instance).
    #[must_use]
    pub fn covers_all_instances(&self, path: &str) -> bool {
        self.is_fully_general() || !path.contains(WILDCARD_INDEX)
    }
}

/// Read-through cache of compiled keys.
///
/// The same keys are matched again and again while walking section chains,
/// so each distinct key string is compiled once and shared. An entry is
/// never replaced after insertion, which makes concurrent readers safe.
#[derive(Debug, Default)]
pub struct KeyMatcherCache {
    matchers: DashMap<String, Arc<KeyMatcher>>,
}

impl KeyMatcherCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the matcher for `key`, compiling it on first use.
    #[must_use]
    pub fn get(&self, key: &str) -> Arc<KeyMatcher> {
        if let Some(matcher) = self.matchers.get(key) {
            return Arc::clone(&matcher);
        }
        tracing::trace!(key, "Compiling key pattern");
        let entry = self
            .matchers
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(KeyMatcher::new(key)));
        Arc::clone(&entry)
    }

    /// Returns the number of compiled keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// Returns true if nothing has been compiled yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

/// Finds the byte offset of the last dot in `key`, ignoring dots inside
/// `[...]` and `{...}` groups such as `[0..5]`.
///
/// The last dot separates the object path from the terminal name.
///
/// # Examples
///
/// ```
/// use ini_resolve::key::find_last_dot;
///
/// assert_eq!(find_last_dot("a.b[0..5].c"), Some(9));
/// assert_eq!(find_last_dot("node[0..5]"), None);
/// ```
#[must_use]
pub fn find_last_dot(key: &str) -> Option<usize> {
    let mut last_dot = None;
    let mut closer = None;
    for (pos, ch) in key.char_indices() {
        match (closer, ch) {
            (None, '[') => closer = Some(']'),
            (None, '{') => closer = Some('}'),
            (Some(c), _) if c == ch => closer = None,
            (None, '.') => last_dot = Some(pos),
            _ => {}
        }
    }
    last_dot
}

/// Replaces every top-level `[...]` group of `key` with `[*]`.
///
/// An unclosed group is copied verbatim.
#[must_use]
pub fn generalize_key(key: &str) -> String {
    let mut result = String::with_capacity(key.len());
    let mut rest = key;
    while let Some(open) = rest.find(['[', '{']) {
        let opener = rest[open..].chars().next().unwrap_or('[');
        let closer = if opener == '[' { ']' } else { '}' };
        let Some(len) = rest[open..].find(closer) else {
            break;
        };
        result.push_str(&rest[..open]);
        if opener == '[' {
            result.push_str(WILDCARD_INDEX);
        } else {
            result.push_str(&rest[open..=open + len]);
        }
        rest = &rest[open + len + 1..];
    }
    result.push_str(rest);
    result
}

/// Returns true if the key assigns every element of every vector it
/// addresses, i.e. all of its indices are `[*]`.
#[must_use]
pub fn is_total_param_assignment(key: &str) -> bool {
    generalize_key(key) == key
}
