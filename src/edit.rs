//! Structural edits that keep the document tidy and consistent.
//!
//! New sections and entries are placed by an [`OrderingPolicy`]; renaming
//! a section also rewrites the `extends=` lists that refer to it.

use crate::document::{Document, DocumentError};
use crate::ordering::OrderingPolicy;
use crate::registry::EXTENDS;
use crate::section::{EXTENDS_SEPARATOR, remove_section_name_prefix};

/// Adds a section at the place chosen by `ordering`.
///
/// Does nothing if the section already exists.
///
/// # Errors
///
/// Returns an error if the document rejects the insertion.
pub fn add_section<D>(
    doc: &mut D,
    section: &str,
    ordering: &dyn OrderingPolicy,
) -> Result<(), DocumentError>
where
    D: Document,
{
    if doc.contains_section(section) {
        return Ok(());
    }
    let before = ordering.section_insertion_point(&*doc, section);
    tracing::debug!(section, ?before, "Adding section");
    doc.add_section(section, before.as_deref())
}

/// Adds a new entry at the place chosen by `ordering`, creating the section
/// first if needed.
///
/// # Errors
///
/// Returns an error if the document rejects the insertion.
///
/// # Panics
///
/// Panics if the key already exists in the section. Use
/// [`add_or_set_or_remove_entry`] to update existing entries.
pub fn add_entry<D>(
    doc: &mut D,
    section: &str,
    key: &str,
    value: &str,
    comment: Option<&str>,
    ordering: &dyn OrderingPolicy,
) -> Result<(), DocumentError>
where
    D: Document,
{
    add_section(doc, section, ordering)?;
    assert!(
        !doc.contains_key(section, key),
        "key already exists in [{section}]: {key}"
    );
    let before = ordering.key_insertion_point(&*doc, section, key);
    tracing::debug!(section, key, ?before, "Adding entry");
    doc.add_entry(section, key, value, comment, before.as_deref())
}

/// Makes the entry hold `value`: adds it if missing, updates it if
/// different, or removes it when `value` is `None`.
///
/// # Errors
///
/// Returns an error if the document rejects the change.
pub fn add_or_set_or_remove_entry<D>(
    doc: &mut D,
    section: &str,
    key: &str,
    value: Option<&str>,
    ordering: &dyn OrderingPolicy,
) -> Result<(), DocumentError>
where
    D: Document,
{
    match value {
        None if doc.contains_key(section, key) => doc.remove_key(section, key),
        None => Ok(()),
        Some(value) if !doc.contains_key(section, key) => {
            add_entry(doc, section, key, value, None, ordering)
        }
        Some(value) if doc.value(section, key) == Some(value) => Ok(()),
        Some(value) => doc.set_raw_value(section, key, value),
    }
}

/// Renames a section and updates every `extends=` list that names it.
///
/// Other tokens and the existing separators are kept verbatim.
///
/// # Errors
///
/// Returns an error if the section is missing or the new name is taken.
///
/// # Examples
///
/// ```
/// use ini_resolve::document::{MemoryDocument, ReadonlyDocument, Section};
/// use ini_resolve::edit::rename_section;
///
/// let mut doc = MemoryDocument::from_sections(vec![
///     Section::new("Config Base"),
///     Section::new("Config A").with_entry("extends", "Other, Base"),
/// ]).unwrap();
///
/// rename_section(&mut doc, "Config Base", "Config Common").unwrap();
/// assert_eq!(doc.value("Config A", "extends"), Some("Other, Common"));
/// ```
pub fn rename_section<D>(doc: &mut D, old: &str, new: &str) -> Result<(), DocumentError>
where
    D: Document,
{
    doc.rename_section(old, new)?;

    let old_name = remove_section_name_prefix(old);
    let new_name = remove_section_name_prefix(new);
    let sections: Vec<String> = doc.section_names().into_iter().map(str::to_string).collect();
    for section in sections {
        let Some(value) = doc.value(&section, EXTENDS) else {
            continue;
        };
        if let Some(updated) = replace_extends_token(value, &old_name, &new_name) {
            tracing::debug!(section = %section, extends = %updated, "Updating base reference");
            doc.set_raw_value(&section, EXTENDS, &updated)?;
        }
    }
    Ok(())
}

/// Replaces every token equal to `old` in an `extends=` value, keeping the
/// separators. Returns `None` if no token matched.
fn replace_extends_token(value: &str, old: &str, new: &str) -> Option<String> {
    let mut result = String::with_capacity(value.len());
    let mut replaced = false;
    let mut push_token = |result: &mut String, token: &str| {
        if token == old {
            result.push_str(new);
            replaced = true;
        } else {
            result.push_str(token);
        }
    };

    let mut last = 0;
    for separator in EXTENDS_SEPARATOR.find_iter(value) {
        push_token(&mut result, &value[last..separator.start()]);
        result.push_str(separator.as_str());
        last = separator.end();
    }
    push_token(&mut result, &value[last..]);

    replaced.then_some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{MemoryDocument, ReadonlyDocument, Section};
    use crate::ordering::{AppendOrdering, CanonicalOrdering};

    fn keys(doc: &MemoryDocument, section: &str) -> Vec<String> {
        doc.keys(section).into_iter().map(str::to_string).collect()
    }

    mod sections {
        use super::*;

        #[test]
        fn general_is_inserted_first() {
            let mut doc = MemoryDocument::from_sections(vec![Section::new("Config A")]).unwrap();
            add_section(&mut doc, "General", &CanonicalOrdering).unwrap();
            assert_eq!(doc.section_names(), ["General", "Config A"]);
        }

        #[test]
        fn sections_are_kept_alphabetical() {
            let mut doc = MemoryDocument::new();
            for name in ["Config C", "General", "Config A", "Config B"] {
                add_section(&mut doc, name, &CanonicalOrdering).unwrap();
            }
            assert_eq!(
                doc.section_names(),
                ["General", "Config A", "Config B", "Config C"]
            );
        }

        #[test]
        fn existing_section_is_left_alone() {
            let mut doc = MemoryDocument::from_sections(vec![
                Section::new("General").with_entry("network", "Net"),
            ])
            .unwrap();
            add_section(&mut doc, "General", &CanonicalOrdering).unwrap();
            assert_eq!(doc.value("General", "network"), Some("Net"));
        }

        #[test]
        fn append_ordering_keeps_insertion_order() {
            let mut doc = MemoryDocument::new();
            for name in ["Config C", "General"] {
                add_section(&mut doc, name, &AppendOrdering).unwrap();
            }
            assert_eq!(doc.section_names(), ["Config C", "General"]);
        }
    }

    mod entries {
        use super::*;

        #[test]
        fn added_value_round_trips() {
            let mut doc = MemoryDocument::new();
            add_entry(&mut doc, "General", "**.power", "2mW", None, &CanonicalOrdering).unwrap();
            assert_eq!(doc.value("General", "**.power"), Some("2mW"));
        }

        #[test]
        fn entries_follow_rank_order() {
            let mut doc = MemoryDocument::new();
            for key in ["**.power", "sim-time-limit", "network", "extends", "**.gain"] {
                add_entry(&mut doc, "Config A", key, "x", None, &CanonicalOrdering).unwrap();
            }
            assert_eq!(
                keys(&doc, "Config A"),
                ["extends", "network", "sim-time-limit", "**.gain", "**.power"]
            );
        }

        #[test]
        fn comment_is_stored() {
            let mut doc = MemoryDocument::new();
            add_entry(&mut doc, "General", "network", "Net", Some("# main"), &AppendOrdering)
                .unwrap();
            assert_eq!(doc.sections()[0].entries[0].comment.as_deref(), Some("# main"));
        }

        #[test]
        #[should_panic(expected = "key already exists in [General]: network")]
        fn duplicate_key_is_a_contract_violation() {
            let mut doc = MemoryDocument::from_sections(vec![
                Section::new("General").with_entry("network", "Net"),
            ])
            .unwrap();
            let _ = add_entry(&mut doc, "General", "network", "Other", None, &CanonicalOrdering);
        }

        #[test]
        fn set_adds_missing_entry() {
            let mut doc = MemoryDocument::new();
            add_or_set_or_remove_entry(&mut doc, "General", "network", Some("Net"), &CanonicalOrdering)
                .unwrap();
            assert_eq!(doc.value("General", "network"), Some("Net"));
        }

        #[test]
        fn set_updates_existing_entry() {
            let mut doc = MemoryDocument::from_sections(vec![
                Section::new("General").with_entry("network", "Net"),
            ])
            .unwrap();
            add_or_set_or_remove_entry(&mut doc, "General", "network", Some("Other"), &CanonicalOrdering)
                .unwrap();
            assert_eq!(doc.value("General", "network"), Some("Other"));
        }

        #[test]
        fn none_removes_entry() {
            let mut doc = MemoryDocument::from_sections(vec![
                Section::new("General").with_entry("network", "Net"),
            ])
            .unwrap();
            add_or_set_or_remove_entry(&mut doc, "General", "network", None, &CanonicalOrdering)
                .unwrap();
            assert!(!doc.contains_key("General", "network"));

            add_or_set_or_remove_entry(&mut doc, "General", "network", None, &CanonicalOrdering)
                .unwrap();
        }
    }

    mod renaming {
        use super::*;

        fn doc() -> MemoryDocument {
            MemoryDocument::from_sections(vec![
                Section::new("General"),
                Section::new("Config Base"),
                Section::new("Config A").with_entry("extends", "Base"),
                Section::new("Config B").with_entry("extends", "X,\tBase  Y"),
                Section::new("Config C").with_entry("extends", "BaseLine, Y"),
            ])
            .unwrap()
        }

        #[test]
        fn section_is_renamed_in_place() {
            let mut doc = doc();
            rename_section(&mut doc, "Config Base", "Config Common").unwrap();
            assert_eq!(doc.section_names()[1], "Config Common");
        }

        #[test]
        fn references_are_rewritten_verbatim() {
            let mut doc = doc();
            rename_section(&mut doc, "Config Base", "Config Common").unwrap();
            assert_eq!(doc.value("Config A", "extends"), Some("Common"));
            assert_eq!(doc.value("Config B", "extends"), Some("X,\tCommon  Y"));
        }

        #[test]
        fn similar_names_are_untouched() {
            let mut doc = doc();
            rename_section(&mut doc, "Config Base", "Config Common").unwrap();
            assert_eq!(doc.value("Config C", "extends"), Some("BaseLine, Y"));
        }

        #[test]
        fn missing_section_is_an_error() {
            let mut doc = doc();
            assert!(matches!(
                rename_section(&mut doc, "Config Gone", "Config New"),
                Err(DocumentError::SectionNotFound(_))
            ));
        }

        #[test]
        fn token_replacement() {
            assert_eq!(
                replace_extends_token(" a, b ,a", "a", "z").as_deref(),
                Some(" z, b ,z")
            );
            assert_eq!(replace_extends_token("ab, b", "a", "z"), None);
        }
    }
}
