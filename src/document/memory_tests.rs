//! Tests for the in-memory document.

use std::io::Write;

use tempfile::NamedTempFile;

use super::*;

fn sample() -> MemoryDocument {
    MemoryDocument::from_sections(vec![
        Section::new("General")
            .with_entry("network", "Net")
            .with_entry("**.power", "1"),
        Section::new("Config A").with_entry("extends", "B"),
        Section::new("Config B"),
    ])
    .unwrap()
}

mod loading {
    use super::*;

    #[test]
    fn parses_array_of_tables_snapshot() {
        let doc = MemoryDocument::parse(
            r##"
            [[section]]
            name = "General"

            [[section.entry]]
            key = "network"
            value = "Net"
            comment = "# main network"

            [[section]]
            name = "Config A"
        "##,
        )
        .unwrap();

        assert_eq!(doc.section_names(), ["General", "Config A"]);
        assert_eq!(doc.value("General", "network"), Some("Net"));
        assert_eq!(
            doc.sections()[0].entries[0].comment.as_deref(),
            Some("# main network")
        );
    }

    #[test]
    fn empty_snapshot_is_empty_document() {
        let doc = MemoryDocument::parse("").unwrap();
        assert!(doc.section_names().is_empty());
    }

    #[test]
    fn rejects_duplicate_sections() {
        let result = MemoryDocument::from_sections(vec![
            Section::new("General"),
            Section::new("General"),
        ]);
        assert!(matches!(result, Err(DocumentError::DuplicateSection(name)) if name == "General"));
    }

    #[test]
    fn rejects_duplicate_keys() {
        let result = MemoryDocument::from_sections(vec![
            Section::new("General")
                .with_entry("network", "A")
                .with_entry("network", "B"),
        ]);
        assert!(matches!(result, Err(DocumentError::DuplicateKey { .. })));
    }

    #[test]
    fn rejects_unknown_fields() {
        let result = MemoryDocument::parse(
            r#"
            [[section]]
            name = "General"
            colour = "blue"
        "#,
        );
        assert!(matches!(result, Err(DocumentError::Parse(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[section]]\nname = \"General\"\nentry = [{{ key = \"network\", value = \"Net\" }}]"
        )
        .unwrap();

        let doc = MemoryDocument::load(file.path()).unwrap();
        assert_eq!(doc.value("General", "network"), Some("Net"));
    }

    #[test]
    fn load_reports_missing_file() {
        let result = MemoryDocument::load(std::path::Path::new("/nonexistent/ini.toml"));
        assert!(matches!(result, Err(DocumentError::FileRead { .. })));
    }
}

mod queries {
    use super::*;

    #[test]
    fn keys_are_in_document_order() {
        assert_eq!(sample().keys("General"), ["network", "**.power"]);
    }

    #[test]
    fn missing_section_has_no_keys() {
        assert!(sample().keys("Config Z").is_empty());
    }

    #[test]
    fn contains_key_requires_section() {
        let doc = sample();
        assert!(doc.contains_key("Config A", "extends"));
        assert!(!doc.contains_key("Config Z", "extends"));
        assert!(!doc.contains_key("Config B", "extends"));
    }
}

mod mutation {
    use super::*;

    #[test]
    fn add_section_before_anchor() {
        let mut doc = sample();
        doc.add_section("Config AA", Some("Config B")).unwrap();
        assert_eq!(
            doc.section_names(),
            ["General", "Config A", "Config AA", "Config B"]
        );
    }

    #[test]
    fn add_section_appends_without_anchor() {
        let mut doc = sample();
        doc.add_section("Config C", None).unwrap();
        assert_eq!(doc.section_names().last(), Some(&"Config C"));
    }

    #[test]
    fn add_section_rejects_unknown_anchor() {
        let mut doc = sample();
        let result = doc.add_section("Config C", Some("Config Z"));
        assert!(matches!(result, Err(DocumentError::SectionNotFound(_))));
    }

    #[test]
    fn add_entry_then_value_round_trips() {
        let mut doc = sample();
        doc.add_entry("Config B", "**.delay", "10ms", Some("# hop"), None)
            .unwrap();
        assert_eq!(doc.value("Config B", "**.delay"), Some("10ms"));
    }

    #[test]
    fn add_entry_before_anchor() {
        let mut doc = sample();
        doc.add_entry("General", "description", "\"x\"", None, Some("**.power"))
            .unwrap();
        assert_eq!(doc.keys("General"), ["network", "description", "**.power"]);
    }

    #[test]
    fn add_entry_rejects_duplicate_key() {
        let mut doc = sample();
        let result = doc.add_entry("General", "network", "Other", None, None);
        assert!(matches!(result, Err(DocumentError::DuplicateKey { .. })));
        assert_eq!(doc.value("General", "network"), Some("Net"));
    }

    #[test]
    fn set_raw_value_replaces_value() {
        let mut doc = sample();
        doc.set_raw_value("General", "network", "Other").unwrap();
        assert_eq!(doc.value("General", "network"), Some("Other"));
    }

    #[test]
    fn set_raw_value_requires_key() {
        let mut doc = sample();
        let result = doc.set_raw_value("General", "nope", "x");
        assert!(matches!(result, Err(DocumentError::KeyNotFound { .. })));
    }

    #[test]
    fn remove_key_deletes_entry() {
        let mut doc = sample();
        doc.remove_key("General", "network").unwrap();
        assert!(!doc.contains_key("General", "network"));
    }

    #[test]
    fn rename_section_keeps_position() {
        let mut doc = sample();
        doc.rename_section("Config A", "Config Alpha").unwrap();
        assert_eq!(doc.section_names(), ["General", "Config Alpha", "Config B"]);
        assert_eq!(doc.value("Config Alpha", "extends"), Some("B"));
    }

    #[test]
    fn rename_section_rejects_existing_target() {
        let mut doc = sample();
        let result = doc.rename_section("Config A", "Config B");
        assert!(matches!(result, Err(DocumentError::DuplicateSection(_))));
    }
}
