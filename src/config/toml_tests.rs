//! Tests for TOML configuration parsing.

use std::io::Write;

use tempfile::NamedTempFile;

use super::ConfigError;
use super::toml::{TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.document.path.is_none());
        assert!(config.resolve.section.is_none());
        assert!(!config.resolve.include_ned_defaults);
        assert!(config.resolve.timeout_ms.is_none());
        assert!(config.output.format.is_none());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [document]
            path = "omnetpp.toml"

            [resolve]
            section = "Fast"
            include_ned_defaults = true
            timeout_ms = 250

            [output]
            format = "json"
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(
            config.document.path.as_deref(),
            Some("omnetpp.toml".as_ref())
        );
        assert_eq!(config.resolve.section.as_deref(), Some("Fast"));
        assert!(config.resolve.include_ned_defaults);
        assert_eq!(config.resolve.timeout_ms, Some(250));
        assert_eq!(config.output.format.as_deref(), Some("json"));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let toml = r#"
            [resolve]
            sectoin = "Fast"
        "#;

        let result = TomlConfig::parse(toml);

        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn unknown_table_is_rejected() {
        let result = TomlConfig::parse("[server]\nport = 8080\n");

        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let result = TomlConfig::parse("[resolve]\ntimeout_ms = \"fast\"\n");

        assert!(result.is_err());
    }
}

mod loading {
    use super::*;

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[document]\npath = \"a.toml\"").unwrap();

        let config = TomlConfig::load(file.path()).unwrap();

        assert_eq!(config.document.path.as_deref(), Some("a.toml".as_ref()));
    }

    #[test]
    fn load_missing_file_reports_path() {
        let result = TomlConfig::load("/nonexistent/ini-resolve.toml".as_ref());

        match result {
            Err(ConfigError::FileRead { path, .. }) => {
                assert_eq!(path.to_str(), Some("/nonexistent/ini-resolve.toml"));
            }
            other => panic!("Expected FileRead error, got {other:?}"),
        }
    }
}

mod template {
    use super::*;

    #[test]
    fn default_template_parses() {
        let config = TomlConfig::parse(&default_config_template()).unwrap();

        assert!(config.document.path.is_none());
        assert!(!config.resolve.include_ned_defaults);
        assert_eq!(config.resolve.timeout_ms, Some(2000));
    }

    #[test]
    fn default_template_mentions_every_table() {
        let template = default_config_template();

        assert!(template.contains("[document]"));
        assert!(template.contains("[resolve]"));
        assert!(template.contains("[output]"));
    }
}
