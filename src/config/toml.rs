//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Document source configuration
    #[serde(default)]
    pub document: DocumentSection,

    /// Resolution scope and limits
    #[serde(default)]
    pub resolve: ResolveSection,

    /// Output configuration
    #[serde(default)]
    pub output: OutputSection,
}

/// Document source section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentSection {
    /// Path to the document snapshot
    pub path: Option<PathBuf>,
}

/// Resolution section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolveSection {
    /// Section to resolve in
    pub section: Option<String>,

    /// Report entries set to `default` as parameter matches
    #[serde(default)]
    pub include_ned_defaults: bool,

    /// Budget for structural resolution in milliseconds
    pub timeout_ms: Option<u64>,
}

/// Output section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Output format: "text" or "json"
    pub format: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# ini-resolve Configuration File

[document]
# Snapshot of the tokenized inifile (required, can be overridden by --document)
# path = "omnetpp.toml"

[resolve]
# Section to resolve in (default: General)
# section = "General"

# Report entries set to `default` as parameter matches
# Note: OR-merged with --include-defaults
include_ned_defaults = false

# Budget for structural resolution in milliseconds (default: 2000)
timeout_ms = 2000

[output]
# Output format: "text" or "json" (default: text)
# format = "text"
"#
    .to_string()
}
