//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::cli::{Cli, Command, OutputFormat};
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    /// Path to the document snapshot (required)
    pub document: PathBuf,

    /// Section to resolve in
    pub section: String,

    /// Report entries set to `default` as parameter matches
    pub include_ned_defaults: bool,

    /// Budget for structural resolution
    pub timeout: Duration,

    /// Output format
    pub format: OutputFormat,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ document: {}, section: {}, include_ned_defaults: {}, timeout: {}ms, format: {:?} }}",
            self.document.display(),
            self.section,
            self.include_ned_defaults,
            self.timeout.as_millis(),
            self.format,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The document path is missing
    /// - The section name is blank
    /// - The timeout is zero
    /// - The output format is unknown
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let document = Self::resolve_document(cli, toml)?;
        let section = Self::resolve_section(cli, toml)?;
        let timeout = Self::resolve_timeout(cli, toml)?;
        let format = Self::resolve_format(cli, toml)?;

        // OR semantics: either source can enable it
        let cli_defaults = matches!(
            cli.command,
            Command::Params {
                include_defaults: true,
                ..
            }
        );
        let include_ned_defaults =
            cli_defaults || toml.is_some_and(|t| t.resolve.include_ned_defaults);

        Ok(Self {
            document,
            section,
            include_ned_defaults,
            timeout,
            format,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_document(cli: &Cli, toml: Option<&TomlConfig>) -> Result<PathBuf, ConfigError> {
        cli.document
            .clone()
            .or_else(|| toml.and_then(|t| t.document.path.clone()))
            .ok_or_else(|| {
                ConfigError::missing(
                    field::DOCUMENT,
                    "Use --document or set document.path in config file",
                )
            })
    }

    fn resolve_section(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        let section = cli
            .section
            .as_deref()
            .or_else(|| toml.and_then(|t| t.resolve.section.as_deref()))
            .unwrap_or(defaults::SECTION)
            .trim();

        if section.is_empty() {
            return Err(ConfigError::EmptySection);
        }

        Ok(section.to_string())
    }

    fn resolve_timeout(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let timeout = cli
            .timeout_ms
            .or_else(|| toml.and_then(|t| t.resolve.timeout_ms))
            .map_or_else(defaults::timeout, Duration::from_millis);

        if timeout.is_zero() {
            return Err(ConfigError::InvalidDuration {
                field: field::TIMEOUT_MS,
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(timeout)
    }

    fn resolve_format(cli: &Cli, toml: Option<&TomlConfig>) -> Result<OutputFormat, ConfigError> {
        if let Some(format) = cli.format {
            return Ok(format);
        }

        let format_str = toml
            .and_then(|t| t.output.format.as_deref())
            .unwrap_or(defaults::FORMAT);

        parse_format(format_str)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parse_format(s: &str) -> Result<OutputFormat, ConfigError> {
    match s.trim().to_lowercase().as_str() {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        _ => Err(ConfigError::InvalidFormat {
            value: s.to_string(),
        }),
    }
}
