//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use ini_resolve::config::{ConfigError, field};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - invalid args, missing document path, etc.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Runtime error (exit code 2) - unreadable snapshot, unknown section, etc.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Prints helpful hints for common configuration errors.
pub fn print_config_hint(error: &ConfigError) {
    let hint = match error {
        ConfigError::MissingRequired { field: f, .. } if *f == field::DOCUMENT => {
            "Pass --document <SNAPSHOT> or run 'ini-resolve init' to generate a configuration template."
        }
        ConfigError::FileRead { .. } => {
            "Run 'ini-resolve init' to generate a configuration template."
        }
        ConfigError::InvalidFormat { .. } => "Use --format text or --format json.",
        ConfigError::EmptySection => "Use -s General or -s <config name>, e.g. -s Fast.",
        _ => return,
    };
    eprintln!("\n{hint}");
}

/// Sets up the tracing subscriber for logging.
///
/// `RUST_LOG` overrides the level chosen by `--verbose`.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
