//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

use crate::registry::GENERAL;

/// Default section to resolve in.
pub const SECTION: &str = GENERAL;

/// Default budget for structural resolution in milliseconds.
pub const TIMEOUT_MS: u64 = 2000;

/// Default output format name.
pub const FORMAT: &str = "text";

/// Default file name written by `init`.
pub const CONFIG_FILE: &str = "ini-resolve.toml";

/// Default structural-resolution budget as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_millis(TIMEOUT_MS)
}
