//! Reserved names and configuration options known to the resolvers.
//!
//! Centralized constants to avoid magic strings scattered across the codebase.

use crate::key::find_last_dot;

/// Name of the root section every other section falls back to.
pub const GENERAL: &str = "General";

/// Prefix of named configuration sections (`[Config Foo]`).
pub const CONFIG_PREFIX: &str = "Config ";

/// Key holding the list of base configurations.
pub const EXTENDS: &str = "extends";

/// Raw value meaning "apply the NED default".
pub const DEFAULT: &str = "default";

/// Terminal key name selecting the type of a `like` submodule or channel.
pub const TYPENAME: &str = "typename";

/// A per-section configuration option with its registered default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigOption {
    /// Key as written in the inifile
    pub name: &'static str,
    /// Value assumed when no section in the chain defines the key
    pub default: Option<&'static str>,
}

/// `extends = <config names>`
pub const CFG_EXTENDS: ConfigOption = ConfigOption {
    name: EXTENDS,
    default: None,
};

/// `description = <text>`
pub const CFG_DESCRIPTION: ConfigOption = ConfigOption {
    name: "description",
    default: None,
};

/// `network = <NED type>`
pub const CFG_NETWORK: ConfigOption = ConfigOption {
    name: "network",
    default: None,
};

/// `abstract = <bool>`
pub const CFG_ABSTRACT: ConfigOption = ConfigOption {
    name: "abstract",
    default: Some("false"),
};

/// `repeat = <count>`
pub const CFG_REPEAT: ConfigOption = ConfigOption {
    name: "repeat",
    default: Some("1"),
};

/// Classification of an inifile key by its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// Section-wide option without a dot, e.g. `sim-time-limit`.
    Config,
    /// Option addressed to objects, e.g. `**.vector-recording`.
    PerObjectConfig,
    /// Parameter assignment, e.g. `**.node[*].power`.
    Param,
}

impl KeyType {
    /// Classifies a key.
    ///
    /// Keys without a top-level dot are section-wide options. Dotted keys
    /// whose terminal name contains a hyphen are per-object options (NED
    /// parameter names cannot contain hyphens); all other dotted keys assign
    /// parameters.
    #[must_use]
    pub fn of(key: &str) -> Self {
        match find_last_dot(key) {
            None => Self::Config,
            Some(dot) if key[dot + 1..].contains('-') => Self::PerObjectConfig,
            Some(_) => Self::Param,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_key_is_config() {
        assert_eq!(KeyType::of("sim-time-limit"), KeyType::Config);
        assert_eq!(KeyType::of("network"), KeyType::Config);
    }

    #[test]
    fn dotted_hyphenated_key_is_per_object_config() {
        assert_eq!(
            KeyType::of("**.vector-recording"),
            KeyType::PerObjectConfig
        );
        assert_eq!(
            KeyType::of("Net.host[0..3].app.result-recording-modes"),
            KeyType::PerObjectConfig
        );
    }

    #[test]
    fn dotted_key_is_param() {
        assert_eq!(KeyType::of("**.node[*].power"), KeyType::Param);
    }

    #[test]
    fn hyphen_before_last_dot_does_not_count() {
        assert_eq!(KeyType::of("a-b.c"), KeyType::Param);
    }

    #[test]
    fn dots_inside_ranges_are_not_separators() {
        assert_eq!(KeyType::of("node[0..5]"), KeyType::Config);
    }
}
