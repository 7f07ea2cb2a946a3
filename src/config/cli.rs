//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// ini-resolve: inifile section and parameter resolver
///
/// Answers what value a key has in a section, which entries match a
/// parameter path, and which type a `like` submodule resolves to.
#[derive(Debug, Parser)]
#[command(name = "ini-resolve")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to the document snapshot (TOML)
    #[arg(long, short, global = true)]
    pub document: Option<PathBuf>,

    /// Section to resolve in
    #[arg(long, short, global = true)]
    pub section: Option<String>,

    /// Output format
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Budget for structural resolution in milliseconds
    #[arg(long = "timeout-ms", global = true)]
    pub timeout_ms: Option<u64>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for ini-resolve
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the fallback chain of the section
    Chain,

    /// List all sections with their bases and flags
    Sections,

    /// Look up a configuration option along the fallback chain
    Lookup {
        /// Option name, e.g. sim-time-limit
        key: String,

        /// Value to report when no section defines the option
        #[arg(long)]
        default: Option<String>,
    },

    /// Print the network of the section
    Network,

    /// List the entries that assign a parameter path
    Params {
        /// Full parameter path, e.g. Net.node[*].power
        path: String,

        /// Also report entries set to `default`
        #[arg(long = "include-defaults")]
        include_defaults: bool,
    },

    /// Resolve the type of a `like` submodule or connection
    Typename {
        /// Full path of the parent module, e.g. Net.host[0]
        module: String,

        /// Submodule name; omit for a connection
        name: Option<String>,

        /// Vector size expression if the submodule is a vector
        #[arg(long, value_name = "SIZE")]
        vector: Option<String>,

        /// Type expression between the angle brackets
        #[arg(long = "like-expr", value_name = "EXPR")]
        like_expr: Option<String>,

        /// The type expression is a `default(...)` fallback
        #[arg(long = "default-expr", requires = "like_expr")]
        default_expr: bool,
    },

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = super::defaults::CONFIG_FILE)]
        output: PathBuf,
    },
}

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    #[value(name = "text")]
    Text,
    /// JSON document
    #[value(name = "json")]
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}
