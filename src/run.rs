//! Application execution logic.
//!
//! This module loads the document snapshot, runs one query subcommand
//! against it, and renders the answer as text or JSON.

use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use ini_resolve::config::{Command, OutputFormat, ValidatedConfig};
use ini_resolve::document::{DocumentError, MemoryDocument, ReadonlyDocument};
use ini_resolve::key::KeyMatcherCache;
use ini_resolve::like::LikeResolver;
use ini_resolve::lookup::{lookup_config, lookup_network, lookup_parameter};
use ini_resolve::ned::{DisabledResolver, ElementDecl};
use ini_resolve::registry::GENERAL;
use ini_resolve::section::{config_name_to_section_name, section_chain, section_summary};
use ini_resolve::time::Deadline;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to load the document snapshot.
    #[error("Failed to load document: {0}")]
    Document(#[source] DocumentError),

    /// The requested section is not in the document.
    #[error("No such section: [{0}]")]
    UnknownSection(String),

    /// Failed to render JSON output.
    #[error("Failed to render JSON: {0}")]
    Json(#[source] serde_json::Error),
}

/// One parameter match as shown by `params`.
#[derive(Debug, Serialize)]
struct ParamMatch<'a> {
    section: &'a str,
    key: &'a str,
    value: Option<&'a str>,
}

/// Executes one query subcommand.
///
/// This function:
/// 1. Loads the document snapshot named by the configuration
/// 2. Checks that the active section exists (`General` may be implicit)
/// 3. Runs the query and renders the answer
///
/// # Errors
///
/// Returns an error if the document cannot be loaded, the section is
/// unknown, or JSON rendering fails.
pub fn execute(config: &ValidatedConfig, command: &Command) -> Result<String, RunError> {
    let doc = MemoryDocument::load(&config.document).map_err(RunError::Document)?;
    tracing::debug!(
        path = %config.document.display(),
        sections = doc.section_names().len(),
        "Loaded document"
    );

    query(&doc, config, command)
}

/// Runs a query against an already loaded document.
///
/// # Errors
///
/// Returns an error if the section is unknown or JSON rendering fails.
pub fn query<D>(doc: &D, config: &ValidatedConfig, command: &Command) -> Result<String, RunError>
where
    D: ReadonlyDocument + ?Sized,
{
    let section = match command {
        Command::Sections | Command::Init { .. } => config.section.clone(),
        _ => active_section(doc, &config.section)?,
    };
    let section = section.as_str();

    let format = config.format;
    match command {
        Command::Chain => {
            let chain = section_chain(doc, section);
            render(format, &chain, || chain.join("\n"))
        }

        Command::Sections => sections(doc, format),

        Command::Lookup { key, default } => {
            let chain = section_chain(doc, section);
            let value = lookup_config(&chain, key, doc, default.as_deref());
            render(format, &json!({ "key": key, "value": value }), || {
                value.clone().unwrap_or_else(|| "(not set)".to_string())
            })
        }

        Command::Network => {
            let network = lookup_network(doc, section);
            render(format, &json!({ "network": network }), || {
                network.clone().unwrap_or_else(|| "(not set)".to_string())
            })
        }

        Command::Params { path, .. } => params(doc, config, section, path),

        Command::Typename {
            module,
            name,
            vector,
            like_expr,
            default_expr,
        } => {
            let mut element = name
                .as_ref()
                .map_or_else(ElementDecl::connection, ElementDecl::submodule);
            if let Some(size) = vector {
                element = element.vector(size.as_str());
            }
            if let Some(expr) = like_expr {
                element = if *default_expr {
                    element.with_default_like_expr(expr.as_str())
                } else {
                    element.with_like_expr(expr.as_str())
                };
            }
            typename(doc, config, section, module, &element)
        }

        // handled before the configuration is loaded
        Command::Init { .. } => Ok(String::new()),
    }
}

/// Maps the configured section to a section of the document.
///
/// Accepts the section name (`Config Fast`) or the configuration name
/// (`Fast`). A missing `[General]` is tolerated.
fn active_section<D>(doc: &D, section: &str) -> Result<String, RunError>
where
    D: ReadonlyDocument + ?Sized,
{
    if doc.contains_section(section) {
        return Ok(section.to_string());
    }
    if section == GENERAL {
        tracing::warn!("Document has no [{GENERAL}] section, resolving without it");
        return Ok(section.to_string());
    }

    let prefixed = config_name_to_section_name(section);
    if doc.contains_section(&prefixed) {
        return Ok(prefixed);
    }
    Err(RunError::UnknownSection(section.to_string()))
}

fn sections<D>(doc: &D, format: OutputFormat) -> Result<String, RunError>
where
    D: ReadonlyDocument + ?Sized,
{
    let summaries: Vec<_> = doc
        .section_names()
        .into_iter()
        .map(|name| section_summary(doc, name))
        .collect();
    render(format, &summaries, || {
        summaries
            .iter()
            .map(|s| {
                let mut line = s.name.clone();
                if !s.bases.is_empty() {
                    line.push_str(" extends ");
                    line.push_str(&s.bases.join(", "));
                }
                if s.is_abstract {
                    line.push_str(" (abstract)");
                }
                if s.has_repeat {
                    line.push_str(" (repeat)");
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn params<D>(
    doc: &D,
    config: &ValidatedConfig,
    section: &str,
    path: &str,
) -> Result<String, RunError>
where
    D: ReadonlyDocument + ?Sized,
{
    let matchers = KeyMatcherCache::new();
    let chain = section_chain(doc, section);
    let keys = lookup_parameter(&matchers, path, config.include_ned_defaults, &chain, doc);
    let matches: Vec<_> = keys
        .iter()
        .map(|sk| ParamMatch {
            section: &sk.section,
            key: &sk.key,
            value: doc.value(&sk.section, &sk.key),
        })
        .collect();

    render(config.format, &matches, || {
        if matches.is_empty() {
            return "(no match)".to_string();
        }
        keys.iter()
            .zip(&matches)
            .map(|(sk, m)| format!("{sk} = {}", m.value.unwrap_or_default()))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn typename<D>(
    doc: &D,
    config: &ValidatedConfig,
    section: &str,
    module: &str,
    element: &ElementDecl,
) -> Result<String, RunError>
where
    D: ReadonlyDocument + ?Sized,
{
    let matchers = KeyMatcherCache::new();
    let deadline = Deadline::after(config.timeout);
    let resolver = LikeResolver::new(doc, &DisabledResolver, &matchers);
    let (typename, error) = match resolver.resolve(module, element, section, &deadline) {
        Ok(typename) => (typename, None),
        Err(e) => (None, Some(e.to_string())),
    };

    render(
        config.format,
        &json!({ "typename": typename, "error": error }),
        || match (&typename, &error) {
            (Some(t), _) => t.clone(),
            (None, Some(e)) => format!("unknown ({e})"),
            (None, None) => "(unknown)".to_string(),
        },
    )
}

fn render<T, F>(format: OutputFormat, value: &T, text: F) -> Result<String, RunError>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    match format {
        OutputFormat::Text => Ok(text()),
        OutputFormat::Json => serde_json::to_string_pretty(value).map_err(RunError::Json),
    }
}
