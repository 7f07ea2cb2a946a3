//! Structural-model (NED) collaborator interface.
//!
//! The declarations of networks, modules and their parameters live outside
//! this crate. The resolvers here only need:
//! - The type expression of a submodule or connection ([`LikeElement`])
//! - Parameter assignments made in NED ([`NedAssignment`])
//! - A way to resolve one module parameter ([`ParamResolver`])
//!
//! Structural resolution may be expensive, so every call is bounded by a
//! [`Timeout`] and may fail with [`ResolutionUnavailable`].

use thiserror::Error;

use crate::resolution::ParamResolution;
use crate::time::Timeout;

/// Structural resolution could not produce an answer.
///
/// Both variants are ordinary outcomes meaning "can't know right now",
/// not defects. Callers report the value as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolutionUnavailable {
    /// Expensive structural resolution is switched off.
    #[error("Parameter resolution is disabled")]
    Disabled,

    /// The caller's time budget ran out.
    #[error("Parameter resolution timed out")]
    TimedOut,
}

/// A submodule or connection whose type may be given by a `like` expression.
pub trait LikeElement {
    /// Returns the type expression between the angle brackets, if any.
    fn like_expr(&self) -> Option<&str>;

    /// Returns true if the expression is a `default(...)` fallback.
    fn is_default(&self) -> bool;

    /// Returns the submodule name; `None` for connections.
    fn submodule_name(&self) -> Option<&str>;

    /// Returns the vector size expression of a submodule vector.
    fn vector_size(&self) -> Option<&str>;
}

/// Plain [`LikeElement`] declaration.
///
/// # Examples
///
/// ```
/// use ini_resolve::ned::{ElementDecl, LikeElement};
///
/// let radio = ElementDecl::submodule("radio")
///     .vector("numRadios")
///     .with_default_like_expr("\"Ieee80211Radio\"");
///
/// assert_eq!(radio.submodule_name(), Some("radio"));
/// assert!(radio.is_default());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDecl {
    submodule_name: Option<String>,
    vector_size: Option<String>,
    like_expr: Option<String>,
    is_default: bool,
}

impl ElementDecl {
    /// Declares a scalar submodule.
    #[must_use]
    pub fn submodule(name: impl Into<String>) -> Self {
        Self {
            submodule_name: Some(name.into()),
            vector_size: None,
            like_expr: None,
            is_default: false,
        }
    }

    /// Declares a connection.
    #[must_use]
    pub const fn connection() -> Self {
        Self {
            submodule_name: None,
            vector_size: None,
            like_expr: None,
            is_default: false,
        }
    }

    /// Turns the submodule into a vector of the given size.
    #[must_use]
    pub fn vector(mut self, size: impl Into<String>) -> Self {
        self.vector_size = Some(size.into());
        self
    }

    /// Sets an explicit type expression (`<expr>`).
    #[must_use]
    pub fn with_like_expr(mut self, expr: impl Into<String>) -> Self {
        self.like_expr = Some(expr.into());
        self.is_default = false;
        self
    }

    /// Sets a fallback type expression (`<default(expr)>`).
    #[must_use]
    pub fn with_default_like_expr(mut self, expr: impl Into<String>) -> Self {
        self.like_expr = Some(expr.into());
        self.is_default = true;
        self
    }
}

impl LikeElement for ElementDecl {
    fn like_expr(&self) -> Option<&str> {
        self.like_expr.as_deref()
    }

    fn is_default(&self) -> bool {
        self.is_default
    }

    fn submodule_name(&self) -> Option<&str> {
        self.submodule_name.as_deref()
    }

    fn vector_size(&self) -> Option<&str> {
        self.vector_size.as_deref()
    }
}

/// A parameter value assigned in NED.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NedAssignment {
    /// Value expression, verbatim
    pub value: String,
    /// Whether the assignment uses a wildcard pattern (`**.power = 1`)
    pub is_pattern: bool,
    /// Name of the type declaring the assignment
    pub enclosing_type: String,
    /// Source text of the assignment
    pub source: String,
}

impl NedAssignment {
    /// Creates a plain (non-pattern) assignment.
    #[must_use]
    pub fn new(value: impl Into<String>, enclosing_type: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            source: value.clone(),
            value,
            is_pattern: false,
            enclosing_type: enclosing_type.into(),
        }
    }

    /// Creates a pattern assignment declared in `enclosing_type`.
    #[must_use]
    pub fn pattern(
        value: impl Into<String>,
        enclosing_type: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            is_pattern: true,
            enclosing_type: enclosing_type.into(),
            source: source.into(),
        }
    }
}

/// Resolves how a module parameter obtains its value.
///
/// # Testing
///
/// Use [`mock::MockParamResolver`] in tests to avoid a structural model.
pub trait ParamResolver {
    /// Resolves the parameter `param_name` of the module `module_full_path`
    /// in the scope of `active_section`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionUnavailable::Disabled`] if structural resolution
    /// is switched off, or [`ResolutionUnavailable::TimedOut`] if `timeout`
    /// expires first.
    fn resolve_module_param(
        &self,
        module_full_path: &str,
        param_name: &str,
        active_section: &str,
        timeout: &dyn Timeout,
    ) -> Result<ParamResolution, ResolutionUnavailable>;
}

/// Resolver for callers without a structural model.
///
/// Every call reports [`ResolutionUnavailable::Disabled`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledResolver;

impl ParamResolver for DisabledResolver {
    fn resolve_module_param(
        &self,
        module_full_path: &str,
        param_name: &str,
        _active_section: &str,
        _timeout: &dyn Timeout,
    ) -> Result<ParamResolution, ResolutionUnavailable> {
        tracing::debug!(
            module = module_full_path,
            param = param_name,
            "Structural resolution disabled"
        );
        Err(ResolutionUnavailable::Disabled)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::NoTimeout;

    #[test]
    fn connection_has_no_name() {
        let channel = ElementDecl::connection().with_like_expr("channelType");
        assert_eq!(channel.submodule_name(), None);
        assert_eq!(channel.like_expr(), Some("channelType"));
        assert!(!channel.is_default());
    }

    #[test]
    fn vector_submodule() {
        let host = ElementDecl::submodule("host").vector("n");
        assert_eq!(host.vector_size(), Some("n"));
        assert_eq!(host.like_expr(), None);
    }

    #[test]
    fn plain_assignment_source_is_value() {
        let assignment = NedAssignment::new("1mW", "Host");
        assert!(!assignment.is_pattern);
        assert_eq!(assignment.source, "1mW");
    }

    #[test]
    fn disabled_resolver_always_fails() {
        assert_eq!(
            DisabledResolver.resolve_module_param("Net.host", "nicType", "General", &NoTimeout),
            Err(ResolutionUnavailable::Disabled)
        );
    }

    #[test]
    fn unavailable_messages() {
        assert_eq!(
            ResolutionUnavailable::TimedOut.to_string(),
            "Parameter resolution timed out"
        );
        assert_eq!(
            ResolutionUnavailable::Disabled.to_string(),
            "Parameter resolution is disabled"
        );
    }
}
