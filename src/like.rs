//! Run-time type resolution of `like` submodules and connections.
//!
//! A submodule declared as `radio: <radioType> like IRadio` gets its type
//! from, in order:
//! 1. the explicit type expression, unless it is a `default(...)` fallback;
//! 2. a `typename` entry in the inifile matching the submodule;
//! 3. the fallback expression of `<default(...)>`.
//!
//! Only two expression shapes are understood: a quoted string literal and a
//! bare identifier naming a parameter of the parent module. Anything else
//! resolves to `None`.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::ReadonlyDocument;
use crate::key::{KeyMatcherCache, is_total_param_assignment};
use crate::literal::parse_quoted_string;
use crate::lookup::{SectionKey, lookup_parameter};
use crate::ned::{LikeElement, ParamResolver, ResolutionUnavailable};
use crate::registry::TYPENAME;
use crate::resolution::param_value;
use crate::section::section_chain;
use crate::time::Timeout;

/// Name used in `typename` keys for connections.
const CONNECTION_NAME: &str = "channel";

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Resolves the NED type of `like` elements against a document.
///
/// # Examples
///
/// ```
/// use ini_resolve::document::{MemoryDocument, Section};
/// use ini_resolve::key::KeyMatcherCache;
/// use ini_resolve::like::LikeResolver;
/// use ini_resolve::ned::{DisabledResolver, ElementDecl};
/// use ini_resolve::time::NoTimeout;
///
/// let doc = MemoryDocument::from_sections(vec![
///     Section::new("General").with_entry("**.radio.typename", "\"Ieee80211Radio\""),
/// ]).unwrap();
/// let matchers = KeyMatcherCache::new();
/// let resolver = LikeResolver::new(&doc, &DisabledResolver, &matchers);
///
/// let radio = ElementDecl::submodule("radio");
/// let ty = resolver.resolve("Net.host", &radio, "General", &NoTimeout).unwrap();
/// assert_eq!(ty.as_deref(), Some("Ieee80211Radio"));
/// ```
#[derive(Debug)]
pub struct LikeResolver<'a, D: ?Sized, P: ?Sized> {
    doc: &'a D,
    params: &'a P,
    matchers: &'a KeyMatcherCache,
}

impl<'a, D, P> LikeResolver<'a, D, P>
where
    D: ReadonlyDocument + ?Sized,
    P: ParamResolver + ?Sized,
{
    /// Creates a resolver over a document and a structural model.
    #[must_use]
    pub const fn new(doc: &'a D, params: &'a P, matchers: &'a KeyMatcherCache) -> Self {
        Self {
            doc,
            params,
            matchers,
        }
    }

    /// Returns the type name of `element` inside the module
    /// `module_full_path`, or `None` if it cannot be determined.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionUnavailable`] if evaluating the expression needs
    /// a parent-module parameter and the structural resolver is disabled or
    /// times out.
    pub fn resolve<E>(
        &self,
        module_full_path: &str,
        element: &E,
        active_section: &str,
        timeout: &dyn Timeout,
    ) -> Result<Option<String>, ResolutionUnavailable>
    where
        E: LikeElement + ?Sized,
    {
        let like_expr = element.like_expr().filter(|expr| !expr.is_empty());

        if let Some(expr) = like_expr.filter(|_| !element.is_default()) {
            return self.evaluate(expr, module_full_path, active_section, timeout);
        }

        // deep `typename` assignments from NED are not modelled
        if let Some(key) = self.typename_entry(module_full_path, element, active_section) {
            let value = self.doc.value(&key.section, &key.key).unwrap_or_default();
            return Ok(quoted_or_none(value));
        }

        match like_expr {
            Some(expr) => self.evaluate(expr, module_full_path, active_section, timeout),
            None => Ok(None),
        }
    }

    /// Finds the `typename` entry that selects the element's type.
    ///
    /// A total assignment (all indices `[*]`) is preferred; otherwise the
    /// first match in chain order wins.
    fn typename_entry<E>(
        &self,
        module_full_path: &str,
        element: &E,
        active_section: &str,
    ) -> Option<SectionKey>
    where
        E: LikeElement + ?Sized,
    {
        let mut name = element
            .submodule_name()
            .unwrap_or(CONNECTION_NAME)
            .to_string();
        if element.submodule_name().is_some() && element.vector_size().is_some_and(|s| !s.is_empty())
        {
            name.push_str("[*]");
        }
        let param_path = format!("{module_full_path}.{name}.{TYPENAME}");

        let chain = section_chain(self.doc, active_section);
        let mut matches = lookup_parameter(self.matchers, &param_path, false, &chain, self.doc);
        tracing::trace!(param_path = %param_path, count = matches.len(), "Looked up typename entries");

        let chosen = matches
            .iter()
            .position(|sk| is_total_param_assignment(&sk.key))
            .unwrap_or(0);
        (chosen < matches.len()).then(|| matches.swap_remove(chosen))
    }

    fn evaluate(
        &self,
        expr: &str,
        module_full_path: &str,
        active_section: &str,
        timeout: &dyn Timeout,
    ) -> Result<Option<String>, ResolutionUnavailable> {
        if expr.starts_with('"') {
            return Ok(quoted_or_none(expr));
        }
        if !IDENTIFIER.is_match(expr) {
            tracing::debug!(expr, "Type expression not understood");
            return Ok(None);
        }

        let res =
            self.params
                .resolve_module_param(module_full_path, expr, active_section, timeout)?;
        Ok(param_value(&res, self.doc).and_then(|value| quoted_or_none(&value)))
    }
}

fn quoted_or_none(value: &str) -> Option<String> {
    parse_quoted_string(value)
        .inspect_err(|e| tracing::debug!(value, error = %e, "Not a type name literal"))
        .ok()
}
