//! Named-placeholder templates for SPARQL text.

use crate::{Error, ErrorContext, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::{BTreeMap, BTreeSet};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid placeholder regex"));

/// A query template with `{{name}}` slots.
///
/// Values are inserted verbatim; escape them with [`escape_literal`] or
/// [`checked_iri`] first.
#[derive(Debug, Clone)]
pub struct SparqlTemplate {
    name: &'static str,
    text: &'static str,
}

impl SparqlTemplate {
    pub const fn new(name: &'static str, text: &'static str) -> Self {
        Self { name, text }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn placeholders(&self) -> BTreeSet<&'static str> {
        PLACEHOLDER
            .captures_iter(self.text)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect()
    }

    /// Fails if any placeholder has no value. Extra values are ignored.
    pub fn render(&self, values: &BTreeMap<&str, String>) -> Result<String> {
        let missing: Vec<&str> = self
            .placeholders()
            .into_iter()
            .filter(|p| !values.contains_key(p))
            .collect();
        if !missing.is_empty() {
            return Err(Error::configuration_with_context(
                format!("template '{}' is missing values", self.name),
                ErrorContext::new()
                    .with_details(missing.join(","))
                    .with_source("sparql_template"),
            ));
        }
        let rendered = PLACEHOLDER.replace_all(self.text, |caps: &Captures| {
            // presence checked above
            values.get(&caps[1]).cloned().unwrap_or_default()
        });
        Ok(rendered.into_owned())
    }
}

/// Escapes a string for use inside a double-quoted SPARQL literal.
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Returns `iri` if it can be written as `<iri>`.
pub fn checked_iri(iri: &str) -> Result<&str> {
    let bad = iri.is_empty()
        || iri
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\'));
    if bad {
        return Err(Error::validation_with_context(
            format!("not a valid IRI: '{}'", iri),
            ErrorContext::new().with_source("sparql_template"),
        ));
    }
    Ok(iri)
}
