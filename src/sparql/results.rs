//! SPARQL 1.1 JSON results (`application/sparql-results+json`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermKind {
    Uri,
    Literal,
    // Some stores still emit the SPARQL 1.0 name.
    #[serde(alias = "typed-literal")]
    TypedLiteral,
    Bnode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RdfTerm {
    #[serde(rename = "type")]
    pub kind: TermKind,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(default, rename = "xml:lang", skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl RdfTerm {
    pub fn is_uri(&self) -> bool {
        self.kind == TermKind::Uri
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, TermKind::Literal | TermKind::TypedLiteral)
    }
}

pub type Binding = BTreeMap<String, RdfTerm>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Head {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bindings {
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

/// Either a SELECT result (`results`) or an ASK result (`boolean`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub head: Head,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Bindings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean: Option<bool>,
}

impl SparqlResults {
    pub fn bindings(&self) -> &[Binding] {
        self.results.as_ref().map(|r| r.bindings.as_slice()).unwrap_or(&[])
    }

    pub fn into_bindings(self) -> Vec<Binding> {
        self.results.map(|r| r.bindings).unwrap_or_default()
    }

    /// Terms bound to the first projected variable, in result order.
    pub fn first_var_terms(&self) -> Vec<&RdfTerm> {
        let Some(var) = self.head.vars.first() else {
            return Vec::new();
        };
        self.bindings().iter().filter_map(|b| b.get(var)).collect()
    }
}
