//! Parsed results of the external QA services.

use serde::{Deserialize, Serialize};

pub const XSD_ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// Answers are IRIs.
    Resource,
    /// Answers are typed literals sharing one datatype.
    Literal,
    /// ASK query result.
    Boolean,
}

/// Knowledge base / user overrides for a single query. Unset fields use the
/// builder's configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub knowledge_base: Option<String>,
    pub user: Option<String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn knowledge_base(mut self, kb: impl Into<String>) -> Self {
        self.knowledge_base = Some(kb.into());
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
}

/// Fully parsed answer of a QA service. Never partially populated: parse
/// failures are reported as errors instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaResult {
    /// Question text that was sent (after enrichment).
    pub question: String,
    /// Generated SPARQL query, if the service produced one.
    pub sparql: Option<String>,
    /// Answer values in service order.
    pub values: Vec<String>,
    pub datatype: String,
    pub answer_kind: AnswerKind,
    pub confidence: f64,
    /// Raw response payload.
    pub raw: serde_json::Value,
    pub endpoint: String,
    pub lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl QaResult {
    pub fn is_resource_answer(&self) -> bool {
        self.answer_kind == AnswerKind::Resource
    }

    /// Compact JSON of the raw payload.
    pub fn raw_json(&self) -> String {
        self.raw.to_string()
    }
}
