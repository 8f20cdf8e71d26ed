//! Common surface of the per-service query builders.

use crate::sparql::SparqlResults;
use crate::transport::HttpResponse;
use crate::types::result::{XSD_ANY_URI, XSD_BOOLEAN, XSD_STRING};
use crate::types::{AnswerKind, QaResult, QueryParams};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use tracing::warn;

/// A remote QA service reachable through the cached HTTP client.
#[async_trait]
pub trait QueryBuilder: Send + Sync {
    /// Short service identifier used in logs and errors.
    fn service_name(&self) -> &'static str;

    fn is_lang_supported(&self, lang: &str) -> bool;

    /// Rejects unsupported languages before any request is sent.
    async fn query(&self, question: &str, lang: Option<&str>, params: &QueryParams) -> Result<QaResult>;
}

/// Answer values, their kind and shared datatype.
#[derive(Debug, Clone, PartialEq)]
pub struct Answers {
    pub values: Vec<String>,
    pub kind: AnswerKind,
    pub datatype: String,
}

impl Answers {
    /// Reads the first projected variable of a SELECT result, or the ASK boolean.
    pub fn from_sparql_results(results: &SparqlResults, source: &'static str) -> Result<Self> {
        if let Some(b) = results.boolean {
            return Ok(Self {
                values: vec![b.to_string()],
                kind: AnswerKind::Boolean,
                datatype: XSD_BOOLEAN.to_string(),
            });
        }

        let terms = results.first_var_terms();
        let Some(first) = terms.first() else {
            return Ok(Self {
                values: Vec::new(),
                kind: AnswerKind::Resource,
                datatype: XSD_ANY_URI.to_string(),
            });
        };

        if terms.iter().any(|t| t.is_uri() != first.is_uri()) {
            return Err(Error::result_format_with_context(
                "answers mix resources and literals",
                ErrorContext::new().with_source(source),
            ));
        }

        let (kind, datatype) = if first.is_uri() {
            (AnswerKind::Resource, XSD_ANY_URI.to_string())
        } else {
            let datatype = first.datatype.clone().unwrap_or_else(|| XSD_STRING.to_string());
            if terms.iter().any(|t| t.datatype.as_deref().unwrap_or(XSD_STRING) != datatype) {
                warn!(source, datatype = %datatype, "answers have mixed datatypes, using the first");
            }
            (AnswerKind::Literal, datatype)
        };

        Ok(Self {
            values: terms.iter().map(|t| t.value.clone()).collect(),
            kind,
            datatype,
        })
    }
}

/// Parses a successful response body as JSON, mapping failures to `ResultFormat`.
pub(crate) fn response_json(response: &HttpResponse, source: &'static str) -> Result<serde_json::Value> {
    serde_json::from_slice(&response.body).map_err(|e| {
        Error::result_format_with_context(
            format!("response is not JSON: {}", e),
            ErrorContext::new().with_source(source),
        )
    })
}

pub(crate) fn missing_field(path: &str, source: &'static str) -> Error {
    Error::result_format_with_context(
        "missing or invalid field",
        ErrorContext::new().with_field_path(path).with_source(source),
    )
}
