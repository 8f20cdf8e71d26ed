//! RuBQ client: JSON question in, generated query and answers out.

use super::types::{RuBQRequest, RuBQResponse};
use crate::client::CachedHttpClient;
use crate::lang::LanguageSupport;
use crate::query::{response_json, QueryBuilder};
use crate::types::result::{XSD_ANY_URI, XSD_BOOLEAN, XSD_DECIMAL, XSD_STRING};
use crate::types::{AnswerKind, QaResult, QueryParams};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use url::Url;

const SOURCE: &str = "rubq";

/// Confidence reported when the service gives none.
pub const DEFAULT_CONFIDENCE: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct RuBQSettings {
    pub endpoint: Url,
    pub languages: LanguageSupport,
}

pub struct RuBQQueryBuilder {
    client: Arc<CachedHttpClient>,
    settings: RuBQSettings,
}

impl RuBQQueryBuilder {
    pub fn new(settings: RuBQSettings, client: Arc<CachedHttpClient>) -> Result<Self> {
        settings.languages.validate()?;
        Ok(Self { client, settings })
    }

    pub fn endpoint(&self) -> &Url {
        &self.settings.endpoint
    }

    /// Queries `endpoint` directly. `lang` must already be validated.
    pub async fn request_at(&self, endpoint: &Url, question: &str, lang: &str) -> Result<QaResult> {
        info!(endpoint = %endpoint, question, lang, "RuBQ request");
        let response = self
            .client
            .post_json(endpoint.clone(), &RuBQRequest { question, lang })
            .await?;
        let raw = response_json(&response, SOURCE)?;
        let result = parse_response(raw, question, endpoint.as_str(), lang)?;
        info!(question, sparql = ?result.sparql, answers = result.values.len(), "RuBQ result");
        Ok(result)
    }
}

#[async_trait]
impl QueryBuilder for RuBQQueryBuilder {
    fn service_name(&self) -> &'static str {
        SOURCE
    }

    fn is_lang_supported(&self, lang: &str) -> bool {
        self.settings.languages.is_supported(lang)
    }

    // RuBQ has no knowledge base or user parameters.
    async fn query(&self, question: &str, lang: Option<&str>, _params: &QueryParams) -> Result<QaResult> {
        let lang = self.settings.languages.resolve(lang)?;
        self.request_at(&self.settings.endpoint, question, lang).await
    }
}

pub fn parse_response(raw: Value, question: &str, endpoint: &str, lang: &str) -> Result<QaResult> {
    let parsed: RuBQResponse = serde_json::from_value(raw.clone()).map_err(|e| {
        Error::result_format_with_context(
            format!("unexpected RuBQ response: {}", e),
            ErrorContext::new().with_source(SOURCE),
        )
    })?;
    let (kind, datatype, values) = classify(&parsed.answers, parsed.datatype.as_deref())?;
    let sparql = parsed.query.filter(|q| !q.trim().is_empty());

    Ok(QaResult {
        question: question.to_string(),
        sparql,
        values,
        datatype,
        answer_kind: kind,
        confidence: parsed.confidence.unwrap_or(DEFAULT_CONFIDENCE),
        raw,
        endpoint: endpoint.to_string(),
        lang: lang.to_string(),
        knowledge_base: None,
        user: None,
    })
}

fn is_iri(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

fn classify(answers: &[Value], declared: Option<&str>) -> Result<(AnswerKind, String, Vec<String>)> {
    let mut values = Vec::with_capacity(answers.len());
    for (i, a) in answers.iter().enumerate() {
        let v = match a {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => {
                return Err(Error::result_format_with_context(
                    "answer is not a scalar",
                    ErrorContext::new()
                        .with_field_path(format!("answers[{}]", i))
                        .with_source(SOURCE),
                ))
            }
        };
        values.push(v);
    }

    if let Some(dt) = declared {
        let kind = match dt {
            XSD_ANY_URI => AnswerKind::Resource,
            XSD_BOOLEAN => AnswerKind::Boolean,
            _ => AnswerKind::Literal,
        };
        return Ok((kind, dt.to_string(), values));
    }

    let inferred = if answers.is_empty() {
        (AnswerKind::Resource, XSD_ANY_URI)
    } else if answers.iter().all(Value::is_boolean) {
        (AnswerKind::Boolean, XSD_BOOLEAN)
    } else if answers.iter().all(Value::is_number) {
        (AnswerKind::Literal, XSD_DECIMAL)
    } else if answers.iter().all(|a| a.as_str().map(is_iri).unwrap_or(false)) {
        (AnswerKind::Resource, XSD_ANY_URI)
    } else {
        (AnswerKind::Literal, XSD_STRING)
    };
    Ok((inferred.0, inferred.1.to_string(), values))
}
