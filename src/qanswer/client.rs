//! QAnswer client: form-encoded question in, SPARQL results out.

use super::types::QAnswerRequest;
use crate::client::CachedHttpClient;
use crate::lang::LanguageSupport;
use crate::query::{missing_field, response_json, Answers, QueryBuilder};
use crate::sparql::SparqlResults;
use crate::types::{QaResult, QueryParams};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

const SOURCE: &str = "qanswer";

#[derive(Debug, Clone)]
pub struct QAnswerSettings {
    pub endpoint: Url,
    pub languages: LanguageSupport,
    pub knowledge_base_default: String,
    pub user_default: String,
}

impl QAnswerSettings {
    pub fn validate(&self) -> Result<()> {
        self.languages.validate()?;
        if self.knowledge_base_default.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "default knowledge base cannot be empty",
                ErrorContext::new().with_field_path("qanswer.knowledge_base_default"),
            ));
        }
        if self.user_default.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "default user cannot be empty",
                ErrorContext::new().with_field_path("qanswer.user_default"),
            ));
        }
        Ok(())
    }
}

pub struct QAnswerQueryBuilder {
    client: Arc<CachedHttpClient>,
    settings: QAnswerSettings,
}

impl QAnswerQueryBuilder {
    pub fn new(settings: QAnswerSettings, client: Arc<CachedHttpClient>) -> Result<Self> {
        settings.validate()?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &QAnswerSettings {
        &self.settings
    }

    pub fn endpoint(&self) -> &Url {
        &self.settings.endpoint
    }

    /// Sends `request` to the endpoint it names rather than the configured one.
    pub async fn request(&self, request: &QAnswerRequest) -> Result<QaResult> {
        let endpoint = Url::parse(&request.endpoint).map_err(|e| {
            Error::validation_with_context(
                format!("invalid endpoint: {}", e),
                ErrorContext::new().with_field_path("endpoint").with_source(SOURCE),
            )
        })?;
        let lang = self.settings.languages.resolve(request.language.as_deref())?;
        let kb = request
            .knowledge_base
            .as_deref()
            .unwrap_or(self.settings.knowledge_base_default.as_str());
        let user = request.user.as_deref().unwrap_or(self.settings.user_default.as_str());
        self.request_at(&endpoint, &request.question, lang, kb, user).await
    }

    async fn request_at(&self, endpoint: &Url, question: &str, lang: &str, kb: &str, user: &str) -> Result<QaResult> {
        info!(endpoint = %endpoint, question, lang, kb, user, "QAnswer request");
        let response = self
            .client
            .post_form(
                endpoint.clone(),
                &[("query", question), ("lang", lang), ("kb", kb), ("user", user)],
            )
            .await?;
        let raw = response_json(&response, SOURCE)?;
        let result = parse_response(raw, question, endpoint.as_str(), lang, kb, user)?;
        info!(
            question,
            answers = result.values.len(),
            confidence = result.confidence,
            "QAnswer result"
        );
        Ok(result)
    }
}

#[async_trait]
impl QueryBuilder for QAnswerQueryBuilder {
    fn service_name(&self) -> &'static str {
        SOURCE
    }

    fn is_lang_supported(&self, lang: &str) -> bool {
        self.settings.languages.is_supported(lang)
    }

    async fn query(&self, question: &str, lang: Option<&str>, params: &QueryParams) -> Result<QaResult> {
        let lang = self.settings.languages.resolve(lang)?;
        let kb = params
            .knowledge_base
            .as_deref()
            .unwrap_or(self.settings.knowledge_base_default.as_str());
        let user = params.user.as_deref().unwrap_or(self.settings.user_default.as_str());
        self.request_at(&self.settings.endpoint, question, lang, kb, user).await
    }
}

/// Reads `questions[0].question`: `answers` holds SPARQL JSON results (embedded
/// as a string or as an object), `language[0]` the generated query and confidence.
pub fn parse_response(
    raw: Value,
    question: &str,
    endpoint: &str,
    lang: &str,
    kb: &str,
    user: &str,
) -> Result<QaResult> {
    let q = raw
        .pointer("/questions/0/question")
        .ok_or_else(|| missing_field("questions[0].question", SOURCE))?;

    let answers_value = q
        .get("answers")
        .ok_or_else(|| missing_field("questions[0].question.answers", SOURCE))?;
    let results: SparqlResults = match answers_value {
        Value::String(s) => serde_json::from_str(s),
        other => serde_json::from_value(other.clone()),
    }
    .map_err(|e| {
        Error::result_format_with_context(
            format!("answers are not SPARQL JSON results: {}", e),
            ErrorContext::new()
                .with_field_path("questions[0].question.answers")
                .with_source(SOURCE),
        )
    })?;
    let answers = Answers::from_sparql_results(&results, SOURCE)?;

    let interpretation = q
        .pointer("/language/0")
        .ok_or_else(|| missing_field("questions[0].question.language[0]", SOURCE))?;
    let sparql = interpretation
        .get("SPARQL")
        .and_then(Value::as_str)
        .ok_or_else(|| missing_field("questions[0].question.language[0].SPARQL", SOURCE))?
        .to_string();
    let confidence = interpretation
        .get("confidence")
        .and_then(Value::as_f64)
        .ok_or_else(|| missing_field("questions[0].question.language[0].confidence", SOURCE))?;
    if !(0.0..=1.0).contains(&confidence) {
        warn!(confidence, "QAnswer confidence outside [0, 1]");
    }

    Ok(QaResult {
        question: question.to_string(),
        sparql: Some(sparql),
        values: answers.values,
        datatype: answers.datatype,
        answer_kind: answers.kind,
        confidence,
        raw,
        endpoint: endpoint.to_string(),
        lang: lang.to_string(),
        knowledge_base: Some(kb.to_string()),
        user: Some(user.to_string()),
    })
}
