use super::QanaryComponent;
use crate::query::QueryBuilder;
use crate::rubq::RuBQQueryBuilder;
use crate::sparql::queries;
use crate::triplestore::TripleStore;
use crate::types::{QaResult, QanaryQuestion, QueryParams};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Asks RuBQ for a SPARQL query and annotates it.
pub struct RuBQComponent {
    builder: RuBQQueryBuilder,
    store: Arc<dyn TripleStore>,
    application_name: String,
    lang: Option<String>,
}

impl RuBQComponent {
    pub fn new(builder: RuBQQueryBuilder, store: Arc<dyn TripleStore>, application_name: impl Into<String>) -> Self {
        Self {
            builder,
            store,
            application_name: application_name.into(),
            lang: None,
        }
    }

    /// Language sent with every question; the builder default otherwise.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn builder(&self) -> &RuBQQueryBuilder {
        &self.builder
    }
}

#[async_trait]
impl QanaryComponent for RuBQComponent {
    fn application_name(&self) -> &str {
        &self.application_name
    }

    async fn process(&self, question: &QanaryQuestion) -> Result<QaResult> {
        info!(question_uri = %question.uri, "process");
        let result = self
            .builder
            .query(&question.text, self.lang.as_deref(), &QueryParams::new())
            .await?;

        match result.sparql.as_deref() {
            Some(sparql) => {
                let update = queries::sparql_query_annotation(
                    question,
                    sparql,
                    result.confidence,
                    &self.application_name,
                )?;
                self.store.update(&update).await?;
                info!(question_uri = %question.uri, "SPARQL query annotation stored");
            }
            None => warn!(question = %question.text, "RuBQ generated no query, nothing stored"),
        }
        Ok(result)
    }
}
