use super::QanaryComponent;
use crate::enrich::EntityEnricher;
use crate::qanswer::{knowledge_graph_endpoint, QAnswerQueryBuilder};
use crate::query::QueryBuilder;
use crate::sparql::queries;
use crate::triplestore::TripleStore;
use crate::types::{NamedEntity, QaResult, QanaryQuestion, QueryParams};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Replaces recognized entities by their IRIs, asks QAnswer and stores the answer.
pub struct QAnswerComponent {
    builder: QAnswerQueryBuilder,
    store: Arc<dyn TripleStore>,
    enricher: EntityEnricher,
    application_name: String,
}

impl QAnswerComponent {
    pub fn new(
        builder: QAnswerQueryBuilder,
        store: Arc<dyn TripleStore>,
        enricher: EntityEnricher,
        application_name: impl Into<String>,
    ) -> Self {
        Self {
            builder,
            store,
            enricher,
            application_name: application_name.into(),
        }
    }

    pub fn builder(&self) -> &QAnswerQueryBuilder {
        &self.builder
    }

    pub fn threshold(&self) -> f64 {
        self.enricher.threshold()
    }

    /// Entities annotated for `question` in its input graph.
    pub async fn named_entities(&self, question: &QanaryQuestion) -> Result<Vec<NamedEntity>> {
        let query = queries::named_entities_query(question)?;
        let bindings = self.store.select(&query).await?;
        let entities = queries::named_entities_from_bindings(&bindings)?;
        for e in &entities {
            info!(
                resource = %e.resource,
                start = e.start,
                end = e.end,
                score = ?e.score,
                ignored = !e.passes(self.threshold()),
                "found entity"
            );
        }
        if entities.is_empty() {
            warn!(question = %question.text, "no named entities found");
        }
        Ok(entities)
    }
}

#[async_trait]
impl QanaryComponent for QAnswerComponent {
    fn application_name(&self) -> &str {
        &self.application_name
    }

    async fn process(&self, question: &QanaryQuestion) -> Result<QaResult> {
        info!(question_uri = %question.uri, "process");
        let entities = self.named_entities(question).await?;
        let enriched = self.enricher.enrich(&question.text, &entities);

        let params = QueryParams::new();
        let result = self.builder.query(&enriched, None, &params).await?;

        let kb = result
            .knowledge_base
            .as_deref()
            .unwrap_or(self.builder.settings().knowledge_base_default.as_str());
        let update = queries::qanswer_annotations(
            question,
            &result,
            &self.application_name,
            knowledge_graph_endpoint(kb),
        )?;
        self.store.update(&update).await?;
        info!(question_uri = %question.uri, answers = result.values.len(), "annotations stored");
        Ok(result)
    }
}
