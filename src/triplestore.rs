//! Triplestore collaborator: read annotations with SELECT, write them with UPDATE.

use crate::sparql::{Binding, SparqlResults};
use crate::transport::{HttpExecutor, HttpRequest};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

#[async_trait]
pub trait TripleStore: Send + Sync {
    async fn select(&self, query: &str) -> Result<Vec<Binding>>;
    async fn update(&self, update: &str) -> Result<()>;
}

/// SPARQL 1.1 protocol endpoint. Requests are never cached.
pub struct HttpTripleStore {
    query_endpoint: Url,
    update_endpoint: Url,
    executor: Arc<dyn HttpExecutor>,
}

impl HttpTripleStore {
    pub fn new(endpoint: Url, executor: Arc<dyn HttpExecutor>) -> Self {
        Self {
            query_endpoint: endpoint.clone(),
            update_endpoint: endpoint,
            executor,
        }
    }

    /// For stores that expose updates on a separate path.
    pub fn with_update_endpoint(mut self, endpoint: Url) -> Self {
        self.update_endpoint = endpoint;
        self
    }

    fn failed(&self, status: u16, body: String, url: &Url) -> Error {
        Error::triplestore_with_context(
            format!("HTTP {}: {}", status, body),
            ErrorContext::new()
                .with_details(url.to_string())
                .with_source("http_triplestore"),
        )
    }
}

#[async_trait]
impl TripleStore for HttpTripleStore {
    async fn select(&self, query: &str) -> Result<Vec<Binding>> {
        debug!(endpoint = %self.query_endpoint, "SPARQL select");
        let request = HttpRequest::post(self.query_endpoint.clone())
            .form(&[("query", query)])
            .header("accept", "application/sparql-results+json");
        let response = self.executor.send(&request).await?;
        if !response.is_success() {
            return Err(self.failed(response.status, response.text(), &self.query_endpoint));
        }
        let results: SparqlResults = response.json().map_err(|e| {
            Error::triplestore_with_context(
                format!("unreadable SELECT result: {}", e),
                ErrorContext::new().with_source("http_triplestore"),
            )
        })?;
        Ok(results.into_bindings())
    }

    async fn update(&self, update: &str) -> Result<()> {
        info!(endpoint = %self.update_endpoint, "SPARQL update");
        debug!(update = %update, "SPARQL update text");
        let request = HttpRequest::post(self.update_endpoint.clone()).form(&[("update", update)]);
        let response = self.executor.send(&request).await?;
        if !response.is_success() {
            return Err(self.failed(response.status, response.text(), &self.update_endpoint));
        }
        Ok(())
    }
}
