//! Mock HTTP server setup for integration tests

use async_trait::async_trait;
use mockito::{Matcher, Mock, Server, ServerGuard};
use qanary_lib_rust::lang::LanguageSupport;
use qanary_lib_rust::qanswer::{QAnswerQueryBuilder, QAnswerSettings};
use qanary_lib_rust::rubq::{RuBQQueryBuilder, RuBQSettings};
use qanary_lib_rust::sparql::Binding;
use qanary_lib_rust::{CachedHttpClient, TripleStore};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::Mutex;

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: Arc<Mutex<ServerGuard>>,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Arc::new(Mutex::new(server)),
            base_url,
        }
    }

    pub fn url(&self, path: &str) -> url::Url {
        format!("{}{}", self.base_url, path).parse().unwrap()
    }

    /// Cached client talking to the real network layer with the given TTL
    pub fn create_client(&self, ttl: Duration) -> Arc<CachedHttpClient> {
        Arc::new(CachedHttpClient::builder().ttl(ttl).build().unwrap())
    }

    pub fn qanswer_builder(&self, client: Arc<CachedHttpClient>) -> QAnswerQueryBuilder {
        QAnswerQueryBuilder::new(
            QAnswerSettings {
                endpoint: self.url("/api/gerbil"),
                languages: LanguageSupport::new("en", ["en", "de", "fr"]).unwrap(),
                knowledge_base_default: "wikidata".into(),
                user_default: "open".into(),
            },
            client,
        )
        .unwrap()
    }

    pub fn rubq_builder(&self, client: Arc<CachedHttpClient>) -> RuBQQueryBuilder {
        RuBQQueryBuilder::new(
            RuBQSettings {
                endpoint: self.url("/answer"),
                languages: LanguageSupport::new("en", ["en", "ru"]).unwrap(),
            },
            client,
        )
        .unwrap()
    }

    /// Create a mock for a successful JSON response; expects exactly `hits` calls
    pub async fn mock_json_response(&self, method: &str, path: &str, body: &str, hits: usize) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock(method, path)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    /// QAnswer mock matching the form-encoded question; expects exactly `hits` calls
    pub async fn mock_qanswer(&self, question: &str, lang: &str, body: &str, hits: usize) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", "/api/gerbil")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("query".into(), question.into()),
                Matcher::UrlEncoded("lang".into(), lang.into()),
                Matcher::UrlEncoded("kb".into(), "wikidata".into()),
                Matcher::UrlEncoded("user".into(), "open".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    /// RuBQ mock matching the JSON body; expects exactly `hits` calls
    pub async fn mock_rubq(&self, question: &str, lang: &str, body: &str, hits: usize) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", "/answer")
            .match_body(Matcher::Json(serde_json::json!({"question": question, "lang": lang})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    /// Create a mock for an error response; expects exactly `hits` calls
    pub async fn mock_error_response(&self, path: &str, status: usize, error_body: &str, hits: usize) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(error_body)
            .expect(hits)
            .create_async()
            .await
    }
}

/// QAnswer payload with one resource answer
pub fn qanswer_body(answer_iri: &str, sparql: &str, confidence: f64) -> String {
    let answers = serde_json::json!({
        "head": {"vars": ["o1"]},
        "results": {"bindings": [{"o1": {"type": "uri", "value": answer_iri}}]}
    });
    serde_json::json!({"questions": [{"question": {
        "answers": answers.to_string(),
        "language": [{"SPARQL": sparql, "confidence": confidence}]
    }}]})
    .to_string()
}

/// In-memory triplestore returning canned bindings and recording every update
#[derive(Default)]
pub struct RecordingTripleStore {
    pub bindings: Vec<Binding>,
    pub selects: StdMutex<Vec<String>>,
    pub updates: StdMutex<Vec<String>>,
}

impl RecordingTripleStore {
    pub fn with_bindings(bindings: Vec<Binding>) -> Self {
        Self {
            bindings,
            ..Default::default()
        }
    }

    pub fn updates(&self) -> Vec<String> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl TripleStore for RecordingTripleStore {
    async fn select(&self, query: &str) -> qanary_lib_rust::Result<Vec<Binding>> {
        self.selects.lock().unwrap().push(query.to_string());
        Ok(self.bindings.clone())
    }

    async fn update(&self, update: &str) -> qanary_lib_rust::Result<()> {
        self.updates.lock().unwrap().push(update.to_string());
        Ok(())
    }
}
