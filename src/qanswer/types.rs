//! QAnswer request types.

use serde::{Deserialize, Serialize};

/// Direct request to a QAnswer endpoint, bypassing the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QAnswerRequest {
    pub endpoint: String,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl QAnswerRequest {
    pub fn new(endpoint: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            question: question.into(),
            language: None,
            knowledge_base: None,
            user: None,
        }
    }
}

/// SPARQL endpoint of a knowledge base id QAnswer understands.
pub fn knowledge_graph_endpoint(knowledge_base: &str) -> Option<&'static str> {
    match knowledge_base {
        "wikidata" => Some("https://query.wikidata.org/bigdata/namespace/wdq/sparql"),
        "dbpedia" => Some("https://dbpedia.org/sparql"),
        _ => None,
    }
}
