//! RuBQ wire types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuBQRequest<'a> {
    pub question: &'a str,
    pub lang: &'a str,
}

/// Response body. `answers` may hold strings, numbers or booleans; `query` is
/// missing, null or blank when no query could be generated.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RuBQResponse {
    #[serde(default)]
    pub query: Option<String>,
    pub answers: Vec<serde_json::Value>,
    #[serde(default)]
    pub datatype: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}
