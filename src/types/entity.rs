//! Named entities detected upstream in the question text.

use serde::{Deserialize, Serialize};

/// A span `[start, end)` of the question, counted in characters, linked to `resource`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub resource: String,
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl NamedEntity {
    pub fn new(resource: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            resource: resource.into(),
            start,
            end,
            score: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Entities without a score always pass; a NaN score never does.
    pub fn passes(&self, threshold: f64) -> bool {
        match self.score {
            Some(score) => score >= threshold,
            None => true,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
