use serde::{Deserialize, Serialize};

/// The question a component is asked to process.
///
/// `in_graph` holds the annotations written by earlier components, `out_graph`
/// receives ours. In a typical pipeline both point to the same graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QanaryQuestion {
    pub uri: String,
    pub text: String,
    pub in_graph: String,
    pub out_graph: String,
}

impl QanaryQuestion {
    pub fn new(uri: impl Into<String>, text: impl Into<String>, graph: impl Into<String>) -> Self {
        let graph = graph.into();
        Self {
            uri: uri.into(),
            text: text.into(),
            in_graph: graph.clone(),
            out_graph: graph,
        }
    }

    pub fn with_out_graph(mut self, graph: impl Into<String>) -> Self {
        self.out_graph = graph.into();
        self
    }
}
