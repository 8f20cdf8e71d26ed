//! 流水线组件模块：把查询构建器接入问答流水线。
//!
//! # Pipeline Components
//!
//! A component is invoked once per question. It reads earlier annotations from the
//! triplestore, calls its QA service and writes new annotations back. Any failure
//! aborts the run before anything is written.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`QAnswerComponent`] | Entity enrichment + QAnswer, full answer annotations |
//! | [`RuBQComponent`] | RuBQ, annotates the generated SPARQL query |

mod qanswer;
mod rubq;

pub use qanswer::QAnswerComponent;
pub use rubq::RuBQComponent;

use crate::types::{QaResult, QanaryQuestion};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait QanaryComponent: Send + Sync {
    /// Name used in the `urn:qanary:<name>` service IRI of written annotations.
    fn application_name(&self) -> &str;

    async fn process(&self, question: &QanaryQuestion) -> Result<QaResult>;
}
