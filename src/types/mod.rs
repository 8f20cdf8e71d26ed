//! 类型系统模块：问答流水线组件之间传递的核心数据类型。
//!
//! # Types Module
//!
//! Strongly-typed values exchanged between the pipeline boundary, the entity
//! enricher and the query builders.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`NamedEntity`] | Question span linked to a resource, with optional score |
//! | [`QanaryQuestion`] | Question handed to a component by the pipeline |
//! | [`QaResult`] | Parsed answer of an external QA service |
//! | [`AnswerKind`] | Whether answers are resources, literals or a boolean |
//! | [`QueryParams`] | Optional knowledge base / user overrides for a query |

pub mod entity;
pub mod question;
pub mod result;

pub use entity::NamedEntity;
pub use question::QanaryQuestion;
pub use result::{AnswerKind, QaResult, QueryParams};
