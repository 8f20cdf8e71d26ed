//! QAnswer 问答服务模块：将（已替换实体的）问题发送到 QAnswer API 并解析结果。

mod client;
mod types;

pub use client::{parse_response, QAnswerQueryBuilder, QAnswerSettings};
pub use types::{knowledge_graph_endpoint, QAnswerRequest};
