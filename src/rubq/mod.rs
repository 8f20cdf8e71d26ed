//! RuBQ 问答服务模块：生成 SPARQL 查询并返回答案。

mod client;
mod types;

pub use client::{parse_response, RuBQQueryBuilder, RuBQSettings, DEFAULT_CONFIDENCE};
pub use types::{RuBQRequest, RuBQResponse};
