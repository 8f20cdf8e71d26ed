//! # qanary-lib-rust
//!
//! 问答流水线（Qanary）组件的 Rust 实现：带缓存的外部问答服务调用。
//!
//! Question-answering pipeline components that call external QA web services
//! (QAnswer, RuBQ) through a time-bounded response cache.
//!
//! ## Overview
//!
//! Each component is invoked once per question. The QAnswer component replaces
//! recognized named entities by their resource IRIs, sends the rewritten question to
//! QAnswer and stores query, answers and raw payload as annotations. The RuBQ
//! component asks RuBQ for a SPARQL query and stores it.
//!
//! Outbound calls go through [`CachedHttpClient`]: identical requests (method, URL,
//! body, declared headers) inside the TTL window are answered from the
//! [`cache::ResponseCache`] without touching the network. Failed calls are never
//! cached.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qanary_lib_rust::{CachedHttpClient, LanguageSupport, QueryBuilder, QueryParams};
//! use qanary_lib_rust::qanswer::{QAnswerQueryBuilder, QAnswerSettings};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> qanary_lib_rust::Result<()> {
//!     let client = Arc::new(CachedHttpClient::builder().ttl(Duration::from_secs(5)).build()?);
//!     let qanswer = QAnswerQueryBuilder::new(
//!         QAnswerSettings {
//!             endpoint: "http://qanswer.example/api/gerbil".parse().expect("url"),
//!             languages: LanguageSupport::new("en", ["en", "fr"])?,
//!             knowledge_base_default: "wikidata".into(),
//!             user_default: "open".into(),
//!         },
//!         client,
//!     )?;
//!     let result = qanswer
//!         .query("What is the capital of Germany?", None, &QueryParams::new())
//!         .await?;
//!     println!("{:?}", result.values);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | TTL-bounded response cache and request fingerprints |
//! | [`client`] | Cached HTTP client |
//! | [`transport`] | Request/response values and the reqwest executor |
//! | [`enrich`] | Named-entity substitution in questions |
//! | [`qanswer`] | QAnswer query builder |
//! | [`rubq`] | RuBQ query builder |
//! | [`sparql`] | Annotation templates and SPARQL JSON results |
//! | [`triplestore`] | Triplestore collaborator |
//! | [`component`] | Pipeline components |
//! | [`config`] | YAML / environment configuration |

pub mod cache;
pub mod client;
pub mod component;
pub mod config;
pub mod enrich;
pub mod lang;
pub mod qanswer;
pub mod query;
pub mod rubq;
pub mod sparql;
pub mod transport;
pub mod triplestore;
pub mod types;

// Re-export main types for convenience
pub use client::{CachedHttpClient, CachedHttpClientBuilder};
pub use component::{QAnswerComponent, QanaryComponent, RuBQComponent};
pub use config::ComponentConfig;
pub use enrich::EntityEnricher;
pub use lang::LanguageSupport;
pub use query::QueryBuilder;
pub use triplestore::{HttpTripleStore, TripleStore};
pub use types::{AnswerKind, NamedEntity, QaResult, QanaryQuestion, QueryParams};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
