//! Cached HTTP client used by every query builder.
//!
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod core;

pub use builder::CachedHttpClientBuilder;
pub use core::CachedHttpClient;
