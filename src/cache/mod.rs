//! 响应缓存模块：在限定时间窗口内复用外部 HTTP 调用的响应。
//!
//! # Response Caching Module
//!
//! Memoizes outbound HTTP calls for a bounded time window so that repeated
//! pipeline runs and tests do not hit slow, rate-limited QA services again.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ResponseCache`] | TTL-bounded store with hit/miss statistics |
//! | [`CacheConfig`] | TTL, on/off switch and entry size limit |
//! | [`CacheBackend`] | Trait for implementing custom storage |
//! | [`MemoryCache`] | In-memory store |
//! | [`NullCache`] | No-op store for disabling caching |
//! | [`CacheKeyGenerator`] | Request fingerprinting |
//!
//! ## Example
//!
//! ```rust
//! use qanary_lib_rust::cache::{CacheConfig, MemoryCache, ResponseCache};
//! use std::time::Duration;
//!
//! let cache = ResponseCache::new(
//!     CacheConfig::new().with_ttl(Duration::from_secs(5)),
//!     Box::new(MemoryCache::unbounded()),
//! );
//! assert_eq!(cache.ttl(), Duration::from_secs(5));
//! ```
//!
//! ## Cache Key Generation
//!
//! Keys are SHA-256 digests over:
//! - HTTP method and target URL
//! - a declared subset of headers (`content-type`, `accept` by default)
//! - the raw request body
//!
//! Changing the body with the same URL and method always produces a new key.

mod backend;
mod key;
mod manager;

pub use backend::{CacheBackend, CacheEntry, MemoryCache, NullCache};
pub use key::{CacheKey, CacheKeyGenerator, DEFAULT_FINGERPRINT_HEADERS};
pub use manager::{CacheConfig, CacheStats, ResponseCache};
