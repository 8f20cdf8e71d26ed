use crate::cache::{CacheKeyGenerator, ResponseCache};
use crate::client::core::CachedHttpClient;
use crate::transport::{HttpExecutor, ReqwestExecutor};
use crate::Result;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`CachedHttpClient`].
///
/// Share one `ResponseCache` between clients by passing the same `Arc`.
pub struct CachedHttpClientBuilder {
    executor: Option<Arc<dyn HttpExecutor>>,
    cache: Option<Arc<ResponseCache>>,
    ttl: Duration,
    keys: CacheKeyGenerator,
    user_agent: Option<String>,
}

impl CachedHttpClientBuilder {
    pub fn new() -> Self {
        Self {
            executor: None,
            cache: None,
            ttl: Duration::from_secs(5),
            keys: CacheKeyGenerator::new(),
            user_agent: Some(format!("qanary-lib-rust/{}", env!("CARGO_PKG_VERSION"))),
        }
    }

    /// Network layer; defaults to [`ReqwestExecutor::new`].
    pub fn executor(mut self, executor: Arc<dyn HttpExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Use an existing cache. Overrides [`Self::ttl`].
    pub fn cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// TTL of the in-memory cache created when no cache is supplied.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn key_generator(mut self, keys: CacheKeyGenerator) -> Self {
        self.keys = keys;
        self
    }

    /// Sent on every request unless the request sets its own. Not part of the fingerprint.
    pub fn user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn build(self) -> Result<CachedHttpClient> {
        let executor: Arc<dyn HttpExecutor> = match self.executor {
            Some(e) => e,
            None => Arc::new(ReqwestExecutor::new()?),
        };
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(ResponseCache::in_memory(self.ttl)));
        Ok(CachedHttpClient {
            executor,
            cache,
            keys: self.keys,
            user_agent: self.user_agent,
            executed: AtomicU64::new(0),
        })
    }
}

impl Default for CachedHttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
