//! Response cache with a single time-to-live window.

use super::backend::{CacheBackend, CacheEntry, MemoryCache};
use super::key::CacheKey;
use crate::transport::HttpResponse;
use crate::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CacheConfig { pub ttl: Duration, pub enabled: bool, pub max_entry_size: usize }

impl Default for CacheConfig {
    fn default() -> Self { Self { ttl: Duration::from_secs(5), enabled: true, max_entry_size: usize::MAX } }
}

impl CacheConfig {
    pub fn new() -> Self { Self::default() }
    pub fn with_ttl(mut self, ttl: Duration) -> Self { self.ttl = ttl; self }
    pub fn with_ttl_secs(self, secs: u64) -> Self { self.with_ttl(Duration::from_secs(secs)) }
    pub fn with_enabled(mut self, enabled: bool) -> Self { self.enabled = enabled; self }
    pub fn with_max_entry_size(mut self, bytes: usize) -> Self { self.max_entry_size = bytes; self }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats { pub hits: u64, pub misses: u64, pub puts: u64, pub errors: u64 }

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 { let total = self.hits + self.misses; if total == 0 { 0.0 } else { self.hits as f64 / total as f64 } }
}

struct AtomicStats { hits: AtomicU64, misses: AtomicU64, puts: AtomicU64, errors: AtomicU64 }
impl AtomicStats {
    fn new() -> Self { Self { hits: AtomicU64::new(0), misses: AtomicU64::new(0), puts: AtomicU64::new(0), errors: AtomicU64::new(0) } }
    fn to_stats(&self) -> CacheStats { CacheStats { hits: self.hits.load(Ordering::Relaxed), misses: self.misses.load(Ordering::Relaxed), puts: self.puts.load(Ordering::Relaxed), errors: self.errors.load(Ordering::Relaxed) } }
}

/// Shared key -> (response, timestamp) store.
///
/// An entry is served iff `now - created_at < ttl`, decided at lookup. Stale entries
/// stay in the backend until the next `put` (for any key) prunes them.
/// Two concurrent misses for the same key both report a miss.
pub struct ResponseCache { config: CacheConfig, backend: Box<dyn CacheBackend>, stats: AtomicStats }

impl ResponseCache {
    pub fn new(config: CacheConfig, backend: Box<dyn CacheBackend>) -> Self { Self { config, backend, stats: AtomicStats::new() } }

    /// In-memory, unbounded cache with the given TTL.
    pub fn in_memory(ttl: Duration) -> Self { Self::new(CacheConfig::new().with_ttl(ttl), Box::new(MemoryCache::unbounded())) }

    pub async fn get(&self, key: &CacheKey) -> Result<Option<HttpResponse>> {
        if !self.config.enabled {
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
            return Ok(None);
        }
        match self.backend.get(key).await {
            Ok(Some(entry)) if entry.is_fresh(self.config.ttl) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, age_ms = entry.age().as_millis() as u64, "cache hit");
                Ok(Some(entry.response))
            }
            Ok(Some(entry)) => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, age_ms = entry.age().as_millis() as u64, "cache entry expired");
                Ok(None)
            }
            Ok(None) => { self.stats.misses.fetch_add(1, Ordering::Relaxed); Ok(None) }
            Err(e) => { self.stats.errors.fetch_add(1, Ordering::Relaxed); Err(e) }
        }
    }

    pub async fn put(&self, key: &CacheKey, response: HttpResponse) -> Result<()> {
        if !self.config.enabled { return Ok(()); }
        if response.body.len() > self.config.max_entry_size {
            debug!(key = %key, size = response.body.len(), "response too large to cache");
            return Ok(());
        }
        match self.backend.prune(self.config.ttl).await {
            Ok(0) => {}
            Ok(n) => debug!(pruned = n, "expired cache entries removed"),
            Err(e) => { self.stats.errors.fetch_add(1, Ordering::Relaxed); return Err(e); }
        }
        match self.backend.insert(CacheEntry::new(key.clone(), response)).await {
            Ok(()) => { self.stats.puts.fetch_add(1, Ordering::Relaxed); Ok(()) }
            Err(e) => { self.stats.errors.fetch_add(1, Ordering::Relaxed); Err(e) }
        }
    }

    pub async fn invalidate(&self, key: &CacheKey) -> Result<bool> { self.backend.delete(key).await }
    pub async fn clear(&self) -> Result<()> { self.backend.clear().await }

    /// Number of stored entries, stale ones included.
    pub async fn size(&self) -> Result<usize> { self.backend.len().await }

    pub fn hit_count(&self) -> u64 { self.stats.hits.load(Ordering::Relaxed) }
    pub fn miss_count(&self) -> u64 { self.stats.misses.load(Ordering::Relaxed) }
    pub fn stats(&self) -> CacheStats { self.stats.to_stats() }
    pub fn ttl(&self) -> Duration { self.config.ttl }
    pub fn backend_name(&self) -> &'static str { self.backend.name() }
}
