//! Cache backend implementations.

use super::key::CacheKey;
use crate::transport::HttpResponse;
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// A stored response. Never mutated; a refetch inserts a new entry under the same key.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub response: HttpResponse,
    pub created_at: Instant,
}

impl CacheEntry {
    pub fn new(key: CacheKey, response: HttpResponse) -> Self {
        Self {
            key,
            response,
            created_at: Instant::now(),
        }
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}

/// Key-value storage behind [`super::ResponseCache`].
///
/// Each call must be atomic on its own; there is no cross-call locking.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>>;
    async fn insert(&self, entry: CacheEntry) -> Result<()>;
    async fn delete(&self, key: &CacheKey) -> Result<bool>;
    async fn clear(&self) -> Result<()>;
    async fn len(&self) -> Result<usize>;
    /// Drops entries with `age >= ttl`; returns how many were removed.
    async fn prune(&self, ttl: Duration) -> Result<usize>;
    fn name(&self) -> &'static str;
}

pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    max_entries: usize,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            max_entries: max_entries.max(1),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(usize::MAX)
    }

    fn poisoned() -> crate::Error {
        crate::Error::configuration_with_context(
            "memory cache lock poisoned",
            crate::ErrorContext::new().with_source("memory_cache"),
        )
    }

    // Only called when inserting a new key into a full map.
    fn evict_oldest(&self, entries: &mut HashMap<String, CacheEntry>) {
        while entries.len() >= self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.created_at)
                .map(|(k, _)| k.clone());
            if let Some(k) = oldest {
                entries.remove(&k);
            } else {
                break;
            }
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>> {
        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        Ok(entries.get(&key.hash).cloned())
    }
    async fn insert(&self, entry: CacheEntry) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        if !entries.contains_key(&entry.key.hash) {
            self.evict_oldest(&mut entries);
        }
        entries.insert(entry.key.hash.clone(), entry);
        Ok(())
    }
    async fn delete(&self, key: &CacheKey) -> Result<bool> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        Ok(entries.remove(&key.hash).is_some())
    }
    async fn clear(&self) -> Result<()> {
        self.entries.write().map_err(|_| Self::poisoned())?.clear();
        Ok(())
    }
    async fn len(&self) -> Result<usize> {
        Ok(self.entries.read().map_err(|_| Self::poisoned())?.len())
    }
    async fn prune(&self, ttl: Duration) -> Result<usize> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        let before = entries.len();
        entries.retain(|_, e| e.is_fresh(ttl));
        Ok(before - entries.len())
    }
    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Backend that stores nothing; every lookup misses.
pub struct NullCache;
impl NullCache {
    pub fn new() -> Self {
        Self
    }
}
impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for NullCache {
    async fn get(&self, _: &CacheKey) -> Result<Option<CacheEntry>> {
        Ok(None)
    }
    async fn insert(&self, _: CacheEntry) -> Result<()> {
        Ok(())
    }
    async fn delete(&self, _: &CacheKey) -> Result<bool> {
        Ok(false)
    }
    async fn clear(&self) -> Result<()> {
        Ok(())
    }
    async fn len(&self) -> Result<usize> {
        Ok(0)
    }
    async fn prune(&self, _: Duration) -> Result<usize> {
        Ok(0)
    }
    fn name(&self) -> &'static str {
        "null"
    }
}
