//! Cache key generation.

use crate::transport::HttpRequest;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

/// Headers that take part in the fingerprint unless configured otherwise.
pub const DEFAULT_FINGERPRINT_HEADERS: &[&str] = &["content-type", "accept"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub hash: String,
    /// `METHOD url`, kept for log output only.
    pub target: Option<String>,
}

impl CacheKey {
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into(), target: None }
    }
    pub fn with_target(mut self, target: impl Into<String>) -> Self { self.target = Some(target.into()); self }
    pub fn as_str(&self) -> &str { &self.hash }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.hash) }
}

impl From<&str> for CacheKey { fn from(s: &str) -> Self { Self::new(s) } }
impl From<String> for CacheKey { fn from(s: String) -> Self { Self::new(s) } }

/// Derives request fingerprints from method, URL, body and a declared header subset.
///
/// Headers outside the declared subset (user agents, tracing ids) never change the key.
#[derive(Debug, Clone)]
pub struct CacheKeyGenerator {
    headers: BTreeSet<String>,
    salt: Option<String>,
}

impl CacheKeyGenerator {
    pub fn new() -> Self {
        Self::with_headers(DEFAULT_FINGERPRINT_HEADERS.iter().copied())
    }

    pub fn with_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            headers: headers.into_iter().map(|h| h.as_ref().to_ascii_lowercase()).collect(),
            salt: None,
        }
    }

    pub fn with_salt(mut self, salt: impl Into<String>) -> Self { self.salt = Some(salt.into()); self }

    pub fn fingerprint_headers(&self) -> impl Iterator<Item = &str> {
        self.headers.iter().map(String::as_str)
    }

    pub fn generate(&self, request: &HttpRequest) -> CacheKey {
        let mut hasher = Sha256::new();
        hasher.update(request.method.as_str().to_ascii_uppercase().as_bytes());
        hasher.update(b"\n");
        hasher.update(request.url.as_str().as_bytes());
        hasher.update(b"\n");
        for name in &self.headers {
            if let Some(value) = request.headers.get(name) {
                hasher.update(name.as_bytes());
                hasher.update(b":");
                hasher.update(value.trim().as_bytes());
                hasher.update(b"\n");
            }
        }
        let body = request.body.as_deref().unwrap_or_default();
        hasher.update((body.len() as u64).to_be_bytes());
        hasher.update(body);
        if let Some(ref s) = self.salt {
            hasher.update(b"\nsalt:");
            hasher.update(s.as_bytes());
        }
        let hash: String = hasher.finalize().iter().map(|b| format!("{:02x}", b)).collect();
        CacheKey::new(hash).with_target(format!("{} {}", request.method, request.url))
    }
}

impl Default for CacheKeyGenerator { fn default() -> Self { Self::new() } }
