use crate::cache::{CacheKeyGenerator, ResponseCache};
use crate::transport::{HttpExecutor, HttpRequest, HttpResponse};
use crate::{Error, ErrorContext, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// HTTP client that answers repeated requests from a [`ResponseCache`].
///
/// Only 2xx responses are stored. Non-success statuses and transport errors are
/// returned as [`Error::RequestFailed`] / [`Error::Transport`] and leave the cache
/// untouched. Concurrent misses for one key each dispatch a request.
pub struct CachedHttpClient {
    pub(crate) executor: Arc<dyn HttpExecutor>,
    pub(crate) cache: Arc<ResponseCache>,
    pub(crate) keys: CacheKeyGenerator,
    pub(crate) user_agent: Option<String>,
    pub(crate) executed: AtomicU64,
}

impl CachedHttpClient {
    pub fn builder() -> super::CachedHttpClientBuilder {
        super::CachedHttpClientBuilder::new()
    }

    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let request = match &self.user_agent {
            Some(ua) if !request.headers.contains_key("user-agent") => {
                request.header("user-agent", ua.clone())
            }
            _ => request,
        };
        let key = self.keys.generate(&request);

        if let Some(cached) = self.cache.get(&key).await? {
            debug!(target_url = %request.url, key = %key, "served from cache");
            return Ok(cached);
        }

        let dispatched = self.executor.send(&request).await;
        let executed = self.executed.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            method = %request.method,
            target_url = %request.url,
            executed_requests = executed,
            "executed uncached request"
        );

        let response = dispatched.map_err(|e| {
            warn!(target_url = %request.url, error = %e, "request failed");
            match e {
                Error::Transport(t) => Error::request_failed(
                    None,
                    t.to_string(),
                    ErrorContext::new()
                        .with_details(format!("{} {}", request.method, request.url))
                        .with_source("cached_http_client"),
                ),
                other => other,
            }
        })?;

        if !response.is_success() {
            warn!(target_url = %request.url, status = response.status, "non-success status, not cached");
            return Err(Error::request_failed(
                Some(response.status),
                truncate(&response.text(), 512),
                ErrorContext::new()
                    .with_details(format!("{} {}", request.method, request.url))
                    .with_source("cached_http_client"),
            ));
        }

        self.cache.put(&key, response.clone()).await?;
        Ok(response)
    }

    pub async fn get(&self, url: Url) -> Result<HttpResponse> {
        self.execute(HttpRequest::get(url)).await
    }

    pub async fn post_form<K, V>(&self, url: Url, pairs: &[(K, V)]) -> Result<HttpResponse>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.execute(HttpRequest::post(url).form(pairs)).await
    }

    pub async fn post_json<T>(&self, url: Url, body: &T) -> Result<HttpResponse>
    where
        T: serde::Serialize + ?Sized,
    {
        self.execute(HttpRequest::post(url).json(body)?).await
    }

    /// Number of requests that actually went to the network. Never decreases.
    pub fn executed_requests(&self) -> u64 {
        self.executed.load(Ordering::Relaxed)
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
