use super::{HttpExecutor, HttpRequest, HttpResponse};
use crate::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Proxy;
use std::collections::BTreeMap;
use std::env;
use std::time::Duration;
use tracing::debug;

/// [`HttpExecutor`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: reqwest::Client,
}

impl ReqwestExecutor {
    /// Builds a client with env-overridable defaults
    /// (`QANARY_HTTP_TIMEOUT_SECS`, `QANARY_HTTP_POOL_MAX_IDLE_PER_HOST`, `QANARY_PROXY_URL`).
    pub fn new() -> Result<Self> {
        let timeout_secs = env::var("QANARY_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60);
        Self::with_timeout(Duration::from_secs(timeout_secs))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(
                env::var("QANARY_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(16),
            )
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Ok(proxy_url) = env::var("QANARY_PROXY_URL") {
            if let Ok(proxy) = Proxy::all(&proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder
            .build()
            .map_err(|e| crate::Error::Transport(TransportError::Other(e.to_string())))?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(headers.len());
        for (k, v) in headers {
            let name = HeaderName::from_bytes(k.as_bytes())
                .map_err(|e| TransportError::Other(format!("invalid header name {}: {}", k, e)))?;
            let value = HeaderValue::from_str(v)
                .map_err(|e| TransportError::Other(format!("invalid header value for {}: {}", k, e)))?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut req = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(Self::header_map(&request.headers)?);
        if let Some(body) = &request.body {
            req = req.body(body.clone());
        }

        debug!(method = %request.method, url = %request.url, "dispatching request");
        let response = req
            .send()
            .await
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)))?;

        Ok(HttpResponse { status, headers, body })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
