//! Rate-limit aware request handler
//!
//! The sole network entry point. Every GET goes through the same sequence:
//! acquire a concurrency slot, wait out any shared backoff deadline, then
//! hit the wire. A 429 answer records the server's Retry-After hint and
//! retries in an explicit loop; the slot is released before waiting so a
//! sustained 429 storm cannot starve the gate. Final 2xx responses are
//! cached by URL; intermediate retry attempts never are.

use super::backoff::RetryCoordinator;
use super::cache::ResponseCache;
use super::gate::RequestGate;
use super::rate_limit::RateLimiter;
use crate::config::{ClientConfig, Credentials};
use crate::error::{Error, Result};
use reqwest::{Client, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

/// Snapshot of a successful response, safe to cache and share
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// Deserialize the body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Authenticated GET with gating, shared backoff, and response caching
///
/// All state (gate, backoff deadline, cache) lives in this instance;
/// independent handlers never interfere with each other.
pub struct HttpRequestHandler {
    client: Client,
    base_url: Url,
    credentials: Credentials,
    gate: RequestGate,
    retry: RetryCoordinator,
    cache: ResponseCache<ApiResponse>,
    rate_limiter: Option<RateLimiter>,
    default_retry_after: Duration,
}

impl HttpRequestHandler {
    /// Create a handler from a client config and credentials
    pub fn new(config: &ClientConfig, credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        let base_url = Url::parse(&config.base_url)?;

        Ok(Self {
            client,
            base_url,
            credentials,
            gate: RequestGate::new(config.max_concurrent_requests),
            retry: RetryCoordinator::new(),
            cache: ResponseCache::new(config.cache_ttl),
            rate_limiter: config.rate_limit.as_ref().map(RateLimiter::new),
            default_retry_after: config.default_retry_after,
        })
    }

    /// Perform an authenticated GET for `path`, relative to the base URL
    ///
    /// Fails with [`Error::Unauthorized`] on 401 (never retried), with
    /// [`Error::HttpStatus`] on any other non-2xx, and with
    /// [`Error::Cancelled`] if the token fires at any suspension point.
    pub async fn get(&self, path: &str, cancel: &CancellationToken) -> Result<Arc<ApiResponse>> {
        let url = self.resolve_url(path)?;
        self.cache
            .get_or_compute(url.as_str(), || self.fetch_fresh(url.clone(), cancel))
            .await
    }

    /// Fetch past the cache, retrying 429s until the server accepts
    async fn fetch_fresh(&self, url: Url, cancel: &CancellationToken) -> Result<ApiResponse> {
        loop {
            let slot = self.gate.acquire(cancel).await?;
            self.retry.wait_if_needed(cancel).await?;
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            if let Some(limiter) = &self.rate_limiter {
                limiter.wait().await;
            }

            let response = self.send(&url, cancel).await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let delay = retry_after(&response).unwrap_or(self.default_retry_after);
                warn!(%url, delay_secs = delay.as_secs(), "rate limited (429), backing off");
                self.retry.record_backoff(delay);
                // Free the slot before waiting out the backoff, then retry.
                drop(slot);
                continue;
            }

            if status == StatusCode::UNAUTHORIZED {
                return Err(Error::Unauthorized);
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::HttpStatus {
                    status: status.as_u16(),
                    body,
                });
            }

            let body = response.text().await?;
            drop(slot);
            debug!(%url, status = status.as_u16(), "request succeeded");
            return Ok(ApiResponse {
                status: status.as_u16(),
                body,
            });
        }
    }

    /// Send one request, racing it against cancellation
    async fn send(&self, url: &Url, cancel: &CancellationToken) -> Result<Response> {
        let request = self
            .client
            .get(url.clone())
            .basic_auth(&self.credentials.api_key, Some(&self.credentials.api_secret));

        tokio::select! {
            () = cancel.cancelled() => Err(Error::Cancelled),
            response = request.send() => Ok(response?),
        }
    }

    /// Resolve a path (or full URL) against the base URL
    fn resolve_url(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }
        Ok(self.base_url.join(path)?)
    }

    /// Number of cached responses
    pub fn cached_responses(&self) -> usize {
        self.cache.len()
    }
}

impl std::fmt::Debug for HttpRequestHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRequestHandler")
            .field("base_url", &self.base_url.as_str())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Extract the Retry-After header, interpreted as whole seconds
fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
