//! Single-shot fetcher
//!
//! One GET, one `{"data": ...}` envelope. A missing or malformed payload
//! is reported as absence rather than a hard failure; transport and
//! status errors still propagate from the handler.

use super::envelope::SingleRoot;
use crate::error::Result;
use crate::http::HttpRequestHandler;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Fetches a single-value endpoint
#[derive(Debug, Clone)]
pub struct NonPaginatedFetcher {
    handler: Arc<HttpRequestHandler>,
}

impl NonPaginatedFetcher {
    /// Create a fetcher over the given handler
    pub fn new(handler: Arc<HttpRequestHandler>) -> Self {
        Self { handler }
    }

    /// Fetch `endpoint` and unwrap its envelope
    pub async fn fetch<T>(&self, endpoint: &str, cancel: &CancellationToken) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let response = self.handler.get(endpoint, cancel).await?;
        let root: SingleRoot<T> = match serde_json::from_str(&response.body) {
            Ok(root) => root,
            Err(error) => {
                debug!(endpoint, %error, "payload did not match the expected shape");
                return Ok(None);
            }
        };
        Ok(root.data)
    }
}
