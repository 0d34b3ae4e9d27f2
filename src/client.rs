//! Fivetran REST API client
//!
//! The public surface over the HTTP layer: enumerate groups, the
//! connectors of a group, and per-connector schema metadata. All calls
//! share one handler instance, so the concurrency gate, backoff deadline,
//! and response cache apply across every operation of this client while
//! independent clients never interfere.

use crate::config::{ClientConfig, Credentials};
use crate::error::Result;
use crate::fetch::{NonPaginatedFetcher, PaginatedFetcher};
use crate::http::HttpRequestHandler;
use crate::models::{Connector, ConnectorSchemas, Group};
use futures::stream::Stream;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Client for the Fivetran REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    paginated: PaginatedFetcher,
    single: NonPaginatedFetcher,
    fan_out_width: usize,
}

impl ApiClient {
    /// Create a client from a config and credentials
    pub fn new(config: &ClientConfig, credentials: Credentials) -> Result<Self> {
        let handler = Arc::new(HttpRequestHandler::new(config, credentials)?);
        Ok(Self {
            paginated: PaginatedFetcher::new(Arc::clone(&handler)),
            single: NonPaginatedFetcher::new(handler),
            fan_out_width: config.fan_out_width,
        })
    }

    /// Stream every group in the account
    pub fn groups(
        &self,
        cancel: &CancellationToken,
    ) -> impl Stream<Item = Result<Group>> + Send + 'static {
        self.paginated.fetch_items("groups", cancel)
    }

    /// Stream every connector in a group
    pub fn connectors(
        &self,
        group_id: &str,
        cancel: &CancellationToken,
    ) -> impl Stream<Item = Result<Connector>> + Send + 'static {
        let endpoint = format!("groups/{}/connectors", urlencoding::encode(group_id));
        self.paginated.fetch_items(&endpoint, cancel)
    }

    /// Fetch schema metadata for a connector
    ///
    /// Returns `None` when the connector has no schema payload.
    pub async fn connector_schemas(
        &self,
        connector_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<ConnectorSchemas>> {
        let endpoint = format!("connectors/{}/schemas", urlencoding::encode(connector_id));
        self.single.fetch(&endpoint, cancel).await
    }

    /// Configured fan-out width for downstream fetches
    pub fn fan_out_width(&self) -> usize {
        self.fan_out_width
    }
}
