//! # Fivetran Lineage Importer
//!
//! Resilient, paginated access to the rate-limited Fivetran REST API,
//! plus a lineage-mapping import workflow built on top of it.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    cli / lineage import                     │
//! │   groups → connectors → per-connector schema metadata       │
//! └───────────────┬───────────────────────────┬────────────────┘
//!                 │                           │
//!         PaginatedFetcher            FanOutOrchestrator
//!         (cursor pages)              (bounded parallel
//!                 │                    schema fetches)
//!                 │                           │
//!                 └─────────┬─────────────────┘
//!                           ▼
//!                  HttpRequestHandler
//!         ┌──────────┬───────────────┬──────────────┐
//!         │ Request  │ Retry         │ Response     │
//!         │ Gate     │ Coordinator   │ Cache (TTL)  │
//!         │ (slots)  │ (429 backoff) │              │
//!         └──────────┴───────────────┴──────────────┘
//! ```
//!
//! The HTTP layer bounds in-flight concurrency, honors server Retry-After
//! hints through a shared backoff deadline, and caches successful
//! responses by URL. The fan-out layer runs one schema fetch per
//! connector under its own permit pool and aggregates partial failures
//! without aborting the run.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Client configuration and credentials
pub mod config;

/// Resource models for groups, connectors, and schemas
pub mod models;

/// Rate-limit aware HTTP access layer
pub mod http;

/// Paginated and single-shot fetch abstractions
pub mod fetch;

/// Bounded-concurrency fan-out orchestration
pub mod fanout;

/// Fivetran REST API client
pub mod client;

/// Lineage mapping import workflow
pub mod lineage;

/// Console abstraction for the interactive flow
pub mod console;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::ApiClient;
pub use config::{ClientConfig, Credentials};
pub use error::{Error, Result};
pub use fanout::{FanOutOrchestrator, FanOutReport, FetchOutcome};
pub use lineage::{collect_lineage, LineageMappings};
pub use models::{Connector, ConnectorSchemas, Group};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
