//! Error types for the Fivetran lineage importer
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! The HTTP layer distinguishes fatal conditions (401, cancellation) from
//! failures that callers may isolate per item (any other non-2xx status).

use thiserror::Error;

/// The main error type for this crate
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing credential: {name} (set the {env} environment variable or pass a flag)")]
    MissingCredential { name: String, env: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("401 Unauthorized - check your API key and permissions")]
    Unauthorized,

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Data Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Workflow Errors
    // ============================================================================
    #[error("No groups found in Fivetran account")]
    NoGroups,

    #[error("No connectors found in group '{group_id}'")]
    NoConnectors { group_id: String },

    #[error("Invalid selection: {message}")]
    InvalidSelection { message: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create an invalid selection error
    pub fn invalid_selection(message: impl Into<String>) -> Self {
        Self::InvalidSelection {
            message: message.into(),
        }
    }

    /// Fatal errors terminate the whole session instead of being
    /// recorded per item by the fan-out layer.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Unauthorized | Error::Cancelled)
    }
}

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;
