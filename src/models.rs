//! Fivetran REST API resource models
//!
//! Typed shapes for the hierarchical resources this crate enumerates:
//! groups, the connectors inside a group, and per-connector schema
//! metadata. Wire fields are snake_case.
//!
//! Schema and table maps use `BTreeMap` so rendered output is
//! deterministic regardless of server-side map ordering.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Groups
// ============================================================================

/// A Fivetran group (the "database" equivalent in Fivetran terminology)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

// ============================================================================
// Connectors
// ============================================================================

/// A connector belonging to a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connector {
    pub id: String,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub paused: Option<bool>,
}

// ============================================================================
// Schema metadata
// ============================================================================

/// Schema metadata for a single connector
///
/// Maps source schema names to their destination layout. Individual
/// schema values may be null in the API response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorSchemas {
    #[serde(default)]
    pub schemas: BTreeMap<String, Option<SchemaMetadata>>,
}

/// A single source schema and where it lands in the destination
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMetadata {
    #[serde(default)]
    pub name_in_destination: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub tables: BTreeMap<String, TableMetadata>,
}

/// A single source table and its destination name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    #[serde(default)]
    pub name_in_destination: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
}
