//! Lineage mapping import
//!
//! For every connector in a group, fetch its schema metadata and render
//! one mapping line per table:
//!
//! ```text
//! <connector>: <schema>.<table> -> <schema_dest>.<table_dest>
//! ```
//!
//! Schema fetches fan out with bounded parallelism; a connector whose
//! fetch fails contributes an error line instead of aborting the run.
//! Lines within a connector are deterministic because the schema and
//! table maps are ordered.

use crate::client::ApiClient;
use crate::error::Result;
use crate::fanout::{FanOutOrchestrator, FetchOutcome, ParentItem};
use crate::models::{Connector, ConnectorSchemas};
use tokio_util::sync::CancellationToken;
use tracing::info;

impl ParentItem for Connector {
    fn parent_id(&self) -> &str {
        &self.id
    }
}

/// Aggregated lineage mappings for one group
#[derive(Debug, Default)]
pub struct LineageMappings {
    /// One line per source table, plus one error line per failed connector
    pub lines: Vec<String>,
    /// Number of connectors seen
    pub connector_count: usize,
    /// Number of connectors whose schema fetch failed
    pub failure_count: usize,
}

/// Render the mapping lines for one connector's schemas
pub fn render_mappings(connector_id: &str, schemas: &ConnectorSchemas) -> Vec<String> {
    let mut lines = Vec::new();
    for (schema_key, schema) in &schemas.schemas {
        let Some(schema) = schema else { continue };
        let schema_dest = schema.name_in_destination.as_deref().unwrap_or(schema_key);
        for (table_key, table) in &schema.tables {
            let table_dest = table.name_in_destination.as_deref().unwrap_or(table_key);
            lines.push(format!(
                "{connector_id}: {schema_key}.{table_key} -> {schema_dest}.{table_dest}"
            ));
        }
    }
    lines
}

/// Collect lineage mappings for every connector in `group_id`
pub async fn collect_lineage(
    client: &ApiClient,
    group_id: &str,
    cancel: &CancellationToken,
) -> Result<LineageMappings> {
    info!(group_id, "collecting lineage mappings");

    let connectors = client.connectors(group_id, cancel);
    let orchestrator = FanOutOrchestrator::new(client.fan_out_width());

    let fetch_client = client.clone();
    let fetch_cancel = cancel.clone();
    let report = orchestrator
        .run(connectors, cancel, move |connector: Connector| {
            let client = fetch_client.clone();
            let cancel = fetch_cancel.clone();
            async move {
                let schemas = client.connector_schemas(&connector.id, &cancel).await?;
                Ok(schemas.map(|schemas| render_mappings(&connector.id, &schemas)))
            }
        })
        .await?;

    let mut mappings = LineageMappings {
        connector_count: report.len(),
        ..LineageMappings::default()
    };
    for entry in report.entries {
        match entry.outcome {
            FetchOutcome::Value(lines) => mappings.lines.extend(lines),
            FetchOutcome::Absent => {}
            FetchOutcome::Failed { message } => {
                mappings.failure_count += 1;
                mappings
                    .lines
                    .push(format!("{}: error fetching schemas - {message}", entry.parent_id));
            }
        }
    }
    // Completion order varies across runs; sort for stable output.
    mappings.lines.sort();

    info!(
        connectors = mappings.connector_count,
        lines = mappings.lines.len(),
        failures = mappings.failure_count,
        "lineage collection finished"
    );
    Ok(mappings)
}
