//! Fivetran response envelopes
//!
//! Paginated resources arrive as
//! `{"data": {"items": [...], "next_cursor": <string|null>}}`;
//! single resources as `{"data": {...}}`. Fields are snake_case on the
//! wire, matching the field names here.

use serde::Deserialize;

/// Envelope around a paginated resource
#[derive(Debug, Deserialize)]
pub struct PaginatedRoot<T> {
    pub data: Option<Page<T>>,
}

/// One page of items plus the cursor for the next page
///
/// The explicit bound keeps the payload type free of a `Default`
/// requirement that the defaulted `items` field would otherwise infer.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

/// Envelope around a single-value resource
#[derive(Debug, Deserialize)]
pub struct SingleRoot<T> {
    pub data: Option<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginated_envelope() {
        let root: PaginatedRoot<String> = serde_json::from_str(
            r#"{"data": {"items": ["a", "b"], "next_cursor": "abc"}}"#,
        )
        .unwrap();
        let page = root.data.unwrap();
        assert_eq!(page.items, vec!["a", "b"]);
        assert_eq!(page.next_cursor.as_deref(), Some("abc"));
    }

    #[test]
    fn test_paginated_envelope_null_cursor() {
        let root: PaginatedRoot<String> =
            serde_json::from_str(r#"{"data": {"items": [], "next_cursor": null}}"#).unwrap();
        let page = root.data.unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn test_paginated_envelope_missing_data() {
        let root: PaginatedRoot<String> = serde_json::from_str("{}").unwrap();
        assert!(root.data.is_none());
    }

    #[test]
    fn test_page_missing_items_defaults_to_empty() {
        let root: PaginatedRoot<String> =
            serde_json::from_str(r#"{"data": {"next_cursor": null}}"#).unwrap();
        assert!(root.data.unwrap().items.is_empty());
    }

    #[test]
    fn test_envelopes_accept_payloads_without_default() {
        #[derive(Debug, Deserialize, PartialEq, Eq)]
        #[serde(rename_all = "snake_case")]
        enum Status {
            Active,
            Paused,
        }

        let root: PaginatedRoot<Status> = serde_json::from_str(
            r#"{"data": {"items": ["active", "paused"], "next_cursor": null}}"#,
        )
        .unwrap();
        assert_eq!(root.data.unwrap().items, vec![Status::Active, Status::Paused]);

        let single: SingleRoot<Status> = serde_json::from_str(r#"{"data": "paused"}"#).unwrap();
        assert_eq!(single.data, Some(Status::Paused));
    }

    #[test]
    fn test_single_envelope() {
        let root: SingleRoot<serde_json::Value> =
            serde_json::from_str(r#"{"data": {"id": "x"}}"#).unwrap();
        assert_eq!(root.data.unwrap()["id"], "x");
    }
}
