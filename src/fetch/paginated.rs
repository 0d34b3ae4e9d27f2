//! Cursor-based paginated fetcher
//!
//! Walks a cursor-linked sequence of pages and yields every item in
//! server order as a lazy stream. Each page is fetched only when the
//! consumer polls past the previous one, so early termination skips the
//! remaining pages. Re-invoking the operation starts over from the first
//! page; the stream is not restartable.

use super::envelope::PaginatedRoot;
use crate::error::{Error, Result};
use crate::http::HttpRequestHandler;
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

enum PageCursor {
    First,
    Next(String),
    Done,
}

/// Streams the items of a paginated endpoint
#[derive(Debug, Clone)]
pub struct PaginatedFetcher {
    handler: Arc<HttpRequestHandler>,
}

impl PaginatedFetcher {
    /// Create a fetcher over the given handler
    pub fn new(handler: Arc<HttpRequestHandler>) -> Self {
        Self { handler }
    }

    /// Lazily fetch every item of `endpoint`, page by page
    ///
    /// Terminates after the page whose `next_cursor` is absent or null.
    pub fn fetch_items<T>(
        &self,
        endpoint: &str,
        cancel: &CancellationToken,
    ) -> impl Stream<Item = Result<T>> + Send + 'static
    where
        T: DeserializeOwned + Send + 'static,
    {
        let handler = Arc::clone(&self.handler);
        let endpoint = endpoint.to_string();
        let cancel = cancel.clone();

        stream::try_unfold(PageCursor::First, move |state| {
            let handler = Arc::clone(&handler);
            let endpoint = endpoint.clone();
            let cancel = cancel.clone();
            async move {
                let cursor = match state {
                    PageCursor::First => None,
                    PageCursor::Next(cursor) => Some(cursor),
                    // The annotation anchors the unfold's error type.
                    PageCursor::Done => return Ok::<_, Error>(None),
                };

                let url = page_url(&endpoint, cursor.as_deref());
                let response = handler.get(&url, &cancel).await?;
                let root: PaginatedRoot<T> = response.json()?;

                let Some(page) = root.data else {
                    debug!(%url, "paginated envelope had no data, stopping");
                    return Ok(None);
                };

                let next = match page.next_cursor {
                    Some(cursor) if !cursor.is_empty() => PageCursor::Next(cursor),
                    _ => PageCursor::Done,
                };
                Ok(Some((page.items, next)))
            }
        })
        .map_ok(|items: Vec<T>| stream::iter(items.into_iter().map(Ok)))
        .try_flatten()
        .boxed()
    }
}

/// Append the cursor query parameter to an endpoint path
fn page_url(endpoint: &str, cursor: Option<&str>) -> String {
    match cursor {
        None => endpoint.to_string(),
        Some(cursor) => {
            let separator = if endpoint.contains('?') { '&' } else { '?' };
            format!("{endpoint}{separator}cursor={}", urlencoding::encode(cursor))
        }
    }
}

#[cfg(test)]
mod page_url_tests {
    use super::page_url;

    #[test]
    fn test_first_page_has_no_cursor() {
        assert_eq!(page_url("groups", None), "groups");
    }

    #[test]
    fn test_cursor_is_appended() {
        assert_eq!(page_url("groups", Some("abc")), "groups?cursor=abc");
    }

    #[test]
    fn test_cursor_is_percent_encoded() {
        assert_eq!(
            page_url("groups", Some("a/b=c")),
            "groups?cursor=a%2Fb%3Dc"
        );
    }

    #[test]
    fn test_existing_query_uses_ampersand() {
        assert_eq!(
            page_url("groups?limit=10", Some("abc")),
            "groups?limit=10&cursor=abc"
        );
    }
}
