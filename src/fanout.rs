//! Bounded-concurrency fan-out over a stream of parent items
//!
//! Launches one downstream fetch per parent item, capped by a permit pool
//! that is independent of the HTTP layer's concurrency gate (one budget
//! for raw wire concurrency, one for logical fan-out width). Every task
//! is joined before the orchestrator returns, and every parent item
//! contributes exactly one report entry: a value, an absence, or the
//! captured failure. A failing item never cancels its siblings; only
//! authentication failures and cancellation abort the whole run.

use crate::error::{Error, Result};
use futures::stream::{Stream, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Default number of parallel downstream fetches
pub const DEFAULT_FAN_OUT_WIDTH: usize = 5;

/// Items that can key a fan-out entry
pub trait ParentItem {
    /// Identifier tying a report entry back to its parent
    fn parent_id(&self) -> &str;
}

/// Outcome of one downstream fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    /// The downstream resource was found
    Value(T),
    /// The downstream resource had no data
    Absent,
    /// The fetch failed; the failure stays isolated to this item
    Failed { message: String },
}

/// One report entry per parent item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanOutEntry<T> {
    pub parent_id: String,
    pub outcome: FetchOutcome<T>,
}

/// Aggregated result of a fan-out run
///
/// Entry order is completion order, not input order.
#[derive(Debug, Default)]
pub struct FanOutReport<T> {
    pub entries: Vec<FanOutEntry<T>>,
}

impl<T> FanOutReport<T> {
    /// Total number of entries (one per parent item)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no parent items were seen
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that resolved to a value
    pub fn successes(&self) -> impl Iterator<Item = &FanOutEntry<T>> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, FetchOutcome::Value(_)))
    }

    /// Entries that captured a failure
    pub fn failures(&self) -> impl Iterator<Item = &FanOutEntry<T>> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, FetchOutcome::Failed { .. }))
    }
}

/// Runs bounded fan-out fetches and aggregates their outcomes
#[derive(Debug, Clone)]
pub struct FanOutOrchestrator {
    width: usize,
}

impl FanOutOrchestrator {
    /// Create an orchestrator with the given parallelism (minimum 1)
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
        }
    }

    /// Fetch a downstream resource for every item of `parents`
    ///
    /// Tasks start as soon as parent items arrive; the permit pool bounds
    /// how many fetches run at once. The call returns only after every
    /// spawned task has been joined.
    pub async fn run<P, T, F, Fut>(
        &self,
        parents: impl Stream<Item = Result<P>>,
        cancel: &CancellationToken,
        fetch: F,
    ) -> Result<FanOutReport<T>>
    where
        P: ParentItem + Send + 'static,
        T: Send + 'static,
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<T>>> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.width));
        let fetch = Arc::new(fetch);
        let mut tasks: JoinSet<Result<FanOutEntry<T>>> = JoinSet::new();

        futures::pin_mut!(parents);
        while let Some(parent) = parents.next().await {
            // A failure in the parent stream itself aborts the run.
            let parent = match parent {
                Ok(parent) => parent,
                Err(error) => {
                    tasks.abort_all();
                    return Err(error);
                }
            };

            let parent_id = parent.parent_id().to_string();
            let semaphore = Arc::clone(&semaphore);
            let fetch = Arc::clone(&fetch);
            let cancel = cancel.clone();
            tasks.spawn(async move {
                // The permit wait is a suspension point; it must observe
                // cancellation even while siblings hold every permit.
                let _permit = tokio::select! {
                    () = cancel.cancelled() => return Err(Error::Cancelled),
                    permit = semaphore.acquire_owned() => {
                        permit.map_err(|_| Error::Cancelled)?
                    }
                };
                if cancel.is_cancelled() {
                    return Err(Error::Cancelled);
                }

                match fetch(parent).await {
                    Ok(Some(value)) => Ok(FanOutEntry {
                        parent_id,
                        outcome: FetchOutcome::Value(value),
                    }),
                    Ok(None) => Ok(FanOutEntry {
                        parent_id,
                        outcome: FetchOutcome::Absent,
                    }),
                    Err(error) if error.is_fatal() => Err(error),
                    Err(error) => {
                        warn!(parent_id, %error, "downstream fetch failed");
                        Ok(FanOutEntry {
                            parent_id,
                            outcome: FetchOutcome::Failed {
                                message: error.to_string(),
                            },
                        })
                    }
                }
            });
        }

        debug!(tasks = tasks.len(), "joining fan-out tasks");
        let mut entries = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(entry)) => entries.push(entry),
                Ok(Err(fatal)) => {
                    tasks.abort_all();
                    return Err(fatal);
                }
                Err(join_error) => {
                    tasks.abort_all();
                    return Err(Error::Other(format!(
                        "fan-out task failed to complete: {join_error}"
                    )));
                }
            }
        }

        Ok(FanOutReport { entries })
    }
}

impl Default for FanOutOrchestrator {
    fn default() -> Self {
        Self::new(DEFAULT_FAN_OUT_WIDTH)
    }
}
