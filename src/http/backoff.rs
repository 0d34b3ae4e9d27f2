//! Shared backoff deadline for server-driven rate limiting
//!
//! When the server answers 429 it names a point in time before which no
//! new request should be issued. Every request routed through one handler
//! shares that deadline. Updates only move the deadline forward, and the
//! sleep happens outside the lock so unrelated requests are not serialized
//! by the critical section.

use crate::error::{Error, Result};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Shared "not-before" deadline updated from Retry-After responses
#[derive(Debug)]
pub struct RetryCoordinator {
    deadline: Mutex<Option<Instant>>,
}

impl RetryCoordinator {
    /// Create a coordinator with no deadline set
    pub fn new() -> Self {
        Self {
            deadline: Mutex::new(None),
        }
    }

    /// Push the shared deadline to `max(current, now + delay)`
    pub fn record_backoff(&self, delay: Duration) {
        let candidate = Instant::now() + delay;
        let mut deadline = self.deadline.lock().expect("deadline lock poisoned");
        match *deadline {
            Some(current) if current >= candidate => {}
            _ => *deadline = Some(candidate),
        }
    }

    /// Sleep until the shared deadline has passed, if one is pending
    pub async fn wait_if_needed(&self, cancel: &CancellationToken) -> Result<()> {
        let remaining = {
            let deadline = self.deadline.lock().expect("deadline lock poisoned");
            deadline.map(|d| d.saturating_duration_since(Instant::now()))
        };

        match remaining {
            Some(remaining) if !remaining.is_zero() => {
                tokio::select! {
                    () = cancel.cancelled() => Err(Error::Cancelled),
                    () = tokio::time::sleep(remaining) => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }

    /// Time left until the deadline, if any
    pub fn remaining(&self) -> Option<Duration> {
        let deadline = self.deadline.lock().expect("deadline lock poisoned");
        deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
            .filter(|d| !d.is_zero())
    }
}

impl Default for RetryCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
