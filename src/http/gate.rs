//! Concurrency gate for in-flight requests
//!
//! Bounds how many requests may be on the wire at once. The pool size is
//! fixed at construction; 0 disables gating and every acquire succeeds
//! immediately. Permits are RAII: dropping one returns the slot, which
//! also covers the cancelled path.

use crate::error::{Error, Result};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

/// Fixed-size pool of request slots
#[derive(Debug, Clone)]
pub struct RequestGate {
    semaphore: Option<Arc<Semaphore>>,
}

/// A held request slot; dropping it releases the slot
#[derive(Debug)]
pub struct RequestSlot {
    _permit: Option<OwnedSemaphorePermit>,
}

impl RequestGate {
    /// Create a gate with the given capacity (0 = unbounded)
    pub fn new(max_concurrent: u16) -> Self {
        let semaphore = if max_concurrent == 0 {
            None
        } else {
            Some(Arc::new(Semaphore::new(usize::from(max_concurrent))))
        };
        Self { semaphore }
    }

    /// Wait until a slot is available
    ///
    /// Returns [`Error::Cancelled`] without consuming a slot if the token
    /// fires while waiting.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<RequestSlot> {
        let Some(semaphore) = &self.semaphore else {
            return Ok(RequestSlot { _permit: None });
        };

        tokio::select! {
            () = cancel.cancelled() => Err(Error::Cancelled),
            permit = Arc::clone(semaphore).acquire_owned() => {
                let permit = permit.map_err(|_| Error::Cancelled)?;
                Ok(RequestSlot { _permit: Some(permit) })
            }
        }
    }

    /// Number of currently free slots, if bounded
    pub fn available(&self) -> Option<usize> {
        self.semaphore.as_ref().map(|s| s.available_permits())
    }
}
