//! TTL response cache
//!
//! Keyed by resolved request URL. An entry is valid iff
//! `now < stored_at + ttl`; expired entries are simply overwritten by the
//! next successful fetch, there is no background eviction. Two concurrent
//! misses for the same key may both hit the network; the second insert
//! wins. That duplicate work is accepted rather than coordinated away.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: Arc<V>,
    stored_at: Instant,
}

/// Time-to-live cache mapping request URLs to response snapshots
#[derive(Debug)]
pub struct ResponseCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
}

impl<V> ResponseCache<V> {
    /// Create a cache where entries stay valid for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Look up an unexpired entry
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        let entries = self.entries.read().expect("cache lock poisoned");
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() < self.ttl {
            Some(Arc::clone(&entry.value))
        } else {
            None
        }
    }

    /// Store a value with a fresh timestamp, returning the shared handle
    pub fn insert(&self, key: impl Into<String>, value: V) -> Arc<V> {
        let value = Arc::new(value);
        let mut entries = self.entries.write().expect("cache lock poisoned");
        entries.insert(
            key.into(),
            CacheEntry {
                value: Arc::clone(&value),
                stored_at: Instant::now(),
            },
        );
        value
    }

    /// Return the cached value or run `compute` and store its result
    ///
    /// The lock is never held across `compute`, so concurrent misses for
    /// the same key may each invoke it.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        key: &str,
        compute: F,
    ) -> std::result::Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<V, E>>,
    {
        if let Some(hit) = self.get(key) {
            return Ok(hit);
        }
        let value = compute().await?;
        Ok(self.insert(key, value))
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.read().expect("cache lock poisoned").len()
    }

    /// True when no entries are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
