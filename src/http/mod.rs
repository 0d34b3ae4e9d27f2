//! Resilient HTTP access layer
//!
//! Composes four pieces around a single authenticated GET primitive:
//! - `gate` - bounds concurrent in-flight requests
//! - `backoff` - shared not-before deadline driven by 429 responses
//! - `cache` - TTL cache of successful responses, keyed by URL
//! - `rate_limit` - optional proactive client-side pacing
//!
//! `handler::HttpRequestHandler` is the only type that touches the network.

mod backoff;
mod cache;
mod gate;
mod handler;
mod rate_limit;

pub use backoff::RetryCoordinator;
pub use cache::ResponseCache;
pub use gate::{RequestGate, RequestSlot};
pub use handler::{ApiResponse, HttpRequestHandler};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
