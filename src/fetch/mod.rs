//! Typed fetch abstractions over the request handler
//!
//! Two shapes of read:
//! - `paginated` - walks cursor-linked pages lazily, yielding items in
//!   server order
//! - `single` - one GET that unwraps a single-value envelope
//!
//! Both deserialize the Fivetran response envelopes defined in `envelope`.

mod envelope;
mod paginated;
mod single;

pub use envelope::{Page, PaginatedRoot, SingleRoot};
pub use paginated::PaginatedFetcher;
pub use single::NonPaginatedFetcher;
