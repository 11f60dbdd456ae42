//! Cache Module
//!
//! Provides an in-memory cache that reclaims expired entries first and the
//! least recently used entry of the lowest priority next.

mod clock;
mod entry;
mod heap;
mod recency;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use entry::CacheEntry;
pub use heap::LazyMinHeap;
pub use recency::RecencyList;
pub use stats::CacheStats;
pub use store::{EvictionReason, PriorityExpiryCache};
