//! Priority Expiry Cache - A bounded in-memory cache
//!
//! Reclaims expired entries first, then the least recently used entry of
//! the lowest priority.

pub mod cache;
pub mod config;
pub mod error;
pub mod harness;

pub use cache::{Clock, ManualClock, MonotonicClock, PriorityExpiryCache};
pub use config::Config;
pub use error::{CacheError, HarnessError};
