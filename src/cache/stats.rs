//! Cache Statistics Module
//!
//! Tracks lookups and evictions split by the reason the victim was chosen.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of lookups that returned a value
    pub hits: u64,
    /// Number of lookups for keys not resident
    pub misses: u64,
    /// Number of lookups hidden because the entry had expired
    pub expired_misses: u64,
    /// Entries reclaimed because their expiry had elapsed
    pub expired_evictions: u64,
    /// Entries reclaimed as least recently used of the lowest priority
    pub priority_evictions: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Expired misses count as misses. Returns 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses + self.expired_misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total evictions for either reason.
    pub fn evictions(&self) -> u64 {
        self.expired_evictions + self.priority_evictions
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expired_miss(&mut self) {
        self.expired_misses += 1;
    }

    pub fn record_expired_eviction(&mut self) {
        self.expired_evictions += 1;
    }

    pub fn record_priority_eviction(&mut self) {
        self.priority_evictions += 1;
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
