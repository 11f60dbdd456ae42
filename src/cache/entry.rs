//! Cache Entry Module
//!
//! Defines the record stored for every resident key.

use std::time::Duration;

// == Cache Entry ==
/// Value plus the two attributes that drive eviction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<V, P> {
    /// The stored value
    pub value: V,
    /// Lower priorities are evicted first when nothing has expired
    pub priority: P,
    /// Expiry, measured from cache construction
    pub expiry: Duration,
}

impl<V, P> CacheEntry<V, P> {
    // == Constructor ==
    /// Creates a new cache entry.
    pub fn new(value: V, priority: P, expiry: Duration) -> Self {
        Self {
            value,
            priority,
            expiry,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at the given elapsed time.
    ///
    /// Boundary condition: an entry whose expiry equals `elapsed` is still
    /// live. It expires only once elapsed time is strictly greater.
    pub fn is_expired(&self, elapsed: Duration) -> bool {
        self.expiry < elapsed
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("value", 5, Duration::from_secs(100));

        assert_eq!(entry.value, "value");
        assert_eq!(entry.priority, 5);
        assert_eq!(entry.expiry, Duration::from_secs(100));
    }

    #[test]
    fn test_entry_not_expired_before_deadline() {
        let entry = CacheEntry::new(1, 5, Duration::from_secs(10));
        assert!(!entry.is_expired(Duration::from_secs(3)));
    }

    #[test]
    fn test_entry_expired_after_deadline() {
        let entry = CacheEntry::new(1, 5, Duration::from_secs(3));
        assert!(entry.is_expired(Duration::from_secs(5)));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new(1, 5, Duration::from_secs(3));
        assert!(
            !entry.is_expired(Duration::from_secs(3)),
            "Entry should still be live exactly at its expiry"
        );
    }
}
