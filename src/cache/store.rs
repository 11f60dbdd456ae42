//! Cache Store Module
//!
//! Main cache engine combining the record table with priority and expiry
//! indices and their lazily cleaned min-heaps.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::cache::{CacheEntry, CacheStats, Clock, LazyMinHeap, MonotonicClock, RecencyList};
use crate::error::{CacheError, Result};

// == Eviction Reason ==
/// Why a victim was chosen by the eviction policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
    /// It held the smallest expiry and that expiry had elapsed
    Expired,
    /// Nothing had expired; it was the LRU key of the lowest priority
    Priority,
}

// == Priority Expiry Cache ==
/// Bounded cache that evicts expired entries first, then the least recently
/// used entry of the lowest priority.
///
/// Not thread-safe: a single owner drives every operation to completion.
#[derive(Debug)]
pub struct PriorityExpiryCache<K, V, P, C = MonotonicClock> {
    /// Record table, the source of truth for each key's attributes
    entries: HashMap<K, CacheEntry<V, P>>,
    /// Keys per priority, oldest touch first
    priority_index: HashMap<P, RecencyList<K>>,
    /// Keys per expiry, unordered
    expiry_index: HashMap<Duration, HashSet<K>>,
    priority_heap: LazyMinHeap<P>,
    expiry_heap: LazyMinHeap<Duration>,
    stats: CacheStats,
    max_items: usize,
    disable_expired_keys: bool,
    clock: C,
}

impl<K, V, P> PriorityExpiryCache<K, V, P, MonotonicClock>
where
    K: Eq + Hash + Clone,
    P: Ord + Hash + Clone,
{
    // == Constructor ==
    /// Creates a cache whose elapsed time starts now.
    ///
    /// # Errors
    /// `CacheError::InvalidCapacity` if `max_items` is zero.
    pub fn new(max_items: usize, disable_expired_keys: bool) -> Result<Self> {
        Self::with_clock(max_items, disable_expired_keys, MonotonicClock::new())
    }
}

impl<K, V, P, C> PriorityExpiryCache<K, V, P, C>
where
    K: Eq + Hash + Clone,
    P: Ord + Hash + Clone,
    C: Clock,
{
    /// Creates a cache measuring expiry against `clock`.
    ///
    /// # Errors
    /// `CacheError::InvalidCapacity` if `max_items` is zero.
    pub fn with_clock(max_items: usize, disable_expired_keys: bool, clock: C) -> Result<Self> {
        if max_items == 0 {
            return Err(CacheError::InvalidCapacity(max_items));
        }

        Ok(Self {
            entries: HashMap::new(),
            priority_index: HashMap::new(),
            expiry_index: HashMap::new(),
            priority_heap: LazyMinHeap::new(),
            expiry_heap: LazyMinHeap::new(),
            stats: CacheStats::new(),
            max_items,
            disable_expired_keys,
            clock,
        })
    }

    // == Get ==
    /// Retrieves a value by key, marking it most recently used in its
    /// priority tier.
    ///
    /// The touch happens even when the entry has expired. An expired entry
    /// is hidden only if the cache was built with `disable_expired_keys`;
    /// it stays resident either way until eviction reclaims it.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if let Some(bucket) = self.priority_index.get_mut(&entry.priority) {
            bucket.touch(key);
        }

        if self.disable_expired_keys && entry.is_expired(self.clock.elapsed()) {
            self.stats.record_expired_miss();
            return None;
        }

        self.stats.record_hit();
        Some(&entry.value)
    }

    // == Set ==
    /// Stores a value with its priority and expiry.
    ///
    /// Updating a resident key moves it between buckets and leaves the
    /// element count alone. Inserting a new key into a full cache evicts
    /// exactly one entry first.
    ///
    /// Returns `false` if a new key was refused because capacity is zero.
    pub fn set(&mut self, key: K, value: V, priority: P, expiry: Duration) -> bool {
        if let Some(entry) = self.entries.get_mut(&key) {
            let old_priority = std::mem::replace(&mut entry.priority, priority.clone());
            let old_expiry = std::mem::replace(&mut entry.expiry, expiry);
            entry.value = value;

            // Emptied buckets stay behind; eviction drains them
            if let Some(bucket) = self.priority_index.get_mut(&old_priority) {
                bucket.remove(&key);
            }
            if let Some(bucket) = self.expiry_index.get_mut(&old_expiry) {
                bucket.remove(&key);
            }

            self.index_key(key, priority, expiry);
            return true;
        }

        if self.entries.len() >= self.max_items {
            self.evict_one();
        }

        // Only reachable once capacity has been lowered to zero
        if self.entries.len() >= self.max_items {
            warn!(
                "Insert refused: cache capacity is {}, {} entries resident",
                self.max_items,
                self.entries.len()
            );
            return false;
        }

        self.entries
            .insert(key.clone(), CacheEntry::new(value, priority.clone(), expiry));
        self.index_key(key, priority, expiry);
        self.stats.set_total_entries(self.entries.len());
        true
    }

    // == Set Max Items ==
    /// Changes capacity, evicting one entry at a time until the cache fits.
    ///
    /// Returns the number of entries evicted.
    pub fn set_max_items(&mut self, max_items: usize) -> usize {
        debug!(from = self.max_items, to = max_items, "Changing cache capacity");
        self.max_items = max_items;

        let mut evicted = 0;
        while self.entries.len() > self.max_items {
            if self.evict_one().is_none() {
                break;
            }
            evicted += 1;
        }
        evicted
    }

    // == Keys ==
    /// Iterates every resident key in no particular order, expired or not.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.keys()
    }

    /// Checks residency without touching recency.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Returns the current number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn disable_expired_keys(&self) -> bool {
        self.disable_expired_keys
    }

    /// Time elapsed since the cache was built.
    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn index_key(&mut self, key: K, priority: P, expiry: Duration) {
        self.priority_index
            .entry(priority.clone())
            .or_default()
            .push_back(key.clone());
        self.priority_heap.push(priority);

        self.expiry_index.entry(expiry).or_default().insert(key);
        self.expiry_heap.push(expiry);
    }

    /// Pops heap heads whose bucket has emptied and drops those buckets.
    fn drain_stale_heads(&mut self) {
        let expiry_index = &self.expiry_index;
        let stale_expiries = self
            .expiry_heap
            .drain_stale(|expiry| expiry_index.get(expiry).is_some_and(|b| !b.is_empty()));
        for expiry in &stale_expiries {
            self.expiry_index.remove(expiry);
        }

        let priority_index = &self.priority_index;
        let stale_priorities = self
            .priority_heap
            .drain_stale(|priority| priority_index.get(priority).is_some_and(|b| !b.is_empty()));
        for priority in &stale_priorities {
            self.priority_index.remove(priority);
        }

        if !stale_expiries.is_empty() || !stale_priorities.is_empty() {
            trace!(
                expiries = stale_expiries.len(),
                priorities = stale_priorities.len(),
                "Dropped stale heap heads"
            );
        }
    }

    // == Evict One ==
    /// Removes exactly one entry, or nothing if the cache is empty.
    ///
    /// The smallest live expiry wins if it has elapsed; any key sharing it
    /// may be chosen. Otherwise the front of the lowest priority bucket goes.
    /// Buckets emptied here are left for the next call to drain.
    fn evict_one(&mut self) -> Option<(K, EvictionReason)> {
        self.drain_stale_heads();

        if self.entries.is_empty() {
            info!("No elements present in the cache, nothing to evict");
            return None;
        }

        let elapsed = self.clock.elapsed();
        let (key, reason) = match self.expiry_heap.peek() {
            Some(min_expiry) if *min_expiry < elapsed => {
                let key = self
                    .expiry_index
                    .get(min_expiry)
                    .and_then(|bucket| bucket.iter().next())
                    .cloned()?;
                (key, EvictionReason::Expired)
            }
            _ => {
                let min_priority = self.priority_heap.peek()?;
                let key = self
                    .priority_index
                    .get(min_priority)
                    .and_then(RecencyList::front)
                    .cloned()?;
                (key, EvictionReason::Priority)
            }
        };

        let entry = self.entries.remove(&key)?;
        if let Some(bucket) = self.expiry_index.get_mut(&entry.expiry) {
            bucket.remove(&key);
        }
        if let Some(bucket) = self.priority_index.get_mut(&entry.priority) {
            bucket.remove(&key);
        }

        match reason {
            EvictionReason::Expired => self.stats.record_expired_eviction(),
            EvictionReason::Priority => self.stats.record_priority_eviction(),
        }
        self.stats.set_total_entries(self.entries.len());
        debug!(
            ?reason,
            expiry = ?entry.expiry,
            ?elapsed,
            remaining = self.entries.len(),
            "Evicted entry"
        );

        Some((key, reason))
    }

    /// Panics unless every index agrees with the record table.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        for (key, entry) in &self.entries {
            assert!(
                self.priority_index
                    .get(&entry.priority)
                    .is_some_and(|b| b.contains(key)),
                "key missing from its priority bucket"
            );
            assert!(
                self.expiry_index
                    .get(&entry.expiry)
                    .is_some_and(|b| b.contains(key)),
                "key missing from its expiry bucket"
            );
        }

        let priority_members: usize = self.priority_index.values().map(RecencyList::len).sum();
        let expiry_members: usize = self.expiry_index.values().map(HashSet::len).sum();
        assert_eq!(priority_members, self.entries.len(), "stray priority bucket member");
        assert_eq!(expiry_members, self.entries.len(), "stray expiry bucket member");

        for (priority, bucket) in &self.priority_index {
            if !bucket.is_empty() {
                assert!(self.priority_heap.is_present(priority), "live priority not in heap");
            }
        }
        for (expiry, bucket) in &self.expiry_index {
            if !bucket.is_empty() {
                assert!(self.expiry_heap.is_present(expiry), "live expiry not in heap");
            }
        }

        assert!(self.entries.len() <= self.max_items, "capacity exceeded");
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    type TestCache = PriorityExpiryCache<&'static str, i32, i32, ManualClock>;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn cache(max_items: usize) -> (TestCache, ManualClock) {
        let clock = ManualClock::new();
        let cache = PriorityExpiryCache::with_clock(max_items, false, clock.clone()).unwrap();
        (cache, clock)
    }

    fn sorted_keys(cache: &TestCache) -> Vec<&'static str> {
        let mut keys: Vec<_> = cache.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn test_new_rejects_zero_capacity() {
        let result: Result<PriorityExpiryCache<String, i32, i32>> =
            PriorityExpiryCache::new(0, false);
        assert_eq!(result.unwrap_err(), CacheError::InvalidCapacity(0));
    }

    #[test]
    fn test_new_with_monotonic_clock() {
        let cache: PriorityExpiryCache<String, i32, i32> =
            PriorityExpiryCache::new(3, true).unwrap();
        assert!(cache.is_empty());
        assert_eq!(cache.max_items(), 3);
        assert!(cache.disable_expired_keys());
    }

    #[test]
    fn test_set_and_get() {
        let (mut cache, _) = cache(5);

        cache.set("A", 1, 5, secs(100));

        assert_eq!(cache.get("A"), Some(&1));
        assert_eq!(cache.len(), 1);
        cache.assert_consistent();
    }

    #[test]
    fn test_get_nonexistent() {
        let (mut cache, _) = cache(5);
        assert_eq!(cache.get("missing"), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_update_preserves_count_and_never_evicts() {
        let (mut cache, _) = cache(2);
        cache.set("A", 1, 5, secs(100));
        cache.set("B", 2, 5, secs(100));

        cache.set("A", 10, 1, secs(7));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions(), 0);
        assert_eq!(cache.get("A"), Some(&10));
        assert_eq!(cache.get("B"), Some(&2));
        cache.assert_consistent();
    }

    #[test]
    fn test_update_moves_key_between_buckets() {
        let (mut cache, _) = cache(5);
        cache.set("A", 1, 5, secs(100));
        cache.set("A", 1, 9, secs(30));

        assert!(cache.priority_index[&5].is_empty());
        assert!(cache.expiry_index[&secs(100)].is_empty());
        assert!(cache.priority_index[&9].contains("A"));
        assert!(cache.expiry_index[&secs(30)].contains("A"));
        cache.assert_consistent();
    }

    #[test]
    fn test_lowest_priority_evicted_first() {
        let (mut cache, _) = cache(3);
        cache.set("high", 1, 10, secs(100));
        cache.set("low", 2, 1, secs(100));
        cache.set("mid", 3, 5, secs(100));

        cache.set("new", 4, 7, secs(100));

        assert_eq!(sorted_keys(&cache), vec!["high", "mid", "new"]);
        assert_eq!(cache.stats().priority_evictions, 1);
    }

    #[test]
    fn test_lru_within_priority() {
        let (mut cache, _) = cache(3);
        cache.set("A", 1, 5, secs(100));
        cache.set("B", 2, 5, secs(100));
        cache.set("C", 3, 5, secs(100));

        // A becomes most recent, B is now the oldest
        cache.get("A");
        cache.set("D", 4, 5, secs(100));

        assert_eq!(sorted_keys(&cache), vec!["A", "C", "D"]);

        // Updating C makes it recent, so A goes next
        cache.set("C", 30, 5, secs(100));
        cache.set("E", 5, 5, secs(100));
        assert_eq!(sorted_keys(&cache), vec!["C", "D", "E"]);
    }

    #[test]
    fn test_expired_entry_evicted_before_low_priority() {
        let (mut cache, clock) = cache(2);
        cache.set("precious", 1, 100, secs(3));
        cache.set("cheap", 2, 1, secs(100));

        clock.set(secs(5));
        cache.set("new", 3, 50, secs(100));

        assert_eq!(sorted_keys(&cache), vec!["cheap", "new"]);
        assert_eq!(cache.stats().expired_evictions, 1);
        cache.assert_consistent();
    }

    #[test]
    fn test_expiry_equal_to_elapsed_is_not_expired() {
        let (mut cache, clock) = cache(2);
        cache.set("edge", 1, 100, secs(5));
        cache.set("cheap", 2, 1, secs(100));

        clock.set(secs(5));
        cache.set("new", 3, 50, secs(100));

        assert_eq!(sorted_keys(&cache), vec!["edge", "new"]);
        assert_eq!(cache.stats().priority_evictions, 1);
    }

    #[test]
    fn test_expired_key_visible_without_flag() {
        let (mut cache, clock) = cache(5);
        cache.set("A", 1, 5, secs(3));
        clock.set(secs(10));

        assert_eq!(cache.get("A"), Some(&1));
    }

    #[test]
    fn test_disable_expired_keys_hides_but_keeps_entry() {
        let clock = ManualClock::new();
        let mut cache: TestCache = PriorityExpiryCache::with_clock(5, true, clock.clone()).unwrap();
        cache.set("A", 1, 5, secs(3));
        cache.set("B", 2, 5, secs(100));

        clock.set(secs(10));

        assert_eq!(cache.get("A"), None);
        assert!(cache.contains_key("A"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().expired_misses, 1);

        // The hidden read still counted as a touch
        let order: Vec<_> = cache.priority_index[&5].iter().copied().collect();
        assert_eq!(order, vec!["B", "A"]);
    }

    #[test]
    fn test_set_max_items_shrinks_one_at_a_time() {
        let (mut cache, _) = cache(5);
        for (key, priority) in [("A", 3), ("B", 1), ("C", 2), ("D", 5), ("E", 4)] {
            cache.set(key, 0, priority, secs(100));
        }

        assert_eq!(cache.set_max_items(3), 2);
        assert_eq!(sorted_keys(&cache), vec!["A", "D", "E"]);
        cache.assert_consistent();
    }

    #[test]
    fn test_set_max_items_grow_keeps_everything() {
        let (mut cache, _) = cache(2);
        cache.set("A", 1, 1, secs(100));
        cache.set("B", 2, 1, secs(100));

        assert_eq!(cache.set_max_items(10), 0);
        cache.set("C", 3, 1, secs(100));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_set_max_items_zero_drains_and_refuses_inserts() {
        let (mut cache, _) = cache(3);
        cache.set("A", 1, 1, secs(100));
        cache.set("B", 2, 2, secs(100));

        assert_eq!(cache.set_max_items(0), 2);
        assert!(cache.is_empty());

        assert!(!cache.set("C", 3, 1, secs(100)));
        assert!(cache.is_empty());
        cache.assert_consistent();

        cache.set_max_items(1);
        assert!(cache.set("C", 3, 1, secs(100)));
        assert!(cache.set("C", 4, 1, secs(100)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evict_on_empty_is_noop() {
        let (mut cache, _) = cache(1);
        assert_eq!(cache.evict_one(), None);
        assert_eq!(cache.stats().evictions(), 0);
    }

    #[test]
    fn test_evict_one_reports_reason() {
        let (mut cache, clock) = cache(5);
        cache.set("A", 1, 1, secs(100));
        cache.set("B", 2, 9, secs(2));

        assert_eq!(cache.evict_one(), Some(("A", EvictionReason::Priority)));
        clock.set(secs(3));
        assert_eq!(cache.evict_one(), Some(("B", EvictionReason::Expired)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_stale_heads_drained_lazily() {
        let (mut cache, _) = cache(5);
        cache.set("A", 1, 1, secs(10));
        cache.set("B", 2, 2, secs(20));
        cache.set("C", 3, 3, secs(30));

        cache.evict_one();
        // Removal leaves the emptied bucket and its heap slot in place
        assert_eq!(cache.priority_heap.len(), 3);
        assert!(cache.priority_index.contains_key(&1));

        cache.evict_one();
        // The next eviction drained priority 1 and expiry 10 first
        assert!(!cache.priority_index.contains_key(&1));
        assert!(!cache.priority_heap.is_present(&1));
        assert!(!cache.expiry_heap.is_present(&secs(10)));
        assert_eq!(sorted_keys(&cache), vec!["C"]);
        cache.assert_consistent();
    }

    #[test]
    fn test_drained_priority_can_return() {
        let (mut cache, _) = cache(5);
        cache.set("A", 1, 1, secs(100));
        cache.set("B", 2, 2, secs(100));
        cache.evict_one();
        cache.evict_one();
        assert!(!cache.priority_heap.is_present(&1));

        cache.set("C", 3, 1, secs(100));
        cache.set("D", 4, 4, secs(100));
        cache.assert_consistent();
        assert_eq!(cache.evict_one(), Some(("C", EvictionReason::Priority)));
    }

    #[test]
    fn test_update_to_unseen_priority_is_indexed() {
        let (mut cache, _) = cache(5);
        cache.set("A", 1, 5, secs(100));
        cache.set("B", 2, 5, secs(100));

        cache.set("B", 2, 0, secs(100));
        cache.assert_consistent();
        assert_eq!(cache.evict_one(), Some(("B", EvictionReason::Priority)));
    }

    #[test]
    fn test_update_stale_bucket_is_reused() {
        let (mut cache, _) = cache(5);
        cache.set("A", 1, 1, secs(100));
        cache.set("A", 1, 2, secs(100));
        // Priority 1 is still present in the heap with an empty bucket
        cache.set("A", 1, 1, secs(100));

        assert_eq!(cache.priority_heap.len(), 2);
        cache.assert_consistent();
    }

    #[test]
    fn test_keys_include_expired_entries() {
        let (mut cache, clock) = cache(5);
        cache.set("A", 1, 1, secs(1));
        cache.set("B", 2, 1, secs(100));
        clock.set(secs(50));

        assert_eq!(sorted_keys(&cache), vec!["A", "B"]);
    }

    #[test]
    fn test_stats() {
        let (mut cache, _) = cache(1);
        cache.set("A", 1, 1, secs(100));
        cache.get("A");
        cache.get("missing");
        cache.set("B", 2, 1, secs(100));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.priority_evictions, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
