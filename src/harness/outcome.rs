//! Harness outcomes
//!
//! Results printed by the driver, as text lines or JSON objects.

use std::fmt;

use serde::Serialize;

use crate::cache::CacheStats;

/// Something the driver reports back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    /// Start of a named script run
    Scenario { name: String },
    /// `get` found a visible value
    Value { key: String, value: String },
    /// `get` found nothing, or the entry was hidden as expired
    Absent { key: String },
    /// `set` of a new key was refused by a zero-capacity cache
    Refused { key: String },
    /// Resident keys, sorted
    Keys { keys: Vec<String> },
    /// Counter snapshot
    Stats { stats: CacheStats },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Scenario { name } => write!(f, "----------- Running {name} -----------"),
            Outcome::Value { key, value } => write!(f, "Value for {key}: {value}"),
            Outcome::Absent { key } => write!(f, "{key} not present in the Cache"),
            Outcome::Refused { key } => write!(f, "{key} not stored: cache capacity is zero"),
            Outcome::Keys { keys } => write!(f, "Keys: [{}]", keys.join(", ")),
            Outcome::Stats { stats } => write!(
                f,
                "Stats: hits={} misses={} expired_misses={} hit_rate={:.2} expired_evictions={} priority_evictions={} total_entries={}",
                stats.hits,
                stats.misses,
                stats.expired_misses,
                stats.hit_rate(),
                stats.expired_evictions,
                stats.priority_evictions,
                stats.total_entries
            ),
        }
    }
}
