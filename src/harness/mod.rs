//! Harness Module
//!
//! Thin line-oriented driver for exercising a cache from scripts.
//!
//! # Commands
//! - `set <key> <value> <priority> <expiry_secs>` - Store or update a key
//! - `get <key>` - Read a key, touching its recency
//! - `max <n>` - Change capacity, evicting as needed
//! - `keys` - List resident keys
//! - `sleep <secs>` - Let time pass on the cache clock
//! - `stats` - Print counters

mod command;
mod driver;
mod outcome;
pub mod scenarios;

pub use command::{parse_script, Command};
pub use driver::{Driver, HarnessCache};
pub use outcome::Outcome;
pub use scenarios::{Scenario, SCENARIOS};
