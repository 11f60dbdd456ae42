//! Script driver
//!
//! Runs parsed commands against a cache and writes each outcome.

use std::io::Write;

use tracing::debug;

use crate::cache::{Clock, PriorityExpiryCache};
use crate::config::{Config, OutputFormat};
use crate::error::HarnessError;
use crate::harness::{Command, Outcome};

/// Cache shape driven by scripts: string keys and values, integer priorities.
pub type HarnessCache<C> = PriorityExpiryCache<String, String, i64, C>;

/// Executes commands against one cache instance.
pub struct Driver<W, C> {
    cache: HarnessCache<C>,
    out: W,
    format: OutputFormat,
}

impl<W: Write, C: Clock> Driver<W, C> {
    /// Wraps an existing cache.
    pub fn new(cache: HarnessCache<C>, out: W, format: OutputFormat) -> Self {
        Self { cache, out, format }
    }

    /// Builds a fresh cache from configuration; its elapsed time starts at
    /// `clock`'s origin.
    pub fn from_config(config: &Config, clock: C, out: W) -> Result<Self, HarnessError> {
        let cache =
            PriorityExpiryCache::with_clock(config.max_items, config.disable_expired_keys, clock)?;
        Ok(Self::new(cache, out, config.output_format))
    }

    /// Applies one command, returning what it produced, if anything.
    pub fn execute(&mut self, command: &Command) -> Option<Outcome> {
        match command {
            Command::Set {
                key,
                value,
                priority,
                expiry,
            } => {
                let stored = self
                    .cache
                    .set(key.clone(), value.clone(), *priority, *expiry);
                (!stored).then(|| Outcome::Refused { key: key.clone() })
            }
            Command::Get { key } => Some(match self.cache.get(key.as_str()) {
                Some(value) => Outcome::Value {
                    key: key.clone(),
                    value: value.clone(),
                },
                None => Outcome::Absent { key: key.clone() },
            }),
            Command::SetMaxItems { max_items } => {
                let evicted = self.cache.set_max_items(*max_items);
                debug!(max_items, evicted, "Capacity changed");
                None
            }
            Command::Keys => {
                let mut keys: Vec<String> = self.cache.keys().cloned().collect();
                keys.sort_unstable();
                Some(Outcome::Keys { keys })
            }
            Command::Sleep { duration } => {
                self.cache.clock().wait(*duration);
                None
            }
            Command::Stats => Some(Outcome::Stats {
                stats: self.cache.stats(),
            }),
        }
    }

    /// Executes every command, writing outcomes as they happen.
    pub fn run(&mut self, commands: &[Command]) -> Result<Vec<Outcome>, HarnessError> {
        let mut outcomes = Vec::new();
        for command in commands {
            if let Some(outcome) = self.execute(command) {
                self.emit(&outcome)?;
                outcomes.push(outcome);
            }
        }
        self.out.flush()?;
        Ok(outcomes)
    }

    /// Writes one outcome in the configured format.
    pub fn emit(&mut self, outcome: &Outcome) -> Result<(), HarnessError> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{outcome}")?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, outcome)?;
                writeln!(self.out)?;
            }
        }
        Ok(())
    }

    pub fn cache(&self) -> &HarnessCache<C> {
        &self.cache
    }

    /// Consumes the driver, returning the output sink.
    pub fn into_output(self) -> W {
        self.out
    }
}
