//! Configuration Module
//!
//! Handles loading harness configuration from environment variables.

use std::env;

// == Output Format ==
/// How the harness renders command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl OutputFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Harness configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Capacity of each cache built by the harness
    pub max_items: usize,
    /// Whether `get` hides entries whose expiry has elapsed
    pub disable_expired_keys: bool,
    /// Rendering of command results
    pub output_format: OutputFormat,
    /// Advance a manual clock on `sleep` instead of sleeping
    pub manual_clock: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ITEMS` - Cache capacity (default: 5)
    /// - `DISABLE_EXPIRED_KEYS` - Hide expired values on get (default: false)
    /// - `OUTPUT_FORMAT` - `text` or `json` (default: text)
    /// - `MANUAL_CLOCK` - Simulate sleeps (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_items: env::var("MAX_ITEMS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_items),
            disable_expired_keys: env::var("DISABLE_EXPIRED_KEYS")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.disable_expired_keys),
            output_format: env::var("OUTPUT_FORMAT")
                .ok()
                .and_then(|v| OutputFormat::parse(&v))
                .unwrap_or(defaults.output_format),
            manual_clock: env::var("MANUAL_CLOCK")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.manual_clock),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_items: 5,
            disable_expired_keys: false,
            output_format: OutputFormat::Text,
            manual_clock: false,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
