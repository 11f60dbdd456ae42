//! Error types for the cache and its harness
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised by the cache itself.
///
/// Absent keys, expired keys and eviction on an empty cache are not errors;
/// they surface as `None` or as a logged no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A cache must be able to hold at least one entry
    #[error("Invalid capacity: max_items must be positive, got {0}")]
    InvalidCapacity(usize),
}

// == Harness Error Enum ==
/// Errors raised while parsing or executing a command script.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// First word of the line is not a known command
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },

    /// Command received the wrong number of arguments
    #[error("line {line}: '{command}' expects {expected} argument(s), got {got}")]
    WrongArity {
        line: usize,
        command: &'static str,
        expected: usize,
        got: usize,
    },

    /// Argument could not be parsed
    #[error("line {line}: invalid {what} '{value}'")]
    InvalidArgument {
        line: usize,
        what: &'static str,
        value: String,
    },

    /// Cache construction failed
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Reading the script or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output could not be encoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
