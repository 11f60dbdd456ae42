//! Script commands
//!
//! One command per line; blank lines are skipped and a word starting with
//! `#` begins a comment.

use std::time::Duration;

use crate::error::HarnessError;

/// A single harness instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `set <key> <value> <priority> <expiry_secs>`
    Set {
        key: String,
        value: String,
        priority: i64,
        expiry: Duration,
    },
    /// `get <key>`
    Get { key: String },
    /// `max <n>`
    SetMaxItems { max_items: usize },
    /// `keys`
    Keys,
    /// `sleep <secs>`
    Sleep { duration: Duration },
    /// `stats`
    Stats,
}

impl Command {
    /// Parses one line. Returns `Ok(None)` for blank or comment lines.
    pub fn parse(line: usize, text: &str) -> Result<Option<Self>, HarnessError> {
        // A comment starts at the first word beginning with '#'
        let mut words = text
            .split_whitespace()
            .take_while(|word| !word.starts_with('#'));
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match name.to_ascii_lowercase().as_str() {
            "set" => {
                expect_args(line, "set", &args, 4)?;
                Command::Set {
                    key: args[0].to_string(),
                    value: args[1].to_string(),
                    priority: args[2].parse().map_err(|_| HarnessError::InvalidArgument {
                        line,
                        what: "priority",
                        value: args[2].to_string(),
                    })?,
                    expiry: parse_secs(line, "expiry", args[3])?,
                }
            }
            "get" => {
                expect_args(line, "get", &args, 1)?;
                Command::Get {
                    key: args[0].to_string(),
                }
            }
            "max" => {
                expect_args(line, "max", &args, 1)?;
                Command::SetMaxItems {
                    max_items: args[0].parse().map_err(|_| HarnessError::InvalidArgument {
                        line,
                        what: "capacity",
                        value: args[0].to_string(),
                    })?,
                }
            }
            "keys" => {
                expect_args(line, "keys", &args, 0)?;
                Command::Keys
            }
            "sleep" => {
                expect_args(line, "sleep", &args, 1)?;
                Command::Sleep {
                    duration: parse_secs(line, "duration", args[0])?,
                }
            }
            "stats" => {
                expect_args(line, "stats", &args, 0)?;
                Command::Stats
            }
            _ => {
                return Err(HarnessError::UnknownCommand {
                    line,
                    command: name.to_string(),
                })
            }
        };

        Ok(Some(command))
    }
}

/// Parses a whole script, numbering lines from 1.
pub fn parse_script(script: &str) -> Result<Vec<Command>, HarnessError> {
    let mut commands = Vec::new();
    for (idx, text) in script.lines().enumerate() {
        if let Some(command) = Command::parse(idx + 1, text)? {
            commands.push(command);
        }
    }
    Ok(commands)
}

fn expect_args(
    line: usize,
    command: &'static str,
    args: &[&str],
    expected: usize,
) -> Result<(), HarnessError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(HarnessError::WrongArity {
            line,
            command,
            expected,
            got: args.len(),
        })
    }
}

fn parse_secs(line: usize, what: &'static str, raw: &str) -> Result<Duration, HarnessError> {
    raw.parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| HarnessError::InvalidArgument {
            line,
            what,
            value: raw.to_string(),
        })
}
