//! Priority Expiry Cache - command-line harness
//!
//! Runs the built-in demonstration scenarios, a script file, or a script
//! read from stdin.
//!
//! # Usage
//! - `priority_expiry_cache` or `priority_expiry_cache demo` - both scenarios
//! - `priority_expiry_cache <path>` - script file
//! - `priority_expiry_cache -` - script from stdin

use std::io::{self, Read, Write};
use std::{env, fs};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use priority_expiry_cache::harness::{parse_script, Command, Driver, Outcome, SCENARIOS};
use priority_expiry_cache::{Clock, Config, ManualClock, MonotonicClock};

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only outcomes
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "priority_expiry_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_items={}, disable_expired_keys={}, output={:?}, manual_clock={}",
        config.max_items, config.disable_expired_keys, config.output_format, config.manual_clock
    );

    let source = env::args().nth(1).unwrap_or_else(|| "demo".to_string());
    match source.as_str() {
        "demo" => {
            for scenario in SCENARIOS {
                run_script(&config, scenario.name, scenario.script)?;
            }
        }
        "-" => {
            let mut script = String::new();
            io::stdin()
                .read_to_string(&mut script)
                .context("Failed to read script from stdin")?;
            run_script(&config, "stdin", &script)?;
        }
        path => {
            let script = fs::read_to_string(path)
                .with_context(|| format!("Failed to read script file {path}"))?;
            run_script(&config, path, &script)?;
        }
    }

    Ok(())
}

/// Parses `script` and runs it against a fresh cache.
fn run_script(config: &Config, name: &str, script: &str) -> Result<()> {
    let commands =
        parse_script(script).with_context(|| format!("Failed to parse script {name}"))?;
    info!("Running {} ({} commands)", name, commands.len());

    let stdout = io::stdout().lock();
    if config.manual_clock {
        execute(Driver::from_config(config, ManualClock::new(), stdout)?, name, &commands)
    } else {
        execute(Driver::from_config(config, MonotonicClock::new(), stdout)?, name, &commands)
    }
}

fn execute<W: Write, C: Clock>(
    mut driver: Driver<W, C>,
    name: &str,
    commands: &[Command],
) -> Result<()> {
    driver.emit(&Outcome::Scenario {
        name: name.to_string(),
    })?;
    driver
        .run(commands)
        .with_context(|| format!("Failed while running {name}"))?;
    info!("Finished {} with {:?}", name, driver.cache().stats());
    Ok(())
}
