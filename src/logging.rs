// src/logging.rs

//! Logging setup for `tabledump` using `tracing` + `tracing-subscriber`.
//!
//! The filter is taken from, in order:
//! 1. `--log-level`, applied to every target
//! 2. `TABLEDUMP_LOG`, read as `EnvFilter` directives, so per-module levels
//!    work: `TABLEDUMP_LOG=info,tabledump::exec=debug`
//! 3. `info`
//!
//! Logs go to STDERR; stdout only carries the path of the written dump.

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "TABLEDUMP_LOG";
const DEFAULT_DIRECTIVES: &str = "info";

/// Initialise global logging subscriber.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV).ok();
    let filter = build_filter(cli_level, env_value.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {e}"))?;

    Ok(())
}

/// Resolve the filter from a CLI level and the raw `TABLEDUMP_LOG` value.
///
/// A blank variable counts as unset; malformed directives are an error
/// rather than being silently ignored.
pub fn build_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> Result<EnvFilter> {
    if let Some(level) = cli_level {
        return Ok(EnvFilter::new(level.as_str()));
    }

    match env_value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid {LOG_ENV} value '{directives}'")),
        None => Ok(EnvFilter::new(DEFAULT_DIRECTIVES)),
    }
}
