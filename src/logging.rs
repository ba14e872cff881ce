//! File logging setup.
//!
//! The terminal belongs to the REPL, so tracing output goes to
//! `~/.local/share/nanocode/logs/nanocode.log` instead.

use anyhow::{Context, Result};
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::constants::LOG_FILENAME;

/// Installs the global subscriber. `RUST_LOG` wins over `config.log_level`.
pub fn init(config: &Config) -> Result<()> {
    let log_dir = Config::log_dir()?;
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;
    let log_file = fs::File::create(log_dir.join(LOG_FILENAME)).context("Failed to create log file")?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))?;

    info!(level = %config.log_level, "Logging initialized");
    Ok(())
}
