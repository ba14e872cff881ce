//! Command-line interface definition and startup for nanocode.
//!
//! Uses [`clap`] with derive macros. There are no flags beyond the generated
//! `--help` and `--version`; everything else comes from config and env.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::{info, warn};

use crate::chat;
use crate::config::Config;
use crate::logging;
use crate::provider::HttpModelClient;
use crate::tools::ToolRegistry;

/// Top-level CLI structure for nanocode.
#[derive(Parser)]
#[command(name = "nanocode", version, about = "A minimal agentic coding assistant")]
pub struct Cli {}

/// Parses command-line arguments into a [`Cli`] struct.
///
/// Delegates to [`clap::Parser::parse`], which exits the process on invalid input.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Startup line shown before the first prompt.
fn banner(config: &Config) -> String {
    format!(
        "{} | {} | {}",
        "nanocode".bold(),
        format!("{} ({})", config.model, config.provider.display_name()).dimmed(),
        config.working_dir.display()
    )
}

/// Builds config, logging, tools and the model client, then runs the REPL.
pub async fn run(_cli: Cli) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    if let Err(e) = logging::init(&config) {
        eprintln!("{} logging disabled: {:#}", "warning:".yellow().bold(), e);
    }
    info!(?config, "startup");

    let tools = ToolRegistry::with_builtins(&config);
    let client = HttpModelClient::new(&config, tools.schemas())
        .context("Failed to build HTTP client")?;
    if config.api_key.is_empty() {
        warn!(provider = config.provider.display_name(), "no API key configured");
    }

    println!("{}\n", banner(&config));
    chat::run_chat(&config, &client, &tools).await
}
