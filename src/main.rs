//! Entry point for nanocode, a minimal agentic coding assistant for the terminal.
//!
//! This binary loads environment variables, parses CLI arguments via [`cli`],
//! and hands off to the chat REPL.

mod agent;
mod chat;
mod cli;
mod config;
mod constants;
mod format;
mod logging;
mod message;
mod output;
mod provider;
mod tools;

use anyhow::Result;

/// Runs the nanocode CLI.
///
/// Loads `.env` files (silently ignored if absent), parses command-line
/// arguments into a [`cli::Cli`] struct, and starts the session via
/// [`cli::run`].
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::parse();
    cli::run(cli).await
}
