//! Strictly Hangman - terminal client for the AI hangman service.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use strictly_hangman::{Cli, ClientConfig, tui};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = cli.apply(ClientConfig::load(&cli.config)?);

    tui::init_logging(&config)?;
    info!(config = ?config, "Configuration resolved");

    tui::run_tui(config).await
}
