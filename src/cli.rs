//! Command-line interface for strictly_hangman.

use std::path::PathBuf;

use clap::Parser;

use crate::ClientConfig;

/// Strictly Hangman - terminal client for the AI hangman service
#[derive(Parser, Debug)]
#[command(name = "strictly_hangman")]
#[command(about = "Play hangman against an AI oracle service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file (defaults are used if it is missing)
    #[arg(short, long, default_value = "strictly_hangman.toml")]
    pub config: PathBuf,

    /// Hangman service URL, overriding config and environment
    #[arg(long)]
    pub server_url: Option<String>,

    /// Delay between auto-play moves in milliseconds
    #[arg(long)]
    pub auto_play_delay_ms: Option<u64>,

    /// File to write logs to
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Applies flags on top of a loaded config.
    pub fn apply(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(url) = &self.server_url {
            config = config.with_server_url(url.clone());
        }
        if let Some(delay) = self.auto_play_delay_ms {
            config = config.with_auto_play_delay_ms(delay);
        }
        if let Some(path) = &self.log_file {
            config = config.with_log_file(path.clone());
        }
        config
    }
}
