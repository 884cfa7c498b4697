//! Client configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{ConfigError, DEFAULT_AUTO_PLAY_DELAY};

/// Environment variable overriding the configured service URL.
pub const SERVER_URL_ENV: &str = "HANGMAN_SERVER_URL";

/// Settings for the hangman client.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct ClientConfig {
    /// Base URL of the hangman service.
    #[serde(default = "default_server_url")]
    server_url: String,

    /// Delay between auto-play moves, in milliseconds.
    #[serde(default = "default_auto_play_delay_ms")]
    auto_play_delay_ms: u64,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,

    /// File receiving the client's logs.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,
}

#[instrument]
fn default_server_url() -> String {
    "http://localhost:5001".to_string()
}

#[instrument]
fn default_auto_play_delay_ms() -> u64 {
    DEFAULT_AUTO_PLAY_DELAY.as_millis() as u64
}

#[instrument]
fn default_request_timeout_secs() -> u64 {
    10
}

#[instrument]
fn default_log_file() -> PathBuf {
    PathBuf::from("strictly_hangman.log")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            auto_play_delay_ms: default_auto_play_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            log_file: default_log_file(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(server_url = %config.server_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise starts from defaults, then
    /// applies environment overrides.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = if path.as_ref().exists() {
            Self::from_file(path)?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };
        Ok(config.with_env_overrides())
    }

    /// Applies [`SERVER_URL_ENV`] when set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        match std::env::var(SERVER_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => {
                info!(server_url = %url, "Server URL overridden from environment");
                self.with_server_url(url)
            }
            _ => self,
        }
    }

    /// Delay between auto-play moves.
    pub fn auto_play_delay(&self) -> Duration {
        Duration::from_millis(self.auto_play_delay_ms)
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
