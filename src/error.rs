//! Error types for the hangman client.

use derive_more::{Display, Error};
use tracing::instrument;

/// Failure of any exchange with the hangman service.
///
/// Transport failures, non-success statuses and undecodable bodies all land
/// here so callers deal with a single transient error kind.
#[derive(Debug, Clone, Display, Error)]
#[display("API error: {} at {}:{}", message, file, line)]
pub struct ApiError {
    /// Diagnostic message.
    pub message: String,
    /// Human-readable `error` text reported by the service, if any.
    pub service_message: Option<String>,
    /// HTTP status, when a response was received.
    pub status: Option<u16>,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ApiError {
    /// Creates a new API error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            service_message: None,
            status: None,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Creates an error for a non-success response.
    ///
    /// `service_message` is the body's `error` field when it had one.
    #[track_caller]
    #[instrument(skip(service_message))]
    pub fn service(status: u16, service_message: Option<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = match &service_message {
            Some(text) => format!("Service returned {}: {}", status, text),
            None => format!("Service returned {}", status),
        };
        Self {
            message,
            service_message,
            status: Some(status),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Text to show the player: the service's own message, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.service_message
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        let mut error = Self::new(format!("HTTP error: {}", err));
        error.status = err.status().map(|s| s.as_u16());
        error
    }
}

impl From<serde_json::Error> for ApiError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Invalid JSON response: {}", err))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
