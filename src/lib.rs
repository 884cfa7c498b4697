//! Strictly Hangman library - client-side orchestration for an AI hangman service
//!
//! The service owns the target word, lives, guessed letters and oracle
//! suggestions. This crate tracks the round it reports, gates and sequences
//! requests against it, and drives auto-play.
//!
//! # Architecture
//!
//! - **Validator**: [`can_guess`] decides whether a letter may be sent
//! - **Session**: [`GameSession`], the last reported state of the round
//! - **Client**: [`HangmanApi`] and its HTTP implementation [`HttpHangmanClient`]
//! - **Orchestrator**: [`Orchestrator`], the loading/active/terminal state machine
//! - **Auto-play**: [`AutoPlayScheduler`], a cancellable self-rescheduling timer
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use strictly_hangman::{ClientConfig, Command, HttpHangmanClient, Orchestrator};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::default();
//! let client = HttpHangmanClient::new(config.server_url(), config.request_timeout())?;
//! let mut orchestrator = Orchestrator::new(Arc::new(client), config.auto_play_delay());
//!
//! orchestrator.start();
//! orchestrator.step().await;
//! orchestrator.dispatch(Command::Guess('e'));
//! orchestrator.step().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod auto_play;
mod cli;
mod client;
mod config;
mod error;
mod letter;
mod orchestrator;
mod protocol;
mod round;
mod session;
mod ui_state;
mod validator;

pub mod tui;

// Crate-level exports - Errors
pub use error::{ApiError, ConfigError};

// Crate-level exports - Configuration
pub use cli::Cli;
pub use config::{ClientConfig, SERVER_URL_ENV};

// Crate-level exports - Domain
pub use letter::Letter;
pub use round::{CustomWord, CustomWordError, RoundId, RoundMode};
pub use session::{GameSession, LetterStatus, SessionConflict};
pub use validator::can_guess;

// Crate-level exports - Service adapter
pub use client::{HangmanApi, HttpHangmanClient};
pub use protocol::{
    GuessRecord, HintSuggestion, InitReport, MAX_LIVES, MoveOutcome, RoundStart, Snapshot,
    StateSnapshot,
};

// Crate-level exports - Orchestration
pub use auto_play::{AutoPlayScheduler, AutoPlayState, AutoPlayTick, DEFAULT_AUTO_PLAY_DELAY};
pub use orchestrator::{Command, MoveKind, Orchestrator, OrchestratorEvent, Phase, StepOutcome};
pub use ui_state::{Banner, Tone, UiState};
