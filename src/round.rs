//! Round identity and round start modes.

use derive_more::{Display, Error};
use tracing::{debug, instrument};

/// Monotonically increasing tag for the live round.
///
/// Every request is tagged with the id that was current when it was sent;
/// a completion whose tag no longer matches belongs to a superseded round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display)]
#[display("round#{}", _0)]
pub struct RoundId(u64);

impl RoundId {
    /// Returns the id following this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Raw counter value.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// How the target word of a new round is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundMode {
    /// The service picks a word.
    Random,
    /// The player supplies the word.
    Custom(CustomWord),
}

impl RoundMode {
    /// Wire name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Custom(_) => "custom",
        }
    }

    /// The custom word, if any.
    pub fn word(&self) -> Option<&str> {
        match self {
            Self::Random => None,
            Self::Custom(word) => Some(word.as_str()),
        }
    }
}

/// Why a custom word was refused before reaching the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum CustomWordError {
    /// Nothing but whitespace was entered.
    #[display("Please enter a word")]
    Empty,
    /// Something other than `a-z` / `A-Z` was entered.
    #[display("Word must contain only letters")]
    NonAlphabetic,
}

/// A non-empty, letters-only, lowercased target word.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub struct CustomWord(String);

impl CustomWord {
    /// Validates a draft entered by the player.
    ///
    /// Surrounding whitespace only counts as empty; inner content must match
    /// `^[a-zA-Z]+$` exactly.
    #[instrument]
    pub fn parse(draft: &str) -> Result<Self, CustomWordError> {
        if draft.trim().is_empty() {
            debug!("Custom word is empty");
            return Err(CustomWordError::Empty);
        }
        if !draft.chars().all(|c| c.is_ascii_alphabetic()) {
            debug!("Custom word contains non-letters");
            return Err(CustomWordError::NonAlphabetic);
        }
        Ok(Self(draft.to_ascii_lowercase()))
    }

    /// The lowercased word.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
