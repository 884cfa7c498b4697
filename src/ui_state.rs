//! Ephemeral presentation state owned by the orchestrator.

use derive_getters::Getters;
use tracing::debug;

use crate::HintSuggestion;

/// Tone of the status banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Tone {
    /// Neutral information.
    Info,
    /// Something went the player's way.
    Success,
    /// A wrong guess or a failed action.
    Failure,
}

/// Transient status message shown after an action.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Banner {
    text: String,
    tone: Tone,
}

impl Banner {
    /// Creates a banner.
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Banner, hints and custom-word draft.
///
/// Clearing rules:
/// - state-changing completions (guess, AI move, resync) clear hints and
///   overwrite the banner;
/// - a hint completion replaces hints and leaves the banner alone;
/// - a new round clears everything, including an open custom-word prompt.
#[derive(Debug, Clone, Default, PartialEq, Getters)]
pub struct UiState {
    banner: Option<Banner>,
    hints: Vec<HintSuggestion>,
    custom_word: Option<String>,
}

impl UiState {
    /// Overwrites the banner.
    pub fn set_banner(&mut self, text: impl Into<String>, tone: Tone) {
        let banner = Banner::new(text, tone);
        debug!(text = %banner.text, tone = %tone, "Banner updated");
        self.banner = Some(banner);
    }

    /// Removes the banner.
    pub fn clear_banner(&mut self) {
        self.banner = None;
    }

    /// Replaces the displayed hints.
    pub fn show_hints(&mut self, hints: Vec<HintSuggestion>) {
        self.hints = hints;
    }

    /// Hides hints.
    pub fn clear_hints(&mut self) {
        self.hints.clear();
    }

    /// Whether hints are on screen.
    pub fn hints_visible(&self) -> bool {
        !self.hints.is_empty()
    }

    /// Opens the custom-word prompt with an empty draft.
    pub fn open_custom_word(&mut self) {
        self.custom_word = Some(String::new());
    }

    /// Whether the custom-word prompt is open.
    pub fn custom_word_open(&self) -> bool {
        self.custom_word.is_some()
    }

    /// Appends to the draft if the prompt is open.
    pub fn push_custom_char(&mut self, c: char) {
        if let Some(draft) = self.custom_word.as_mut() {
            draft.push(c);
        }
    }

    /// Removes the last draft character if the prompt is open.
    pub fn pop_custom_char(&mut self) {
        if let Some(draft) = self.custom_word.as_mut() {
            draft.pop();
        }
    }

    /// Closes the prompt and discards the draft.
    pub fn close_custom_word(&mut self) {
        self.custom_word = None;
    }

    /// Clears everything for a freshly started round.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
