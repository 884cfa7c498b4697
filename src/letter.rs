//! Single guessable letters.

use derive_more::Display;
use serde::Serialize;

/// A single lowercase ASCII letter.
///
/// Construction normalizes case and rejects everything that is not an
/// ASCII letter, so a `Letter` can always be sent to the service as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize)]
#[serde(transparent)]
pub struct Letter(char);

impl Letter {
    /// Builds a letter from a character, lowercasing it.
    ///
    /// Returns `None` for anything outside `a-z` / `A-Z`.
    pub fn new(c: char) -> Option<Self> {
        c.is_ascii_alphabetic().then(|| Self(c.to_ascii_lowercase()))
    }

    /// Parses a one-character string such as the service's `"e"`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::new(c),
            _ => None,
        }
    }

    /// Returns the lowercase character.
    pub fn as_char(self) -> char {
        self.0
    }

    /// Returns the uppercase character used for display.
    pub fn to_upper(self) -> char {
        self.0.to_ascii_uppercase()
    }

    /// Iterates `a` through `z`.
    pub fn alphabet() -> impl Iterator<Item = Letter> {
        ('a'..='z').map(Self)
    }
}
