//! Client-side record of the live round.

use std::collections::BTreeSet;

use derive_more::{Display, Error};
use tracing::{debug, instrument};

use crate::{Letter, RoundId, RoundStart, Snapshot};

/// How a letter has fared in the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
pub enum LetterStatus {
    /// Not tried yet.
    Untried,
    /// Tried and present in the word.
    Hit,
    /// Tried and absent from the word.
    Miss,
}

/// Why a server snapshot cannot follow the current session.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SessionConflict {
    /// The pattern changed length mid-round.
    #[display("pattern length changed from {} to {}", before, after)]
    PatternLength {
        /// Length before.
        before: usize,
        /// Length reported.
        after: usize,
    },
    /// Lives went up mid-round.
    #[display("lives increased from {} to {}", before, after)]
    LivesIncreased {
        /// Lives before.
        before: u8,
        /// Lives reported.
        after: u8,
    },
    /// A previously guessed letter disappeared.
    #[display("guessed letter '{}' was lost", _0)]
    GuessLost(#[error(not(source))] Letter),
    /// A finished game was reported as running again.
    #[display("finished round reported as running")]
    Reopened,
}

/// State of one round as last reported by the service.
///
/// Replaced wholesale on every successful state-changing response; never
/// patched field by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    round: RoundId,
    pattern: String,
    lives: u8,
    guessed_letters: BTreeSet<Letter>,
    is_over: bool,
    is_won: bool,
    revealed_word: Option<String>,
}

impl GameSession {
    /// Fresh session for a round that just started.
    #[instrument(skip(start), fields(pattern = %start.pattern, lives = start.lives))]
    pub fn started(round: RoundId, start: RoundStart) -> Self {
        debug!("Creating session for new round");
        Self {
            round,
            pattern: start.pattern,
            lives: start.lives,
            guessed_letters: BTreeSet::new(),
            is_over: false,
            is_won: false,
            revealed_word: None,
        }
    }

    /// Session mirroring a full server snapshot.
    pub fn from_snapshot(round: RoundId, snapshot: &Snapshot) -> Self {
        let is_over = *snapshot.game_over();
        Self {
            round,
            pattern: snapshot.pattern().clone(),
            lives: *snapshot.lives(),
            guessed_letters: snapshot.guessed().clone(),
            is_over,
            is_won: is_over && *snapshot.won(),
            revealed_word: snapshot.target_word().clone(),
        }
    }

    /// Checks that `next` is a legal successor of this session within the
    /// same round.
    #[instrument(skip_all, fields(round = %self.round))]
    pub fn check_successor(&self, next: &GameSession) -> Result<(), SessionConflict> {
        let (before, after) = (self.pattern_len(), next.pattern_len());
        if before != after {
            return Err(SessionConflict::PatternLength { before, after });
        }
        if next.lives > self.lives {
            return Err(SessionConflict::LivesIncreased {
                before: self.lives,
                after: next.lives,
            });
        }
        if let Some(lost) = self.guessed_letters.difference(&next.guessed_letters).next() {
            return Err(SessionConflict::GuessLost(*lost));
        }
        if self.is_over && !next.is_over {
            return Err(SessionConflict::Reopened);
        }
        Ok(())
    }

    /// Round this session belongs to.
    pub fn round(&self) -> RoundId {
        self.round
    }

    /// Partially revealed word; `_` marks hidden letters.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Number of letters in the target word.
    pub fn pattern_len(&self) -> usize {
        self.pattern.chars().count()
    }

    /// Remaining lives.
    pub fn lives(&self) -> u8 {
        self.lives
    }

    /// Letters tried so far.
    pub fn guessed_letters(&self) -> &BTreeSet<Letter> {
        &self.guessed_letters
    }

    /// Whether `letter` was already tried.
    pub fn has_guessed(&self, letter: Letter) -> bool {
        self.guessed_letters.contains(&letter)
    }

    /// Whether the round has finished.
    pub fn is_over(&self) -> bool {
        self.is_over
    }

    /// Whether the round finished with the word solved.
    pub fn is_won(&self) -> bool {
        self.is_won
    }

    /// Target word, only once the round is over.
    pub fn revealed_word(&self) -> Option<&str> {
        self.revealed_word.as_deref()
    }

    /// Status of a letter for keyboard display.
    pub fn letter_status(&self, letter: Letter) -> LetterStatus {
        if !self.has_guessed(letter) {
            LetterStatus::Untried
        } else if self.pattern.contains(letter.as_char()) {
            LetterStatus::Hit
        } else {
            LetterStatus::Miss
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters(s: &str) -> BTreeSet<Letter> {
        s.chars().filter_map(Letter::new).collect()
    }

    fn session(pattern: &str, lives: u8, guessed: &str, over: bool) -> GameSession {
        let snapshot = Snapshot::new(pattern.into(), lives, letters(guessed), over, false, None);
        GameSession::from_snapshot(RoundId::default(), &snapshot)
    }

    #[test]
    fn test_started_session_is_blank() {
        let s = GameSession::started(RoundId::default(), RoundStart::new("_____".into(), 6));
        assert_eq!(s.pattern_len(), 5);
        assert_eq!(s.lives(), 6);
        assert!(s.guessed_letters().is_empty());
        assert!(!s.is_over());
        assert!(s.revealed_word().is_none());
    }

    #[test]
    fn test_successor_accepts_progress() {
        let before = session("_____", 6, "", false);
        let after = session("_e___", 6, "e", false);
        assert!(before.check_successor(&after).is_ok());
    }

    #[test]
    fn test_successor_rejects_length_change() {
        let before = session("_____", 6, "", false);
        let after = session("____", 6, "e", false);
        assert_eq!(
            before.check_successor(&after),
            Err(SessionConflict::PatternLength { before: 5, after: 4 })
        );
    }

    #[test]
    fn test_successor_rejects_lives_gain() {
        let before = session("_____", 4, "xz", false);
        let after = session("_____", 5, "xzq", false);
        assert!(matches!(
            before.check_successor(&after),
            Err(SessionConflict::LivesIncreased { .. })
        ));
    }

    #[test]
    fn test_successor_rejects_lost_guess() {
        let before = session("_____", 6, "ae", false);
        let after = session("_____", 5, "aq", false);
        assert!(matches!(
            before.check_successor(&after),
            Err(SessionConflict::GuessLost(_))
        ));
    }

    #[test]
    fn test_successor_rejects_reopen() {
        let before = session("cat", 6, "cat", true);
        let after = session("cat", 6, "cat", false);
        assert_eq!(before.check_successor(&after), Err(SessionConflict::Reopened));
    }

    #[test]
    fn test_letter_status() {
        let s = session("_e___", 5, "ex", false);
        assert_eq!(s.letter_status(Letter::new('e').expect("letter")), LetterStatus::Hit);
        assert_eq!(s.letter_status(Letter::new('x').expect("letter")), LetterStatus::Miss);
        assert_eq!(s.letter_status(Letter::new('a').expect("letter")), LetterStatus::Untried);
    }
}
