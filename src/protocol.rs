//! Wire format of the hangman service and its normalized counterparts.
//!
//! The `*Body` structs mirror the JSON exactly; everything the rest of the
//! crate sees has been checked and converted into the public types here.

use std::collections::BTreeSet;

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{ApiError, Letter, RoundMode};

/// Lives at the start of every round.
pub const MAX_LIVES: u8 = 6;

/// Result of preparing server-side state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, new)]
pub struct InitReport {
    /// Words the oracle was trained on, when reported.
    pub corpus_size: Option<usize>,
    /// Words available for random rounds, when reported.
    pub test_size: Option<usize>,
}

/// Initial view of a freshly started round.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct RoundStart {
    /// All-underscore pattern, one per target letter.
    pub pattern: String,
    /// Starting lives.
    pub lives: u8,
}

/// Complete server view of a round in progress or finished.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Snapshot {
    pattern: String,
    lives: u8,
    guessed: BTreeSet<Letter>,
    game_over: bool,
    won: bool,
    target_word: Option<String>,
}

impl Snapshot {
    /// Builds a snapshot, dropping `target_word` unless the game is over.
    pub fn new(
        pattern: String,
        lives: u8,
        guessed: BTreeSet<Letter>,
        game_over: bool,
        won: bool,
        target_word: Option<String>,
    ) -> Self {
        Self {
            pattern,
            lives,
            guessed,
            game_over,
            won,
            target_word: target_word.filter(|_| game_over),
        }
    }
}

/// Outcome of a player guess or an AI move.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct MoveOutcome {
    /// Round state after the move.
    snapshot: Snapshot,
    /// Whether the guessed letter is in the word.
    correct: bool,
    /// Letter the service played; always present for AI moves.
    letter: Option<Letter>,
}

/// One past guess as recorded by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct GuessRecord {
    /// Letter guessed.
    pub letter: Letter,
    /// Whether it was in the word.
    pub correct: bool,
}

/// Current server state plus guess history.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct StateSnapshot {
    /// Round state.
    snapshot: Snapshot,
    /// Guesses in the order they were made.
    history: Vec<GuessRecord>,
}

/// A letter the oracle recommends, with its estimated probability.
#[derive(Debug, Clone, Copy, PartialEq, new)]
pub struct HintSuggestion {
    /// Suggested letter.
    pub letter: Letter,
    /// Probability in `[0, 1]`.
    pub probability: f64,
}

// ── Request bodies ─────────────────────────────────────────────

/// Body of `POST /api/new-game`.
#[derive(Debug, Serialize)]
pub struct NewGameBody<'a> {
    /// `random` or `custom`.
    pub mode: &'static str,
    /// Target word for custom rounds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<&'a str>,
}

impl<'a> From<&'a RoundMode> for NewGameBody<'a> {
    fn from(mode: &'a RoundMode) -> Self {
        Self {
            mode: mode.as_str(),
            word: mode.word(),
        }
    }
}

/// Body of `POST /api/guess`.
#[derive(Debug, Serialize)]
pub struct GuessBody {
    /// Guessed letter.
    pub letter: Letter,
}

// ── Response bodies ────────────────────────────────────────────

/// Body of any non-success response.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure reason.
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `POST /api/init`.
#[derive(Debug, Deserialize)]
pub struct InitBody {
    #[serde(default)]
    corpus_size: Option<usize>,
    #[serde(default)]
    test_size: Option<usize>,
}

impl From<InitBody> for InitReport {
    fn from(body: InitBody) -> Self {
        Self::new(body.corpus_size, body.test_size)
    }
}

/// Body of `POST /api/new-game`.
#[derive(Debug, Deserialize)]
pub struct NewGameResponseBody {
    pattern: String,
    lives: u8,
}

impl From<NewGameResponseBody> for RoundStart {
    fn from(body: NewGameResponseBody) -> Self {
        Self::new(body.pattern, body.lives)
    }
}

/// Body of `POST /api/guess` and `POST /api/ai-play`.
#[derive(Debug, Deserialize)]
pub struct MoveBody {
    pattern: String,
    lives: u8,
    #[serde(default)]
    guessed: Vec<String>,
    game_over: bool,
    won: bool,
    correct: bool,
    #[serde(default)]
    letter: Option<String>,
    #[serde(default)]
    target_word: Option<String>,
}

impl TryFrom<MoveBody> for MoveOutcome {
    type Error = ApiError;

    fn try_from(body: MoveBody) -> Result<Self, Self::Error> {
        let letter = body.letter.as_deref().map(parse_letter).transpose()?;
        let guessed = parse_guessed(&body.guessed)?;
        let snapshot = Snapshot::new(
            body.pattern,
            body.lives,
            guessed,
            body.game_over,
            body.won,
            body.target_word,
        );
        Ok(Self::new(snapshot, body.correct, letter))
    }
}

/// One entry of `suggestions` in `GET /api/ai-hint`.
#[derive(Debug, Deserialize)]
pub struct SuggestionBody {
    letter: String,
    probability: f64,
}

/// Body of `GET /api/ai-hint`.
#[derive(Debug, Deserialize)]
pub struct HintBody {
    #[serde(default)]
    suggestions: Vec<SuggestionBody>,
}

impl TryFrom<HintBody> for Vec<HintSuggestion> {
    type Error = ApiError;

    fn try_from(body: HintBody) -> Result<Self, Self::Error> {
        body.suggestions
            .into_iter()
            .map(|s| {
                let letter = parse_letter(&s.letter)?;
                let probability = if s.probability.is_finite() {
                    s.probability.clamp(0.0, 1.0)
                } else {
                    warn!(letter = %letter, "Non-finite hint probability");
                    0.0
                };
                Ok(HintSuggestion::new(letter, probability))
            })
            .collect()
    }
}

/// One entry of `history` in `GET /api/game-state`.
#[derive(Debug, Deserialize)]
pub struct HistoryBody {
    letter: String,
    correct: bool,
}

/// Body of `GET /api/game-state`.
#[derive(Debug, Deserialize)]
pub struct StateBody {
    pattern: String,
    lives: u8,
    #[serde(default)]
    guessed: Vec<String>,
    game_over: bool,
    won: bool,
    #[serde(default)]
    target_word: Option<String>,
    #[serde(default)]
    history: Vec<HistoryBody>,
}

impl TryFrom<StateBody> for StateSnapshot {
    type Error = ApiError;

    fn try_from(body: StateBody) -> Result<Self, Self::Error> {
        let guessed = parse_guessed(&body.guessed)?;
        let history = body
            .history
            .iter()
            .map(|h| Ok(GuessRecord::new(parse_letter(&h.letter)?, h.correct)))
            .collect::<Result<Vec<_>, ApiError>>()?;
        let snapshot = Snapshot::new(
            body.pattern,
            body.lives,
            guessed,
            body.game_over,
            body.won,
            body.target_word,
        );
        Ok(Self::new(snapshot, history))
    }
}

#[track_caller]
fn parse_letter(raw: &str) -> Result<Letter, ApiError> {
    Letter::parse(raw)
        .ok_or_else(|| ApiError::new(format!("Invalid letter in response: {:?}", raw)))
}

fn parse_guessed(raw: &[String]) -> Result<BTreeSet<Letter>, ApiError> {
    raw.iter().map(|s| parse_letter(s)).collect()
}
