//! Guess gating.

use crate::{GameSession, Letter};

/// Whether `letter` may be submitted against `session`.
///
/// False when there is no session, the round is over, or the letter was
/// already tried.
pub fn can_guess(session: Option<&GameSession>, letter: Letter) -> bool {
    match session {
        Some(s) => !s.is_over() && !s.has_guessed(letter),
        None => false,
    }
}
