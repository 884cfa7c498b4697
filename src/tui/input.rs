//! Key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{Command, Phase};

/// What a key press asks the front end to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Leave the client.
    Quit,
    /// Forward to the orchestrator.
    Command(Command),
    /// Unbound key.
    Nothing,
}

/// Maps a key press to an action given the current phase and whether the
/// custom-word prompt has focus.
pub fn map_key(key: KeyEvent, phase: &Phase, custom_word_open: bool) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }

    if custom_word_open {
        return match key.code {
            KeyCode::Enter => KeyAction::Command(Command::SubmitCustomWord),
            KeyCode::Esc => KeyAction::Command(Command::CancelCustomWord),
            KeyCode::Backspace => KeyAction::Command(Command::CustomWordBackspace),
            KeyCode::Char(c) => KeyAction::Command(Command::CustomWordInput(c)),
            _ => KeyAction::Nothing,
        };
    }

    match (phase, key.code) {
        (_, KeyCode::Esc) => KeyAction::Quit,
        (Phase::Error(_), KeyCode::Enter | KeyCode::Char('r')) => {
            KeyAction::Command(Command::Retry)
        }
        (Phase::Error(_), KeyCode::Char('q')) => KeyAction::Quit,
        (Phase::Terminal, KeyCode::Enter) => KeyAction::Command(Command::NewRandomRound),
        (_, KeyCode::Char('1')) => KeyAction::Command(Command::RequestHint),
        (_, KeyCode::Char('2')) => KeyAction::Command(Command::AiMove),
        (_, KeyCode::Char('3')) => KeyAction::Command(Command::ToggleAutoPlay),
        (_, KeyCode::Char('4')) => KeyAction::Command(Command::NewRandomRound),
        (_, KeyCode::Char('5')) => KeyAction::Command(Command::OpenCustomWord),
        (_, KeyCode::Char('6')) => KeyAction::Command(Command::Resync),
        (_, KeyCode::Char(c)) if c.is_ascii_alphabetic() => {
            KeyAction::Command(Command::Guess(c))
        }
        _ => KeyAction::Nothing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_letters_guess_during_play() {
        assert_eq!(
            map_key(key(KeyCode::Char('E')), &Phase::Active, false),
            KeyAction::Command(Command::Guess('E'))
        );
    }

    #[test]
    fn test_prompt_captures_letters() {
        assert_eq!(
            map_key(key(KeyCode::Char('c')), &Phase::Active, true),
            KeyAction::Command(Command::CustomWordInput('c'))
        );
        assert_eq!(
            map_key(key(KeyCode::Esc), &Phase::Active, true),
            KeyAction::Command(Command::CancelCustomWord)
        );
    }

    #[test]
    fn test_retry_after_failure() {
        let phase = Phase::Error("down".to_string());
        assert_eq!(
            map_key(key(KeyCode::Char('r')), &phase, false),
            KeyAction::Command(Command::Retry)
        );
        assert_eq!(
            map_key(key(KeyCode::Char('q')), &phase, false),
            KeyAction::Quit
        );
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c, &Phase::Active, true), KeyAction::Quit);
    }

    #[test]
    fn test_enter_starts_new_round_when_over() {
        assert_eq!(
            map_key(key(KeyCode::Enter), &Phase::Terminal, false),
            KeyAction::Command(Command::NewRandomRound)
        );
        assert_eq!(
            map_key(key(KeyCode::Enter), &Phase::Active, false),
            KeyAction::Nothing
        );
    }
}
