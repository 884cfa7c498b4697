//! In-memory hangman service for driving the orchestrator in tests.

#![allow(dead_code)]

use std::collections::{BTreeSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use strictly_hangman::{
    ApiError, GuessRecord, HangmanApi, HintSuggestion, InitReport, Letter, MAX_LIVES,
    MoveOutcome, RoundMode, RoundStart, Snapshot, StateSnapshot,
};

/// One recorded call against the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Initialize,
    StartRound { mode: &'static str, word: Option<String> },
    Guess(char),
    Hint,
    AiMove,
    FetchState,
}

#[derive(Debug, Default)]
struct Game {
    target: String,
    guessed: BTreeSet<Letter>,
    history: Vec<GuessRecord>,
    lives: u8,
}

impl Game {
    fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            lives: MAX_LIVES,
            ..Self::default()
        }
    }

    fn pattern(&self) -> String {
        self.target
            .chars()
            .map(|c| match Letter::new(c) {
                Some(l) if self.guessed.contains(&l) => c,
                _ => '_',
            })
            .collect()
    }

    fn won(&self) -> bool {
        !self.pattern().contains('_')
    }

    fn over(&self) -> bool {
        self.won() || self.lives == 0
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.pattern(),
            self.lives,
            self.guessed.clone(),
            self.over(),
            self.won(),
            Some(self.target.clone()),
        )
    }

    fn play(&mut self, letter: Letter) -> Result<bool, ApiError> {
        if self.over() {
            return Err(ApiError::service(400, Some("Game is over".to_string())));
        }
        if !self.guessed.insert(letter) {
            return Err(ApiError::service(400, Some("Letter already guessed".to_string())));
        }
        let correct = self.target.contains(letter.as_char());
        if !correct {
            self.lives -= 1;
        }
        self.history.push(GuessRecord::new(letter, correct));
        Ok(correct)
    }
}

#[derive(Debug, Default)]
struct State {
    random_words: VecDeque<String>,
    game: Option<Game>,
    ai_order: Vec<char>,
    calls: Vec<Call>,
    init_failures: usize,
    ai_failures: usize,
    guess_failures: usize,
    hint_failure: bool,
    guess_delay: Option<Duration>,
    truncate_patterns: bool,
}

/// Scriptable in-memory hangman service.
///
/// Random rounds take words from a queue; the AI plays letters in a fixed
/// order, skipping ones already tried.
#[derive(Debug, Default)]
pub struct FakeHangman {
    state: Mutex<State>,
}

impl FakeHangman {
    /// Fake whose random rounds use `words` in order.
    pub fn with_words(words: &[&str]) -> Self {
        let fake = Self::default();
        {
            let mut state = fake.state.lock().expect("lock");
            state.random_words = words.iter().map(|w| w.to_string()).collect();
            state.ai_order = "etaoinshrdlcumwfgypbvkjxqz".chars().collect();
        }
        fake
    }

    pub fn set_ai_order(&self, order: &str) {
        self.state.lock().expect("lock").ai_order = order.chars().collect();
    }

    pub fn fail_initialize(&self, times: usize) {
        self.state.lock().expect("lock").init_failures = times;
    }

    pub fn fail_ai_moves(&self, times: usize) {
        self.state.lock().expect("lock").ai_failures = times;
    }

    pub fn fail_guesses(&self, times: usize) {
        self.state.lock().expect("lock").guess_failures = times;
    }

    pub fn fail_hints(&self) {
        self.state.lock().expect("lock").hint_failure = true;
    }

    /// Delays guess responses (the server state changes immediately).
    pub fn delay_guesses(&self, delay: Duration) {
        self.state.lock().expect("lock").guess_delay = Some(delay);
    }

    /// Makes guess and state responses report a pattern one letter short.
    pub fn truncate_patterns(&self) {
        self.state.lock().expect("lock").truncate_patterns = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().expect("lock").calls.clone()
    }

    pub fn count(&self, wanted: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| wanted(c)).count()
    }

    fn record(&self, call: Call) -> std::sync::MutexGuard<'_, State> {
        let mut state = self.state.lock().expect("lock");
        state.calls.push(call);
        state
    }
}

#[async_trait::async_trait]
impl HangmanApi for FakeHangman {
    async fn initialize(&self) -> Result<InitReport, ApiError> {
        let mut state = self.record(Call::Initialize);
        if state.init_failures > 0 {
            state.init_failures -= 1;
            return Err(ApiError::service(500, Some("corpus missing".to_string())));
        }
        Ok(InitReport::new(Some(1000), Some(state.random_words.len())))
    }

    async fn start_round(&self, mode: RoundMode) -> Result<RoundStart, ApiError> {
        let mut state = self.record(Call::StartRound {
            mode: mode.as_str(),
            word: mode.word().map(str::to_string),
        });
        let word = match mode.word() {
            Some(word) => word.to_string(),
            None => state
                .random_words
                .pop_front()
                .ok_or_else(|| ApiError::service(400, Some("No words left".to_string())))?,
        };
        let game = Game::new(&word);
        let start = RoundStart::new(game.pattern(), game.lives);
        state.game = Some(game);
        Ok(start)
    }

    async fn submit_guess(&self, letter: Letter) -> Result<MoveOutcome, ApiError> {
        let (result, delay) = {
            let mut state = self.record(Call::Guess(letter.as_char()));
            let delay = state.guess_delay;
            let truncate = state.truncate_patterns;
            if state.guess_failures > 0 {
                state.guess_failures -= 1;
                (Err(ApiError::new("connection reset")), delay)
            } else {
                let game = state
                    .game
                    .as_mut()
                    .ok_or_else(|| ApiError::service(400, Some("No active game".to_string())))?;
                let result = game.play(letter).map(|correct| {
                    MoveOutcome::new(snapshot_of(game, truncate), correct, None)
                });
                (result, delay)
            }
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn request_hint(&self) -> Result<Vec<HintSuggestion>, ApiError> {
        let state = self.record(Call::Hint);
        if state.hint_failure {
            return Err(ApiError::new("timed out"));
        }
        let game = state
            .game
            .as_ref()
            .ok_or_else(|| ApiError::service(400, Some("No active game".to_string())))?;
        Ok(state
            .ai_order
            .iter()
            .filter_map(|c| Letter::new(*c))
            .filter(|l| !game.guessed.contains(l))
            .take(3)
            .zip([0.5, 0.3, 0.2])
            .map(|(letter, p)| HintSuggestion::new(letter, p))
            .collect())
    }

    async fn request_ai_move(&self) -> Result<MoveOutcome, ApiError> {
        let mut state = self.record(Call::AiMove);
        if state.ai_failures > 0 {
            state.ai_failures -= 1;
            return Err(ApiError::service(500, Some("oracle crashed".to_string())));
        }
        let order = state.ai_order.clone();
        let game = state
            .game
            .as_mut()
            .ok_or_else(|| ApiError::service(400, Some("No active game".to_string())))?;
        let letter = order
            .iter()
            .filter_map(|c| Letter::new(*c))
            .find(|l| !game.guessed.contains(l))
            .ok_or_else(|| ApiError::new("no letters left"))?;
        let correct = game.play(letter)?;
        Ok(MoveOutcome::new(game.snapshot(), correct, Some(letter)))
    }

    async fn fetch_state(&self) -> Result<StateSnapshot, ApiError> {
        let state = self.record(Call::FetchState);
        let game = state
            .game
            .as_ref()
            .ok_or_else(|| ApiError::service(400, Some("No active game".to_string())))?;
        Ok(StateSnapshot::new(
            snapshot_of(game, state.truncate_patterns),
            game.history.clone(),
        ))
    }
}

fn snapshot_of(game: &Game, truncate: bool) -> Snapshot {
    let snapshot = game.snapshot();
    if !truncate {
        return snapshot;
    }
    let mut pattern = snapshot.pattern().clone();
    pattern.pop();
    Snapshot::new(
        pattern,
        *snapshot.lives(),
        snapshot.guessed().clone(),
        *snapshot.game_over(),
        *snapshot.won(),
        snapshot.target_word().clone(),
    )
}
