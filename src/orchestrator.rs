//! Game orchestration: the client-side state machine.
//!
//! All mutation happens in [`Orchestrator::dispatch`] (player commands) and
//! [`Orchestrator::apply`] (completions and timer ticks). Requests run on
//! spawned tasks and report back over the orchestrator's own channel. Moves,
//! hints and refreshes are tagged with the round of the live session; round
//! starts carry their own request number so only the newest one lands.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::{
    ApiError, AutoPlayScheduler, AutoPlayTick, CustomWord, GameSession, HangmanApi,
    HintSuggestion, Letter, MoveOutcome, RoundId, RoundMode, RoundStart, StateSnapshot, Tone,
    UiState, can_guess,
};

const BOOTSTRAP_FAILED: &str =
    "Failed to initialize game. Make sure the hangman service is running.";
const NEW_ROUND_FAILED: &str = "Failed to start new game";
const GUESS_FAILED: &str = "Failed to make guess";
const HINT_FAILED: &str = "Failed to get AI hint";
const AI_MOVE_FAILED: &str = "Failed to let AI play";
const RESYNC_FAILED: &str = "Failed to refresh game state";

/// Top-level phase of the client.
#[derive(Debug, Clone, PartialEq, Eq, strum::AsRefStr)]
pub enum Phase {
    /// Initializing the service and starting the first round.
    Loading,
    /// Start-up failed; only [`Command::Retry`] is accepted.
    Error(String),
    /// A round is being played.
    Active,
    /// The round is over; a new round may be started.
    Terminal,
}

/// Player intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Guess a letter.
    Guess(char),
    /// Ask the oracle for suggestions.
    RequestHint,
    /// Let the oracle play one letter.
    AiMove,
    /// Switch auto-play on or off.
    ToggleAutoPlay,
    /// Start a round with a service-chosen word.
    NewRandomRound,
    /// Open the custom-word prompt.
    OpenCustomWord,
    /// Type into the custom-word prompt.
    CustomWordInput(char),
    /// Delete the last character of the custom-word draft.
    CustomWordBackspace,
    /// Validate the draft and start a custom round.
    SubmitCustomWord,
    /// Close the prompt, discarding the draft.
    CancelCustomWord,
    /// Retry start-up after a failure.
    Retry,
    /// Re-read the round state from the service.
    Resync,
}

/// What produced a move completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// The player guessed this letter.
    Guess(Letter),
    /// The oracle played; `auto` when triggered by auto-play.
    AiMove {
        /// Whether auto-play issued the request.
        auto: bool,
    },
}

/// Completions and ticks delivered to the orchestrator's loop.
#[derive(Debug)]
pub enum OrchestratorEvent {
    /// `initialize` + first `start_round` finished.
    Bootstrapped {
        /// Round-start request number at dispatch.
        request: u64,
        /// Outcome.
        result: Result<RoundStart, ApiError>,
    },
    /// A later `start_round` finished.
    RoundStarted {
        /// Round-start request number at dispatch.
        request: u64,
        /// Outcome.
        result: Result<RoundStart, ApiError>,
    },
    /// A guess or AI move finished.
    Moved {
        /// Round tag at dispatch.
        round: RoundId,
        /// Which action it was.
        kind: MoveKind,
        /// Outcome.
        result: Result<MoveOutcome, ApiError>,
    },
    /// A hint request finished.
    Hinted {
        /// Round tag at dispatch.
        round: RoundId,
        /// Session revision at dispatch.
        revision: u64,
        /// Outcome.
        result: Result<Vec<HintSuggestion>, ApiError>,
    },
    /// A state refresh finished.
    Resynced {
        /// Round tag at dispatch.
        round: RoundId,
        /// Outcome.
        result: Result<StateSnapshot, ApiError>,
    },
    /// The auto-play timer fired.
    AutoPlay(AutoPlayTick),
}

impl From<AutoPlayTick> for OrchestratorEvent {
    fn from(tick: AutoPlayTick) -> Self {
        Self::AutoPlay(tick)
    }
}

/// How an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// State was updated.
    Applied,
    /// The event belonged to a superseded round, revision or round-start
    /// request and was dropped.
    Stale,
    /// The event was no longer relevant (e.g. a tick after disabling).
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InFlight {
    Guess(Letter),
    AiMove,
    Resync,
}

/// Owns the live [`GameSession`], the [`UiState`] and the auto-play
/// scheduler, and sequences every request against the service.
pub struct Orchestrator<A> {
    api: Arc<A>,
    phase: Phase,
    session: Option<GameSession>,
    ui: UiState,
    round: RoundId,
    revision: u64,
    start_request: u64,
    round_pending: bool,
    in_flight: Option<InFlight>,
    auto_play: AutoPlayScheduler<OrchestratorEvent>,
    events_tx: mpsc::UnboundedSender<OrchestratorEvent>,
    events_rx: mpsc::UnboundedReceiver<OrchestratorEvent>,
}

impl<A: HangmanApi + 'static> Orchestrator<A> {
    /// Creates an orchestrator in the `Loading` phase.
    ///
    /// Nothing is sent until [`start`](Self::start) is called.
    pub fn new(api: Arc<A>, auto_play_delay: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let auto_play = AutoPlayScheduler::new(auto_play_delay, events_tx.clone());
        Self {
            api,
            phase: Phase::Loading,
            session: None,
            ui: UiState::default(),
            round: RoundId::default(),
            revision: 0,
            start_request: 0,
            round_pending: false,
            in_flight: None,
            auto_play,
            events_tx,
            events_rx,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Live session, once a round has started.
    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    /// Banner, hints and custom-word draft.
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// Auto-play scheduler.
    pub fn auto_play(&self) -> &AutoPlayScheduler<OrchestratorEvent> {
        &self.auto_play
    }

    /// Identifier of the live session's round.
    pub fn round(&self) -> RoundId {
        self.round
    }

    /// Whether a round start or state-changing request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.round_pending || self.in_flight.is_some()
    }

    /// Letter of the player guess awaiting a response, if any.
    pub fn pending_guess(&self) -> Option<Letter> {
        match self.in_flight {
            Some(InFlight::Guess(letter)) => Some(letter),
            _ => None,
        }
    }

    /// Whether an AI move is awaiting a response.
    pub fn ai_move_pending(&self) -> bool {
        self.in_flight == Some(InFlight::AiMove)
    }

    /// Whether a guess of `letter` would be dispatched right now.
    pub fn can_guess(&self, letter: Letter) -> bool {
        self.phase == Phase::Active && !self.is_busy() && can_guess(self.session(), letter)
    }

    /// Initializes the service and starts the first round.
    #[instrument(skip(self))]
    pub fn start(&mut self) {
        self.phase = Phase::Loading;
        self.session = None;
        self.ui.reset();
        self.auto_play.disable();
        self.in_flight = None;

        let request = self.next_start_request();
        info!(request, "Bootstrapping");
        self.spawn(move |api| async move {
            let result = bootstrap(api.as_ref()).await;
            OrchestratorEvent::Bootstrapped { request, result }
        });
    }

    /// Handles a player command. Commands that do not fit the current phase
    /// are ignored.
    #[instrument(skip(self), fields(phase = self.phase.as_ref()))]
    pub fn dispatch(&mut self, command: Command) {
        debug!("Dispatching command");
        match command {
            Command::Guess(c) => self.guess(c),
            Command::RequestHint => self.request_hint(),
            Command::AiMove => {
                self.ai_move(false);
            }
            Command::ToggleAutoPlay => self.toggle_auto_play(),
            Command::NewRandomRound => self.new_round(RoundMode::Random),
            Command::OpenCustomWord => self.open_custom_word(),
            Command::CustomWordInput(c) => self.ui.push_custom_char(c),
            Command::CustomWordBackspace => self.ui.pop_custom_char(),
            Command::SubmitCustomWord => self.submit_custom_word(),
            Command::CancelCustomWord => self.ui.close_custom_word(),
            Command::Retry => self.retry(),
            Command::Resync => self.resync(),
        }
    }

    /// Waits for the next completion or tick and applies it.
    pub async fn step(&mut self) -> StepOutcome {
        // The orchestrator holds a sender, so the channel never closes.
        match self.events_rx.recv().await {
            Some(event) => self.apply(event),
            None => StepOutcome::Ignored,
        }
    }

    /// Applies every event that is already waiting, returning how many.
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            handled += 1;
        }
        handled
    }

    /// Applies one completion or tick.
    #[instrument(skip_all, fields(current = %self.round))]
    pub fn apply(&mut self, event: OrchestratorEvent) -> StepOutcome {
        match event {
            OrchestratorEvent::Bootstrapped { request, result } => {
                if self.is_superseded_start(request) {
                    return StepOutcome::Stale;
                }
                self.finish_bootstrap(result)
            }
            OrchestratorEvent::RoundStarted { request, result } => {
                if self.is_superseded_start(request) {
                    return StepOutcome::Stale;
                }
                self.finish_round_start(result)
            }
            OrchestratorEvent::Moved {
                round,
                kind,
                result,
            } => {
                if self.is_stale(round) {
                    return StepOutcome::Stale;
                }
                self.finish_move(kind, result)
            }
            OrchestratorEvent::Hinted {
                round,
                revision,
                result,
            } => {
                if self.is_stale(round) {
                    return StepOutcome::Stale;
                }
                if revision != self.revision {
                    debug!(revision, current = self.revision, "Dropping outdated hints");
                    return StepOutcome::Stale;
                }
                self.finish_hint(result)
            }
            OrchestratorEvent::Resynced { round, result } => {
                if self.is_stale(round) {
                    return StepOutcome::Stale;
                }
                self.finish_resync(result)
            }
            OrchestratorEvent::AutoPlay(tick) => self.on_tick(tick),
        }
    }

    /// Stops auto-play and cancels its timer.
    #[instrument(skip(self))]
    pub fn shutdown(&mut self) {
        info!("Shutting down orchestrator");
        self.auto_play.disable();
    }

    // ── Commands ───────────────────────────────────────────────

    fn guess(&mut self, c: char) {
        let Some(letter) = Letter::new(c) else {
            debug!(input = %c, "Ignoring non-letter guess");
            return;
        };
        if !self.can_guess(letter) {
            debug!(letter = %letter, busy = self.is_busy(), "Guess refused");
            return;
        }

        self.in_flight = Some(InFlight::Guess(letter));
        let round = self.round;
        info!(letter = %letter, round = %round, "Submitting guess");
        self.spawn(move |api| async move {
            let result = api.submit_guess(letter).await;
            OrchestratorEvent::Moved {
                round,
                kind: MoveKind::Guess(letter),
                result,
            }
        });
    }

    /// Returns whether a request was sent.
    fn ai_move(&mut self, auto: bool) -> bool {
        if !self.session_active() || self.is_busy() {
            debug!(auto, busy = self.is_busy(), "AI move refused");
            return false;
        }

        self.in_flight = Some(InFlight::AiMove);
        let round = self.round;
        info!(auto, round = %round, "Requesting AI move");
        self.spawn(move |api| async move {
            let result = api.request_ai_move().await;
            OrchestratorEvent::Moved {
                round,
                kind: MoveKind::AiMove { auto },
                result,
            }
        });
        true
    }

    fn request_hint(&mut self) {
        if !self.session_active() || self.round_pending {
            debug!("Hint refused");
            return;
        }

        let round = self.round;
        let revision = self.revision;
        debug!(round = %round, revision, "Requesting hint");
        self.spawn(move |api| async move {
            let result = api.request_hint().await;
            OrchestratorEvent::Hinted {
                round,
                revision,
                result,
            }
        });
    }

    fn toggle_auto_play(&mut self) {
        if self.auto_play.is_enabled() {
            self.auto_play.disable();
            return;
        }
        if !self.session_active() || self.round_pending {
            debug!("Auto-play needs an active round");
            return;
        }
        self.auto_play.enable();
    }

    fn new_round(&mut self, mode: RoundMode) {
        if matches!(self.phase, Phase::Loading | Phase::Error(_)) {
            debug!("New round refused before start-up completes");
            return;
        }

        self.auto_play.disable();
        // A move still in flight keeps its round tag: it lands if this start
        // fails and is dropped once the new round is installed.
        let request = self.next_start_request();
        info!(request, mode = mode.as_str(), "Starting new round");
        self.spawn(move |api| async move {
            let result = api.start_round(mode).await;
            OrchestratorEvent::RoundStarted { request, result }
        });
    }

    fn open_custom_word(&mut self) {
        if matches!(self.phase, Phase::Active | Phase::Terminal) {
            self.ui.open_custom_word();
        }
    }

    fn submit_custom_word(&mut self) {
        let Some(draft) = self.ui.custom_word().clone() else {
            return;
        };
        match CustomWord::parse(&draft) {
            Ok(word) => self.new_round(RoundMode::Custom(word)),
            Err(e) => {
                info!(error = %e, "Custom word rejected");
                self.ui.set_banner(e.to_string(), Tone::Failure);
            }
        }
    }

    fn retry(&mut self) {
        if matches!(self.phase, Phase::Error(_)) {
            self.start();
        } else {
            debug!("Retry only applies after a start-up failure");
        }
    }

    fn resync(&mut self) {
        if !matches!(self.phase, Phase::Active | Phase::Terminal) || self.is_busy() {
            debug!("Resync refused");
            return;
        }

        self.in_flight = Some(InFlight::Resync);
        let round = self.round;
        info!(round = %round, "Refreshing game state");
        self.spawn(move |api| async move {
            let result = api.fetch_state().await;
            OrchestratorEvent::Resynced { round, result }
        });
    }

    // ── Completions ────────────────────────────────────────────

    fn finish_bootstrap(&mut self, result: Result<RoundStart, ApiError>) -> StepOutcome {
        self.round_pending = false;
        match result {
            Ok(start) => {
                info!(pattern = %start.pattern, lives = start.lives, "Start-up complete");
                self.install_round(start);
            }
            Err(e) => {
                warn!(error = %e, "Start-up failed");
                self.phase = Phase::Error(BOOTSTRAP_FAILED.to_string());
            }
        }
        StepOutcome::Applied
    }

    fn finish_round_start(&mut self, result: Result<RoundStart, ApiError>) -> StepOutcome {
        self.round_pending = false;
        match result {
            Ok(start) => {
                info!(pattern = %start.pattern, lives = start.lives, "Round started");
                self.install_round(start);
            }
            Err(e) => {
                warn!(error = %e, "New round failed");
                self.ui.set_banner(e.user_message(NEW_ROUND_FAILED), Tone::Failure);
                self.resume_auto_play();
            }
        }
        StepOutcome::Applied
    }

    fn finish_move(
        &mut self,
        kind: MoveKind,
        result: Result<MoveOutcome, ApiError>,
    ) -> StepOutcome {
        self.in_flight = None;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, ?kind, "Move failed");
                match kind {
                    MoveKind::Guess(_) => {
                        self.ui.set_banner(e.user_message(GUESS_FAILED), Tone::Failure);
                        self.resume_auto_play();
                    }
                    MoveKind::AiMove { .. } => {
                        self.ui.set_banner(AI_MOVE_FAILED, Tone::Failure);
                        self.auto_play.disable();
                    }
                }
                return StepOutcome::Applied;
            }
        };

        let next = GameSession::from_snapshot(self.round, outcome.snapshot());
        if !self.accept_successor(&next) {
            match kind {
                MoveKind::AiMove { .. } => self.auto_play.disable(),
                MoveKind::Guess(_) => self.resume_auto_play(),
            }
            return StepOutcome::Applied;
        }

        let correct = *outcome.correct();
        let letter = match kind {
            MoveKind::Guess(letter) => Some(letter),
            MoveKind::AiMove { .. } => *outcome.letter(),
        };
        let shown = letter.map_or('?', Letter::to_upper);
        let (text, tone) = match (kind, correct) {
            (MoveKind::Guess(_), true) => (
                format!("Great! \"{}\" is in the word!", shown),
                Tone::Success,
            ),
            (MoveKind::Guess(_), false) => (
                format!("Sorry, \"{}\" is not in the word.", shown),
                Tone::Failure,
            ),
            (MoveKind::AiMove { .. }, true) => (
                format!("AI guessed \"{}\" - Correct!", shown),
                Tone::Success,
            ),
            (MoveKind::AiMove { .. }, false) => (
                format!("AI guessed \"{}\" - Wrong!", shown),
                Tone::Failure,
            ),
        };
        info!(
            letter = ?letter,
            correct,
            lives = next.lives(),
            pattern = %next.pattern(),
            "Move applied"
        );

        self.replace_session(next);
        self.ui.set_banner(text, tone);
        self.settle();
        StepOutcome::Applied
    }

    fn finish_hint(&mut self, result: Result<Vec<HintSuggestion>, ApiError>) -> StepOutcome {
        match result {
            Ok(hints) if hints.is_empty() => {
                self.ui.clear_hints();
                self.ui.set_banner("The oracle has no suggestions", Tone::Info);
            }
            Ok(hints) => {
                debug!(count = hints.len(), "Hints received");
                self.ui.show_hints(hints);
            }
            Err(e) => {
                warn!(error = %e, "Hint failed");
                self.ui.set_banner(HINT_FAILED, Tone::Failure);
            }
        }
        StepOutcome::Applied
    }

    fn finish_resync(&mut self, result: Result<StateSnapshot, ApiError>) -> StepOutcome {
        self.in_flight = None;
        match result {
            Ok(state) => {
                let next = GameSession::from_snapshot(self.round, state.snapshot());
                if !self.accept_successor(&next) {
                    self.resume_auto_play();
                    return StepOutcome::Applied;
                }
                let guesses = state.history().len();
                info!(history = guesses, "Game state refreshed");
                self.replace_session(next);
                self.ui.set_banner(
                    format!("Game state refreshed ({} guesses so far)", guesses),
                    Tone::Info,
                );
                self.settle();
            }
            Err(e) => {
                warn!(error = %e, "Resync failed");
                self.ui.set_banner(e.user_message(RESYNC_FAILED), Tone::Failure);
                self.resume_auto_play();
            }
        }
        StepOutcome::Applied
    }

    fn on_tick(&mut self, tick: AutoPlayTick) -> StepOutcome {
        if !self.auto_play.accept_tick(tick) {
            return StepOutcome::Ignored;
        }
        if !self.session_active() {
            self.auto_play.halt_on_terminal();
            return StepOutcome::Applied;
        }
        if !self.ai_move(true) {
            // The outstanding request re-arms the timer when it completes.
            debug!("Auto-play tick deferred behind in-flight request");
        }
        StepOutcome::Applied
    }

    // ── Helpers ────────────────────────────────────────────────

    fn spawn<F, Fut>(&self, request: F)
    where
        F: FnOnce(Arc<A>) -> Fut,
        Fut: Future<Output = OrchestratorEvent> + Send + 'static,
    {
        let fut = request(Arc::clone(&self.api));
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let event = fut.await;
            // Receiver gone means the orchestrator was torn down.
            let _ = events.send(event);
        });
    }

    /// Issues a round-start request number and marks a start as pending.
    fn next_start_request(&mut self) -> u64 {
        self.start_request += 1;
        self.round_pending = true;
        self.start_request
    }

    fn is_superseded_start(&self, request: u64) -> bool {
        if request != self.start_request {
            debug!(
                request,
                current = self.start_request,
                "Dropping superseded round start"
            );
            return true;
        }
        false
    }

    fn is_stale(&self, round: RoundId) -> bool {
        if round != self.round {
            debug!(event_round = %round, "Dropping completion from superseded round");
            return true;
        }
        false
    }

    fn session_active(&self) -> bool {
        self.phase == Phase::Active && self.session.as_ref().is_some_and(|s| !s.is_over())
    }

    fn install_round(&mut self, start: RoundStart) {
        // Completions tagged with the previous round are stale from here on.
        self.round = self.round.next();
        self.session = Some(GameSession::started(self.round, start));
        self.revision += 1;
        self.in_flight = None;
        self.ui.reset();
        self.auto_play.disable();
        self.phase = Phase::Active;
    }

    /// Checks `next` against the live session, reporting a conflict on the
    /// banner.
    fn accept_successor(&mut self, next: &GameSession) -> bool {
        let Some(current) = self.session.as_ref() else {
            return true;
        };
        match current.check_successor(next) {
            Ok(()) => true,
            Err(conflict) => {
                warn!(%conflict, "Rejecting inconsistent game state");
                self.ui.set_banner(
                    format!("Service sent an inconsistent game state: {}", conflict),
                    Tone::Failure,
                );
                false
            }
        }
    }

    fn replace_session(&mut self, next: GameSession) {
        self.session = Some(next);
        self.revision += 1;
        self.ui.clear_hints();
    }

    /// Moves to `Terminal` if the round ended, otherwise keeps auto-play
    /// going.
    fn settle(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if !session.is_over() {
            self.resume_auto_play();
            return;
        }

        let word = session
            .revealed_word()
            .map(str::to_uppercase)
            .unwrap_or_else(|| "?".to_string());
        let (ending, tone) = if session.is_won() {
            (format!("You won! The word was: {}", word), Tone::Success)
        } else {
            (format!("Game over! The word was: {}", word), Tone::Failure)
        };
        info!(won = session.is_won(), word = %word, "Round over");

        let text = match self.ui.banner() {
            Some(banner) => format!("{} {}", banner.text(), ending),
            None => ending,
        };
        self.ui.set_banner(text, tone);
        self.phase = Phase::Terminal;
        self.auto_play.halt_on_terminal();
    }

    fn resume_auto_play(&mut self) {
        if self.auto_play.is_enabled()
            && self.auto_play.pending() == 0
            && self.session_active()
            && !self.is_busy()
        {
            self.auto_play.arm();
        }
    }
}

async fn bootstrap<A: HangmanApi + ?Sized>(api: &A) -> Result<RoundStart, ApiError> {
    let report = api.initialize().await?;
    debug!(?report, "Service ready");
    api.start_round(RoundMode::Random).await
}
