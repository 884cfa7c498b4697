//! Auto-play scheduling.
//!
//! The scheduler owns at most one pending timer. When it fires it posts an
//! [`AutoPlayTick`] back to the owner's event channel; the owner decides,
//! against live state, whether an AI move is still wanted.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

/// Default delay between auto-play moves.
pub const DEFAULT_AUTO_PLAY_DELAY: Duration = Duration::from_secs(1);

/// Timer expiry for a given arming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoPlayTick {
    /// Generation of the arming that produced this tick.
    pub generation: u64,
}

/// Observable scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
pub enum AutoPlayState {
    /// Auto-play is off.
    Disabled,
    /// Enabled with a timer pending.
    Armed,
    /// Enabled with no timer pending; an AI move is in flight or about to be.
    Running,
    /// Was enabled when the round ended; nothing further is scheduled.
    DisarmedOnTerminal,
}

/// Self-rescheduling delayed trigger for AI moves.
///
/// Generic over the owner's event type so that ticks travel on the same
/// channel as every other completion.
#[derive(Debug)]
pub struct AutoPlayScheduler<E> {
    delay: Duration,
    enabled: bool,
    halted_on_terminal: bool,
    generation: u64,
    timer: Option<JoinHandle<()>>,
    events: mpsc::UnboundedSender<E>,
}

impl<E> AutoPlayScheduler<E>
where
    E: From<AutoPlayTick> + Send + 'static,
{
    /// Creates a disabled scheduler posting ticks to `events`.
    pub fn new(delay: Duration, events: mpsc::UnboundedSender<E>) -> Self {
        Self {
            delay,
            enabled: false,
            halted_on_terminal: false,
            generation: 0,
            timer: None,
            events,
        }
    }

    /// Current state.
    pub fn state(&self) -> AutoPlayState {
        match (self.enabled, self.timer.is_some()) {
            (true, true) => AutoPlayState::Armed,
            (true, false) => AutoPlayState::Running,
            (false, _) if self.halted_on_terminal => AutoPlayState::DisarmedOnTerminal,
            (false, _) => AutoPlayState::Disabled,
        }
    }

    /// Whether auto-play is switched on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of outstanding scheduled actions; never more than one.
    pub fn pending(&self) -> usize {
        usize::from(self.timer.is_some())
    }

    /// Delay between arming and firing.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Switches auto-play on and arms the first timer.
    #[instrument(skip(self))]
    pub fn enable(&mut self) {
        info!("Auto-play enabled");
        self.enabled = true;
        self.halted_on_terminal = false;
        self.arm();
    }

    /// Switches auto-play off and cancels any pending timer.
    #[instrument(skip(self))]
    pub fn disable(&mut self) {
        if self.enabled {
            info!("Auto-play disabled");
        }
        self.enabled = false;
        self.halted_on_terminal = false;
        self.cancel();
    }

    /// Stops scheduling because the round ended.
    #[instrument(skip(self))]
    pub fn halt_on_terminal(&mut self) {
        if self.enabled {
            info!("Round over, auto-play disarmed");
            self.halted_on_terminal = true;
        }
        self.enabled = false;
        self.cancel();
    }

    /// Schedules the next tick, cancelling any pending one first.
    ///
    /// Does nothing while disabled.
    #[instrument(skip(self), fields(generation = self.generation + 1))]
    pub fn arm(&mut self) {
        if !self.enabled {
            return;
        }
        self.cancel();
        self.generation += 1;

        let tick = AutoPlayTick {
            generation: self.generation,
        };
        let delay = self.delay;
        let events = self.events.clone();
        debug!(delay_ms = delay.as_millis() as u64, "Arming auto-play timer");
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the owner was torn down.
            let _ = events.send(E::from(tick));
        }));
    }

    /// Consumes a tick, returning whether it belongs to the current arming
    /// and auto-play is still enabled.
    #[instrument(skip(self), fields(current = self.generation))]
    pub fn accept_tick(&mut self, tick: AutoPlayTick) -> bool {
        if tick.generation != self.generation || self.timer.is_none() {
            debug!(generation = tick.generation, "Ignoring superseded tick");
            return false;
        }
        self.timer = None;
        if !self.enabled {
            debug!("Ignoring tick while disabled");
            return false;
        }
        true
    }

    fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            debug!(generation = self.generation, "Cancelling auto-play timer");
            timer.abort();
        }
    }
}

impl<E> Drop for AutoPlayScheduler<E> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
