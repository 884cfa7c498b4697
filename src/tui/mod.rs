//! Terminal UI for Strictly Hangman.

mod input;
mod ui;

pub use input::{KeyAction, map_key};
pub use ui::draw;

use std::io::{self, Stdout};
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::time::Duration;
use tracing::{debug, error, info, instrument};

use crate::{ClientConfig, HangmanApi, HttpHangmanClient, Orchestrator};

/// How long to wait for a key before re-rendering.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Installs file logging so tracing output does not corrupt the TUI.
pub fn init_logging(config: &ClientConfig) -> Result<()> {
    let log_file = std::fs::File::create(config.log_file()).with_context(|| {
        format!("Failed to create log file {}", config.log_file().display())
    })?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,strictly_hangman=debug")
            }),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized
    Ok(())
}

/// Run the TUI client against the configured service.
#[instrument(skip_all, fields(server_url = %config.server_url()))]
pub async fn run_tui(config: ClientConfig) -> Result<()> {
    info!("Starting Strictly Hangman TUI");

    let client = HttpHangmanClient::new(config.server_url(), config.request_timeout())?;
    let mut orchestrator = Orchestrator::new(Arc::new(client), config.auto_play_delay());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    orchestrator.start();
    let res = run_loop(&mut terminal, &mut orchestrator).await;
    orchestrator.shutdown();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    res
}

/// Renders, applies completed requests, and forwards key presses until the
/// player quits.
async fn run_loop<A: HangmanApi + 'static>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    orchestrator: &mut Orchestrator<A>,
) -> Result<()> {
    loop {
        let applied = orchestrator.drain();
        if applied > 0 {
            debug!(applied, "Applied completions");
        }

        terminal.draw(|f| draw(f, orchestrator))?;

        if event::poll(INPUT_POLL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let open = orchestrator.ui().custom_word_open();
                match map_key(key, orchestrator.phase(), open) {
                    KeyAction::Quit => {
                        info!("User quit");
                        return Ok(());
                    }
                    KeyAction::Command(command) => orchestrator.dispatch(command),
                    KeyAction::Nothing => {}
                }
            }
        } else {
            // Let request tasks make progress between polls.
            tokio::task::yield_now().await;
        }
    }
}
