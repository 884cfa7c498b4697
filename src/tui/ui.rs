//! Stateless UI rendering for hangman.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
    AutoPlayState, GameSession, HangmanApi, Letter, LetterStatus, MAX_LIVES, Orchestrator, Phase,
    Tone,
};

const KEYBOARD_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];

/// Draws the whole client.
pub fn draw<A: HangmanApi + 'static>(frame: &mut Frame, orchestrator: &Orchestrator<A>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(10),   // Game
            Constraint::Length(3), // Status
            Constraint::Length(3), // Help
        ])
        .split(frame.area());

    let title = Paragraph::new("Strictly Games - Hangman")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    match orchestrator.phase() {
        Phase::Loading => draw_centered(frame, chunks[1], "Loading AI Oracle...", Color::Cyan),
        Phase::Error(message) => draw_centered(frame, chunks[1], message, Color::Red),
        Phase::Active | Phase::Terminal => draw_game(frame, chunks[1], orchestrator),
    }

    draw_status(frame, chunks[2], orchestrator);

    let help = match orchestrator.phase() {
        Phase::Error(_) => "R/Enter: Retry | Esc: Quit",
        _ if orchestrator.ui().custom_word_open() => "Type a word | Enter: Start | Esc: Cancel",
        Phase::Terminal => "Enter/4: Random word | 5: Custom word | Esc: Quit",
        _ => {
            "a-z: Guess | 1: Hint | 2: AI play | 3: Auto play | 4: Random word | \
             5: Custom | 6: Refresh | Esc: Quit"
        }
    };
    let help = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[3]);
}

fn draw_centered(frame: &mut Frame, area: Rect, text: &str, color: Color) {
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn draw_game<A: HangmanApi + 'static>(
    frame: &mut Frame,
    area: Rect,
    orchestrator: &Orchestrator<A>,
) {
    let Some(session) = orchestrator.session() else {
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Pattern
            Constraint::Length(5), // Keyboard
            Constraint::Min(3),    // Custom word prompt
        ])
        .split(columns[0]);

    let pattern = Paragraph::new(pattern_line(session))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Word"));
    frame.render_widget(pattern, rows[0]);

    let keyboard = Paragraph::new(keyboard_lines(orchestrator, session))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Letters"));
    frame.render_widget(keyboard, rows[1]);

    if let Some(draft) = orchestrator.ui().custom_word() {
        let prompt = Paragraph::new(format!("> {}_", draft))
            .style(Style::default().fg(Color::White))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Enter your word (letters only)"),
            );
        frame.render_widget(prompt, rows[2]);
    }

    frame.render_widget(side_panel(orchestrator, session), columns[1]);
}

fn pattern_line(session: &GameSession) -> Line<'static> {
    let spans: Vec<Span> = session
        .pattern()
        .chars()
        .map(|c| match c {
            '_' => Span::styled(" _ ", Style::default().fg(Color::DarkGray)),
            c => Span::styled(
                format!(" {} ", c.to_ascii_uppercase()),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        })
        .collect();
    Line::from(spans)
}

fn keyboard_lines<A: HangmanApi + 'static>(
    orchestrator: &Orchestrator<A>,
    session: &GameSession,
) -> Vec<Line<'static>> {
    KEYBOARD_ROWS
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .chars()
                .filter_map(Letter::new)
                .map(|letter| {
                    let style = match session.letter_status(letter) {
                        LetterStatus::Hit => Style::default().fg(Color::Green),
                        LetterStatus::Miss => Style::default().fg(Color::Red),
                        LetterStatus::Untried if orchestrator.pending_guess() == Some(letter) => {
                            Style::default().fg(Color::Black).bg(Color::Yellow)
                        }
                        LetterStatus::Untried if orchestrator.can_guess(letter) => {
                            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                        }
                        LetterStatus::Untried => Style::default().fg(Color::DarkGray),
                    };
                    Span::styled(format!(" {} ", letter.to_upper()), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn side_panel<A: HangmanApi + 'static>(
    orchestrator: &Orchestrator<A>,
    session: &GameSession,
) -> Paragraph<'static> {
    let mut lines = vec![
        Line::from(format!("Lives: {}/{}", session.lives(), MAX_LIVES)),
        Line::from(format!("Guessed: {}", session.guessed_letters().len())),
        Line::from(format!(
            "Auto play: {}",
            auto_play_label(orchestrator.auto_play().state())
        )),
    ];
    if orchestrator.ai_move_pending() {
        lines.push(Line::from("AI is thinking..."));
    }

    let hints = orchestrator.ui().hints();
    if !hints.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "AI Suggestions:",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for hint in hints {
            lines.push(Line::from(format!(
                "  {}  {:>5.1}%",
                hint.letter.to_upper(),
                hint.probability * 100.0
            )));
        }
    }

    Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Round"))
}

fn auto_play_label(state: AutoPlayState) -> &'static str {
    match state {
        AutoPlayState::Disabled | AutoPlayState::DisarmedOnTerminal => "off",
        AutoPlayState::Armed | AutoPlayState::Running => "on",
    }
}

fn draw_status<A: HangmanApi + 'static>(
    frame: &mut Frame,
    area: Rect,
    orchestrator: &Orchestrator<A>,
) {
    let (text, color) = match orchestrator.ui().banner() {
        Some(banner) => {
            let color = match banner.tone() {
                Tone::Success => Color::Green,
                Tone::Failure => Color::Red,
                Tone::Info => Color::Yellow,
            };
            (banner.text().clone(), color)
        }
        None => (String::new(), Color::Yellow),
    };
    let status = Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, area);
}
