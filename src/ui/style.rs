//! Theming and color definitions.
//!
//! Uses ANSI colors that adapt to the terminal's color palette.

use ratatui::style::{Color, Modifier, Style};

/// Secondary text: placeholders, labels, disabled controls.
pub fn dim() -> Style {
    Style::default().fg(Color::Indexed(245))
}

pub fn card_title() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub fn page_button() -> Style {
    Style::default().fg(Color::White)
}

pub fn current_page() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Color for a character's life status ("Alive", "Dead", "unknown").
pub fn life_status(status: &str) -> Style {
    match status.to_ascii_lowercase().as_str() {
        "alive" => Style::default().fg(Color::Green),
        "dead" => Style::default().fg(Color::Red),
        _ => dim(),
    }
}
