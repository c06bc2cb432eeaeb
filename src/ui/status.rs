use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::{Model, ToastLevel};

const RETRY_LABEL: &str = "[ retry ]";

pub fn render_status_line(model: &Model, frame: &mut Frame, area: Rect) {
    let text = model.status_text();
    let line = Line::styled(format!(" {text}"), Style::default().fg(Color::Cyan));
    frame.render_widget(Paragraph::new(line), area);
}

pub fn render_offline_banner(model: &Model, frame: &mut Frame, area: Rect) {
    if model.online || area.height == 0 {
        return;
    }
    let bar = Paragraph::new(" Offline: results may be unavailable until the connection returns")
        .style(Style::default().bg(Color::Yellow).fg(Color::Black));
    frame.render_widget(bar, area);
}

fn error_prefix(message: &str) -> String {
    format!(" {message} ")
}

/// Where the retry control sits inside the error banner, if shown.
pub fn retry_button_rect(area: Rect, model: &Model) -> Option<Rect> {
    let err = model.error()?;
    if area.height == 0 {
        return None;
    }
    let offset = u16::try_from(error_prefix(&err.to_string()).width()).unwrap_or(u16::MAX);
    let x = area.x.saturating_add(offset);
    let width = u16::try_from(RETRY_LABEL.width())
        .unwrap_or(u16::MAX)
        .min(area.right().saturating_sub(x));
    (width > 0).then_some(Rect::new(x, area.y, width, 1))
}

pub fn render_error_banner(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(err) = model.error() else {
        return;
    };
    if area.height == 0 {
        return;
    }
    let style = Style::default().bg(Color::Red).fg(Color::White);
    let line = Line::from(vec![
        Span::raw(error_prefix(&err.to_string())),
        Span::styled(RETRY_LABEL, style.add_modifier(Modifier::BOLD | Modifier::REVERSED)),
        Span::raw("  F5 / Ctrl-r"),
    ]);
    frame.render_widget(Paragraph::new(line).style(style), area);
}

pub fn render_footer(model: &Model, frame: &mut Frame, area: Rect) {
    let location = model.history.current();
    let location = if location.is_empty() { "/" } else { location };
    let page_info = match model.total_pages() {
        0 => String::new(),
        total => format!("  [page {}/{}]", model.state.page, total),
    };
    let history_info = format!(
        "  [{}{}]",
        if model.history.can_go_back() { "<" } else { "-" },
        if model.history.can_go_forward() { ">" } else { "-" },
    );
    let online_indicator = if model.online { "" } else { " [offline]" };

    let status = format!(
        " {}  {}{}{}{}  F1:help",
        crate::app::APP_TITLE,
        location,
        page_info,
        history_info,
        online_indicator
    );
    let bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
