use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::api::CharacterRecord;
use crate::app::{Model, Phase};

use super::{CARD_HEIGHT, SEARCH_BAR_HEIGHT, overlays, pagination, status, style};

/// Screen regions of the dashboard, top to bottom.
///
/// Zero-height rects mark regions that are hidden in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardLayout {
    pub search: Rect,
    pub status: Rect,
    pub offline_banner: Rect,
    pub error_banner: Rect,
    pub results: Rect,
    pub pagination: Rect,
    pub toast: Rect,
    pub footer: Rect,
}

pub fn dashboard_layout(area: Rect, model: &Model) -> DashboardLayout {
    let offline_rows = u16::from(!model.online);
    let error_rows = u16::from(model.error().is_some());
    let pagination_rows = u16::from(!model.page_window().is_empty());
    let toast_rows = u16::from(model.active_toast().is_some());

    let [
        search,
        status,
        offline_banner,
        error_banner,
        results,
        pagination,
        toast,
        footer,
    ] = Layout::vertical([
        Constraint::Length(SEARCH_BAR_HEIGHT),
        Constraint::Length(1),
        Constraint::Length(offline_rows),
        Constraint::Length(error_rows),
        Constraint::Min(0),
        Constraint::Length(pagination_rows),
        Constraint::Length(toast_rows),
        Constraint::Length(1),
    ])
    .areas(area);

    DashboardLayout {
        search,
        status,
        offline_banner,
        error_banner,
        results,
        pagination,
        toast,
        footer,
    }
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let layout = dashboard_layout(area, model);

    render_search_bar(model, frame, layout.search);
    status::render_status_line(model, frame, layout.status);
    status::render_offline_banner(model, frame, layout.offline_banner);
    status::render_error_banner(model, frame, layout.error_banner);
    render_results(model, frame, layout.results);
    pagination::render_pagination(model, frame, layout.pagination);
    status::render_toast_bar(model, frame, layout.toast);
    status::render_footer(model, frame, layout.footer);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn render_search_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title("Search characters")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);

    let line = if model.input.is_empty() {
        Line::styled("Type a name, e.g. rick", style::dim())
    } else {
        Line::raw(model.input.as_str())
    };
    frame.render_widget(Paragraph::new(line).block(block), area);

    if inner.width > 0 && inner.height > 0 && !model.help_visible {
        let typed = u16::try_from(unicode_width::UnicodeWidthStr::width(model.input.as_str()))
            .unwrap_or(u16::MAX);
        let x = inner.x.saturating_add(typed).min(inner.right().saturating_sub(1));
        frame.set_cursor_position((x, inner.y));
    }
}

fn render_results(model: &Model, frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }
    let block = Block::default()
        .title("Results")
        .borders(Borders::TOP)
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = match &model.phase {
        Phase::Idle | Phase::Failed(_) => Vec::new(),
        Phase::Loading => skeleton_cards(inner),
        Phase::Success(page) if page.is_empty() => vec![Line::styled(
            format!("No characters found for \"{}\".", model.state.query),
            style::dim(),
        )],
        Phase::Success(page) => {
            let visible_cards = (inner.height / CARD_HEIGHT).max(1) as usize;
            page.items()
                .iter()
                .skip(model.results_scroll)
                .take(visible_cards + 1)
                .flat_map(card_lines)
                .collect()
        }
    };
    frame.render_widget(Paragraph::new(lines), inner);
}

fn card_lines(character: &CharacterRecord) -> Vec<Line<'_>> {
    vec![
        Line::from(vec![
            Span::styled(format!("#{} ", character.id), style::dim()),
            Span::styled(character.name.as_str(), style::card_title()),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::raw(character.species.as_str()),
            Span::raw(" • "),
            Span::styled(
                character.status.as_str(),
                style::life_status(&character.status),
            ),
        ]),
        Line::from(vec![
            Span::styled("  From: ", style::dim()),
            Span::raw(character.origin.name.as_str()),
            Span::styled(" · Now: ", style::dim()),
            Span::raw(character.location.name.as_str()),
        ]),
        Line::raw(""),
    ]
}

fn skeleton_cards(area: Rect) -> Vec<Line<'static>> {
    let count = (area.height / CARD_HEIGHT).clamp(1, 8);
    let width = usize::from(area.width.max(4));
    let bar = |percent: usize| Line::styled("░".repeat(width * percent / 100), style::dim());
    (0..count)
        .flat_map(|_| [bar(70), bar(50), bar(60), Line::raw("")])
        .collect()
}
