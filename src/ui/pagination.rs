use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::Model;
use crate::pagination::PageEntry;

use super::style;

const PREV_LABEL: &str = "◀ Prev";
const NEXT_LABEL: &str = "Next ▶";

/// One control in the pagination strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageButton {
    pub label: String,
    /// Page selected by clicking; `None` for gaps and disabled controls
    pub target: Option<u32>,
    pub current: bool,
}

/// The strip's controls: prev, the page window, next.
///
/// Empty when there is at most one page.
pub fn pagination_buttons(model: &Model) -> Vec<PageButton> {
    let window = model.page_window();
    if window.is_empty() {
        return Vec::new();
    }
    let current = model.state.page;

    let mut buttons = Vec::with_capacity(window.len() + 2);
    buttons.push(PageButton {
        label: PREV_LABEL.to_string(),
        target: model.can_go_prev().then(|| current - 1),
        current: false,
    });
    for entry in window {
        buttons.push(match entry {
            PageEntry::Page(n) if n == current => PageButton {
                label: format!("[{n}]"),
                target: Some(n),
                current: true,
            },
            PageEntry::Page(n) => PageButton {
                label: format!(" {n} "),
                target: Some(n),
                current: false,
            },
            PageEntry::Gap => PageButton {
                label: entry.to_string(),
                target: None,
                current: false,
            },
        });
    }
    buttons.push(PageButton {
        label: NEXT_LABEL.to_string(),
        target: model.can_go_next().then(|| current + 1),
        current: false,
    });
    buttons
}

/// Clickable rects within the pagination row and the page each selects.
pub fn pagination_hit_regions(area: Rect, model: &Model) -> Vec<(Rect, u32)> {
    let mut regions = Vec::new();
    let mut x = area.x.saturating_add(1);
    for button in pagination_buttons(model) {
        let width = u16::try_from(button.label.width()).unwrap_or(u16::MAX);
        if let Some(target) = button.target {
            let visible = width.min(area.right().saturating_sub(x));
            if visible > 0 {
                regions.push((Rect::new(x, area.y, visible, 1), target));
            }
        }
        x = x.saturating_add(width).saturating_add(1);
    }
    regions
}

pub fn render_pagination(model: &Model, frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }
    let mut spans = vec![Span::raw(" ")];
    for button in pagination_buttons(model) {
        let span_style = if button.current {
            style::current_page()
        } else if button.target.is_some() {
            style::page_button()
        } else {
            style::dim()
        };
        spans.push(Span::styled(button.label, span_style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
