use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};

use crate::app::{App, Message, Model};

impl App {
    pub(super) fn handle_event(&self, event: &Event, model: &Model) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Mouse(mouse) if self.settings.mouse_enabled => {
                Self::handle_mouse(*mouse, model)
            }
            Event::Resize(w, h) => Some(Message::Resize(*w, *h)),
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return Some(Message::HideHelp);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            // Application
            KeyCode::Char('c') if ctrl => Some(Message::Quit),
            KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Esc => {
                if model.input.is_empty() {
                    Some(Message::Quit)
                } else {
                    Some(Message::InputClear)
                }
            }

            // Network
            KeyCode::F(5) => Some(Message::Retry),
            KeyCode::Char('r') if ctrl => Some(Message::Retry),

            // History
            KeyCode::Left if alt => Some(Message::NavigateBack),
            KeyCode::Right if alt => Some(Message::NavigateForward),

            // Pagination
            KeyCode::Left => Some(Message::PrevPage),
            KeyCode::Right => Some(Message::NextPage),
            KeyCode::Home => Some(Message::FirstPage),
            KeyCode::End => Some(Message::LastPage),

            // Results pane
            KeyCode::Up => Some(Message::ScrollUp(1)),
            KeyCode::Down => Some(Message::ScrollDown(1)),
            KeyCode::PageUp => Some(Message::ScrollUp(cards_per_page(model))),
            KeyCode::PageDown => Some(Message::ScrollDown(cards_per_page(model))),

            // Search field
            KeyCode::Enter => Some(Message::SearchSubmitted(model.input.clone())),
            KeyCode::Backspace => {
                if model.input.is_empty() {
                    None
                } else {
                    Some(Message::InputBackspace)
                }
            }
            KeyCode::Char('u') if ctrl => Some(Message::InputClear),
            KeyCode::Char(c) if !ctrl && !alt => Some(Message::InputChar(c)),

            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return matches!(mouse.kind, MouseEventKind::Up(MouseButton::Left))
                .then_some(Message::HideHelp);
        }

        let area = Rect::new(0, 0, model.terminal_size.0, model.terminal_size.1);
        let layout = crate::ui::dashboard_layout(area, model);
        let point = Position::new(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some((_, page)) = crate::ui::pagination_hit_regions(layout.pagination, model)
                    .into_iter()
                    .find(|(rect, _)| rect.contains(point))
                {
                    return Some(Message::PageSelected(page));
                }
                if crate::ui::retry_button_rect(layout.error_banner, model)
                    .is_some_and(|rect| rect.contains(point))
                {
                    return Some(Message::Retry);
                }
                None
            }
            MouseEventKind::ScrollUp if layout.results.contains(point) => {
                Some(Message::ScrollUp(1))
            }
            MouseEventKind::ScrollDown if layout.results.contains(point) => {
                Some(Message::ScrollDown(1))
            }
            _ => None,
        }
    }
}

fn cards_per_page(model: &Model) -> usize {
    let rows = model
        .terminal_size
        .1
        .saturating_sub(crate::ui::SEARCH_BAR_HEIGHT + 4);
    usize::from((rows / crate::ui::CARD_HEIGHT).max(1))
}
