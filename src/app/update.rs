use crate::api::{FetchError, ResultPage};
use crate::app::Model;
use crate::app::model::Phase;
use crate::location::SearchState;

/// All possible events and actions in the application.
///
/// These represent user input, network completions, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Lifecycle
    /// Derive state from the start location and issue the first request
    Start,

    // Search field
    /// Type a character into the search field
    InputChar(char),
    /// Delete the last character of the search field
    InputBackspace,
    /// Empty the search field
    InputClear,
    /// The search field settled on this (untrimmed) text
    SearchSubmitted(String),

    // Pagination
    /// Jump to a specific page
    PageSelected(u32),
    /// Go to the previous page
    PrevPage,
    /// Go to the next page
    NextPage,
    /// Go to page 1
    FirstPage,
    /// Go to the last known page
    LastPage,

    // History
    /// Step back in location history
    NavigateBack,
    /// Step forward in location history
    NavigateForward,

    // Network
    /// A request finished; the outcome of the current request also sets
    /// connectivity
    FetchCompleted {
        generation: u64,
        outcome: Result<ResultPage, FetchError>,
    },
    /// Re-run the request for the current state
    Retry,

    // Results pane
    /// Scroll the card list up by n cards
    ScrollUp(usize),
    /// Scroll the card list down by n cards
    ScrollDown(usize),

    // Window
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here. Requests are
/// not started here: a transition into loading leaves a
/// [`crate::app::FetchRequest`] on the model for the event loop to dispatch.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::Start => {
            let location = model.history.current().to_string();
            model.restore_location(&location);
        }

        Message::InputChar(c) => model.input.push(c),
        Message::InputBackspace => {
            model.input.pop();
        }
        Message::InputClear => model.input.clear(),
        Message::SearchSubmitted(raw) => {
            model.input.clone_from(&raw);
            let query = raw.trim().to_string();
            model.navigate_to(SearchState::new(query, 1));
        }

        Message::PageSelected(page) => select_page(&mut model, page),
        Message::PrevPage => {
            if model.can_go_prev() {
                let page = model.state.page - 1;
                select_page(&mut model, page);
            }
        }
        Message::NextPage => {
            if model.can_go_next() {
                let page = model.state.page + 1;
                select_page(&mut model, page);
            }
        }
        Message::FirstPage => {
            if model.state.page != 1 {
                select_page(&mut model, 1);
            }
        }
        Message::LastPage => {
            let last = model.total_pages();
            if last > 1 && model.state.page != last {
                select_page(&mut model, last);
            }
        }

        Message::NavigateBack => {
            if let Some(location) = model.history.back().map(str::to_string) {
                model.restore_location(&location);
            }
        }
        Message::NavigateForward => {
            if let Some(location) = model.history.forward().map(str::to_string) {
                model.restore_location(&location);
            }
        }

        Message::FetchCompleted { generation, outcome } => {
            if generation != model.generation() {
                tracing::debug!(
                    generation,
                    current = model.generation(),
                    "discarding superseded response"
                );
                return model;
            }
            match outcome {
                Ok(page) => {
                    tracing::info!(
                        query = %model.state.query,
                        page = model.state.page,
                        count = page.total_count(),
                        "results loaded"
                    );
                    model.set_online(true);
                    model.phase = Phase::Success(page);
                    model.results_scroll = 0;
                    model.refresh_title();
                }
                Err(FetchError::Cancelled) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "request failed");
                    if err.is_network() {
                        model.set_online(false);
                    }
                    model.phase = Phase::Failed(err);
                }
            }
        }
        Message::Retry => {
            if matches!(model.phase, Phase::Failed(_)) {
                model.begin_loading();
            }
        }

        Message::ScrollUp(n) => {
            model.results_scroll = model.results_scroll.saturating_sub(n);
        }
        Message::ScrollDown(n) => {
            let max = model.results().len().saturating_sub(1);
            model.results_scroll = model.results_scroll.saturating_add(n).min(max);
        }

        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,
        Message::Resize(width, height) => model.terminal_size = (width, height),
        Message::Redraw => {}
        Message::Quit => model.should_quit = true,
    }

    model
}

fn select_page(model: &mut Model, page: u32) {
    if page == 0 {
        return;
    }
    let state = SearchState {
        query: model.state.query.clone(),
        page,
    };
    model.navigate_to(state);
}
