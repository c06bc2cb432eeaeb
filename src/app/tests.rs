use std::future::Future;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiInfo, CharacterRecord, CharacterSource, FetchError, NamedLocation, ResultPage};
use crate::debounce::Debouncer;
use crate::location::SearchState;

use super::{App, FetchDispatcher, FetchRequest, Message, Model, Phase, ToastLevel, update};

fn character(id: u64, name: &str) -> CharacterRecord {
    CharacterRecord {
        id,
        name: name.to_string(),
        status: "Alive".to_string(),
        species: "Human".to_string(),
        gender: "Male".to_string(),
        image: String::new(),
        origin: NamedLocation {
            name: "Earth (C-137)".to_string(),
        },
        location: NamedLocation {
            name: "Citadel of Ricks".to_string(),
        },
    }
}

fn result_page(count: u64, pages: u32, names: &[&str]) -> ResultPage {
    ResultPage {
        info: ApiInfo {
            count,
            pages,
            next: None,
            prev: None,
        },
        results: names
            .iter()
            .zip(1..)
            .map(|(name, id)| character(id, name))
            .collect(),
    }
}

fn started_model(location: &str) -> Model {
    update(Model::new(location, 2, (100, 40)), Message::Start)
}

/// Complete the model's current request with `outcome`.
fn complete(model: Model, outcome: Result<ResultPage, FetchError>) -> Model {
    let generation = model.generation();
    update(model, Message::FetchCompleted { generation, outcome })
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Hangs on "slow" until cancelled; answers anything else immediately.
struct ScriptedSource;

impl CharacterSource for ScriptedSource {
    fn fetch_page(
        &self,
        query: &str,
        page: u32,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<ResultPage, FetchError>> + Send {
        let query = query.to_string();
        async move {
            if query == "slow" {
                cancel.cancelled().await;
                return Err(FetchError::Cancelled);
            }
            if query == "offline" {
                return Err(FetchError::Network("connection refused".to_string()));
            }
            let mut result = result_page(1, 3, &[query.as_str()]);
            result.results[0].id = u64::from(page);
            Ok(result)
        }
    }
}

fn test_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap()
}

#[test]
fn test_start_derives_state_from_location_and_requests_fetch() {
    let mut model = started_model("?q=rick&page=3");
    assert_eq!(model.state, SearchState::new("rick", 3));
    assert_eq!(model.input, "rick");
    assert_eq!(model.phase, Phase::Loading);
    assert_eq!(
        model.take_pending_fetch(),
        Some(FetchRequest {
            generation: 1,
            state: SearchState::new("rick", 3),
        })
    );
    assert_eq!(model.take_pending_fetch(), None);
}

#[test]
fn test_start_clamps_malformed_page() {
    let model = started_model("?q=beth&page=banana");
    assert_eq!(model.state, SearchState::new("beth", 1));
    let model = started_model("?page=-3");
    assert_eq!(model.state.page, 1);
}

#[test]
fn test_typing_edits_input_without_fetching() {
    let mut model = started_model("");
    model.take_pending_fetch();
    let model = update(model, Message::InputChar('r'));
    let model = update(model, Message::InputChar('i'));
    let mut model = update(model, Message::InputBackspace);
    assert_eq!(model.input, "r");
    assert_eq!(model.state.query, "");
    assert_eq!(model.take_pending_fetch(), None);
    let model = update(model, Message::InputClear);
    assert!(model.input.is_empty());
}

#[test]
fn test_search_submitted_resets_page_trims_query_and_pushes_location() {
    let mut model = started_model("?q=rick&page=4");
    model.take_pending_fetch();
    let mut model = update(model, Message::SearchSubmitted("  morty ".to_string()));

    assert_eq!(model.state, SearchState::new("morty", 1));
    assert_eq!(model.input, "  morty ");
    assert_eq!(model.history.current(), "?q=morty");
    assert!(model.history.can_go_back());
    let request = model.take_pending_fetch().unwrap();
    assert_eq!(request.generation, 2);
    assert_eq!(request.state, SearchState::new("morty", 1));
}

#[test]
fn test_page_selected_keeps_query_and_pushes_location() {
    let model = complete(started_model("?q=rick"), Ok(result_page(107, 6, &["Rick"])));
    let mut model = update(model, Message::PageSelected(3));

    assert_eq!(model.state, SearchState::new("rick", 3));
    assert_eq!(model.history.current(), "?q=rick&page=3");
    assert_eq!(model.phase, Phase::Loading);
    assert_eq!(model.take_pending_fetch().unwrap().state.page, 3);
}

#[test]
fn test_page_selected_zero_is_ignored() {
    let mut model = started_model("?q=rick&page=2");
    model.take_pending_fetch();
    let mut model = update(model, Message::PageSelected(0));
    assert_eq!(model.state.page, 2);
    assert_eq!(model.take_pending_fetch(), None);
}

#[test]
fn test_prev_and_next_respect_bounds() {
    let mut model = complete(started_model(""), Ok(result_page(40, 2, &["Rick"])));
    model.take_pending_fetch();

    let mut model = update(model, Message::PrevPage);
    assert_eq!(model.take_pending_fetch(), None);

    let model = update(model, Message::NextPage);
    assert_eq!(model.state.page, 2);
    let mut model = complete(model, Ok(result_page(40, 2, &["Morty"])));
    model.take_pending_fetch();

    let mut model = update(model, Message::NextPage);
    assert_eq!(model.take_pending_fetch(), None);
    assert_eq!(model.state.page, 2);

    let model = update(model, Message::FirstPage);
    assert_eq!(model.state.page, 1);
}

#[test]
fn test_last_page_jumps_to_total() {
    let model = complete(started_model("?q=smith"), Ok(result_page(200, 10, &["Jerry"])));
    let model = update(model, Message::LastPage);
    assert_eq!(model.state, SearchState::new("smith", 10));
}

#[test]
fn test_navigate_back_and_forward_rederive_state_without_push() {
    let model = started_model("?q=rick");
    let model = update(model, Message::PageSelected(2));
    let model = update(model, Message::SearchSubmitted("summer".to_string()));
    assert_eq!(model.history.len(), 3);

    let mut model = update(model, Message::NavigateBack);
    assert_eq!(model.state, SearchState::new("rick", 2));
    assert_eq!(model.input, "rick");
    assert_eq!(model.history.len(), 3);
    assert_eq!(model.take_pending_fetch().unwrap().state, SearchState::new("rick", 2));

    let model = update(model, Message::NavigateBack);
    assert_eq!(model.state, SearchState::new("rick", 1));
    let mut model = update(model, Message::NavigateBack);
    model.take_pending_fetch();
    let mut model = update(model, Message::NavigateBack);
    assert_eq!(model.take_pending_fetch(), None, "no history before the start");

    let model = update(model, Message::NavigateForward);
    assert_eq!(model.state, SearchState::new("rick", 2));
}

#[test]
fn test_superseded_response_is_discarded() {
    let model = started_model("?q=rick");
    let stale_generation = model.generation();
    let model = update(model, Message::SearchSubmitted("morty".to_string()));

    let model = update(
        model,
        Message::FetchCompleted {
            generation: stale_generation,
            outcome: Ok(result_page(1, 1, &["Rick Sanchez"])),
        },
    );
    assert_eq!(model.phase, Phase::Loading, "stale result must not render");
    assert!(model.results().is_empty());

    let model = complete(model, Ok(result_page(1, 1, &["Morty Smith"])));
    assert_eq!(model.results()[0].name, "Morty Smith");
}

#[test]
fn test_superseded_failure_is_discarded() {
    let model = started_model("?q=rick");
    let stale_generation = model.generation();
    let model = update(model, Message::PageSelected(2));
    let model = update(
        model,
        Message::FetchCompleted {
            generation: stale_generation,
            outcome: Err(FetchError::remote(500)),
        },
    );
    assert_eq!(model.phase, Phase::Loading);
}

#[test]
fn test_cancelled_outcome_is_a_no_op() {
    let model = started_model("?q=rick");
    let model = complete(model, Err(FetchError::Cancelled));
    assert_eq!(model.phase, Phase::Loading);
    assert!(model.error().is_none());
}

#[test]
fn test_failure_shows_error_and_retry_reissues_same_request() {
    let model = complete(started_model("?q=rick&page=2"), Err(FetchError::remote(500)));
    assert_eq!(model.error().and_then(FetchError::status), Some(500));
    assert_eq!(model.status_text(), "");
    let history_len = model.history.len();

    let mut model = update(model, Message::Retry);
    assert_eq!(model.phase, Phase::Loading);
    assert_eq!(model.history.len(), history_len, "retry does not push");
    let request = model.take_pending_fetch().unwrap();
    assert_eq!(request.state, SearchState::new("rick", 2));
    assert_eq!(request.generation, 2);
}

#[test]
fn test_retry_outside_failure_is_ignored() {
    let mut model = complete(started_model(""), Ok(result_page(1, 1, &["Rick"])));
    model.take_pending_fetch();
    let mut model = update(model, Message::Retry);
    assert_eq!(model.take_pending_fetch(), None);
}

#[test]
fn test_empty_page_shows_no_results_not_error() {
    let model = complete(started_model("?q=zzzz"), Ok(ResultPage::empty()));
    assert!(model.error().is_none());
    assert_eq!(model.status_text(), "No results");
    assert!(model.page_window().is_empty());
}

#[test]
fn test_success_status_and_title() {
    let model = complete(started_model("?q=rick&page=2"), Ok(result_page(1234, 62, &["Rick"])));
    assert_eq!(model.status_text(), "Found 1,234 characters; page 2/62");
    assert_eq!(model.title, "Results for \"rick\" - charsearch");

    let model = update(model, Message::SearchSubmitted(String::new()));
    let model = complete(model, Ok(result_page(826, 42, &["Rick"])));
    assert_eq!(model.title, super::APP_TITLE);
}

#[test]
fn test_status_while_loading() {
    let model = started_model("");
    assert_eq!(model.status_text(), "Loading…");
}

#[test]
fn test_deep_link_past_last_page_shows_empty_page() {
    let model = complete(started_model("?q=rick&page=999"), Ok(result_page(107, 6, &[])));
    assert_eq!(model.state.page, 999);
    assert_eq!(model.status_text(), "No results");
    assert!(!model.page_window().is_empty());
}

#[test]
fn test_page_window_hidden_for_single_page() {
    let model = complete(started_model("?q=rick"), Ok(result_page(3, 1, &["Rick"])));
    assert!(model.page_window().is_empty());
}

#[test]
fn test_current_outcome_sets_connectivity_with_toast() {
    let model = complete(started_model("?q=rick"), Err(FetchError::Network("refused".to_string())));
    assert!(!model.online);
    assert_eq!(model.active_toast().map(|(_, level)| level), Some(ToastLevel::Warning));

    let model = update(model, Message::Retry);
    let model = complete(model, Ok(result_page(1, 1, &["Rick"])));
    assert!(model.online);
    assert_eq!(model.active_toast().map(|(_, level)| level), Some(ToastLevel::Info));
}

#[test]
fn test_superseded_network_failure_leaves_connectivity() {
    let model = started_model("?q=rick");
    let stale_generation = model.generation();
    let model = update(model, Message::PageSelected(2));
    let model = complete(model, Ok(result_page(40, 2, &["Morty"])));

    let model = update(
        model,
        Message::FetchCompleted {
            generation: stale_generation,
            outcome: Err(FetchError::Network("reset".to_string())),
        },
    );
    assert!(model.online);
    assert!(model.active_toast().is_none());
    assert!(model.error().is_none());
}

#[test]
fn test_scroll_is_clamped_to_results() {
    let model = complete(started_model(""), Ok(result_page(3, 1, &["Rick", "Morty", "Summer"])));
    let model = update(model, Message::ScrollDown(10));
    assert_eq!(model.results_scroll, 2);
    let model = update(model, Message::ScrollUp(1));
    assert_eq!(model.results_scroll, 1);
    let model = update(model, Message::ScrollUp(5));
    assert_eq!(model.results_scroll, 0);
}

#[test]
fn test_help_and_quit() {
    let model = update(Model::default(), Message::ToggleHelp);
    assert!(model.help_visible);
    let model = update(model, Message::HideHelp);
    assert!(!model.help_visible);
    let model = update(model, Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_key_bindings() {
    let mut model = started_model("");
    model.input = "rick".to_string();

    assert_eq!(
        App::handle_key(key(KeyCode::Enter), &model),
        Some(Message::SearchSubmitted("rick".to_string()))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('y')), &model),
        Some(Message::InputChar('y'))
    );
    assert_eq!(App::handle_key(key(KeyCode::Esc), &model), Some(Message::InputClear));
    assert_eq!(App::handle_key(key(KeyCode::Left), &model), Some(Message::PrevPage));
    assert_eq!(App::handle_key(key(KeyCode::F(5)), &model), Some(Message::Retry));
    assert_eq!(
        App::handle_key(KeyEvent::new(KeyCode::Left, KeyModifiers::ALT), &model),
        Some(Message::NavigateBack)
    );
    assert_eq!(
        App::handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), &model),
        Some(Message::Quit)
    );

    model.input.clear();
    assert_eq!(App::handle_key(key(KeyCode::Esc), &model), Some(Message::Quit));
    assert_eq!(App::handle_key(key(KeyCode::Backspace), &model), None);

    model.help_visible = true;
    assert_eq!(
        App::handle_key(key(KeyCode::Char('x')), &model),
        Some(Message::HideHelp)
    );
}

#[test]
fn test_click_on_page_button_selects_page() {
    let model = complete(started_model("?q=rick&page=6"), Ok(result_page(400, 20, &["Rick"])));
    let area = Rect::new(0, 0, model.terminal_size.0, model.terminal_size.1);
    let layout = crate::ui::dashboard_layout(area, &model);
    let regions = crate::ui::pagination_hit_regions(layout.pagination, &model);
    let (rect, page) = regions
        .iter()
        .copied()
        .find(|(_, page)| *page == 19)
        .expect("page 19 button");
    assert_eq!(page, 19);

    let app = App::new("");
    let click = Event::Mouse(MouseEvent {
        kind: MouseEventKind::Up(MouseButton::Left),
        column: rect.x,
        row: rect.y,
        modifiers: KeyModifiers::NONE,
    });
    assert_eq!(app.handle_event(&click, &model), Some(Message::PageSelected(19)));
}

#[test]
fn test_click_on_retry_button_retries() {
    let model = complete(started_model("?q=rick"), Err(FetchError::remote(503)));
    let area = Rect::new(0, 0, model.terminal_size.0, model.terminal_size.1);
    let layout = crate::ui::dashboard_layout(area, &model);
    let rect = crate::ui::retry_button_rect(layout.error_banner, &model).expect("retry button");

    let click = MouseEvent {
        kind: MouseEventKind::Up(MouseButton::Left),
        column: rect.x + 1,
        row: rect.y,
        modifiers: KeyModifiers::NONE,
    };
    assert_eq!(App::handle_mouse(click, &model), Some(Message::Retry));
}

#[test]
fn test_resize_event_updates_size() {
    let app = App::new("");
    let model = Model::default();
    let msg = app.handle_event(&Event::Resize(120, 50), &model);
    assert_eq!(msg, Some(Message::Resize(120, 50)));
    let model = update(model, Message::Resize(120, 50));
    assert_eq!(model.terminal_size, (120, 50));
}

#[test]
fn test_typing_queues_debounced_search() {
    let runtime = test_runtime();
    let (tx, _rx) = mpsc::channel();
    let mut dispatcher = FetchDispatcher::new(Arc::new(ScriptedSource), runtime.handle().clone(), tx);
    let mut debouncer = Debouncer::new(300);
    let mut model = started_model("");
    model.take_pending_fetch();

    for (idx, c) in "rick".chars().enumerate() {
        let msg = Message::InputChar(c);
        model = update(model, msg.clone());
        App::handle_message_side_effects(&mut model, &mut dispatcher, &mut debouncer, &msg, idx as u64 * 50);
    }
    assert_eq!(dispatcher.active_generation(), None, "typing alone does not fetch");
    assert_eq!(debouncer.take_ready(200), None);
    assert_eq!(debouncer.take_ready(450), Some("rick".to_string()));
}

#[test]
fn test_submit_cancels_pending_debounce_and_dispatches() {
    let runtime = test_runtime();
    let (tx, _rx) = mpsc::channel();
    let mut dispatcher = FetchDispatcher::new(Arc::new(ScriptedSource), runtime.handle().clone(), tx);
    let mut debouncer = Debouncer::new(300);
    let mut model = started_model("");
    model.take_pending_fetch();

    debouncer.queue("mor".to_string(), 0);
    let msg = Message::SearchSubmitted("mor".to_string());
    model = update(model, msg.clone());
    App::handle_message_side_effects(&mut model, &mut dispatcher, &mut debouncer, &msg, 10);

    assert!(!debouncer.is_pending());
    assert_eq!(dispatcher.active_generation(), Some(model.generation()));
    assert!(model.pending_fetch().is_none());
}

#[test]
fn test_dispatcher_cancels_superseded_request() {
    let runtime = test_runtime();
    let (tx, rx) = mpsc::channel();
    let mut dispatcher = FetchDispatcher::new(Arc::new(ScriptedSource), runtime.handle().clone(), tx);

    let mut model = started_model("?q=slow");
    dispatcher.dispatch(model.take_pending_fetch().unwrap());
    assert_eq!(dispatcher.active_generation(), Some(1));

    model = update(model, Message::SearchSubmitted("rick".to_string()));
    dispatcher.dispatch(model.take_pending_fetch().unwrap());
    assert_eq!(dispatcher.active_generation(), Some(2));

    let mut completions = Vec::new();
    while completions.len() < 2 {
        let msg = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("both requests should complete");
        if let Message::FetchCompleted { generation, outcome } = &msg {
            completions.push((*generation, outcome.clone()));
        }
        model = update(model, msg);
    }

    assert!(completions.contains(&(1, Err(FetchError::Cancelled))));
    assert_eq!(model.state, SearchState::new("rick", 1));
    assert_eq!(model.results().len(), 1);
    assert_eq!(model.results()[0].name, "rick");
}

#[test]
fn test_dispatcher_reports_network_failure_as_offline() {
    let runtime = test_runtime();
    let (tx, rx) = mpsc::channel();
    let mut dispatcher = FetchDispatcher::new(Arc::new(ScriptedSource), runtime.handle().clone(), tx);

    let mut model = started_model("?q=offline");
    dispatcher.dispatch(model.take_pending_fetch().unwrap());

    loop {
        let msg = rx.recv_timeout(Duration::from_secs(5)).expect("completion");
        let done = matches!(msg, Message::FetchCompleted { .. });
        model = update(model, msg);
        if done {
            break;
        }
    }
    assert!(!model.online);
    assert!(matches!(model.error(), Some(FetchError::Network(_))));
}

#[test]
fn test_dropping_dispatcher_cancels_active_request() {
    let runtime = test_runtime();
    let (tx, rx) = mpsc::channel();
    let mut dispatcher = FetchDispatcher::new(Arc::new(ScriptedSource), runtime.handle().clone(), tx);

    let mut model = started_model("?q=slow");
    dispatcher.dispatch(model.take_pending_fetch().unwrap());
    drop(dispatcher);

    let msg = rx.recv_timeout(Duration::from_secs(5)).expect("cancelled completion");
    assert_eq!(
        msg,
        Message::FetchCompleted {
            generation: 1,
            outcome: Err(FetchError::Cancelled),
        }
    );
}

#[test]
fn test_history_navigation_drops_pending_typed_search() {
    let runtime = test_runtime();
    let (tx, _rx) = mpsc::channel();
    let mut dispatcher = FetchDispatcher::new(Arc::new(ScriptedSource), runtime.handle().clone(), tx);
    let mut debouncer = Debouncer::new(300);
    let mut model = started_model("");
    model.take_pending_fetch();

    let mut now_ms = 0;
    for msg in [
        Message::SearchSubmitted("rick".to_string()),
        Message::InputChar('y'),
        Message::NavigateBack,
    ] {
        model = update(model, msg.clone());
        App::handle_message_side_effects(&mut model, &mut dispatcher, &mut debouncer, &msg, now_ms);
        now_ms += 10;
    }
    assert_eq!(model.state, SearchState::default());
    assert!(model.input.is_empty());
    assert!(model.history.can_go_forward());

    assert!(!App::submit_settled_search(&mut model, &mut dispatcher, &mut debouncer, 1_000));
    assert_eq!(model.state, SearchState::default());
    assert!(model.history.can_go_forward());
}

#[test]
fn test_settled_search_resets_page_for_unchanged_query() {
    let runtime = test_runtime();
    let (tx, _rx) = mpsc::channel();
    let mut dispatcher = FetchDispatcher::new(Arc::new(ScriptedSource), runtime.handle().clone(), tx);
    let mut debouncer = Debouncer::new(300);
    let mut model = complete(started_model("?q=rick&page=3"), Ok(result_page(107, 6, &["Rick"])));
    model.take_pending_fetch();

    let msg = Message::InputChar(' ');
    model = update(model, msg.clone());
    App::handle_message_side_effects(&mut model, &mut dispatcher, &mut debouncer, &msg, 0);

    assert!(!App::submit_settled_search(&mut model, &mut dispatcher, &mut debouncer, 100));
    assert_eq!(model.state.page, 3);

    assert!(App::submit_settled_search(&mut model, &mut dispatcher, &mut debouncer, 300));
    assert_eq!(model.state, SearchState::new("rick", 1));
    assert_eq!(model.input, "rick ");
    assert_eq!(model.history.current(), "?q=rick");
    assert_eq!(model.phase, Phase::Loading);
    assert_eq!(dispatcher.active_generation(), Some(model.generation()));
}
