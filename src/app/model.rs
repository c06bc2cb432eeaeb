use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::api::{CharacterRecord, FetchError, ResultPage};
use crate::location::{History, SearchState};
use crate::pagination::{self, PageEntry};

/// Base terminal title, also used when the query is empty.
pub const APP_TITLE: &str = "charsearch";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Where the current request stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A request for the current state is in flight
    Loading,
    /// The current state's page arrived
    Success(ResultPage),
    /// The current state's request failed; retry re-runs it
    Failed(FetchError),
}

/// A fetch the event loop must start on the model's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub state: SearchState,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state. The model never
/// performs I/O: requests are left in an effect slot for the event loop.
#[derive(Debug)]
pub struct Model {
    /// The query and page being displayed
    pub state: SearchState,
    /// Raw text of the search field (untrimmed, may differ from `state.query`
    /// while the debounce window is open)
    pub input: String,
    pub phase: Phase,
    /// Visited locations, newest last
    pub history: History,
    /// Pages shown on each side of the current page
    pub span: u32,
    /// Last known connectivity
    pub online: bool,
    /// Index of the first card shown in the results pane
    pub results_scroll: usize,
    pub help_visible: bool,
    pub should_quit: bool,
    /// Terminal size in cells, used for mouse hit-testing
    pub terminal_size: (u16, u16),
    /// Title reflecting the last successful search
    pub title: String,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    /// Bumped on every request; completions for older values are stale
    generation: u64,
    pending_fetch: Option<FetchRequest>,
    toast: Option<Toast>,
}

impl Model {
    /// Create a model whose history starts at `location`.
    ///
    /// The state is not derived until [`crate::app::Message::Start`] is
    /// processed, which also issues the first request.
    pub fn new(location: impl Into<String>, span: u32, terminal_size: (u16, u16)) -> Self {
        Self {
            history: History::new(location),
            span,
            terminal_size,
            ..Self::default()
        }
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Supersede any outstanding request and ask for the current state.
    pub(super) fn begin_loading(&mut self) {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.results_scroll = 0;
        self.pending_fetch = Some(FetchRequest {
            generation: self.generation,
            state: self.state.clone(),
        });
        tracing::debug!(
            generation = self.generation,
            query = %self.state.query,
            page = self.state.page,
            "entering loading"
        );
    }

    /// Take the request queued by the last transition, if any.
    pub fn take_pending_fetch(&mut self) -> Option<FetchRequest> {
        self.pending_fetch.take()
    }

    pub const fn pending_fetch(&self) -> Option<&FetchRequest> {
        self.pending_fetch.as_ref()
    }

    /// Replace the state and record it as a new location.
    pub(super) fn navigate_to(&mut self, state: SearchState) {
        self.history.push(state.to_location());
        self.state = state;
        self.begin_loading();
    }

    /// Replace the state from a location already in history.
    pub(super) fn restore_location(&mut self, location: &str) {
        self.state = SearchState::from_location(location);
        self.input.clone_from(&self.state.query);
        self.begin_loading();
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    pub const fn result_page(&self) -> Option<&ResultPage> {
        match &self.phase {
            Phase::Success(page) => Some(page),
            _ => None,
        }
    }

    pub const fn error(&self) -> Option<&FetchError> {
        match &self.phase {
            Phase::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn results(&self) -> &[CharacterRecord] {
        self.result_page().map(ResultPage::items).unwrap_or_default()
    }

    /// Total pages of the last successful response, 0 otherwise.
    pub fn total_pages(&self) -> u32 {
        self.result_page().map_or(0, ResultPage::total_pages)
    }

    /// The pagination strip, empty unless there is more than one page.
    pub fn page_window(&self) -> Vec<PageEntry> {
        let total = self.total_pages();
        if total <= 1 {
            return Vec::new();
        }
        pagination::build_window(self.state.page, total, self.span)
    }

    pub const fn can_go_prev(&self) -> bool {
        self.state.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.state.page < self.total_pages()
    }

    /// Human-readable summary shown on the status line.
    pub fn status_text(&self) -> String {
        match &self.phase {
            Phase::Idle | Phase::Failed(_) => String::new(),
            Phase::Loading => "Loading…".to_string(),
            Phase::Success(page) if page.is_empty() => "No results".to_string(),
            Phase::Success(page) => format!(
                "Found {} characters; page {}/{}",
                format_count(page.total_count()),
                self.state.page,
                page.total_pages().max(1)
            ),
        }
    }

    pub(super) fn refresh_title(&mut self) {
        self.title = if self.state.query.is_empty() {
            APP_TITLE.to_string()
        } else {
            format!("Results for \"{}\" - {APP_TITLE}", self.state.query)
        };
    }

    /// Record connectivity, announcing changes.
    pub(super) fn set_online(&mut self, online: bool) {
        if self.online == online {
            return;
        }
        self.online = online;
        if online {
            self.show_toast(ToastLevel::Info, "Back online");
        } else {
            self.show_toast(ToastLevel::Warning, "You appear to be offline");
        }
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

impl Default for Model {
    fn default() -> Self {
        Self {
            state: SearchState::default(),
            input: String::new(),
            phase: Phase::Idle,
            history: History::default(),
            span: pagination::DEFAULT_SPAN,
            online: true,
            results_scroll: 0,
            help_visible: false,
            should_quit: false,
            terminal_size: (80, 24),
            title: APP_TITLE.to_string(),
            config_global_path: None,
            config_local_path: None,
            generation: 0,
            pending_fetch: None,
            toast: None,
        }
    }
}

/// Format a count with thousands separators: `1234567` -> `1,234,567`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
