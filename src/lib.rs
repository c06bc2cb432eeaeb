// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. api::ApiInfo)
    clippy::module_name_repetitions
)]

//! # charsearch
//!
//! A terminal search dashboard for paginated character-listing APIs.
//!
//! Type a name and charsearch queries the API after a short pause, renders
//! the matching characters as cards, and offers a page window for moving
//! through large result sets. The query and page live in a location string
//! (`?q=rick&page=3`) with back/forward history.
//!
//! ## Architecture
//!
//! charsearch uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state, including the single active request
//! - **Message**: Events and actions (keys, clicks, network completions)
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! Requests carry a generation number. Starting a new request cancels the
//! previous one, and any completion whose generation is not current is
//! discarded, so the screen only ever shows the current query and page.
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`api`]: Cancellable fetching from the listing endpoint
//! - [`pagination`]: Page-window construction
//! - [`debounce`]: Quiet-period debouncing
//! - [`location`]: Search state in the location string, history
//! - [`config`]: Command-line and rc-file settings
//! - [`ui`]: Terminal UI components

pub mod api;
pub mod app;
pub mod config;
pub mod debounce;
pub mod location;
pub mod pagination;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::api::{CharacterSource, FetchError, ResultPage};
    pub use crate::app::{App, Message, Model, update};
    pub use crate::location::SearchState;
    pub use crate::pagination::{PageEntry, build_window};
}
