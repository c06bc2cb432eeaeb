//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`FetchDispatcher`]: Starts requests the model asks for, one at a time
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use effects::FetchDispatcher;
pub use model::{APP_TITLE, FetchRequest, Model, Phase, ToastLevel, format_count};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::config::Settings;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    start_location: String,
    settings: Settings,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application that starts at `location` (e.g. `?q=rick`).
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            start_location: location.into(),
            settings: Settings::default(),
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Use resolved settings (endpoint, debounce, span, mouse).
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Set config paths to show in help.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}

#[cfg(test)]
mod tests;
