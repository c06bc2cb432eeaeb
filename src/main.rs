//! charsearch - A terminal search dashboard for character-listing APIs.
//!
//! # Usage
//!
//! ```bash
//! charsearch
//! charsearch '?q=rick&page=3'
//! charsearch --query morty --page 2
//! charsearch --api-url http://localhost:8080/api/character
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use charsearch::app::App;
use charsearch::config::{
    ConfigFlags, Settings, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use charsearch::location::SearchState;

/// A terminal search dashboard for paginated character-listing APIs
#[derive(Parser, Debug)]
#[command(name = "charsearch", version, about, long_about = None)]
struct Cli {
    /// Start location, e.g. '?q=rick&page=3' or a full URL
    #[arg(value_name = "LOCATION")]
    location: Option<String>,

    /// Initial search query (overrides the location's q)
    #[arg(short, long)]
    query: Option<String>,

    /// Initial page (overrides the location's page)
    #[arg(short, long)]
    page: Option<u32>,

    /// Character-listing endpoint
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Quiet period before a typed query is searched
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// Pages shown on each side of the current page
    #[arg(long)]
    span: Option<u32>,

    /// Write logs to a file (filtered by RUST_LOG, default warn)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Do not capture the mouse
    #[arg(long)]
    no_mouse: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

impl Cli {
    /// The start location after applying --query and --page.
    fn start_location(&self) -> String {
        let base = self.location.as_deref().unwrap_or_default();
        if self.query.is_none() && self.page.is_none() {
            return base.to_string();
        }
        let mut state = SearchState::from_location(base);
        if let Some(query) = &self.query {
            state.query = query.trim().to_string();
        }
        if let Some(page) = self.page {
            state.page = page.max(1);
        }
        state.to_location()
    }
}

// The terminal UI owns stdout, so logs go to a file or nowhere.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false);
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_deref())?;
    let settings = Settings::from_flags(&effective);
    tracing::info!(?settings, "starting");

    let mut app = App::new(cli.start_location())
        .with_settings(settings)
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    app.run().context("Application error")
}
