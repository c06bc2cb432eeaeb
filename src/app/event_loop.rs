use std::io::stdout;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::SetTitle;
use ratatui::DefaultTerminal;

use crate::api::{CharacterSource, HttpCharacterSource};
use crate::app::{App, FetchDispatcher, Message, Model, update};
use crate::debounce::Debouncer;

/// Poll interval while nothing is pending.
const IDLE_POLL_MS: u64 = 250;

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or async runtime cannot be built,
    /// if the terminal cannot be initialized, or if terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        let source = HttpCharacterSource::from_endpoint(&self.settings.api_url)?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("charsearch-fetch")
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;

        let mut terminal = ratatui::try_init().context(
            "Failed to initialize terminal - charsearch requires an interactive terminal",
        )?;
        let size = terminal.size()?;
        if self.settings.mouse_enabled {
            execute!(stdout(), EnableMouseCapture)?;
        }

        let mut model = Model::new(
            self.start_location.clone(),
            self.settings.span,
            (size.width, size.height),
        );
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);

        let (tx, rx) = mpsc::channel();
        let mut dispatcher = FetchDispatcher::new(Arc::new(source), runtime.handle().clone(), tx);

        let result = self.event_loop(&mut terminal, &mut model, &mut dispatcher, &rx);

        dispatcher.cancel_active();
        if self.settings.mouse_enabled {
            let _ = execute!(stdout(), DisableMouseCapture);
        }
        ratatui::restore();
        runtime.shutdown_timeout(Duration::from_millis(100));

        result
    }

    fn event_loop<S: CharacterSource + 'static>(
        &self,
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        dispatcher: &mut FetchDispatcher<S>,
        rx: &Receiver<Message>,
    ) -> Result<()> {
        let start = Instant::now();
        let elapsed_ms = || u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut search_debouncer: Debouncer<String> = Debouncer::new(self.settings.debounce_ms);
        let mut applied_title = String::new();
        let mut needs_render = true;

        Self::apply(
            model,
            dispatcher,
            &mut search_debouncer,
            Message::Start,
            elapsed_ms(),
        );

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            // Network completions first, so input handled below sees fresh state.
            while let Ok(msg) = rx.try_recv() {
                Self::apply(model, dispatcher, &mut search_debouncer, msg, elapsed_ms());
                needs_render = true;
            }

            if Self::submit_settled_search(
                model,
                dispatcher,
                &mut search_debouncer,
                elapsed_ms(),
            ) {
                needs_render = true;
            }

            if needs_render {
                if model.title != applied_title {
                    let _ = execute!(stdout(), SetTitle(&model.title));
                    applied_title.clone_from(&model.title);
                }
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }

            let poll_ms = if model.is_loading() {
                20
            } else {
                search_debouncer
                    .time_until_ready(elapsed_ms())
                    .map_or(IDLE_POLL_MS, |ms| ms.clamp(1, IDLE_POLL_MS))
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                let msg = self.handle_event(&event::read()?, model);
                if let Some(msg) = msg {
                    Self::apply(model, dispatcher, &mut search_debouncer, msg, elapsed_ms());
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                while event::poll(Duration::from_millis(0))? {
                    if let Some(msg) = self.handle_event(&event::read()?, model) {
                        Self::apply(model, dispatcher, &mut search_debouncer, msg, elapsed_ms());
                        needs_render = true;
                    }
                }
            }
        }
        Ok(())
    }

    /// Run one message through `update` and its side effects.
    pub(super) fn apply<S: CharacterSource + 'static>(
        model: &mut Model,
        dispatcher: &mut FetchDispatcher<S>,
        search_debouncer: &mut Debouncer<String>,
        msg: Message,
        now_ms: u64,
    ) {
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        Self::handle_message_side_effects(model, dispatcher, search_debouncer, &side_msg, now_ms);
    }
}
