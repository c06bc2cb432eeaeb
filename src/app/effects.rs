use std::sync::Arc;
use std::sync::mpsc::Sender;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::api::CharacterSource;
use crate::app::{App, FetchRequest, Message, Model};
use crate::debounce::Debouncer;

#[derive(Debug)]
struct ActiveRequest {
    generation: u64,
    token: CancellationToken,
}

/// Starts fetches and keeps at most one of them alive.
///
/// Each dispatch cancels the previous request before spawning the next. Every
/// spawned fetch reports back with exactly one [`Message::FetchCompleted`].
pub struct FetchDispatcher<S> {
    source: Arc<S>,
    runtime: Handle,
    tx: Sender<Message>,
    active: Option<ActiveRequest>,
}

impl<S: CharacterSource + 'static> FetchDispatcher<S> {
    pub const fn new(source: Arc<S>, runtime: Handle, tx: Sender<Message>) -> Self {
        Self {
            source,
            runtime,
            tx,
            active: None,
        }
    }

    /// Cancel the active request (if any) and start `request`.
    pub fn dispatch(&mut self, request: FetchRequest) {
        if let Some(previous) = self.cancel_active() {
            tracing::debug!(
                previous,
                next = request.generation,
                "superseding in-flight request"
            );
        }

        let token = CancellationToken::new();
        self.active = Some(ActiveRequest {
            generation: request.generation,
            token: token.clone(),
        });

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let FetchRequest { generation, state } = request;
            let outcome = source.fetch_page(&state.query, state.page, token).await;
            let _ = tx.send(Message::FetchCompleted {
                generation,
                outcome,
            });
        });
    }

    /// Cancel the active request, returning its generation.
    pub fn cancel_active(&mut self) -> Option<u64> {
        let active = self.active.take()?;
        active.token.cancel();
        Some(active.generation)
    }

    pub fn active_generation(&self) -> Option<u64> {
        self.active.as_ref().map(|active| active.generation)
    }
}

impl<S> Drop for FetchDispatcher<S> {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.token.cancel();
        }
    }
}

impl App {
    /// Apply the side effects that follow `msg` once `update` has run.
    pub(super) fn handle_message_side_effects<S: CharacterSource + 'static>(
        model: &mut Model,
        dispatcher: &mut FetchDispatcher<S>,
        search_debouncer: &mut Debouncer<String>,
        msg: &Message,
        now_ms: u64,
    ) {
        match msg {
            Message::InputChar(_) | Message::InputBackspace | Message::InputClear => {
                search_debouncer.queue(model.input.clone(), now_ms);
            }
            // Pending text belongs to the location being left.
            Message::SearchSubmitted(_)
            | Message::Start
            | Message::NavigateBack
            | Message::NavigateForward => search_debouncer.cancel(),
            _ => {}
        }

        if let Some(request) = model.take_pending_fetch() {
            dispatcher.dispatch(request);
        }
    }

    /// Submit the search input once its quiet period has elapsed.
    ///
    /// Returns `true` when a search was submitted.
    pub(super) fn submit_settled_search<S: CharacterSource + 'static>(
        model: &mut Model,
        dispatcher: &mut FetchDispatcher<S>,
        search_debouncer: &mut Debouncer<String>,
        now_ms: u64,
    ) -> bool {
        let Some(raw) = search_debouncer.take_ready(now_ms) else {
            return false;
        };
        tracing::debug!(input = %raw, "search input settled");
        Self::apply(
            model,
            dispatcher,
            search_debouncer,
            Message::SearchSubmitted(raw),
            now_ms,
        );
        true
    }
}
