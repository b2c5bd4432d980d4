//! Debounced search controller
//!
//! Text changes flow into an actor that debounces and deduplicates them,
//! runs at most one live search at a time, and publishes the results of the
//! most recently issued search. Everything that touches controller state
//! happens on the actor's message loop:
//!
//! ```text
//! textChanged ──► debouncer ──(timer)──► settle ──► search task
//!                                                       │
//!      presenter + latest results ◄── searchCompleted ◄─┘
//! ```
//!
//! Each issued search gets a generation number. Starting a new search
//! cancels the previous one, and a completion is applied only if it belongs
//! to the latest generation, so results never appear in completion order
//! when that differs from issue order.

use crate::client::{SearchClient, Transport};
use crate::core::{Actor, ActorController, ActorSendError, Message, MessageHandler};
use crate::debouncer::{SearchDebouncer, Settlement};
use crate::error::{SearchError, SearchResult};
use crate::presenter::Presenter;
use crate::query::decode_input;
use crate::types::ResultSet;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub enum SearchMessage {
    TextChanged(String),
    Settle { ticket: u64 },
    SearchCompleted { generation: u64, results: ResultSet },
    SearchFailed { generation: u64, error: SearchError },
}

/// Progress reported from the message loop to the handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Activity {
    /// Text changes the loop has taken in
    inputs_seen: u64,
    /// A debounce window is open or a search is in flight
    busy: bool,
}

/// State owned by the controller's message loop.
struct ControllerState<T: Transport> {
    client: Arc<SearchClient<T>>,
    debouncer: SearchDebouncer,
    current_text: String,
    /// Generation of the most recently issued search
    generation: u64,
    pending_timer: Option<CancellationToken>,
    in_flight: Option<CancellationToken>,
    presenter: Box<dyn Presenter>,
    latest_results: watch::Sender<ResultSet>,
    inputs_seen: u64,
    activity: watch::Sender<Activity>,
}

impl<T: Transport + 'static> ControllerState<T> {
    fn new(
        client: Arc<SearchClient<T>>,
        presenter: Box<dyn Presenter>,
        latest_results: watch::Sender<ResultSet>,
        activity: watch::Sender<Activity>,
    ) -> Self {
        let debouncer = SearchDebouncer::with_delay(client.config().debounce);
        Self {
            client,
            debouncer,
            current_text: String::new(),
            generation: 0,
            pending_timer: None,
            in_flight: None,
            presenter,
            latest_results,
            inputs_seen: 0,
            activity,
        }
    }

    fn publish_activity(&self) {
        let current = Activity {
            inputs_seen: self.inputs_seen,
            busy: self.pending_timer.is_some() || self.in_flight.is_some(),
        };
        self.activity.send_if_modified(|activity| {
            let changed = *activity != current;
            *activity = current;
            changed
        });
    }

    fn on_text_changed(&mut self, text: String, controller: &ActorController<SearchMessage>) {
        log::trace!("Text changed to '{}'", text);
        self.inputs_seen += 1;
        self.current_text = text.clone();
        let ticket = self.debouncer.set_pending_search(text);

        if let Some(timer) = self.pending_timer.take() {
            timer.cancel();
        }
        let token = controller.child_token();
        self.pending_timer = Some(token.clone());

        let delay = self.debouncer.debounce_delay;
        let controller = controller.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = controller.send_message("settle", SearchMessage::Settle { ticket });
                }
            }
        });
    }

    fn on_settle(&mut self, ticket: u64, controller: &ActorController<SearchMessage>) {
        match self.debouncer.settle(ticket) {
            Settlement::Ready(query) => {
                self.pending_timer = None;
                self.issue_search(query, controller);
            }
            Settlement::Duplicate => {
                self.pending_timer = None;
                log::debug!("'{}' settled again, not searching", self.current_text);
            }
            Settlement::Blank => {
                self.pending_timer = None;
                log::debug!("Settled on blank input, not searching");
            }
            Settlement::Stale => {
                log::trace!("Ignoring stale debounce ticket {}", ticket);
            }
        }
    }

    fn issue_search(&mut self, query: String, controller: &ActorController<SearchMessage>) {
        if let Some(previous) = self.in_flight.take() {
            log::debug!("Cancelling search #{} in favour of '{}'", self.generation, query);
            previous.cancel();
        }

        self.generation += 1;
        let generation = self.generation;
        let token = controller.child_token();
        self.in_flight = Some(token.clone());

        log::debug!("Issuing search #{} for '{}'", generation, query);
        let client = self.client.clone();
        let controller = controller.clone();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => {
                    log::debug!("Search #{} for '{}' was cancelled", generation, query);
                    return;
                }
                outcome = client.search(&query) => outcome,
            };

            let sent = match outcome {
                Ok(results) => controller.send_message(
                    "searchCompleted",
                    SearchMessage::SearchCompleted { generation, results },
                ),
                Err(error) => controller.send_message(
                    "searchFailed",
                    SearchMessage::SearchFailed { generation, error },
                ),
            };
            if sent.is_err() {
                log::debug!("Controller stopped before search #{} finished", generation);
            }
        });
    }

    fn on_search_completed(&mut self, generation: u64, results: ResultSet) {
        if generation != self.generation {
            log::debug!(
                "Discarding results of superseded search #{} (latest is #{})",
                generation,
                self.generation
            );
            return;
        }
        self.in_flight = None;

        log::info!("Showing {} photos", results.len());
        self.presenter.replace_all(&results);
        self.latest_results.send_replace(results);
    }

    fn on_search_failed(&mut self, generation: u64, error: SearchError) {
        if generation == self.generation {
            self.in_flight = None;
        }
        log::warn!("Search #{} failed: {}", generation, error);
    }
}

#[async_trait]
impl<T: Transport + 'static> MessageHandler<SearchMessage> for ControllerState<T> {
    async fn on_message(
        &mut self,
        message: Message<SearchMessage>,
        controller: &ActorController<SearchMessage>,
    ) {
        match message.payload {
            SearchMessage::TextChanged(text) => self.on_text_changed(text, controller),
            SearchMessage::Settle { ticket } => self.on_settle(ticket, controller),
            SearchMessage::SearchCompleted {
                generation,
                results,
            } => self.on_search_completed(generation, results),
            SearchMessage::SearchFailed { generation, error } => {
                self.on_search_failed(generation, error)
            }
        }
        self.publish_activity();
    }

    async fn on_shutdown(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        if let Some(token) = self.pending_timer.take() {
            token.cancel();
        }
        self.debouncer.clear_pending_search();
        self.publish_activity();
        log::debug!("Search controller stopped after {} searches", self.generation);
    }
}

/// Handle to a running search controller.
pub struct SearchController {
    actor: Actor<SearchMessage>,
    latest_results: watch::Receiver<ResultSet>,
    activity: watch::Receiver<Activity>,
    inputs_sent: AtomicU64,
    fallback_term: Option<String>,
}

impl SearchController {
    /// Start a controller on the current tokio runtime.
    pub fn spawn<T, P>(client: Arc<SearchClient<T>>, presenter: P) -> Self
    where
        T: Transport + 'static,
        P: Presenter + 'static,
    {
        let fallback_term = client.config().fallback_term.clone();
        let (sender, latest_results) = watch::channel(ResultSet::new());
        let (activity_sender, activity) = watch::channel(Activity::default());
        let state = ControllerState::new(client, Box::new(presenter), sender, activity_sender);

        Self {
            actor: Actor::spawn(state),
            latest_results,
            activity,
            inputs_sent: AtomicU64::new(0),
            fallback_term,
        }
    }

    /// Report new search-bar text. Empty text is not forwarded.
    pub fn on_text_changed(&self, text: impl Into<String>) -> Result<(), ActorSendError> {
        let text = text.into();
        if text.is_empty() {
            return Ok(());
        }
        self.actor
            .send_message("textChanged", SearchMessage::TextChanged(text))?;
        self.inputs_sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Report raw input bytes, applying the configured fallback term to
    /// input that is not valid text.
    pub fn on_input(&self, raw: &[u8]) -> SearchResult<()> {
        let text = decode_input(raw, self.fallback_term.as_deref())?;
        self.on_text_changed(text.into_owned())?;
        Ok(())
    }

    /// Results of the most recently issued successful search.
    pub fn latest_results(&self) -> ResultSet {
        self.latest_results.borrow().clone()
    }

    /// Watch for result set replacements.
    pub fn subscribe(&self) -> watch::Receiver<ResultSet> {
        self.latest_results.clone()
    }

    /// Wait until every text change sent so far has settled and the search it
    /// led to, if any, has completed or failed.
    ///
    /// Returns at once when nothing is pending, and also when the controller
    /// has stopped.
    pub async fn wait_until_idle(&self) {
        let sent = self.inputs_sent.load(Ordering::SeqCst);
        let mut activity = self.activity.clone();
        let idle = activity
            .wait_for(|activity| activity.inputs_seen >= sent && !activity.busy)
            .await
            .map(|_| ());
        if idle.is_err() {
            log::debug!("Controller stopped while waiting for it to go idle");
        }
    }

    pub async fn shutdown(self) {
        self.actor.shutdown().await;
    }
}
