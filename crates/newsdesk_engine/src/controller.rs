use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use desk_logging::{desk_debug, desk_info, desk_warn};
use newsdesk_core::{
    update_search, Article, ArticleId, RequestSeq, SearchEffect, SearchFailure, SearchMsg,
    SearchOutcome, SearchSettings, SearchState, SearchViewModel,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::inbox::Reply;
use crate::{EventBus, SearchClient};

/// Receives the article a user picked; renders the detail view.
pub trait Navigator: Send + Sync {
    fn open(&self, article: Article, category_color: &'static str);
}

/// Published when the pointer enters or leaves a result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverSignal {
    pub article_id: Option<ArticleId>,
}

/// Runs the search state machine against real timers and a [`SearchClient`].
///
/// Must be driven from inside a tokio runtime. Timer and request tasks post
/// their results to an inbox that [`SearchController::next_event`] drains, so
/// every state change happens on the caller's task.
pub struct SearchController {
    state: SearchState,
    client: Arc<dyn SearchClient>,
    navigator: Arc<dyn Navigator>,
    hover_bus: Option<EventBus<HoverSignal>>,
    inbox_tx: mpsc::UnboundedSender<SearchMsg>,
    inbox_rx: mpsc::UnboundedReceiver<SearchMsg>,
    debounce: Option<CancellationToken>,
    requests: HashMap<RequestSeq, CancellationToken>,
}

impl SearchController {
    pub fn new(
        settings: SearchSettings,
        client: Arc<dyn SearchClient>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            state: SearchState::with_settings(settings),
            client,
            navigator,
            hover_bus: None,
            inbox_tx,
            inbox_rx,
            debounce: None,
            requests: HashMap::new(),
        }
    }

    pub fn with_hover_bus(mut self, bus: EventBus<HoverSignal>) -> Self {
        self.hover_bus = Some(bus);
        self
    }

    pub fn input(&mut self, text: impl Into<String>) {
        self.handle(SearchMsg::QueryChanged(text.into()));
    }

    pub fn clear(&mut self) {
        self.handle(SearchMsg::ClearRequested);
    }

    pub fn select(&mut self, index: usize) {
        self.handle(SearchMsg::ResultSelected { index });
    }

    pub fn hover(&mut self, index: Option<usize>) {
        self.handle(SearchMsg::ResultHovered(index));
    }

    pub fn dismiss(&mut self) {
        self.handle(SearchMsg::Dismissed);
    }

    /// Applies one message and runs the resulting effects.
    pub fn handle(&mut self, msg: SearchMsg) {
        if let SearchMsg::SearchCompleted { seq, .. } = &msg {
            self.requests.remove(seq);
        }
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update_search(state, msg);
        self.state = state;
        for effect in effects {
            self.run(effect);
        }
    }

    /// Waits for the next timer or request completion and applies it.
    ///
    /// Only await this while [`SearchController::is_busy`]; otherwise nothing
    /// will ever arrive.
    pub async fn next_event(&mut self) {
        if let Some(msg) = self.inbox_rx.recv().await {
            self.handle(msg);
        }
    }

    /// Drives timers and requests until the controller is idle or settled.
    pub async fn settle(&mut self) {
        while self.state.is_busy() {
            self.next_event().await;
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn outcome(&self) -> &SearchOutcome {
        self.state.outcome()
    }

    pub fn view(&self) -> SearchViewModel {
        self.state.view()
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    /// Unmount: drop timers, abandon requests, ignore anything that still arrives.
    pub fn teardown(&mut self) {
        self.handle(SearchMsg::TornDown);
        self.cancel_all();
    }

    fn run(&mut self, effect: SearchEffect) {
        match effect {
            SearchEffect::ArmDebounce { generation, delay } => self.arm_debounce(generation, delay),
            SearchEffect::CancelDebounce => self.cancel_debounce(),
            SearchEffect::IssueSearch {
                seq,
                query,
                max_results,
                timeout,
            } => self.issue_search(seq, query, max_results, timeout),
            SearchEffect::CancelSearch { seq } => {
                if let Some(token) = self.requests.remove(&seq) {
                    desk_debug!("search: cancelling seq={}", seq);
                    token.cancel();
                }
            }
            SearchEffect::Navigate {
                article,
                category_color,
            } => {
                desk_info!("search: opening article id={}", article.id);
                self.navigator.open(article, category_color);
            }
            SearchEffect::PublishHover { article_id } => {
                if let Some(bus) = &self.hover_bus {
                    bus.publish(HoverSignal { article_id });
                }
            }
        }
    }

    fn arm_debounce(&mut self, generation: u64, delay: Duration) {
        self.cancel_debounce();
        let token = CancellationToken::new();
        let guard = token.clone();
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = guard.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = tx.send(SearchMsg::DebounceElapsed { generation });
                }
            }
        });
        self.debounce = Some(token);
    }

    fn cancel_debounce(&mut self) {
        if let Some(token) = self.debounce.take() {
            token.cancel();
        }
    }

    fn issue_search(&mut self, seq: RequestSeq, query: String, max_results: u32, timeout: Duration) {
        let token = CancellationToken::new();
        let guard = token.clone();
        let client = Arc::clone(&self.client);
        let reply = Reply::new(
            self.inbox_tx.clone(),
            SearchMsg::SearchCompleted {
                seq,
                result: Err(SearchFailure::Unknown),
            },
        );

        tokio::spawn(async move {
            if guard.is_cancelled() {
                reply.disarm();
                return;
            }
            let result = tokio::select! {
                biased;
                _ = guard.cancelled() => {
                    desk_debug!("search: seq={} abandoned in flight", seq);
                    reply.disarm();
                    return;
                }
                answer = tokio::time::timeout(timeout, client.search(&query, max_results)) => {
                    match answer {
                        Ok(Ok(response)) => Ok(response),
                        Ok(Err(err)) => {
                            desk_warn!("search: seq={} failed: {}", seq, err);
                            Err(err.kind)
                        }
                        Err(_) => {
                            desk_warn!("search: seq={} timed out after {:?}", seq, timeout);
                            Err(SearchFailure::Timeout)
                        }
                    }
                }
            };
            reply.send(SearchMsg::SearchCompleted { seq, result });
        });

        self.requests.insert(seq, token);
    }

    fn cancel_all(&mut self) {
        self.cancel_debounce();
        for (_, token) in self.requests.drain() {
            token.cancel();
        }
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
