//! Debounced location search with a suggestion list.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use weatherdash_core::SearchConfig;
use weatherdash_weather::{Location, WeatherApi};

use crate::error_mapping::IntoAppError;

/// Notifications sent to whoever renders the search box
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// Results, loading or open state changed
    ResultsChanged,
    /// Transient message for the user
    Notification(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<Location>,
    pub is_loading: bool,
    pub is_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub min_query_len: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            min_query_len: 2,
        }
    }
}

impl From<&SearchConfig> for SearchSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            min_query_len: config.min_query_len,
        }
    }
}

struct Inner {
    api: Arc<dyn WeatherApi>,
    settings: SearchSettings,
    state: Mutex<SearchState>,
    pending: Mutex<Option<CancellationToken>>,
    generation: AtomicU64,
    /// Generation of the search awaiting the geocoder, 0 when idle
    in_flight: AtomicU64,
    events: mpsc::UnboundedSender<SearchEvent>,
}

/// Search box controller.
///
/// Every query change restarts a single debounce timer; only the last
/// one fires. Must be used from within a tokio runtime.
pub struct SearchController {
    inner: Arc<Inner>,
}

impl SearchController {
    pub fn new(
        api: Arc<dyn WeatherApi>,
        settings: SearchSettings,
    ) -> (Self, mpsc::UnboundedReceiver<SearchEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let inner = Inner {
            api,
            settings,
            state: Mutex::new(SearchState::default()),
            pending: Mutex::new(None),
            generation: AtomicU64::new(0),
            in_flight: AtomicU64::new(0),
            events,
        };

        (
            Self {
                inner: Arc::new(inner),
            },
            rx,
        )
    }

    pub fn state(&self) -> SearchState {
        self.inner.state.lock().clone()
    }

    /// Store the query and (re)start the debounce timer.
    ///
    /// A blank query empties the suggestions right away.
    pub fn set_query(&self, text: impl Into<String>) {
        let text = text.into();
        if text.trim().is_empty() {
            self.cancel_pending();
            self.inner.reset(text);
            return;
        }
        self.inner.state.lock().query = text;

        let token = CancellationToken::new();
        if let Some(previous) = self.inner.pending.lock().replace(token.clone()) {
            previous.cancel();
        }
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let inner = Arc::clone(&self.inner);
        let delay = inner.settings.debounce;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => inner.run_search(generation).await,
            }
        });
    }

    /// Pick a suggestion. Returns the chosen location for the caller to load.
    pub fn select(&self, index: usize) -> Option<Location> {
        self.cancel_pending();

        let mut state = self.inner.state.lock();
        let location = state.results.get(index).cloned()?;
        state.query = location.name.clone();
        state.is_loading = false;
        state.is_open = false;
        drop(state);

        self.inner.notify(SearchEvent::ResultsChanged);
        Some(location)
    }

    pub fn click_outside(&self) {
        self.inner.state.lock().is_open = false;
        self.inner.notify(SearchEvent::ResultsChanged);
    }

    /// Reopen the list when there is something to show.
    pub fn focus(&self) {
        let mut state = self.inner.state.lock();
        if !state.results.is_empty() {
            state.is_open = true;
        }
        drop(state);
        self.inner.notify(SearchEvent::ResultsChanged);
    }

    pub fn clear(&self) {
        self.cancel_pending();
        self.inner.reset(String::new());
    }

    /// Cancel the timer and invalidate any search already in flight.
    fn cancel_pending(&self) {
        if let Some(token) = self.inner.pending.lock().take() {
            token.cancel();
        }
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        if let Some(token) = self.inner.pending.lock().take() {
            token.cancel();
        }
    }
}

impl Inner {
    fn notify(&self, event: SearchEvent) {
        // Receiver gone means nobody is listening any more
        let _ = self.events.send(event);
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn reset(&self, query: String) {
        let mut state = self.state.lock();
        state.query = query;
        state.results.clear();
        state.is_loading = false;
        state.is_open = false;
        drop(state);

        self.notify(SearchEvent::ResultsChanged);
    }

    async fn run_search(&self, generation: u64) {
        let query = {
            let mut state = self.state.lock();
            let query = state.query.trim().to_string();

            if query.chars().count() < self.settings.min_query_len {
                state.results.clear();
                state.is_loading = false;
                state.is_open = false;
                drop(state);
                self.notify(SearchEvent::ResultsChanged);
                return;
            }

            state.is_loading = true;
            self.in_flight.store(generation, Ordering::SeqCst);
            query
        };
        self.notify(SearchEvent::ResultsChanged);

        tracing::debug!("Searching locations for {:?}", query);
        let result = self.api.search(&query).await;

        let mut state = self.state.lock();
        // Only the latest request to reach the geocoder owns the loading flag
        if self.in_flight.load(Ordering::SeqCst) == generation {
            self.in_flight.store(0, Ordering::SeqCst);
            state.is_loading = false;
        }

        if !self.is_current(generation) {
            drop(state);
            tracing::debug!("Dropping superseded search results for {:?}", query);
            self.notify(SearchEvent::ResultsChanged);
            return;
        }

        match result {
            Ok(results) => {
                state.is_open = !results.is_empty();
                state.results = results;
                drop(state);
            }
            Err(e) => {
                state.results.clear();
                state.is_open = false;
                drop(state);

                let message = e.into_app_error().user_message();
                tracing::warn!("Location search failed: {}", message);
                self.notify(SearchEvent::Notification(message.to_string()));
            }
        }
        self.notify(SearchEvent::ResultsChanged);
    }
}
