//! Paginated, searchable listing browser
//!
//! Owns the page state for one listing screen and mediates between a
//! `ListingSource` and a `ListingView`. Search input is debounced, load-more
//! is driven by a scroll sentinel, and every search starts a new generation so
//! responses belonging to a superseded search are dropped on arrival.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, info, warn, instrument};

use crate::client::{ApiError, ErrorKind, ListingSource, PAGE_SIZE};
use crate::domain::{Listing, ListingCard};

use super::debounce::Debouncer;
use super::view::ListingView;

/// Default quiet period between the last keystroke and the search
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Where the controller is in its load cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// Page state of one search session
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    /// Append-only within a search session
    pub items: Vec<Listing>,
    /// Next page to fetch (1-indexed)
    pub page: u32,
    pub has_more: bool,
    pub is_loading: bool,
    pub search_query: String,
    pub phase: LoadPhase,
    generation: u64,
}

impl PageState {
    fn new(search_query: String, generation: u64) -> Self {
        PageState {
            items: Vec::new(),
            page: 1,
            has_more: true,
            is_loading: false,
            search_query,
            phase: LoadPhase::Idle,
            generation,
        }
    }

    /// Identifies the search session this state belongs to
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn cards(&self) -> Vec<ListingCard> {
        self.items.iter().map(ListingCard::from).collect()
    }
}

impl Default for PageState {
    fn default() -> Self {
        PageState::new(String::new(), 0)
    }
}

/// What a load attempt ended up doing
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Rejected by the guard: a load is in flight or there is nothing more
    Skipped,
    /// Items were appended (possibly zero)
    Loaded { added: usize },
    /// The fetch failed; `has_more` is now false
    Failed(ApiError),
    /// A newer search started while this fetch was in flight
    Stale,
}

impl LoadOutcome {
    /// Whether a network call was made
    pub fn issued(&self) -> bool {
        !matches!(self, LoadOutcome::Skipped)
    }
}

/// Short user-facing message for a failed listing fetch
pub fn load_error_message(err: &ApiError) -> &'static str {
    match err.kind() {
        ErrorKind::Network => "Connection error. Check your internet connection.",
        _ => "Failed to load listings. Try refreshing the page.",
    }
}

struct Inner {
    source: Arc<dyn ListingSource>,
    view: Arc<dyn ListingView>,
    state: Mutex<PageState>,
    debouncer: Debouncer,
}

/// Listing browser controller
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct ListingController {
    inner: Arc<Inner>,
}

impl ListingController {
    pub fn new(source: Arc<dyn ListingSource>, view: Arc<dyn ListingView>) -> Self {
        Self::with_debounce(source, view, SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(
        source: Arc<dyn ListingSource>,
        view: Arc<dyn ListingView>,
        debounce: Duration,
    ) -> Self {
        ListingController {
            inner: Arc::new(Inner {
                source,
                view,
                state: Mutex::new(PageState::default()),
                debouncer: Debouncer::new(debounce),
            }),
        }
    }

    /// Copy of the current page state
    pub fn snapshot(&self) -> PageState {
        self.inner.state.lock().clone()
    }

    /// Feed one keystroke's worth of search input
    ///
    /// The search runs once input has been quiet for the debounce period,
    /// with the trimmed value of the last call.
    pub fn on_search_input(&self, raw: &str) {
        let query = raw.trim().to_string();
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);

        self.inner.view.set_loading(true);
        self.inner.debouncer.schedule(async move {
            if let Some(inner) = weak.upgrade() {
                ListingController { inner }.search(query).await;
            }
        });
    }

    /// Start a new search session right away and fetch its first page
    #[instrument(skip(self, query), fields(query = tracing::field::Empty))]
    pub async fn search(&self, query: impl Into<String>) -> LoadOutcome {
        let query = query.into();
        tracing::Span::current().record("query", query.as_str());

        {
            let mut state = self.inner.state.lock();
            let generation = state.generation + 1;
            *state = PageState::new(query, generation);
            debug!(generation, "search session reset");
        }

        self.inner.view.clear_error();
        self.inner.view.render(&[]);
        self.load_more().await
    }

    /// Restart the current search from its first page
    pub async fn retry(&self) -> LoadOutcome {
        let query = self.inner.state.lock().search_query.clone();
        self.search(query).await
    }

    /// The scroll sentinel became visible
    pub async fn on_sentinel_visible(&self) -> LoadOutcome {
        self.load_more().await
    }

    /// Fetch the next page of the current search
    ///
    /// No-op while a load of the same search is in flight or once the search
    /// has no more pages. The guard is per search generation, not per
    /// controller: after `search` starts a new generation its first fetch is
    /// issued even if a fetch of the superseded search is still pending, so
    /// two requests can briefly be in flight. The older one resolves as
    /// `LoadOutcome::Stale`.
    pub async fn load_more(&self) -> LoadOutcome {
        let (page, query, generation) = {
            let mut state = self.inner.state.lock();
            if state.is_loading || !state.has_more {
                return LoadOutcome::Skipped;
            }
            state.is_loading = true;
            state.phase = LoadPhase::Loading;
            (state.page, state.search_query.clone(), state.generation)
        };

        self.inner.view.set_loading(true);
        self.inner.view.clear_error();

        let result = self.inner.source.fetch_page(page, &query).await;

        let mut state = self.inner.state.lock();
        if state.generation != generation {
            debug!(
                generation,
                current = state.generation,
                "dropping response of superseded search"
            );
            return LoadOutcome::Stale;
        }
        state.is_loading = false;

        match result {
            Ok(items) => {
                let added = items.len();
                state.items.extend(items);
                state.has_more = added >= PAGE_SIZE;
                if added > 0 {
                    state.page += 1;
                } else {
                    state.has_more = false;
                }
                state.phase = LoadPhase::Loaded;

                info!(
                    page,
                    added,
                    total = state.items.len(),
                    has_more = state.has_more,
                    "Loaded listings page"
                );

                let cards = state.cards();
                drop(state);
                self.inner.view.set_loading(false);
                self.inner.view.render(&cards);
                LoadOutcome::Loaded { added }
            }
            Err(err) => {
                state.has_more = false;
                state.phase = LoadPhase::Errored;
                drop(state);

                warn!(page, error = %err, "Failed to load listings");
                self.inner.view.set_loading(false);
                self.inner.view.show_error(load_error_message(&err), true);
                LoadOutcome::Failed(err)
            }
        }
    }
}
