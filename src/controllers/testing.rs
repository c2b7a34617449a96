//! Scripted collaborators for controller tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::client::{ApiResult, DealSource, ListingSource};
use crate::domain::{Deal, DealStatus, Listing, ListingCard, SellerSummary};

use super::view::ListingView;

/// `count` listings with consecutive ids starting at `first_id`
pub fn listings(first_id: i64, count: usize) -> Vec<Listing> {
    (0..count as i64)
        .map(|offset| listing(first_id + offset))
        .collect()
}

pub fn listing(id: i64) -> Listing {
    Listing {
        id,
        game: "CS:GO".to_string(),
        title: format!("Account #{}", id),
        description: None,
        price: 1500.0,
        image_url: None,
        is_available: true,
        seller: SellerSummary {
            id: 9,
            name: "trader".to_string(),
            rating: 4.9,
        },
        created_at: None,
        updated_at: None,
    }
}

/// Listing source answering from per-query scripts
///
/// Once a query's script runs dry every further fetch returns an empty page.
#[derive(Default)]
pub struct FakeSource {
    scripts: Mutex<HashMap<String, VecDeque<ApiResult<Vec<Listing>>>>>,
    delay: Option<Duration>,
    query_delays: HashMap<String, Duration>,
    calls: Mutex<Vec<(u32, String)>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, query: &str, result: ApiResult<Vec<Listing>>) -> Self {
        self.scripts
            .lock()
            .entry(query.to_string())
            .or_default()
            .push_back(result);
        self
    }

    /// Delay every fetch
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Delay fetches for one query only
    pub fn with_query_delay(mut self, query: &str, delay: Duration) -> Self {
        self.query_delays.insert(query.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<(u32, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ListingSource for FakeSource {
    async fn fetch_page(&self, page: u32, search: &str) -> ApiResult<Vec<Listing>> {
        self.calls.lock().push((page, search.to_string()));

        let delay = self.query_delays.get(search).copied().or(self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let next = self
            .scripts
            .lock()
            .get_mut(search)
            .and_then(|script| script.pop_front());
        next.unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// View that remembers what it was asked to show
#[derive(Default)]
pub struct RecordingView {
    renders: Mutex<Vec<usize>>,
    errors: Mutex<Vec<(String, bool)>>,
    loading: Mutex<bool>,
}

impl RecordingView {
    pub fn last_render_len(&self) -> Option<usize> {
        self.renders.lock().last().copied()
    }

    pub fn errors(&self) -> Vec<(String, bool)> {
        self.errors.lock().clone()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.lock()
    }
}

impl ListingView for RecordingView {
    fn render(&self, cards: &[ListingCard]) {
        self.renders.lock().push(cards.len());
    }

    fn set_loading(&self, loading: bool) {
        *self.loading.lock() = loading;
    }

    fn show_error(&self, message: &str, can_retry: bool) {
        self.errors.lock().push((message.to_string(), can_retry));
    }

    fn clear_error(&self) {}
}

/// Deal source answering every purchase with the same result
pub struct FakeDeals {
    result: ApiResult<()>,
    delay: Option<Duration>,
    calls: Mutex<Vec<i64>>,
}

impl FakeDeals {
    pub fn new(result: ApiResult<()>) -> Self {
        FakeDeals {
            result,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<i64> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl DealSource for FakeDeals {
    async fn create_deal(&self, account_id: i64) -> ApiResult<Deal> {
        self.calls.lock().push(account_id);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone().map(|_| Deal {
            id: 1000 + account_id,
            account_id,
            buyer_id: 1,
            seller_id: 9,
            status: DealStatus::Pending,
            price: Some(1500.0),
            created_at: None,
            updated_at: None,
        })
    }
}
