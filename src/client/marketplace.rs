//! Marketplace API Client Implementation
//!
//! Endpoint facade over the REST backend. Every method resolves to an
//! `ApiResult`; nothing here panics or retries.

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ApiSettings;
use crate::domain::{Deal, Listing, ListingUpdate, NewDeal, NewListing, NewReview, Review, User};
use crate::telegram::TelegramAuth;

use super::http_client::RateLimitedClient;
use super::models::{AuthResponse, ListingQuery};
use super::traits::{ApiError, ApiResult, DealSource, ListingSource, PAGE_SIZE};

/// Marketplace API client
///
/// Holds the bearer token for the session. Share it between controllers with
/// an `Arc`.
pub struct MarketplaceClient {
    /// Rate-limited HTTP client
    client: RateLimitedClient,

    /// API base URL, without trailing slash
    base_url: String,

    /// Bearer token attached to every request when present
    token: RwLock<Option<String>>,
}

impl MarketplaceClient {
    /// Create a client from settings
    pub fn new(settings: &ApiSettings) -> ApiResult<Self> {
        let client = RateLimitedClient::new(settings.rate_limit_per_minute, settings.timeout())?;

        Ok(MarketplaceClient {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(settings.token.clone().filter(|t| !t.is_empty())),
        })
    }

    /// Create a client for a base URL with default settings
    pub fn with_base_url(base_url: &str) -> ApiResult<Self> {
        Self::new(&ApiSettings {
            base_url: base_url.to_string(),
            ..ApiSettings::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    pub fn clear_token(&self) {
        *self.token.write() = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.read().is_some()
    }

    /// Send one request and map non-2xx answers onto `ApiError`
    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> ApiResult<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(method = %method, url = %url, "Marketplace API request");

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Accept", "application/json");
        if let Some(token) = self.token.read().as_deref() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(method = %method, url = %url, error = %e, "Marketplace API request failed");
                return Err(e);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::from_status(status, &body);
            warn!(
                method = %method,
                url = %url,
                status = status.as_u16(),
                error = %err,
                "Marketplace API error"
            );
            return Err(err);
        }

        Ok(response)
    }

    /// Send a request and decode the JSON body
    async fn request<T, B>(&self, method: Method, endpoint: &str, body: Option<&B>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.execute(method, endpoint, body).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::Decode(format!("{} - Body: {}", e, truncate(&text, 500)))
        })
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.request::<T, ()>(Method::GET, endpoint, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.request(Method::POST, endpoint, Some(body)).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.request::<T, ()>(Method::POST, endpoint, None).await
    }

    // ------------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------------

    /// Log in with Mini-App init data; stores the access token when one is issued
    pub async fn authenticate_telegram(&self, auth: &TelegramAuth) -> ApiResult<AuthResponse> {
        let response: AuthResponse = self.post("/auth/telegram", auth).await?;
        if let Some(token) = response.access_token.as_deref().filter(|t| !t.is_empty()) {
            self.set_token(token);
        }
        info!(
            telegram_id = auth.id,
            token_issued = response.access_token.is_some(),
            "Telegram login succeeded"
        );
        Ok(response)
    }

    // ------------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------------

    pub async fn get_current_user(&self) -> ApiResult<User> {
        self.get("/users/me").await
    }

    pub async fn get_user(&self, id: i64) -> ApiResult<User> {
        self.get(&format!("/users/{}", id)).await
    }

    // ------------------------------------------------------------------------
    // Listings
    // ------------------------------------------------------------------------

    /// Get one page of listings
    ///
    /// # Arguments
    /// * `page` - Page number (1-indexed)
    /// * `search` - Free-text filter; blank means no filter
    pub async fn get_listings(&self, page: u32, search: &str) -> ApiResult<Vec<Listing>> {
        let query = ListingQuery::new(page, PAGE_SIZE, search);
        self.get(&format!("/accounts?{}", query.to_query_string())).await
    }

    pub async fn get_listing(&self, id: i64) -> ApiResult<Listing> {
        self.get(&format!("/accounts/{}", id)).await
    }

    pub async fn create_listing(&self, listing: &NewListing) -> ApiResult<Listing> {
        self.post("/accounts", listing).await
    }

    pub async fn update_listing(&self, id: i64, update: &ListingUpdate) -> ApiResult<Listing> {
        self.request(Method::PATCH, &format!("/accounts/{}", id), Some(update)).await
    }

    /// Delete a listing; whatever body the backend answers with is ignored
    pub async fn delete_listing(&self, id: i64) -> ApiResult<()> {
        self.execute::<()>(Method::DELETE, &format!("/accounts/{}", id), None).await?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Deals
    // ------------------------------------------------------------------------

    pub async fn create_deal(&self, account_id: i64) -> ApiResult<Deal> {
        self.post("/deals", &NewDeal { account_id }).await
    }

    pub async fn get_deals(&self) -> ApiResult<Vec<Deal>> {
        self.get("/deals").await
    }

    pub async fn get_deal(&self, id: i64) -> ApiResult<Deal> {
        self.get(&format!("/deals/{}", id)).await
    }

    pub async fn confirm_deal(&self, id: i64) -> ApiResult<Deal> {
        self.post_empty(&format!("/deals/{}/confirm", id)).await
    }

    pub async fn cancel_deal(&self, id: i64) -> ApiResult<Deal> {
        self.post_empty(&format!("/deals/{}/cancel", id)).await
    }

    // ------------------------------------------------------------------------
    // Reviews
    // ------------------------------------------------------------------------

    pub async fn create_review(&self, review: &NewReview) -> ApiResult<Review> {
        self.post("/reviews", review).await
    }

    pub async fn get_user_reviews(&self, user_id: i64) -> ApiResult<Vec<Review>> {
        self.get(&format!("/users/{}/reviews", user_id)).await
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait]
impl ListingSource for MarketplaceClient {
    async fn fetch_page(&self, page: u32, search: &str) -> ApiResult<Vec<Listing>> {
        self.get_listings(page, search).await
    }
}

#[async_trait]
impl DealSource for MarketplaceClient {
    async fn create_deal(&self, account_id: i64) -> ApiResult<Deal> {
        MarketplaceClient::create_deal(self, account_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn listing(id: i64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "game": "PUBG",
            "title": format!("Account {}", id),
            "price": 500.0,
            "is_available": true,
            "seller": {"id": 1, "name": "seller", "rating": 4.0}
        })
    }

    async fn client_for(server: &MockServer) -> MarketplaceClient {
        MarketplaceClient::with_base_url(&format!("{}/api/v1/", server.uri())).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = MarketplaceClient::with_base_url("http://localhost:8000/api/v1/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api/v1");
        assert!(!client.has_token());
    }

    #[test]
    fn test_token_lifecycle() {
        let client = MarketplaceClient::new(&ApiSettings {
            token: Some("abc".to_string()),
            ..ApiSettings::default()
        })
        .unwrap();
        assert!(client.has_token());

        client.clear_token();
        assert!(!client.has_token());
        client.set_token("def");
        assert!(client.has_token());
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("привет", 3), "при");
        assert_eq!(truncate("hi", 10), "hi");
    }

    #[tokio::test]
    async fn test_get_listings_translates_page_and_sends_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/accounts"))
            .and(query_param("skip", "100"))
            .and(query_param("limit", "100"))
            .and(query_param("search", "dota"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![listing(1), listing(2)]))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        client.set_token("secret");

        let listings = assert_ok!(client.fetch_page(2, " dota ").await);
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[1].id, 2);
    }

    #[tokio::test]
    async fn test_status_codes_are_classified() {
        let server = MockServer::start().await;
        Mock::given(path("/api/v1/users/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(path("/api/v1/accounts/9"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"detail": "Account not found"})),
            )
            .mount(&server)
            .await;
        Mock::given(path("/api/v1/deals"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(path("/api/v1/reviews"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"detail": "Deal is not completed"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;

        assert_eq!(client.get_current_user().await.unwrap_err(), ApiError::AuthRequired);
        assert_eq!(client.get_listing(9).await.unwrap_err(), ApiError::NotFound);
        assert_eq!(client.get_deals().await.unwrap_err(), ApiError::Server { status: 503 });

        let err = assert_err!(client.create_review(&NewReview::new(1, 5, None)).await);
        assert_eq!(err.to_string(), "Deal is not completed");
    }

    #[tokio::test]
    async fn test_undecodable_success_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(path("/api/v1/accounts"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(matches!(client.get_listings(1, "").await, Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn test_create_deal_posts_account_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/deals"))
            .and(body_json(serde_json::json!({"account_id": 77})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 5, "account_id": 77, "buyer_id": 2, "seller_id": 3, "status": "pending"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let deal = assert_ok!(DealSource::create_deal(&client, 77).await);
        assert_eq!(deal.id, 5);
    }

    #[tokio::test]
    async fn test_deal_actions_and_delete() {
        let server = MockServer::start().await;
        let deal = |status: &str| {
            serde_json::json!({
                "id": 5,
                "account_id": 77,
                "buyer_id": 2,
                "seller_id": 3,
                "status": status
            })
        };
        Mock::given(method("POST"))
            .and(path("/api/v1/deals/5/confirm"))
            .respond_with(ResponseTemplate::new(200).set_body_json(deal("completed")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/deals/5/cancel"))
            .respond_with(ResponseTemplate::new(200).set_body_json(deal("cancelled")))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/accounts/77"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Account deleted"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(!client.confirm_deal(5).await.unwrap().status.is_open());
        assert_eq!(client.cancel_deal(5).await.unwrap().status.to_string(), "cancelled");
        assert_ok!(client.delete_listing(77).await);
    }

    #[tokio::test]
    async fn test_update_listing_sends_patch() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/v1/accounts/1"))
            .and(body_json(serde_json::json!({"price": 750.0})))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing(1)))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let update = ListingUpdate {
            price: Some(750.0),
            ..Default::default()
        };
        assert_ok!(client.update_listing(1, &update).await);
    }

    #[tokio::test]
    async fn test_telegram_login_stores_issued_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/telegram"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "user": {"id": 1, "telegram_id": 42, "username": "neo", "rating": 0.0},
                "message": "Successfully authenticated",
                "access_token": "issued"
            })))
            .mount(&server)
            .await;
        Mock::given(path("/api/v1/users/me"))
            .and(header("authorization", "Bearer issued"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": 1, "rating": 0.0})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let auth = TelegramAuth {
            id: 42,
            first_name: "Neo".to_string(),
            username: Some("neo".to_string()),
            photo_url: None,
            auth_date: 1,
            hash: "ff".to_string(),
        };

        assert_ok!(client.authenticate_telegram(&auth).await);
        assert!(client.has_token());
        assert_eq!(client.get_current_user().await.unwrap().id, 1);
    }
}
