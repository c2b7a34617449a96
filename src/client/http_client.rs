//! Rate-Limited HTTP Client for the marketplace backend
//!
//! Thin wrapper over `reqwest::Client` that throttles outgoing requests on
//! the client side and turns transport failures into `ApiError`. Each call is
//! a single attempt; retry policy belongs to the caller.

use governor::{
    clock::DefaultClock, middleware::NoOpMiddleware, state::NotKeyed, Quota, RateLimiter,
};
use nonzero_ext::nonzero;
use reqwest::{Client, Method, RequestBuilder, Response};
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::debug;

use super::traits::{ApiError, ApiResult};

/// Rate-limited HTTP client for API requests
pub struct RateLimitedClient {
    /// Inner HTTP client
    client: Client,

    /// Rate limiter (requests per minute)
    limiter: RateLimiter<NotKeyed, governor::state::InMemoryState, DefaultClock, NoOpMiddleware>,

    /// Configured rate limit
    rate_limit_per_minute: u32,
}

impl RateLimitedClient {
    /// Create a new rate-limited client
    ///
    /// # Arguments
    /// * `rate_limit_per_minute` - Maximum requests allowed per minute
    /// * `timeout` - Overall request timeout; `None` keeps the transport default
    pub fn new(rate_limit_per_minute: u32, timeout: Option<Duration>) -> ApiResult<Self> {
        // At least 1 request per minute
        let rate = NonZeroU32::new(rate_limit_per_minute).unwrap_or(nonzero!(1u32));
        let limiter = RateLimiter::direct(Quota::per_minute(rate));

        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("trustytrade/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("failed to build HTTP client: {}", e)))?;

        Ok(RateLimitedClient {
            client,
            limiter,
            rate_limit_per_minute: rate.get(),
        })
    }

    pub fn rate_limit_per_minute(&self) -> u32 {
        self.rate_limit_per_minute
    }

    /// Build a request with an arbitrary method
    pub fn request(&self, method: Method, url: &str) -> RateLimitedRequestBuilder<'_> {
        RateLimitedRequestBuilder {
            client: self,
            builder: self.client.request(method, url),
        }
    }

    /// Wait for a rate limit permit and execute the request once
    async fn execute(&self, builder: RequestBuilder) -> ApiResult<Response> {
        self.limiter.until_ready().await;

        debug!("Executing rate-limited request");

        Ok(builder.send().await?)
    }
}

/// Request builder wrapper that enforces rate limiting
pub struct RateLimitedRequestBuilder<'a> {
    client: &'a RateLimitedClient,
    builder: RequestBuilder,
}

impl<'a> RateLimitedRequestBuilder<'a> {
    /// Add a header to the request
    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Add JSON body to the request
    pub fn json<T: serde::Serialize + ?Sized>(mut self, json: &T) -> Self {
        self.builder = self.builder.json(json);
        self
    }

    /// Add a bearer token header
    pub fn bearer_auth(mut self, token: &str) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    /// Send the request (waits for rate limit)
    pub async fn send(self) -> ApiResult<Response> {
        self.client.execute(self.builder).await
    }
}
