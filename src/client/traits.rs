//! Error taxonomy and the seams controllers depend on
//!
//! Controllers never talk to `reqwest` directly. They depend on the small
//! `ListingSource` / `DealSource` traits below, which `MarketplaceClient`
//! implements and tests replace with scripted fakes.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::{Deal, Listing};

/// Fixed server-side maximum item count per listing fetch
pub const PAGE_SIZE: usize = 100;

// ============================================================================
// Error Types
// ============================================================================

/// Every way a backend call can fail
///
/// `Display` yields a message fit for showing to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Authorization required")]
    AuthRequired,

    #[error("Resource not found")]
    NotFound,

    #[error("Server error. Please try again later.")]
    Server { status: u16 },

    #[error("NetworkError: {0}")]
    Network(String),

    /// Any other non-2xx answer; carries the backend's `detail` when it sent one
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Coarse error categories used for user-facing messaging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AuthRequired,
    NotFound,
    Server,
    Network,
    Other,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::AuthRequired => ErrorKind::AuthRequired,
            ApiError::NotFound => ErrorKind::NotFound,
            ApiError::Server { .. } => ErrorKind::Server,
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Rejected { .. } | ApiError::Decode(_) | ApiError::InvalidRequest(_) => {
                ErrorKind::Other
            }
        }
    }

    /// Classify a non-2xx response from its status and raw body
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 => ApiError::AuthRequired,
            404 => ApiError::NotFound,
            code if code >= 500 => ApiError::Server { status: code },
            code => {
                let message = detail_message(body).unwrap_or_else(|| {
                    format!(
                        "Error {}: {}",
                        code,
                        status.canonical_reason().unwrap_or("Unknown")
                    )
                });
                ApiError::Rejected { status: code, message }
            }
        }
    }
}

/// Pull the human-readable `detail` out of an error body
///
/// The backend sends either `{"detail": "..."}` or, for validation failures,
/// `{"detail": [{"msg": "...", ...}, ...]}`.
fn detail_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(detail) if !detail.is_empty() => Some(detail.clone()),
        serde_json::Value::Array(items) => items
            .first()?
            .get("msg")?
            .as_str()
            .map(str::to_string),
        _ => None,
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if err.is_builder() {
            ApiError::InvalidRequest(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Result type for backend operations
pub type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// Seams
// ============================================================================

/// Source of paginated, searchable listings
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch one page of listings
    ///
    /// # Arguments
    /// * `page` - Page number (1-indexed), `PAGE_SIZE` items each
    /// * `search` - Free-text filter; blank means no filter
    async fn fetch_page(&self, page: u32, search: &str) -> ApiResult<Vec<Listing>>;
}

/// Sink for purchase requests
#[async_trait]
pub trait DealSource: Send + Sync {
    /// Open a deal for the given listing on behalf of the current user
    async fn create_deal(&self, account_id: i64) -> ApiResult<Deal>;
}
