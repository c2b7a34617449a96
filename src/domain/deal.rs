//! Deal and Review Domain Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// Lifecycle status of a deal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl std::fmt::Display for DealStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DealStatus::Pending => write!(f, "pending"),
            DealStatus::InProgress => write!(f, "in_progress"),
            DealStatus::Completed => write!(f, "completed"),
            DealStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl DealStatus {
    /// Whether the deal can still be confirmed or cancelled
    pub fn is_open(&self) -> bool {
        matches!(self, DealStatus::Pending | DealStatus::InProgress)
    }
}

/// A purchase agreement between a buyer and the listing's seller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: i64,
    pub account_id: i64,
    pub buyer_id: i64,
    pub seller_id: i64,
    pub status: DealStatus,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "timestamp::deserialize_lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_lenient")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body for `POST /deals`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NewDeal {
    pub account_id: i64,
}

/// Feedback left on a completed deal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub deal_id: i64,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_lenient")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body for `POST /reviews`
#[derive(Debug, Clone, Serialize)]
pub struct NewReview {
    pub deal_id: i64,
    /// 1 to 5 stars
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl NewReview {
    /// Build a review, clamping the rating into the accepted 1..=5 range
    pub fn new(deal_id: i64, rating: u8, comment: Option<String>) -> Self {
        NewReview {
            deal_id,
            rating: rating.clamp(1, 5),
            comment,
        }
    }
}
