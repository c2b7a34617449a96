//! Marketplace user profile

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub telegram_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub deals_completed: u32,
    #[serde(default)]
    pub reviews_count: u32,
    #[serde(default, deserialize_with = "timestamp::deserialize_lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_lenient")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Name to show next to the user's listings and reviews
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.username.clone())
            .unwrap_or_else(|| format!("User {}", self.id))
    }
}
