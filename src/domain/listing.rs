//! Listing Domain Models
//!
//! A listing is a game account offered for sale. Listings are fetched page by
//! page from the backend and never mutated locally; the card type derived from
//! them is what rendering surfaces display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

// ============================================================================
// Listing
// ============================================================================

/// Seller summary embedded in every listing
///
/// Missing fields fall back to the "Unknown" seller's values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SellerSummary {
    pub id: i64,
    pub name: String,
    pub rating: f64,
}

impl Default for SellerSummary {
    fn default() -> Self {
        SellerSummary {
            id: 0,
            name: "Unknown".to_string(),
            rating: 0.0,
        }
    }
}

/// A sellable account record surfaced by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    pub game: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_available", deserialize_with = "deserialize_available")]
    pub is_available: bool,
    #[serde(default, deserialize_with = "deserialize_seller")]
    pub seller: SellerSummary,
    #[serde(default, deserialize_with = "timestamp::deserialize_lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_lenient")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_available() -> bool {
    true
}

/// A null availability flag counts as available
fn deserialize_available<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// The backend stores sellers as a free-form JSON column which may be null
fn deserialize_seller<'de, D>(deserializer: D) -> Result<SellerSummary, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<SellerSummary>::deserialize(deserializer)?.unwrap_or_default())
}

impl Listing {
    /// Title shown to users, falling back to the description
    pub fn display_title(&self) -> &str {
        let title = self.title.trim();
        if !title.is_empty() {
            return title;
        }
        match self.description.as_deref().map(str::trim) {
            Some(description) if !description.is_empty() => description,
            _ => UNTITLED,
        }
    }

    /// Image URL, falling back to the game's stock artwork
    pub fn display_image(&self) -> &str {
        match self.image_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => game_artwork(&self.game),
        }
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Body for `POST /accounts`
#[derive(Debug, Clone, Serialize)]
pub struct NewListing {
    pub game: String,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller: Option<SellerSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

/// Body for `PATCH /accounts/{id}`; only set fields are sent
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller: Option<SellerSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

// ============================================================================
// Presentation
// ============================================================================

const UNTITLED: &str = "Untitled";

/// Stock artwork used when a listing has no image of its own
pub const PLACEHOLDER_IMAGE: &str = "/images/games/placeholder.jpg";

/// Stock artwork for the games the marketplace knows about
pub fn game_artwork(game: &str) -> &'static str {
    match game {
        "Dota 2" => "/images/games/dota2.jpg",
        "CS:GO" => "/images/games/csgo.jpg",
        "World of Warcraft" => "/images/games/wow.jpg",
        "Genshin Impact" => "/images/games/genshin.jpg",
        "PUBG" => "/images/games/pubg.jpg",
        _ => PLACEHOLDER_IMAGE,
    }
}

/// Format a price with space-grouped thousands and a rouble sign
///
/// Fractional kopecks are kept (two digits) only when present.
pub fn format_price(price: f64) -> String {
    let price = price.max(0.0);
    let kopecks = (price * 100.0).round() as u64;
    let whole = (kopecks / 100).to_string();
    let fraction = kopecks % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('\u{a0}');
        }
        grouped.push(ch);
    }

    if fraction > 0 {
        format!("{},{:02}\u{a0}₽", grouped, fraction)
    } else {
        format!("{}\u{a0}₽", grouped)
    }
}

/// Everything a rendering surface needs to draw one listing card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingCard {
    pub id: i64,
    pub game: String,
    pub title: String,
    pub image_url: String,
    pub price: String,
    pub seller_name: String,
    pub seller_rating: String,
    pub is_available: bool,
}

impl From<&Listing> for ListingCard {
    fn from(listing: &Listing) -> Self {
        ListingCard {
            id: listing.id,
            game: listing.game.clone(),
            title: listing.display_title().to_string(),
            image_url: listing.display_image().to_string(),
            price: format_price(listing.price),
            seller_name: listing.seller.name.clone(),
            seller_rating: format!("{:.1}", listing.seller.rating),
            is_available: listing.is_available,
        }
    }
}
