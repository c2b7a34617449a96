//! Rendering surface for the listing browser

use tracing::{info, warn};

use crate::domain::ListingCard;

/// Whatever draws the listing page
///
/// Calls arrive from the controller after every state change. An empty
/// `render` means the empty-state ("nothing found") should be shown.
pub trait ListingView: Send + Sync {
    fn render(&self, cards: &[ListingCard]);

    fn set_loading(&self, loading: bool);

    /// Show an error; `can_retry` asks for a retry affordance
    fn show_error(&self, message: &str, can_retry: bool);

    fn clear_error(&self);
}

/// View that writes everything to the log, used by the headless binary
#[derive(Debug, Default)]
pub struct TracingView;

impl ListingView for TracingView {
    fn render(&self, cards: &[ListingCard]) {
        if cards.is_empty() {
            info!("Nothing found");
            return;
        }
        info!(count = cards.len(), "Rendering listings");
        for card in cards {
            info!(
                id = card.id,
                game = %card.game,
                title = %card.title,
                price = %card.price,
                seller = %card.seller_name,
                rating = %card.seller_rating,
                "listing"
            );
        }
    }

    fn set_loading(&self, loading: bool) {
        tracing::debug!(loading, "loading indicator");
    }

    fn show_error(&self, message: &str, can_retry: bool) {
        warn!(message, can_retry, "listing error");
    }

    fn clear_error(&self) {}
}
