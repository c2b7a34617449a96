//! Single-listing view with a confirm-then-submit purchase action

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::client::{ApiError, DealSource, ErrorKind};
use crate::domain::{format_price, Deal, Listing};
use crate::telegram::{Haptic, ImpactStyle, MiniAppBridge, NotificationType};

const PURCHASE_CREATED: &str = "Purchase request created! The seller has been notified.";

/// Result of a purchase attempt
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    /// The deal was opened; `message` is the confirmation to show
    Purchased { deal: Deal, message: String },
    /// The user answered "no" to the confirmation prompt
    Declined,
    /// Another submission is still in flight
    Busy,
    Failed { error: ApiError, message: String },
}

/// Short user-facing message for a failed purchase
pub fn purchase_error_message(err: &ApiError) -> String {
    match err.kind() {
        ErrorKind::AuthRequired => "Please sign in to buy this account.".to_string(),
        ErrorKind::Network => "Connection error. Check your internet connection.".to_string(),
        ErrorKind::Other => match err {
            ApiError::Rejected { message, .. } => message.clone(),
            _ => "Could not create the purchase request. Please try again later.".to_string(),
        },
        _ => "Could not create the purchase request. Please try again later.".to_string(),
    }
}

/// Clears the busy flag when the submission ends, however it ends
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Controller for the listing detail screen
pub struct DetailController {
    listing: Listing,
    deals: Arc<dyn DealSource>,
    bridge: Arc<dyn MiniAppBridge>,
    busy: AtomicBool,
}

impl DetailController {
    pub fn new(
        listing: Listing,
        deals: Arc<dyn DealSource>,
        bridge: Arc<dyn MiniAppBridge>,
    ) -> Self {
        DetailController {
            listing,
            deals,
            bridge,
            busy: AtomicBool::new(false),
        }
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Show the host's main button as the buy action
    pub fn present(&self) {
        self.bridge.show_main_button(&format!("Buy for {}", format_price(self.listing.price)));
    }

    pub fn dismiss(&self) {
        self.bridge.hide_main_button();
    }

    /// Prompt shown before submitting a purchase
    pub fn confirmation_prompt(&self) -> String {
        format!(
            "Do you really want to buy \"{}\" for {}?",
            self.listing.display_title(),
            format_price(self.listing.price)
        )
    }

    /// Ask for confirmation, then open a deal for this listing
    pub async fn purchase(&self) -> PurchaseOutcome {
        if self.is_busy() {
            return PurchaseOutcome::Busy;
        }

        self.bridge.haptic(Haptic::Impact(ImpactStyle::Medium));
        if !self.bridge.confirm(&self.confirmation_prompt()).await {
            return PurchaseOutcome::Declined;
        }

        if self.busy.swap(true, Ordering::AcqRel) {
            return PurchaseOutcome::Busy;
        }
        let _guard = BusyGuard(&self.busy);

        match self.deals.create_deal(self.listing.id).await {
            Ok(deal) => {
                info!(deal_id = deal.id, account_id = self.listing.id, "Purchase request created");
                self.bridge.haptic(Haptic::Notification(NotificationType::Success));
                PurchaseOutcome::Purchased {
                    deal,
                    message: PURCHASE_CREATED.to_string(),
                }
            }
            Err(error) => {
                warn!(account_id = self.listing.id, error = %error, "Failed to create deal");
                self.bridge.haptic(Haptic::Notification(NotificationType::Error));
                let message = purchase_error_message(&error);
                PurchaseOutcome::Failed { error, message }
            }
        }
    }

    /// Chat link for the listing's seller
    pub fn seller_chat_url(&self) -> String {
        format!("https://t.me/user{}", self.listing.seller.id)
    }

    /// Open a chat with the seller through the host
    pub fn contact_seller(&self) {
        self.bridge.haptic(Haptic::Impact(ImpactStyle::Light));
        self.bridge.open_telegram_link(&self.seller_chat_url());
    }
}
