//! TrustyTrade headless browser
//!
//! Logs in with Mini-App init data when configured, then pages through the
//! marketplace listings for an optional search query and logs every card.
//!
//! Usage: `trustytrade [search query]`

use std::sync::Arc;
use anyhow::Context;
use tracing::{info, warn};

use trustytrade::client::MarketplaceClient;
use trustytrade::config::Settings;
use trustytrade::controllers::{ListingController, LoadOutcome, TracingView};
use trustytrade::telegram::{parse_init_data, HeadlessBridge, MiniAppBridge};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("trustytrade=info")),
        )
        .json()
        .init();

    let settings = Settings::load().context("Failed to load configuration")?;
    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");

    info!(
        "Starting TrustyTrade client v{} against {}",
        env!("CARGO_PKG_VERSION"),
        settings.api.base_url
    );

    let client = Arc::new(
        MarketplaceClient::new(&settings.api).context("Failed to create API client")?,
    );
    let bridge: Arc<dyn MiniAppBridge> =
        Arc::new(HeadlessBridge::new(settings.telegram.auto_confirm));

    if let Some(raw) = settings.telegram.init_data.as_deref() {
        match parse_init_data(raw) {
            Ok(auth) => {
                if let Err(e) = client.authenticate_telegram(&auth).await {
                    warn!("Telegram login failed: {}. Browsing anonymously.", e);
                }
            }
            Err(e) => warn!("Ignoring malformed init data: {}", e),
        }
    }

    let controller = ListingController::with_debounce(
        client.clone(),
        Arc::new(TracingView),
        settings.listing.debounce(),
    );

    let mut outcome = controller.search(query).await;
    bridge.signal_ready();

    let mut pages = 1;
    while pages < settings.listing.max_pages {
        if let LoadOutcome::Failed(_) = outcome {
            break;
        }
        outcome = controller.on_sentinel_visible().await;
        if !outcome.issued() {
            break;
        }
        pages += 1;
    }

    let state = controller.snapshot();
    info!(
        listings = state.items.len(),
        has_more = state.has_more,
        query = %state.search_query,
        "Finished browsing"
    );

    if let LoadOutcome::Failed(e) = outcome {
        anyhow::bail!("Failed to load listings: {}", e);
    }
    Ok(())
}
