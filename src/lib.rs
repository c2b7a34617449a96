//! TrustyTrade
//!
//! Client library for the TrustyTrade game-account marketplace running as a
//! Telegram Mini-App: REST client with normalized errors, a paginated and
//! searchable listing browser, and a confirm-then-submit purchase flow.

pub mod client;
pub mod config;
pub mod controllers;
pub mod domain;
pub mod telegram;

pub use client::{ApiError, ApiResult, MarketplaceClient};
pub use config::Settings;
