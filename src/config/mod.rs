//! Configuration module for the marketplace client

use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};
use std::path::PathBuf;
use std::time::Duration;

/// Main application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub listing: ListingSettings,
    #[serde(default)]
    pub telegram: TelegramSettings,
}

/// Backend connection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    /// Bearer token attached to every request when present
    pub token: Option<String>,
    /// Request timeout; the transport default applies when unset
    pub timeout_secs: Option<u64>,
    pub rate_limit_per_minute: u32,
}

/// Listing browser configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingSettings {
    pub debounce_ms: u64,
    /// Upper bound on pages the headless browser loads
    pub max_pages: u32,
}

/// Mini-app host configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TelegramSettings {
    /// Raw init data handed over by the Telegram client
    pub init_data: Option<String>,
    /// Answer used by the headless bridge for confirmation prompts
    pub auto_confirm: bool,
}

impl ApiSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl ListingSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables (prefixed with TRUSTYTRADE_)
    /// 2. config/local.toml (gitignored)
    /// 3. config/default.toml
    pub fn load() -> Result<Self, ConfigError> {
        let config_dir = std::env::var("CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"));

        let builder = Config::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            .add_source(env_source());

        builder.build()?.try_deserialize()
    }
}

/// TRUSTYTRADE_API__BASE_URL, TRUSTYTRADE_LISTING__DEBOUNCE_MS, etc.
fn env_source() -> Environment {
    Environment::with_prefix("TRUSTYTRADE")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: "http://localhost:8000/api/v1".to_string(),
            token: None,
            timeout_secs: None,
            rate_limit_per_minute: 600,
        }
    }
}

impl Default for ListingSettings {
    fn default() -> Self {
        ListingSettings {
            debounce_ms: 300,
            max_pages: 10,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api: ApiSettings::default(),
            listing: ListingSettings::default(),
            telegram: TelegramSettings::default(),
        }
    }
}
