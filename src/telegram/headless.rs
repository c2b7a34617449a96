//! Bridge adapter used when no Telegram host is present

use async_trait::async_trait;
use tracing::info;

use super::bridge::{Haptic, MiniAppBridge};

/// Logs every host call and answers confirmations with a fixed choice
#[derive(Debug, Clone, Default)]
pub struct HeadlessBridge {
    auto_confirm: bool,
}

impl HeadlessBridge {
    pub fn new(auto_confirm: bool) -> Self {
        HeadlessBridge { auto_confirm }
    }
}

#[async_trait]
impl MiniAppBridge for HeadlessBridge {
    fn signal_ready(&self) {
        info!("mini-app ready");
    }

    fn show_main_button(&self, text: &str) {
        info!(text, "main button shown");
    }

    fn hide_main_button(&self) {
        info!("main button hidden");
    }

    fn haptic(&self, feedback: Haptic) {
        info!(%feedback, "haptic feedback");
    }

    fn send_data(&self, data: &str) {
        info!(bytes = data.len(), "data sent to bot");
    }

    fn open_telegram_link(&self, url: &str) {
        info!(url, "opening telegram link");
    }

    async fn confirm(&self, message: &str) -> bool {
        info!(message, answer = self.auto_confirm, "confirmation answered automatically");
        self.auto_confirm
    }
}
