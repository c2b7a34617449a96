//! Capability interface for the Mini-App host
//!
//! Controllers receive an `Arc<dyn MiniAppBridge>` instead of reaching for a
//! global Telegram object, so a headless adapter or a recording fake can
//! stand in for the real host.

use async_trait::async_trait;

/// Impact strength for tactile feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactStyle {
    Light,
    Medium,
    Heavy,
}

/// Outcome-flavoured tactile feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Error,
    Success,
    Warning,
}

/// A single haptic signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Haptic {
    Impact(ImpactStyle),
    Notification(NotificationType),
    Selection,
}

impl std::fmt::Display for ImpactStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImpactStyle::Light => write!(f, "light"),
            ImpactStyle::Medium => write!(f, "medium"),
            ImpactStyle::Heavy => write!(f, "heavy"),
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::Error => write!(f, "error"),
            NotificationType::Success => write!(f, "success"),
            NotificationType::Warning => write!(f, "warning"),
        }
    }
}

impl std::fmt::Display for Haptic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Haptic::Impact(style) => write!(f, "impact:{}", style),
            Haptic::Notification(kind) => write!(f, "notification:{}", kind),
            Haptic::Selection => write!(f, "selection"),
        }
    }
}

/// Host capabilities the controllers may use
#[async_trait]
pub trait MiniAppBridge: Send + Sync {
    /// Tell the host the app finished its first render
    fn signal_ready(&self);

    fn show_main_button(&self, text: &str);

    fn hide_main_button(&self);

    fn haptic(&self, feedback: Haptic);

    /// Send a payload back to the bot; the host closes the app afterwards
    fn send_data(&self, data: &str);

    fn open_telegram_link(&self, url: &str);

    /// Ask the user a yes/no question; resolves once they answer
    async fn confirm(&self, message: &str) -> bool;
}
