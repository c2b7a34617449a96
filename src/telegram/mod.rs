//! Telegram Mini-App integration
//!
//! ```text
//!        ┌────────────────────┐
//!        │ MiniAppBridge trait│
//!        └─────────┬──────────┘
//!          ┌───────┴────────┐
//!   ┌──────┴───────┐ ┌──────┴────────┐
//!   │HeadlessBridge│ │RecordingBridge│ (tests)
//!   └──────────────┘ └───────────────┘
//! ```

mod bridge;
mod headless;
mod init_data;
#[cfg(test)]
pub(crate) mod testing;

pub use bridge::{Haptic, ImpactStyle, MiniAppBridge, NotificationType};
pub use headless::HeadlessBridge;
pub use init_data::{parse_init_data, InitDataError, TelegramAuth};
