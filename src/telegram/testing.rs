//! Recording bridge for controller tests

use async_trait::async_trait;
use parking_lot::Mutex;

use super::bridge::{Haptic, MiniAppBridge};

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeCall {
    Ready,
    ShowMainButton(String),
    HideMainButton,
    Haptic(Haptic),
    SendData(String),
    OpenLink(String),
    Confirm(String),
}

/// Records every call; confirmations return `answer`
pub struct RecordingBridge {
    answer: bool,
    calls: Mutex<Vec<BridgeCall>>,
}

impl RecordingBridge {
    pub fn new(answer: bool) -> Self {
        RecordingBridge {
            answer,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<BridgeCall> {
        self.calls.lock().clone()
    }

    pub fn haptics(&self) -> Vec<Haptic> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                BridgeCall::Haptic(h) => Some(*h),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl MiniAppBridge for RecordingBridge {
    fn signal_ready(&self) {
        self.calls.lock().push(BridgeCall::Ready);
    }

    fn show_main_button(&self, text: &str) {
        self.calls.lock().push(BridgeCall::ShowMainButton(text.to_string()));
    }

    fn hide_main_button(&self) {
        self.calls.lock().push(BridgeCall::HideMainButton);
    }

    fn haptic(&self, feedback: Haptic) {
        self.calls.lock().push(BridgeCall::Haptic(feedback));
    }

    fn send_data(&self, data: &str) {
        self.calls.lock().push(BridgeCall::SendData(data.to_string()));
    }

    fn open_telegram_link(&self, url: &str) {
        self.calls.lock().push(BridgeCall::OpenLink(url.to_string()));
    }

    async fn confirm(&self, message: &str) -> bool {
        self.calls.lock().push(BridgeCall::Confirm(message.to_string()));
        self.answer
    }
}
