//! Surfaced notifications
//!
//! Broadcast of user-visible outcomes (the toasts of a UI layer).

use tokio::sync::broadcast;

use crate::domain::value_object::Principal;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    LoggedIn { principal: Principal },
    LoginFailed { reason: String },
    LoggedOut,
    OperationFailed { operation: &'static str, message: String },
}

/// Publishing side of the notice channel
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notice>,
}

impl Notifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publish; a notice with no subscribers is dropped
    pub fn publish(&self, notice: Notice) {
        let _ = self.sender.send(notice);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
