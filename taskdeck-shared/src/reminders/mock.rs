/// In-memory notifier for tests and demos
///
/// Records every delivery instead of sending it, and can be switched into
/// a failing mode to exercise the scan's partial-failure tolerance.

use async_trait::async_trait;
use std::sync::Mutex;

use super::{Notifier, NotifyError};

/// A recorded delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Notifier that records deliveries in memory
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<SentNotification>>,
    fail: bool,
}

impl MemoryNotifier {
    /// Creates a notifier that accepts every delivery
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a notifier that rejects every delivery
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Snapshot of everything delivered so far
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().expect("notifier lock poisoned").clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn notify(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Transport("simulated delivery failure".to_string()));
        }

        self.sent
            .lock()
            .expect("notifier lock poisoned")
            .push(SentNotification {
                recipient: recipient.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });

        Ok(())
    }
}
