use tokio::sync::broadcast;
use tracing::trace;
use validash_application::{ChangeSignal, StorageChanged};

/// In-process change signal over a tokio broadcast channel.
///
/// Every log store sharing one instance observes the others' appends.
/// Signals never leave the process: with file or Redis storage shared by
/// several API processes, a viewer only notices another process's appends on
/// its next own append or re-read.
#[derive(Clone)]
pub struct BroadcastChangeSignal {
    sender: broadcast::Sender<StorageChanged>,
}

impl BroadcastChangeSignal {
    /// Creates a signal whose receivers lag after `capacity` unread changes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }
}

impl Default for BroadcastChangeSignal {
    fn default() -> Self {
        Self::new(64)
    }
}

impl ChangeSignal for BroadcastChangeSignal {
    fn publish(&self, change: StorageChanged) {
        // No receivers is fine: nobody is watching yet.
        let receivers = self.sender.send(change).unwrap_or(0);
        trace!(receivers, "storage change published");
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChanged> {
        self.sender.subscribe()
    }
}
