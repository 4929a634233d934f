use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use validash_domain::LogEntry;

/// Callback invoked with a fresh snapshot whenever the log changes.
///
/// Implementations must tolerate repeated calls carrying an unchanged
/// snapshot: local appends notify directly and again through the change
/// signal echo. Handlers run while the store holds its append lock and must
/// not wait on the store.
pub trait LogChangeHandler: Send + Sync {
    /// Receives the full log, most recent entry first.
    fn on_change(&self, entries: &[LogEntry]);
}

impl<F> LogChangeHandler for F
where
    F: Fn(&[LogEntry]) + Send + Sync,
{
    fn on_change(&self, entries: &[LogEntry]) {
        self(entries);
    }
}

#[derive(Default)]
struct SubscriberTable {
    next_id: u64,
    handlers: BTreeMap<u64, Arc<dyn LogChangeHandler>>,
}

#[derive(Default)]
pub(super) struct SubscriberRegistry {
    table: Mutex<SubscriberTable>,
}

impl SubscriberRegistry {
    fn lock(&self) -> MutexGuard<'_, SubscriberTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn register(self: &Arc<Self>, handler: Arc<dyn LogChangeHandler>) -> LogSubscription {
        let mut table = self.lock();
        let id = table.next_id;
        table.next_id = table.next_id.wrapping_add(1);
        table.handlers.insert(id, handler);

        LogSubscription {
            id,
            registry: Arc::downgrade(self),
        }
    }

    fn remove(&self, id: u64) -> bool {
        self.lock().handlers.remove(&id).is_some()
    }

    pub(super) fn len(&self) -> usize {
        self.lock().handlers.len()
    }

    pub(super) fn notify(&self, entries: &[LogEntry]) {
        // Handlers run outside the lock so they may subscribe or unsubscribe.
        let handlers: Vec<Arc<dyn LogChangeHandler>> =
            self.lock().handlers.values().cloned().collect();

        for handler in handlers {
            handler.on_change(entries);
        }
    }
}

/// Unsubscribe token returned by [`super::LogStore::subscribe`].
///
/// Dropping the token removes the handler.
pub struct LogSubscription {
    id: u64,
    registry: Weak<SubscriberRegistry>,
}

impl LogSubscription {
    /// Returns the registry identifier of this subscription.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Removes the handler now. Returns whether it was still registered.
    pub fn unsubscribe(mut self) -> bool {
        self.detach()
    }

    fn detach(&mut self) -> bool {
        let registry = std::mem::take(&mut self.registry);
        registry
            .upgrade()
            .is_some_and(|registry| registry.remove(self.id))
    }
}

impl Drop for LogSubscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for LogSubscription {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("LogSubscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
