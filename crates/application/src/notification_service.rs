//! Ephemeral lifecycle notifications for simulated requests.
//!
//! Notifications are never persisted. A request shows a sticky "processing"
//! notification which is replaced exactly once by an auto-dismissing outcome
//! notification carrying the request id. Display is capacity-limited: excess
//! notifications wait in a bounded queue and are dropped once it is full.

use std::collections::VecDeque;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::debug;

use validash_core::RequestId;
use validash_domain::HttpMethod;


/// Identifier of a notification within one service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Creates an identifier from its numeric value.
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    /// Returns the numeric value.
    #[must_use]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Display for NotificationId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Lifecycle phase shown by a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPhase {
    /// The request is still in flight.
    Processing,
    /// The request resolved successfully.
    Success,
    /// The request, or another operation, failed.
    Error,
}

impl NotificationPhase {
    /// Returns a stable transport value for this phase.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Resolved outcome of a request, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The key validated.
    Success,
    /// The key was rejected.
    Error,
}

/// How long a notification stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPolicy {
    /// Stays until dismissed programmatically.
    Sticky,
    /// Disappears after the duration elapses.
    AutoDismiss(Duration),
}

/// Transient user feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Service-local identifier.
    pub id: NotificationId,
    /// Lifecycle phase.
    pub phase: NotificationPhase,
    /// Verb of the related request, if any.
    pub method: Option<HttpMethod>,
    /// Related request, if any.
    pub request_id: Option<RequestId>,
    /// Display text.
    pub message: String,
    /// Display policy.
    pub display: DisplayPolicy,
}

/// Configuration for notification display.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// Maximum notifications displayed at once.
    pub max_visible: usize,
    /// Maximum notifications waiting for a display slot.
    pub max_queued: usize,
    /// Display time of auto-dismissing notifications.
    pub display_duration: Duration,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            max_visible: 5,
            max_queued: 20,
            display_duration: Duration::from_millis(3_000),
        }
    }
}

#[derive(Debug)]
struct VisibleSlot {
    notification: Notification,
    expires_at: Option<Instant>,
}

#[derive(Debug, Default)]
struct NotificationState {
    next_id: u64,
    visible: Vec<VisibleSlot>,
    queued: VecDeque<Notification>,
}

impl NotificationState {
    fn allocate_id(&mut self) -> NotificationId {
        self.next_id = self.next_id.wrapping_add(1);
        NotificationId(self.next_id)
    }

    fn show(&mut self, notification: Notification, now: Instant) {
        let expires_at = match notification.display {
            DisplayPolicy::Sticky => None,
            DisplayPolicy::AutoDismiss(duration) => Some(now + duration),
        };
        self.visible.push(VisibleSlot {
            notification,
            expires_at,
        });
    }

    fn remove(&mut self, id: NotificationId) -> bool {
        let visible_before = self.visible.len();
        self.visible.retain(|slot| slot.notification.id != id);
        let queued_before = self.queued.len();
        self.queued.retain(|notification| notification.id != id);

        visible_before != self.visible.len() || queued_before != self.queued.len()
    }

    fn refresh(&mut self, max_visible: usize, now: Instant) {
        self.visible
            .retain(|slot| slot.expires_at.is_none_or(|expires_at| expires_at > now));

        while self.visible.len() < max_visible {
            let Some(notification) = self.queued.pop_front() else {
                break;
            };
            self.show(notification, now);
        }
    }
}

struct NotificationInner {
    config: NotificationConfig,
    state: Mutex<NotificationState>,
}

/// Application service for lifecycle notifications.
#[derive(Clone)]
pub struct NotificationService {
    inner: Arc<NotificationInner>,
}

impl NotificationService {
    /// Creates a notification service.
    #[must_use]
    pub fn new(config: NotificationConfig) -> Self {
        Self {
            inner: Arc::new(NotificationInner {
                config,
                state: Mutex::new(NotificationState::default()),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, NotificationState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Shows a sticky processing notification for a request that just started.
    ///
    /// The returned handle dismisses the notification when dropped without
    /// being passed to [`Self::resolve`].
    pub fn begin(&self, method: HttpMethod) -> ProcessingNotification {
        let id = self.push_with(|id| Notification {
            id,
            phase: NotificationPhase::Processing,
            method: Some(method),
            request_id: None,
            message: format!("Processing {method} request..."),
            display: DisplayPolicy::Sticky,
        });

        ProcessingNotification {
            id,
            method,
            service: Some(self.clone()),
        }
    }

    /// Replaces a processing notification with its auto-dismissing outcome.
    ///
    /// Returns the identifier of the outcome notification, or `None` when the
    /// notification queue was full.
    pub fn resolve(
        &self,
        mut handle: ProcessingNotification,
        outcome: RequestOutcome,
        request_id: RequestId,
    ) -> Option<NotificationId> {
        let method = handle.method;
        handle.release();

        let (phase, verb) = match outcome {
            RequestOutcome::Success => (NotificationPhase::Success, "succeeded"),
            RequestOutcome::Error => (NotificationPhase::Error, "failed"),
        };
        let display = DisplayPolicy::AutoDismiss(self.inner.config.display_duration);

        self.push_with(|id| Notification {
            id,
            phase,
            method: Some(method),
            request_id: Some(request_id),
            message: format!("{method} request {verb} (request {request_id})"),
            display,
        })
    }

    /// Shows an auto-dismissing error that is not tied to a request.
    pub fn notify_error(&self, message: impl Into<String>) -> Option<NotificationId> {
        let message = message.into();
        let display = DisplayPolicy::AutoDismiss(self.inner.config.display_duration);

        self.push_with(|id| Notification {
            id,
            phase: NotificationPhase::Error,
            method: None,
            request_id: None,
            message,
            display,
        })
    }

    /// Handles a click: non-processing notifications are dismissed early.
    ///
    /// Returns whether a notification was dismissed.
    pub fn click(&self, id: NotificationId) -> bool {
        let mut state = self.lock();
        let is_processing = state
            .visible
            .iter()
            .map(|slot| &slot.notification)
            .chain(state.queued.iter())
            .any(|notification| {
                notification.id == id && notification.phase == NotificationPhase::Processing
            });
        if is_processing {
            return false;
        }

        let removed = state.remove(id);
        state.refresh(self.inner.config.max_visible, Instant::now());
        removed
    }

    /// Dismisses a notification regardless of its phase.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let mut state = self.lock();
        let removed = state.remove(id);
        state.refresh(self.inner.config.max_visible, Instant::now());
        removed
    }

    /// Returns the notifications currently on screen, oldest first.
    #[must_use]
    pub fn visible(&self) -> Vec<Notification> {
        let mut state = self.lock();
        state.refresh(self.inner.config.max_visible, Instant::now());
        state
            .visible
            .iter()
            .map(|slot| slot.notification.clone())
            .collect()
    }

    /// Returns the number of notifications waiting for a display slot.
    #[must_use]
    pub fn queued_len(&self) -> usize {
        let mut state = self.lock();
        state.refresh(self.inner.config.max_visible, Instant::now());
        state.queued.len()
    }

    fn push_with(&self, build: impl FnOnce(NotificationId) -> Notification) -> Option<NotificationId> {
        let now = Instant::now();
        let max_visible = self.inner.config.max_visible;
        let mut state = self.lock();
        state.refresh(max_visible, now);

        let notification = build(state.allocate_id());
        let id = notification.id;
        if state.visible.len() < max_visible {
            state.show(notification, now);
        } else if state.queued.len() < self.inner.config.max_queued {
            state.queued.push_back(notification);
        } else {
            debug!(
                notification_id = %id,
                phase = notification.phase.as_str(),
                "notification queue full, dropping notification"
            );
            return None;
        }

        Some(id)
    }
}

/// Handle to a sticky processing notification.
///
/// Dropping the handle without resolving it dismisses the notification, so an
/// abandoned request leaves nothing on screen.
pub struct ProcessingNotification {
    id: Option<NotificationId>,
    method: HttpMethod,
    service: Option<NotificationService>,
}

impl ProcessingNotification {
    /// Returns the notification identifier, or `None` when it was dropped
    /// because the queue was full.
    #[must_use]
    pub fn id(&self) -> Option<NotificationId> {
        self.id
    }

    /// Returns the verb of the request this notification tracks.
    #[must_use]
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    fn release(&mut self) {
        if let (Some(id), Some(service)) = (self.id.take(), self.service.take()) {
            service.dismiss(id);
        }
    }
}

impl Drop for ProcessingNotification {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ProcessingNotification {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ProcessingNotification")
            .field("id", &self.id)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}
