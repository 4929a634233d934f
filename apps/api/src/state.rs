use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use validash_application::{LogStore, LogViewer, NotificationService, RequestSimulator};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub request_simulator: RequestSimulator,
    pub log_store: LogStore,
    pub log_viewer: Arc<LogViewer>,
    pub notification_service: NotificationService,
    /// Cancelled on shutdown so in-flight simulations stop waiting.
    pub shutdown: CancellationToken,
}
