use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use validash_application::{
    LogStore, LogStoreConfig, LogViewer, NotificationConfig, NotificationService,
    RequestSimulator, SimulatorConfig,
};
use validash_core::AppError;
use validash_infrastructure::{
    BroadcastChangeSignal, StaticValidationDataset, XlsxSpreadsheetExporter,
};

use crate::api_config::ApiConfig;
use crate::state::AppState;

use super::storage::build_log_storage;

pub async fn build_app_state(
    config: &ApiConfig,
    shutdown: CancellationToken,
) -> Result<AppState, AppError> {
    let storage = build_log_storage(&config.log_storage)?;
    let signal = Arc::new(BroadcastChangeSignal::default());
    let dataset = Arc::new(StaticValidationDataset::embedded()?);

    let log_store = LogStore::new(
        storage,
        signal,
        LogStoreConfig::new(config.storage_key.as_str())?,
    );
    let notification_service = NotificationService::new(NotificationConfig {
        max_visible: config.notification_max_visible,
        display_duration: config.notification_display,
        ..NotificationConfig::default()
    });
    let request_simulator = RequestSimulator::new(
        dataset.clone(),
        log_store.clone(),
        notification_service.clone(),
        SimulatorConfig {
            latency: config.simulated_latency,
        },
    );
    let log_viewer = LogViewer::mount(
        &log_store,
        Arc::new(XlsxSpreadsheetExporter::new()),
        dataset,
        notification_service.clone(),
    )
    .await;

    Ok(AppState {
        request_simulator,
        log_store,
        log_viewer: Arc::new(log_viewer),
        notification_service,
        shutdown,
    })
}
