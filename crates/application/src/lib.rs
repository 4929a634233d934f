//! Application services and ports.

#![forbid(unsafe_code)]

mod log_store;
mod log_viewer;
mod notification_service;
mod request_simulator;
mod validation_dataset;

#[cfg(test)]
mod test_support;

pub use log_store::{
    ChangeSignal, LogChangeHandler, LogStorage, LogStore, LogStoreConfig, LogSubscription,
    StorageChanged,
};
pub use log_viewer::{
    EXPORT_COLUMNS, EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME, ExportArtifact, ExportTable, LogFilter,
    LogViewer, SpreadsheetExporter, build_export_table, export_entries, filter_entries,
};
pub use notification_service::{
    DisplayPolicy, Notification, NotificationConfig, NotificationId, NotificationPhase,
    NotificationService, ProcessingNotification, RequestOutcome,
};
pub use request_simulator::{
    RequestSimulator, SimulationPhase, SimulationReport, SimulationRequest, SimulatorConfig,
};
pub use validation_dataset::ValidationDataset;
