//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod broadcast_change_signal;
mod file_log_storage;
mod in_memory_log_storage;
mod redis_log_storage;
mod static_validation_dataset;
mod xlsx_spreadsheet_exporter;

pub use broadcast_change_signal::BroadcastChangeSignal;
pub use file_log_storage::FileLogStorage;
pub use in_memory_log_storage::InMemoryLogStorage;
pub use redis_log_storage::RedisLogStorage;
pub use static_validation_dataset::StaticValidationDataset;
pub use xlsx_spreadsheet_exporter::{EXPORT_SHEET_NAME, XlsxSpreadsheetExporter};
