//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod environment;
mod log_entry;
mod model;
mod request;

pub use environment::Environment;
pub use log_entry::{HttpMethod, LogEntry, LogStatus, StatusFilter};
pub use model::{MODEL_NAMES, derive_model, model_index};
pub use request::{
    RequestFailure, SIMULATED_ENDPOINT, VALIDATION_KEY_LENGTH, validate_key_length,
};
