//! Simulated validation requests.
//!
//! Each invocation runs `Idle -> Validating -> Simulating -> Resolved` and
//! appends exactly one log entry before reporting back, unless the caller
//! cancels while the artificial latency is pending. A cancelled invocation
//! writes nothing and leaves no processing notification behind.

use std::sync::Arc;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use validash_core::{AppResult, RequestId};
use validash_domain::{
    Environment, HttpMethod, LogEntry, LogStatus, RequestFailure, SIMULATED_ENDPOINT,
    validate_key_length,
};

use crate::log_store::LogStore;
use crate::notification_service::{NotificationService, RequestOutcome};
use crate::validation_dataset::ValidationDataset;

mod phase;


pub use phase::SimulationPhase;

use phase::PhaseTrace;

/// Configuration for the request simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Artificial round-trip delay applied to well-formed keys.
    pub latency: Duration,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1_000),
        }
    }
}

/// Input of one simulated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationRequest {
    /// Key submitted by the user.
    pub key: String,
    /// Simulated verb.
    pub method: HttpMethod,
    /// Target environment reported in the response envelope.
    pub environment: Environment,
}

/// Result of one simulated request.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// Correlation id shared with the log entry and notifications.
    pub request_id: RequestId,
    /// Phases visited, starting with `Idle`.
    pub phases: Vec<SimulationPhase>,
    /// Entry written to the log; `None` when the request was cancelled or the
    /// log could not be persisted.
    pub entry: Option<LogEntry>,
    /// Response envelope, or the failure shown to the user.
    pub outcome: Result<Value, RequestFailure>,
}

impl SimulationReport {
    /// Returns the terminal phase.
    #[must_use]
    pub fn final_phase(&self) -> SimulationPhase {
        self.phases
            .last()
            .copied()
            .unwrap_or(SimulationPhase::Idle)
    }
}

/// Application service simulating calls to the validation API.
#[derive(Clone)]
pub struct RequestSimulator {
    dataset: Arc<dyn ValidationDataset>,
    log_store: LogStore,
    notifications: NotificationService,
    config: SimulatorConfig,
}

impl RequestSimulator {
    /// Creates a simulator.
    #[must_use]
    pub fn new(
        dataset: Arc<dyn ValidationDataset>,
        log_store: LogStore,
        notifications: NotificationService,
        config: SimulatorConfig,
    ) -> Self {
        Self {
            dataset,
            log_store,
            notifications,
            config,
        }
    }

    /// Runs one simulated request.
    ///
    /// Validation and lookup failures are expected outcomes: they are logged
    /// with `status = error` and returned in [`SimulationReport::outcome`].
    /// The only internal error is an illegal phase transition.
    pub async fn simulate(
        &self,
        request: SimulationRequest,
        cancellation: &CancellationToken,
    ) -> AppResult<SimulationReport> {
        let request_id = RequestId::new();
        let processing = self.notifications.begin(request.method);
        let mut trace = PhaseTrace::start();

        debug!(
            request_id = %request_id,
            method = %request.method,
            environment = request.environment.id(),
            "simulated request started"
        );

        trace.advance(SimulationPhase::Validating)?;
        let outcome = match validate_key_length(request.key.as_str()) {
            Err(failure) => Err(failure),
            Ok(()) => {
                trace.advance(SimulationPhase::Simulating)?;

                let cancelled = tokio::select! {
                    biased;
                    () = cancellation.cancelled() => true,
                    () = tokio::time::sleep(self.config.latency) => false,
                };
                if cancelled {
                    trace.advance(SimulationPhase::Cancelled)?;
                    drop(processing);
                    info!(
                        request_id = %request_id,
                        method = %request.method,
                        "simulated request cancelled before resolving"
                    );

                    return Ok(SimulationReport {
                        request_id,
                        phases: trace.into_phases(),
                        entry: None,
                        outcome: Err(RequestFailure::Cancelled),
                    });
                }

                self.resolve(&request)
            }
        };

        let status = match outcome {
            Ok(_) => LogStatus::Success,
            Err(_) => LogStatus::Error,
        };
        trace.advance(SimulationPhase::Resolved(status))?;

        let entry = LogEntry::record(
            Utc::now(),
            request.method,
            status,
            SIMULATED_ENDPOINT,
            request.key.as_str(),
            request_id,
        );
        let model = entry.model().to_owned();
        let entry = match self.log_store.append(entry.clone()).await {
            Ok(()) => Some(entry),
            Err(error) => {
                warn!(
                    request_id = %request_id,
                    error = %error,
                    "failed to persist simulated request log entry"
                );
                None
            }
        };

        let notification_outcome = match status {
            LogStatus::Success => RequestOutcome::Success,
            LogStatus::Error | LogStatus::Pending => RequestOutcome::Error,
        };
        self.notifications
            .resolve(processing, notification_outcome, request_id);

        info!(
            request_id = %request_id,
            method = %request.method,
            environment = request.environment.id(),
            status = status.as_str(),
            model = model.as_str(),
            persisted = entry.is_some(),
            "simulated request resolved"
        );

        Ok(SimulationReport {
            request_id,
            phases: trace.into_phases(),
            entry,
            outcome,
        })
    }

    fn resolve(&self, request: &SimulationRequest) -> Result<Value, RequestFailure> {
        let Some(data) = self.dataset.lookup(request.key.as_str()) else {
            return Err(RequestFailure::KeyNotFound {
                method: request.method,
            });
        };

        let environment = request.environment;
        Ok(match request.method {
            HttpMethod::Get => json!({
                "environment": environment.id(),
                "baseUrl": environment.base_url(),
                "data": data,
            }),
            HttpMethod::Post => json!({
                "environment": environment.id(),
                "baseUrl": environment.base_url(),
                "message": "Data updated successfully",
                "data": data,
                "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            }),
        })
    }
}
