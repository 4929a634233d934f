use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;
use validash_application::{DisplayPolicy, Notification};
use validash_domain::{Environment, LogEntry};

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// API representation of a target environment.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/environment-response.ts"
)]
pub struct EnvironmentResponse {
    pub id: String,
    pub name: String,
    pub base_url: String,
}

/// Incoming payload for a simulated request.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/submit-request-request.ts"
)]
pub struct SubmitRequestRequest {
    pub key: String,
    /// `GET` or `POST`, case-insensitive.
    pub method: String,
    /// Environment id; defaults to `development`.
    pub environment: Option<String>,
}

/// Successful simulated request.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/submit-request-response.ts"
)]
pub struct SubmitRequestResponse {
    pub status: String,
    pub request_id: String,
    #[ts(type = "Record<string, unknown>")]
    pub response: Value,
}

/// API representation of a log entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/log-entry-response.ts"
)]
pub struct LogEntryResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub domain_id: String,
    pub model: String,
    pub method: String,
    pub status: String,
    pub endpoint: String,
    pub time: String,
    /// Human-readable status label shown in the log table.
    pub state: String,
    pub value: String,
    pub request_id: String,
}

/// Payload text for a logged key.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/payload-text-response.ts"
)]
pub struct PayloadTextResponse {
    pub value: String,
    pub payload: String,
}

/// API representation of a notification.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/notification-response.ts"
)]
pub struct NotificationResponse {
    #[ts(type = "number")]
    pub id: u64,
    pub phase: String,
    pub method: Option<String>,
    pub request_id: Option<String>,
    pub message: String,
    pub sticky: bool,
    #[ts(type = "number | null")]
    pub dismiss_after_ms: Option<u64>,
}

/// Result of clicking a notification.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/notification-click-response.ts"
)]
pub struct NotificationClickResponse {
    pub dismissed: bool,
}

impl From<Environment> for EnvironmentResponse {
    fn from(value: Environment) -> Self {
        Self {
            id: value.id().to_owned(),
            name: value.name().to_owned(),
            base_url: value.base_url().to_owned(),
        }
    }
}

impl From<LogEntry> for LogEntryResponse {
    fn from(value: LogEntry) -> Self {
        Self {
            id: value.id(),
            domain_id: value.domain_id().to_owned(),
            model: value.model().to_owned(),
            method: value.method().as_str().to_owned(),
            status: value.status().as_str().to_owned(),
            endpoint: value.endpoint().to_owned(),
            time: value.time().to_owned(),
            state: value.status().state_label().to_owned(),
            value: value.value().to_owned(),
            request_id: value.request_id().to_owned(),
        }
    }
}

impl From<Notification> for NotificationResponse {
    fn from(value: Notification) -> Self {
        let (sticky, dismiss_after_ms) = match value.display {
            DisplayPolicy::Sticky => (true, None),
            DisplayPolicy::AutoDismiss(duration) => {
                (false, Some(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)))
            }
        };

        Self {
            id: value.id.as_u64(),
            phase: value.phase.as_str().to_owned(),
            method: value.method.map(|method| method.as_str().to_owned()),
            request_id: value.request_id.map(|request_id| request_id.to_string()),
            message: value.message,
            sticky,
            dismiss_after_ms,
        }
    }
}
