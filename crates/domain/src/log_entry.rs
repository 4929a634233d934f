//! Activity log records produced by simulated requests.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use validash_core::{AppError, RequestId};

use crate::model::derive_model;

/// Verb of a simulated request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Read the payload for a key.
    #[default]
    Get,
    /// Submit an update for a key.
    Post,
}

impl HttpMethod {
    /// Returns the wire value of this method.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl Display for HttpMethod {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("get") {
            Ok(Self::Get)
        } else if value.eq_ignore_ascii_case("post") {
            Ok(Self::Post)
        } else {
            Err(AppError::Validation(format!(
                "method must be either 'GET' or 'POST', got '{value}'"
            )))
        }
    }
}

/// Outcome recorded for a request attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    /// The key was found in the dataset.
    Success,
    /// The key was malformed or unknown.
    Error,
    /// The attempt has not resolved yet.
    Pending,
}

impl LogStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Pending => "pending",
        }
    }

    /// Returns the "State" label shown next to the status in tables and exports.
    #[must_use]
    pub fn state_label(&self) -> &'static str {
        match self {
            Self::Success => "Completed",
            Self::Error => "Failed",
            Self::Pending => "In Progress",
        }
    }
}

impl FromStr for LogStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            "pending" => Ok(Self::Pending),
            _ => Err(AppError::Validation(format!(
                "unknown log status value '{value}'"
            ))),
        }
    }
}

/// Status filter applied by the log table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    /// Keeps every entry.
    #[default]
    All,
    /// Keeps entries with exactly this status.
    Only(LogStatus),
}

impl StatusFilter {
    /// Returns whether an entry with `status` passes this filter.
    #[must_use]
    pub fn matches(&self, status: LogStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => *expected == status,
        }
    }

    /// Returns the transport value of this filter.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(status) => status.as_str(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == "all" {
            return Ok(Self::All);
        }

        LogStatus::from_str(value).map(Self::Only).map_err(|_| {
            AppError::Validation(format!(
                "status filter must be one of 'all', 'success', 'error', 'pending', got '{value}'"
            ))
        })
    }
}

/// Immutable record of one simulated request attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    id: i64,
    domain_id: String,
    model: String,
    #[serde(default)]
    method: HttpMethod,
    status: LogStatus,
    endpoint: String,
    time: String,
    value: String,
    #[serde(default)]
    request_id: String,
}

impl LogEntry {
    /// Records an attempt captured at `captured_at`.
    ///
    /// The identifier is the capture time in epoch milliseconds, so two
    /// entries captured in the same millisecond share an id. The model label
    /// is derived from the submitted key.
    #[must_use]
    pub fn record(
        captured_at: DateTime<Utc>,
        method: HttpMethod,
        status: LogStatus,
        endpoint: impl Into<String>,
        value: impl Into<String>,
        request_id: RequestId,
    ) -> Self {
        let id = captured_at.timestamp_millis();
        let value = value.into();

        Self {
            id,
            domain_id: format!("dom_{id}"),
            model: derive_model(value.as_str()).to_owned(),
            method,
            status,
            endpoint: endpoint.into(),
            time: captured_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            value,
            request_id: request_id.to_string(),
        }
    }

    /// Returns the time-derived identifier.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the synthesized domain identifier.
    #[must_use]
    pub fn domain_id(&self) -> &str {
        self.domain_id.as_str()
    }

    /// Returns the derived model label.
    #[must_use]
    pub fn model(&self) -> &str {
        self.model.as_str()
    }

    /// Returns the verb that produced this entry.
    #[must_use]
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the recorded outcome.
    #[must_use]
    pub fn status(&self) -> LogStatus {
        self.status
    }

    /// Returns the logical endpoint path.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Returns the capture timestamp.
    #[must_use]
    pub fn time(&self) -> &str {
        self.time.as_str()
    }

    /// Returns the raw key submitted by the user.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Returns the notification correlation identifier.
    #[must_use]
    pub fn request_id(&self) -> &str {
        self.request_id.as_str()
    }
}
