//! Shared primitives for all Rust crates in Validash.

#![forbid(unsafe_code)]

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Result type used across Validash crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Correlation identifier shared by a log entry and its lifecycle notifications.
///
/// Serialized as its hyphenated UUID text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Allocates an identifier for a new simulated request.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RequestId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for RequestId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid request id '{value}': {error}")))
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Operation was abandoned by its caller before completing.
    #[error("cancelled: {0}")]
    Cancelled(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::str::FromStr;

    use super::{AppError, NonEmptyString, RequestId};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        assert!(NonEmptyString::new("   ").is_err());
        assert!(NonEmptyString::new("").is_err());
    }

    #[test]
    fn non_empty_string_keeps_surrounding_whitespace() {
        let value = NonEmptyString::new(" apiLogs ");
        assert!(value.is_ok());
        assert_eq!(
            value.map(String::from).unwrap_or_default(),
            " apiLogs ".to_owned()
        );
    }

    #[test]
    fn request_ids_are_distinct_per_request() {
        let ids: HashSet<RequestId> = (0..64).map(|_| RequestId::new()).collect();
        assert_eq!(ids.len(), 64);
    }

    #[test]
    fn request_id_parses_its_display_form() {
        let request_id = RequestId::new();
        let text = request_id.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(text.matches('-').count(), 4);

        let parsed = RequestId::from_str(text.as_str());
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap_or_default(), request_id);
    }

    #[test]
    fn request_id_rejects_garbage_as_validation_error() {
        let parsed = RequestId::from_str("not-a-uuid");
        assert!(matches!(
            parsed,
            Err(AppError::Validation(message)) if message.contains("not-a-uuid")
        ));
    }

    #[test]
    fn cancelled_error_names_its_category() {
        let error = AppError::Cancelled("request abandoned".to_owned());
        assert_eq!(error.to_string(), "cancelled: request abandoned");
    }
}
