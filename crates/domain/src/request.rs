use thiserror::Error;
use validash_core::AppError;

use crate::HttpMethod;

/// Required length of a validation key, in characters.
pub const VALIDATION_KEY_LENGTH: usize = 13;

/// Logical path every simulated request is recorded against.
pub const SIMULATED_ENDPOINT: &str = "/api/validate";

/// Expected failure outcomes of a simulated request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestFailure {
    /// The key does not have exactly [`VALIDATION_KEY_LENGTH`] characters.
    #[error("Key must be exactly 13 digits")]
    InvalidKeyLength {
        /// Character count of the submitted key.
        actual: usize,
    },

    /// The key is well-formed but unknown to the validation dataset.
    #[error("{}", key_not_found_message(.method))]
    KeyNotFound {
        /// Verb of the failed request.
        method: HttpMethod,
    },

    /// The caller abandoned the request before it resolved.
    #[error("request was cancelled before it resolved")]
    Cancelled,
}

impl RequestFailure {
    /// Returns the message shown to the user for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

fn key_not_found_message(method: &HttpMethod) -> &'static str {
    match method {
        HttpMethod::Get => "Key not found",
        HttpMethod::Post => "Invalid key",
    }
}

impl From<RequestFailure> for AppError {
    fn from(value: RequestFailure) -> Self {
        match value {
            RequestFailure::InvalidKeyLength { .. } => Self::Validation(value.user_message()),
            RequestFailure::KeyNotFound { .. } => Self::NotFound(value.user_message()),
            RequestFailure::Cancelled => Self::Cancelled(value.user_message()),
        }
    }
}

/// Checks the key length before any dataset lookup happens.
pub fn validate_key_length(key: &str) -> Result<(), RequestFailure> {
    let actual = key.chars().count();
    if actual != VALIDATION_KEY_LENGTH {
        return Err(RequestFailure::InvalidKeyLength { actual });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use validash_core::AppError;

    use super::{RequestFailure, validate_key_length};
    use crate::HttpMethod;

    #[test]
    fn thirteen_character_key_is_accepted() {
        assert!(validate_key_length("1234567891012").is_ok());
    }

    #[test]
    fn short_key_reports_actual_length() {
        assert_eq!(
            validate_key_length("000"),
            Err(RequestFailure::InvalidKeyLength { actual: 3 })
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(validate_key_length("ééééééééééééé").is_ok());
    }

    #[test]
    fn not_found_message_depends_on_method() {
        let get = RequestFailure::KeyNotFound {
            method: HttpMethod::Get,
        };
        let post = RequestFailure::KeyNotFound {
            method: HttpMethod::Post,
        };
        assert_eq!(get.user_message(), "Key not found");
        assert_eq!(post.user_message(), "Invalid key");
    }

    #[test]
    fn failures_map_to_app_error_categories() {
        let invalid = AppError::from(RequestFailure::InvalidKeyLength { actual: 1 });
        assert!(matches!(invalid, AppError::Validation(_)));

        let missing = AppError::from(RequestFailure::KeyNotFound {
            method: HttpMethod::Get,
        });
        assert!(matches!(missing, AppError::NotFound(_)));

        let cancelled = AppError::from(RequestFailure::Cancelled);
        assert!(matches!(cancelled, AppError::Cancelled(_)));
    }
}
