//! Read-only validation dataset backed by a JSON object.

use std::collections::HashMap;

use serde_json::Value;
use validash_application::ValidationDataset;
use validash_core::{AppError, AppResult};

const EMBEDDED_SAMPLE_DATA: &str = include_str!("../data/sample_data.json");

/// Dataset mapping keys to JSON payloads, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticValidationDataset {
    payloads: HashMap<String, Value>,
}

impl StaticValidationDataset {
    /// Parses a JSON object whose members map keys to payloads.
    pub fn from_json(source: &str) -> AppResult<Self> {
        let value: Value = serde_json::from_str(source).map_err(|error| {
            AppError::Validation(format!("invalid validation dataset json: {error}"))
        })?;

        let Value::Object(members) = value else {
            return Err(AppError::Validation(
                "validation dataset must be a json object".to_owned(),
            ));
        };

        Ok(Self {
            payloads: members.into_iter().collect(),
        })
    }

    /// Loads the dataset compiled into this crate.
    pub fn embedded() -> AppResult<Self> {
        Self::from_json(EMBEDDED_SAMPLE_DATA)
    }

    /// Returns the number of known keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    /// Returns whether the dataset has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

impl ValidationDataset for StaticValidationDataset {
    fn lookup(&self, key: &str) -> Option<Value> {
        self.payloads.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use validash_application::ValidationDataset;

    use super::StaticValidationDataset;

    #[test]
    fn embedded_dataset_contains_reference_key() {
        let dataset = StaticValidationDataset::embedded();
        assert!(dataset.is_ok());
        let dataset = dataset.unwrap_or_default();

        let payload = dataset.lookup("1234567891012");
        assert!(payload.is_some());
        assert_eq!(payload.unwrap_or_default()["name"], "Sample Record");
        assert!(dataset.lookup("9999999999999").is_none());
    }

    #[test]
    fn rejects_invalid_or_non_object_json() {
        assert!(StaticValidationDataset::from_json("{").is_err());
        assert!(StaticValidationDataset::from_json("[1, 2]").is_err());
    }

    #[test]
    fn accepts_any_payload_shape() {
        let dataset =
            StaticValidationDataset::from_json(r#"{"a": 1, "b": "text", "c": [true]}"#)
                .unwrap_or_default();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.lookup("a"), Some(serde_json::json!(1)));
        assert_eq!(dataset.lookup("c"), Some(serde_json::json!([true])));
    }
}
