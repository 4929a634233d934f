use serde_json::Value;

/// Read-only lookup table deciding whether a simulated request succeeds.
///
/// Absence is a normal outcome, not an error.
pub trait ValidationDataset: Send + Sync {
    /// Returns the payload registered for `key`, if any.
    fn lookup(&self, key: &str) -> Option<Value>;
}
