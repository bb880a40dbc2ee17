//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    if e.is_configuration() {
        format!("{}\nRun `smsagent settings show` to review credentials.", e)
    } else {
        e.to_string()
    }
}

/// Serialize a result for `--format json`.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| {
        ApiError::StorageError(crate::error::StorageError::Serialization(e.to_string()))
    })
}
