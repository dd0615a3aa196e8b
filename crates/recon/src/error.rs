use thiserror::Error;

use crate::model::Source;

#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Config value out of range.
    #[error("config validation error: {key}: {reason}")]
    ConfigValidation { key: String, reason: String },

    /// Input document could not be read as records at all.
    #[error("{side} input: {reason}")]
    InputParse { side: Source, reason: String },

    /// Missing required column in CSV input.
    #[error("{side} input: missing column '{column}'")]
    MissingColumn { side: Source, column: String },

    /// A record violates the input contract (negative price, empty id, ...).
    #[error("{side} record '{record}': invalid {field}: {reason}")]
    Validation {
        side: Source,
        record: String,
        field: String,
        reason: String,
    },
}

impl ReconError {
    pub(crate) fn config(key: &str, reason: impl Into<String>) -> Self {
        Self::ConfigValidation {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(
        side: Source,
        record: impl Into<String>,
        field: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            side,
            record: record.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}
