use chrono::NaiveDateTime;
use thiserror::Error;

/// Failures that abort a forecast request
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Payload is not a non-empty list of equally sized rows.
    /// Reported to callers as a rejection rather than an error.
    #[error("Invalid input: Data should be a 2D list.")]
    InvalidInputShape,

    #[error("row {row}: expected {expected} fields, got {actual}")]
    FieldCount {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("row {row}: invalid {field}: {reason}")]
    InvalidObservation {
        row: usize,
        field: &'static str,
        reason: String,
    },

    #[error("unknown site id {0}")]
    UnknownSite(i64),

    #[error("expected {expected} calibrated values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("feature row at {timestamp} has no value for {feature}")]
    IncompleteFeatureRow {
        timestamp: NaiveDateTime,
        feature: &'static str,
    },

    #[error("model returned {actual} predictions for {expected} rows")]
    ModelOutputMismatch { expected: usize, actual: usize },

    #[error("model inference failed: {0}")]
    Model(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ForecastError>;
