//! Core error types for sitegraph-core.
//!
//! Detection and resolution are pure data transforms and never fail for
//! well-formed input; errors here cover the fallible edges only -- the
//! learning-backend call and principle import/validation.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Core error type for sitegraph-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Learning-backend errors
    #[error("Learning error: {0}")]
    Learning(#[from] LearningError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors from the external learning backend.
#[derive(Error, Debug)]
pub enum LearningError {
    /// Transport-level failure
    #[error("Learning request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status
    #[error("Learning backend returned status {status}")]
    Status { status: u16 },

    /// Backend returned a body we could not decode
    #[error("Malformed learning response: {0}")]
    Format(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end_time ({end}) must not precede start_time ({start})")]
    InvalidTimeRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
