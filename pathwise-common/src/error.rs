//! Common error types for Pathwise

use thiserror::Error;

/// Common result type for Pathwise operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Pathwise crates
#[derive(Error, Debug)]
pub enum Error {
    /// Primary/secondary combination outside the compatibility table
    #[error("Invalid interest pair: {primary} / {secondary}")]
    InvalidInterestPair { primary: String, secondary: String },

    /// Label has no training-time encoding in the named column
    #[error("Unknown label '{label}' in column {column}")]
    UnknownLabel { column: &'static str, label: String },

    /// Index outside `[0, size)` for the named column
    #[error("Index {index} out of range for column {column} (size {size})")]
    IndexOutOfRange {
        column: &'static str,
        index: usize,
        size: usize,
    },

    /// Classifier could not produce a class for a feature vector
    #[error("Prediction error: {0}")]
    Prediction(String),

    /// Model artifacts missing or failed to load
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Training dataset could not be read or is malformed
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Training failed
    #[error("Training error: {0}")]
    Training(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Uniqueness violation (username or email already taken)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Credentials did not match
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl Error {
    /// True for the errors that the prediction path degrades on instead of failing
    pub fn is_prediction_failure(&self) -> bool {
        matches!(
            self,
            Error::UnknownLabel { .. } | Error::IndexOutOfRange { .. } | Error::Prediction(_)
        )
    }
}
