//! Custom error types for billtrack
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for billtrack operations
#[derive(Error, Debug)]
pub enum BilltrackError {
    /// A cadence string outside weekly / biweekly / monthly
    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    /// A weekday string that is not one of Monday..Sunday
    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),

    /// A stored record that cannot be turned back into a series
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Date arithmetic left the representable calendar
    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),
}

impl BilltrackError {
    /// Create a "not found" error for bills
    pub fn bill_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Bill",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for pay series
    pub fn pay_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Pay series",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for BilltrackError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BilltrackError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for billtrack operations
pub type BilltrackResult<T> = Result<T, BilltrackError>;
