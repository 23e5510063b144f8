//! Custom error types for the budget engine
//!
//! Structural failures (bad month keys, malformed categories, storage and
//! I/O problems) are errors. Data-quality signals such as an unbalanced
//! allocation or a missing balance estimate are not errors; they travel as
//! [`crate::models::BudgetWarning`] values inside successful results.

use thiserror::Error;

/// The main error type for budget operations
#[derive(Error, Debug)]
pub enum HushallError {
    /// Month outside 1..=12
    #[error("Invalid month key: {year}-{month:02}")]
    InvalidMonthKey { year: i32, month: u32 },

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

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl HushallError {
    /// Create a "not found" error for month snapshots
    pub fn month_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Month",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
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

impl From<std::io::Error> for HushallError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HushallError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for HushallError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for budget operations
pub type HushallResult<T> = Result<T, HushallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HushallError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_invalid_month_display() {
        let err = HushallError::InvalidMonthKey {
            year: 2025,
            month: 13,
        };
        assert_eq!(err.to_string(), "Invalid month key: 2025-13");
    }

    #[test]
    fn test_not_found_error() {
        let err = HushallError::month_not_found("2025-03");
        assert_eq!(err.to_string(), "Month not found: 2025-03");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: HushallError = io_err.into();
        assert!(matches!(err, HushallError::Io(_)));
    }
}
