//! Custom error types for pocket-ledger
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for pocket-ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Validation errors for user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// An uploaded statement is not a CSV file
    #[error("Invalid file type: '{file_name}' is not a CSV file")]
    InvalidFileType { file_name: String },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// A stored record does not match the expected schema
    #[error("Malformed {collection} record #{index}: {reason}")]
    MalformedRecord {
        collection: &'static str,
        index: usize,
        reason: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Statement import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Report export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl LedgerError {
    /// Create a "not found" error for budget entries
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Create a malformed-record error for a collection
    pub fn malformed(collection: &'static str, index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            collection,
            index,
            reason: reason.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error was caused by bad user input rather than the backend
    pub fn is_user_input(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidFileType { .. })
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for pocket-ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_invalid_file_type_display() {
        let err = LedgerError::InvalidFileType {
            file_name: "statement.pdf".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid file type: 'statement.pdf' is not a CSV file"
        );
        assert!(err.is_user_input());
    }

    #[test]
    fn test_malformed_record() {
        let err = LedgerError::malformed("transactions", 3, "missing field `amount`");
        assert_eq!(
            err.to_string(),
            "Malformed transactions record #3: missing field `amount`"
        );
        assert!(!err.is_user_input());
    }

    #[test]
    fn test_not_found_error() {
        let err = LedgerError::budget_not_found("2024-01-15");
        assert_eq!(err.to_string(), "Budget not found: 2024-01-15");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let ledger_err: LedgerError = io_err.into();
        assert!(matches!(ledger_err, LedgerError::Io(_)));
    }
}
