//! Custom error types for production invoicing
//!
//! This module defines the error hierarchy for the crate using thiserror
//! for ergonomic error definitions.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for invoicing operations
#[derive(Error, Debug)]
pub enum InvoiceError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV record file errors
    #[error("CSV error: {0}")]
    Csv(String),

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

    /// Rendering errors
    #[error("Render error: {0}")]
    Render(String),

    /// Dispatch errors
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// The grand total falls between the flat fee tiers
    #[error("No flat fee tier covers a transaction total of {total}")]
    UnmappedFlatTier { total: Decimal },

    /// Percentage rate outside [0, 1]
    #[error("Billing rate {rate} is outside the range 0 to 1")]
    InvalidRate { rate: Decimal },

    /// Record retrieval failed for a production
    #[error("Could not fetch records for production '{production}': {message}")]
    RecordSource { production: String, message: String },
}

impl InvoiceError {
    /// Create a "not found" error for productions
    pub fn production_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Production",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for clients
    pub fn client_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Client",
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

impl From<std::io::Error> for InvoiceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for InvoiceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for InvoiceError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for invoicing operations
pub type InvoiceResult<T> = Result<T, InvoiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_display() {
        let err = InvoiceError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = InvoiceError::production_not_found("Pilot");
        assert_eq!(err.to_string(), "Production not found: Pilot");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_unmapped_tier_error() {
        let err = InvoiceError::UnmappedFlatTier {
            total: dec!(2000000.00),
        };
        assert_eq!(
            err.to_string(),
            "No flat fee tier covers a transaction total of 2000000.00"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: InvoiceError = io_err.into();
        assert!(matches!(err, InvoiceError::Io(_)));
    }
}
