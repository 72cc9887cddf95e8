//! # Lookup Error Types
//!
//! ## Taxonomy
//! ```text
//! ┌───────────────┬──────────────────────────────┬───────────────────────┐
//! │ Variant       │ Cause                        │ User can retry?       │
//! ├───────────────┼──────────────────────────────┼───────────────────────┤
//! │ Validation    │ empty code, bad manual input │ no, fix the input     │
//! │ Network       │ non-2xx HTTP status          │ yes, resubmit         │
//! │ NotFound      │ status 0 / no product        │ no                    │
//! │ Unexpected    │ transport, body, JSON        │ no                    │
//! └───────────────┴──────────────────────────────┴───────────────────────┘
//! ```
//!
//! Every variant leaves the history untouched; the app clears the current
//! product and shows the message.

use scanprice_core::ValidationError;
use thiserror::Error;

/// Message for non-success HTTP responses.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch product data";

/// Message for unknown barcodes.
pub const NOT_FOUND_MESSAGE: &str = "Product not found";

/// Result type alias for lookup operations.
pub type LookupResult<T> = Result<T, LookupError>;

/// A failed lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// The code was rejected before any request was made.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The product database answered with a non-success status.
    #[error("{message}")]
    Network { status: Option<u16>, message: String },

    /// The product database does not know this code.
    #[error("Product not found")]
    NotFound { code: String },

    /// Anything else: transport failure, unreadable body, malformed JSON.
    #[error("{0}")]
    Unexpected(String),

    /// Client settings are unusable (bad URL, zero timeout).
    #[error("Invalid lookup configuration: {0}")]
    InvalidConfig(String),
}

impl LookupError {
    /// Network error for an HTTP status.
    pub fn http_status(status: u16) -> Self {
        LookupError::Network {
            status: Some(status),
            message: FETCH_FAILED_MESSAGE.to_string(),
        }
    }

    /// Returns true if resubmitting the same code may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LookupError::Network { .. })
    }

    /// Returns true if the code itself was the problem.
    pub fn is_validation(&self) -> bool {
        matches!(self, LookupError::Validation(_))
    }
}

impl From<url::ParseError> for LookupError {
    fn from(err: url::ParseError) -> Self {
        LookupError::InvalidConfig(err.to_string())
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Unexpected(format!("Malformed product data: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_network_errors_are_retryable() {
        assert!(LookupError::http_status(503).is_retryable());
        assert!(!LookupError::NotFound { code: "0".into() }.is_retryable());
        assert!(!LookupError::Unexpected("boom".into()).is_retryable());
        assert!(!LookupError::Validation(ValidationError::Required {
            field: "barcode".into()
        })
        .is_retryable());
    }

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(LookupError::http_status(500).to_string(), FETCH_FAILED_MESSAGE);
        assert_eq!(
            LookupError::NotFound { code: "0000000000000".into() }.to_string(),
            NOT_FOUND_MESSAGE
        );
        let validation: LookupError = ValidationError::Required {
            field: "barcode".into(),
        }
        .into();
        assert_eq!(validation.to_string(), "barcode is required");
    }
}
