//! # API Error Type
//!
//! Unified error type for app commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in ScanPrice                              │
//! │                                                                         │
//! │  Command Function ── Result<T, ApiError>                               │
//! │         │                                                               │
//! │         ├── ValidationError ──► VALIDATION_ERROR  (inline, no lookup)  │
//! │         ├── LookupError ──────► NETWORK_ERROR / NOT_FOUND / UNEXPECTED │
//! │         ├── busy session ─────► LOOKUP_IN_PROGRESS                     │
//! │         ├── ScannerError ─────► CAMERA_ERROR      (inline, retry)      │
//! │         └── ArError ──────────► AR_ERROR                               │
//! │                                                                         │
//! │  StoreError never becomes an ApiError: history writes are logged      │
//! │  and swallowed, startup failures are AppError.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use scanprice_core::{CoreError, ValidationError};
use scanprice_lookup::LookupError;
use scanprice_store::StoreError;

use crate::ar::ArError;
use crate::scanner::ScannerError;

/// Error returned from app commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input rejected before any request
    ValidationError,

    /// Product database answered with an error status
    NetworkError,

    /// Unknown barcode, or code not in history
    NotFound,

    /// Transport failure, malformed data, anything unclassified
    Unexpected,

    /// A lookup is already pending
    LookupInProgress,

    /// Barcode scanner could not be started, or closed before a read
    CameraError,

    /// AR overlay failure or capture refused
    ArError,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates the busy error for a second submission.
    pub fn lookup_in_progress() -> Self {
        ApiError::new(
            ErrorCode::LookupInProgress,
            "A lookup is already in progress",
        )
    }

    /// Whether resubmitting may help.
    pub fn is_retryable(&self) -> bool {
        matches!(self.code, ErrorCode::NetworkError | ErrorCode::CameraError)
    }
}

/// Converts lookup errors to API errors.
impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Validation(e) => ApiError::from(e),
            LookupError::Network { status, message } => {
                tracing::warn!(?status, "Product database returned an error");
                ApiError::new(ErrorCode::NetworkError, message)
            }
            e @ LookupError::NotFound { .. } => ApiError::new(ErrorCode::NotFound, e.to_string()),
            LookupError::Unexpected(message) => {
                tracing::error!("Unexpected lookup failure: {}", message);
                ApiError::new(ErrorCode::Unexpected, message)
            }
            e @ LookupError::InvalidConfig(_) => {
                tracing::error!("Lookup misconfigured: {}", e);
                ApiError::new(ErrorCode::Unexpected, e.to_string())
            }
        }
    }
}

/// Converts validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::HistoryItemNotFound(code) => ApiError::not_found("History item", &code),
            CoreError::Validation(e) => ApiError::from(e),
            e @ CoreError::InvalidPersistedHistory(_) => {
                tracing::error!("{}", e);
                ApiError::new(ErrorCode::Unexpected, e.to_string())
            }
        }
    }
}

/// Converts scanner errors to API errors.
impl From<ScannerError> for ApiError {
    fn from(err: ScannerError) -> Self {
        ApiError::new(ErrorCode::CameraError, err.to_string())
    }
}

/// Converts AR errors to API errors.
impl From<ArError> for ApiError {
    fn from(err: ArError) -> Self {
        ApiError::new(ErrorCode::ArError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Startup Errors
// =============================================================================

/// Failures that stop the app from starting or running at all.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration file or environment is unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local storage could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Lookup client could not be built.
    #[error("Lookup client error: {0}")]
    Lookup(#[from] LookupError),

    /// Interactive shell failed.
    #[error("Shell error: {0}")]
    Shell(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for AppError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        AppError::Shell(err.to_string())
    }
}
