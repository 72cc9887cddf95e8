//! # Validation Module
//!
//! Barcode validation for the two entry points into a lookup.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Barcode Entry Points                               │
//! │                                                                         │
//! │  Manual entry (typed)                   Camera / scanner decode         │
//! │  ├── trim                               ├── trim                        │
//! │  ├── non-empty                          └── non-empty                   │
//! │  ├── ASCII digits only                      (decoder output is trusted) │
//! │  └── 6..=13 characters                                                  │
//! │           │                                        │                    │
//! │           └──────────────┬─────────────────────────┘                    │
//! │                          ▼                                              │
//! │                 Product Lookup Service                                  │
//! │                 (re-checks: trimmed code non-empty)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use scanprice_core::validation::validate_manual_barcode;
//!
//! assert_eq!(validate_manual_barcode(" 7501055363803 ").unwrap(), "7501055363803");
//! assert!(validate_manual_barcode("123").is_err());
//! ```

use crate::error::ValidationError;
use crate::{MAX_BARCODE_LEN, MIN_BARCODE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const BARCODE_FIELD: &str = "barcode";

/// Returns true if `code` is 6-13 ASCII digits.
///
/// Unicode digits (e.g. Arabic-Indic numerals) are rejected on purpose:
/// the product database only knows ASCII codes.
pub fn is_barcode(code: &str) -> bool {
    (MIN_BARCODE_LEN..=MAX_BARCODE_LEN).contains(&code.len())
        && code.chars().all(|c| c.is_ascii_digit())
}

/// Validates a barcode typed by the user.
///
/// ## Rules
/// - Surrounding whitespace is ignored
/// - Must not be empty
/// - Must contain only ASCII digits
/// - Must be between 6 and 13 characters
///
/// ## Returns
/// The trimmed barcode.
pub fn validate_manual_barcode(input: &str) -> ValidationResult<String> {
    let code = input.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: BARCODE_FIELD.to_string(),
        });
    }

    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: BARCODE_FIELD.to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    if !is_barcode(code) {
        return Err(ValidationError::LengthOutOfRange {
            field: BARCODE_FIELD.to_string(),
            min: MIN_BARCODE_LEN,
            max: MAX_BARCODE_LEN,
        });
    }

    Ok(code.to_string())
}

/// Normalizes a code produced by a barcode decoder.
///
/// Decoder output is trusted as-is: only surrounding whitespace (scanners
/// commonly terminate with CR/LF) is stripped, no digit-count check.
pub fn normalize_decoded_barcode(text: &str) -> ValidationResult<String> {
    let code = text.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: BARCODE_FIELD.to_string(),
        });
    }

    Ok(code.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
