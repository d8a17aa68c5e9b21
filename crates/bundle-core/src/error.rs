//! # Error Types
//!
//! Domain-specific error types for bundle-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bundle-core errors (this file)                                         │
//! │  ├── DiscountError    - Fatal for one function invocation               │
//! │  └── ValidationError  - Rule violations on a single field               │
//! │                                                                         │
//! │  bundle-function errors (host adapter)                                  │
//! │  └── FunctionError    - What the host sees (code + message)             │
//! │                                                                         │
//! │  Flow: ValidationError → DiscountError → FunctionError → stderr         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! An unrecognized discount type, an empty cart and a cart below every tier
//! threshold all produce a well-formed result with no discounts.

use thiserror::Error;

// =============================================================================
// Discount Error
// =============================================================================

/// Errors that abort a single discount calculation.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// The metafield configuration could not be read as a discount config.
    ///
    /// ## When This Occurs
    /// - The metafield value is not valid JSON
    /// - `tiers` is missing or a tier has the wrong field types
    /// - The discount node carries no metafield at all
    #[error("Discount configuration could not be parsed: {reason}")]
    ConfigParse { reason: String },

    /// A cart line lacks usable numeric data for the active discount type.
    ///
    /// ## When This Occurs
    /// - Fixed bundle pricing and a line has no `amountPerQuantity.amount`
    /// - The unit amount is not a decimal number, or is negative
    /// - A line quantity is missing, not an integer, or negative
    /// - Summing quantities or line prices overflows
    #[error("Cart line {line} is malformed: {reason}")]
    MalformedCartLine { line: String, reason: String },
}

impl DiscountError {
    /// Builds a `ConfigParse` error from a serde failure.
    pub(crate) fn config(err: serde_json::Error) -> Self {
        DiscountError::ConfigParse {
            reason: err.to_string(),
        }
    }

    /// Attributes a validation failure to the named cart line.
    pub(crate) fn line(line: impl Into<String>, err: ValidationError) -> Self {
        DiscountError::MalformedCartLine {
            line: line.into(),
            reason: err.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Rule violations found on a single value.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., "ten" where a decimal was expected).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// The value, or a sum it feeds into, does not fit in 64 bits.
    #[error("{field} is out of range")]
    OutOfRange { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with DiscountError.
pub type DiscountResult<T> = Result<T, DiscountError>;

// =============================================================================
// Unit Tests
// =============================================================================
