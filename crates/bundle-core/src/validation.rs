//! # Validation Module
//!
//! Checks run on host and config data before it is priced.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                       │
//! │  ├── Config field presence and JSON types                               │
//! │  └── Tier quantity is a non-negative integer (u64)                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Tier amount non-negative     → ConfigParse                         │
//! │  ├── Line quantity present, integer, non-negative → MalformedCartLine   │
//! │  └── Unit amount present, decimal, non-negative (fixed bundle only)     │
//! │                                    → MalformedCartLine                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validators return [`ValidationError`]; the caller decides which
//! `DiscountError` kind it becomes and attaches the line or tier position.

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{RawAmount, RawQuantity, Tier};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a tier from the discount configuration.
///
/// ## Rules
/// - `amount` must be finite and not negative
///
/// Percentages above 100 are passed through; the host caps them.
pub fn validate_tier(tier: &Tier) -> ValidationResult<()> {
    if !tier.amount.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if tier.amount < 0.0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a cart line quantity.
///
/// ## Rules
/// - Must be present
/// - Must be an integer that fits in `i64`
/// - Must not be negative. Zero is accepted and contributes nothing.
///
/// ## Example
/// ```rust
/// use bundle_core::types::RawQuantity;
/// use bundle_core::validation::validate_line_quantity;
///
/// assert_eq!(validate_line_quantity(Some(&RawQuantity::Integer(3))), Ok(3));
/// assert_eq!(validate_line_quantity(Some(&RawQuantity::Integer(0))), Ok(0));
/// assert!(validate_line_quantity(Some(&RawQuantity::Integer(-1))).is_err());
/// assert!(validate_line_quantity(None).is_err());
/// ```
pub fn validate_line_quantity(quantity: Option<&RawQuantity>) -> ValidationResult<i64> {
    match quantity {
        None => Err(ValidationError::Required {
            field: "quantity".to_string(),
        }),
        Some(RawQuantity::Integer(quantity)) if *quantity < 0 => {
            Err(ValidationError::MustNotBeNegative {
                field: "quantity".to_string(),
            })
        }
        Some(RawQuantity::Integer(quantity)) => Ok(*quantity),
        Some(RawQuantity::Other(value)) => Err(ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: format!("{value} is not a whole number"),
        }),
    }
}

/// Validates and normalizes a per-unit amount for bundle pricing.
///
/// ## Rules
/// - Must be present
/// - Must parse as a decimal number
/// - Must not be negative
///
/// ## Returns
/// The amount in cents.
pub fn validate_unit_amount(amount: Option<&RawAmount>) -> ValidationResult<Money> {
    let amount = amount.ok_or_else(|| ValidationError::Required {
        field: "cost.amountPerQuantity.amount".to_string(),
    })?;

    let money = amount.to_money()?;
    if money.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "cost.amountPerQuantity.amount".to_string(),
        });
    }

    Ok(money)
}

// =============================================================================
// Unit Tests
// =============================================================================
