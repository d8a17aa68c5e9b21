//! # Function Output
//!
//! The discount instruction handed back to the host. Field names, nesting and
//! value types here are the host's contract and must not drift.
//!
//! ```json
//! {
//!   "discountApplicationStrategy": "MAXIMUM",
//!   "discounts": [
//!     {
//!       "message": "6 FRUITS - 17% OFF",
//!       "value": { "percentage": { "value": "17" } },
//!       "targets": [
//!         { "productVariant": { "id": "gid://shopify/ProductVariant/1", "quantity": 3 } }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! TypeScript declarations are exported with `ts-rs` so host-side code can
//! type-check against the same shape.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Top-level result of one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FunctionResult {
    pub discount_application_strategy: DiscountApplicationStrategy,
    /// Zero or one entries.
    pub discounts: Vec<Discount>,
}

impl FunctionResult {
    /// The well-formed "nothing applies" result.
    pub fn no_discount() -> Self {
        FunctionResult {
            discount_application_strategy: DiscountApplicationStrategy::Maximum,
            discounts: Vec::new(),
        }
    }

    /// A result carrying exactly one discount.
    pub fn single(discount: Discount) -> Self {
        FunctionResult {
            discount_application_strategy: DiscountApplicationStrategy::Maximum,
            discounts: vec![discount],
        }
    }
}

/// How the host combines simultaneously applicable discounts.
/// This function always answers `MAXIMUM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum DiscountApplicationStrategy {
    Maximum,
}

/// One discount descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Discount {
    /// The selected tier's title.
    pub message: String,
    pub value: Value,
    /// One entry per cart line, in cart order.
    pub targets: Vec<Target>,
}

/// Percentage off, or a fixed amount off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum Value {
    Percentage(Percentage),
    FixedAmount(FixedAmount),
}

impl Value {
    pub fn percentage(value: impl Into<String>) -> Self {
        Value::Percentage(Percentage {
            value: value.into(),
        })
    }

    pub fn fixed_amount(amount: impl Into<String>) -> Self {
        Value::FixedAmount(FixedAmount {
            amount: amount.into(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percentage {
    /// Plain decimal string, e.g. `"17"` or `"12.5"`.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FixedAmount {
    /// Exactly two decimals, e.g. `"20.70"`.
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Target {
    pub product_variant: ProductVariantTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductVariantTarget {
    pub id: String,
    #[ts(type = "number")]
    pub quantity: i64,
}

impl Target {
    /// Targets `quantity` units of one product variant.
    pub fn for_variant(id: impl Into<String>, quantity: i64) -> Self {
        Target {
            product_variant: ProductVariantTarget {
                id: id.into(),
                quantity,
            },
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
