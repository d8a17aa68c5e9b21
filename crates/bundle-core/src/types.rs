//! # Domain Types
//!
//! The input side of the discount function: the cart snapshot the host
//! hands over, and the tier configuration stored in the discount metafield.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Input Document                                  │
//! │                                                                         │
//! │  FunctionInput                                                          │
//! │  ├── cart: Cart                                                         │
//! │  │   └── lines: [CartLine]                                              │
//! │  │        ├── quantity                                                  │
//! │  │        ├── merchandise.id            ──► output target id            │
//! │  │        └── cost.amountPerQuantity.amount  ("10.95")                  │
//! │  └── discountNode.metafield.value  (JSON string)                        │
//! │                          │                                              │
//! │                          ▼  DiscountConfig::parse                       │
//! │                  DiscountConfig                                         │
//! │                  ├── tiers: [Tier { title, quantity, amount }]          │
//! │                  └── discountType: PERCENTAGE | FIXED_BUNDLE_PRICE | …  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything deserializes with camelCase field names, exactly as the host
//! sends them. Fields the calculation reads are typed; line quantities and
//! unit amounts arrive raw so a bad value is reported against its line.
//! Informational fields stay as untyped JSON and never fail a parse.

use serde::Deserialize;
use tracing::debug;

use crate::error::{DiscountError, DiscountResult, ValidationError};
use crate::money::Money;
use crate::validation::{validate_line_quantity, validate_tier};

/// Discount type tag for percentage-off tiers.
pub const PERCENTAGE_TAG: &str = "PERCENTAGE";

/// Discount type tag for fixed bundle price tiers.
pub const FIXED_BUNDLE_PRICE_TAG: &str = "FIXED_BUNDLE_PRICE";

// =============================================================================
// Function Input
// =============================================================================

/// The whole document the host passes to one function invocation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInput {
    pub cart: Cart,
    pub discount_node: DiscountNode,
}

/// The discount the function is evaluated for.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscountNode {
    /// Holds the serialized `DiscountConfig`. Absent when the merchant never
    /// saved a configuration.
    #[serde(default)]
    pub metafield: Option<Metafield>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Metafield {
    pub value: String,
}

// =============================================================================
// Cart
// =============================================================================

/// The customer's cart at evaluation time. Read-only.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Informational, passed through by the host.
    #[serde(default)]
    pub buyer_identity: Option<serde_json::Value>,

    /// Line items in cart order. Output targets keep this order.
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Sum of every line's quantity. Tier selection only looks at this.
    ///
    /// ## Errors
    /// `MalformedCartLine` for the first line whose quantity is invalid, or
    /// at which the running total overflows.
    pub fn total_quantity(&self) -> DiscountResult<i64> {
        self.lines
            .iter()
            .enumerate()
            .try_fold(0i64, |total, (index, line)| {
                let quantity = line.checked_quantity(index)?;
                total.checked_add(quantity).ok_or_else(|| {
                    DiscountError::line(
                        line.label(index),
                        ValidationError::OutOfRange {
                            field: "cart total quantity".to_string(),
                        },
                    )
                })
            })
    }
}

/// One line item in the cart.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Host line id (`gid://shopify/CartLine/0`). Only used in error messages.
    #[serde(default)]
    pub id: Option<String>,

    /// Checked by [`CartLine::checked_quantity`].
    #[serde(default)]
    pub quantity: Option<RawQuantity>,

    pub merchandise: Merchandise,

    /// Only required when pricing a fixed bundle.
    #[serde(default)]
    pub cost: Option<CartLineCost>,

    /// Informational. Subscription filtering happens upstream.
    #[serde(default)]
    pub selling_plan_allocation: Option<serde_json::Value>,
}

impl CartLine {
    /// Per-unit amount, if the host sent one.
    pub fn unit_amount(&self) -> Option<&RawAmount> {
        self.cost
            .as_ref()
            .and_then(|cost| cost.amount_per_quantity.as_ref())
            .and_then(|money| money.amount.as_ref())
    }

    /// The line quantity, validated and attributed to this line on failure.
    pub fn checked_quantity(&self, index: usize) -> DiscountResult<i64> {
        validate_line_quantity(self.quantity.as_ref())
            .map_err(|err| DiscountError::line(self.label(index), err))
    }

    /// Name used for this line in error messages: its id, or `#index`.
    pub fn label(&self, index: usize) -> String {
        self.id.clone().unwrap_or_else(|| format!("#{index}"))
    }
}

/// The purchasable variant on a line.
#[derive(Debug, Clone, Deserialize)]
pub struct Merchandise {
    #[serde(rename = "__typename", default)]
    pub typename: Option<String>,

    /// Variant id, echoed into the output target.
    pub id: String,

    #[serde(default)]
    pub product: Option<ProductRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductRef {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineCost {
    #[serde(default)]
    pub amount_per_quantity: Option<MoneyV2>,
}

/// An amount with its currency, as the host encodes money.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyV2 {
    #[serde(default)]
    pub amount: Option<RawAmount>,

    #[serde(default)]
    pub currency_code: Option<String>,
}

/// A line quantity as it arrives.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawQuantity {
    Integer(i64),
    /// Floats, strings, integers beyond `i64` and anything else.
    Other(serde_json::Value),
}

/// A monetary amount as it arrives: decimal string or JSON number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Text(String),
    Number(f64),
    Other(serde_json::Value),
}

impl RawAmount {
    /// Normalizes to integer cents. See [`Money::parse_decimal`].
    pub fn to_money(&self) -> Result<Money, ValidationError> {
        match self {
            RawAmount::Text(text) => Money::parse_decimal(text),
            RawAmount::Number(number) => Money::from_f64(*number),
            RawAmount::Other(value) => Err(ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: format!("{value} is not a decimal amount"),
            }),
        }
    }
}

// =============================================================================
// Discount Configuration
// =============================================================================

/// One discount rule: reach `quantity` items, get `amount`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tier {
    /// Echoed as the discount message.
    #[serde(default)]
    pub title: String,

    /// Minimum total cart quantity to qualify.
    pub quantity: u64,

    /// Percent off (0-100) or the bundle price, depending on the
    /// discount type.
    pub amount: f64,
}

/// How the selected tier's amount is turned into a discount.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum DiscountType {
    /// `amount` is a percentage applied to every line.
    Percentage,
    /// `amount` is the price the whole cart should cost.
    FixedBundlePrice,
    /// Anything else. Yields no discount, never an error.
    Unrecognized(String),
}

impl Default for DiscountType {
    /// A config without `discountType` applies nothing.
    fn default() -> Self {
        DiscountType::Unrecognized(String::new())
    }
}

impl From<serde_json::Value> for DiscountType {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(tag) if tag == PERCENTAGE_TAG => DiscountType::Percentage,
            serde_json::Value::String(tag) if tag == FIXED_BUNDLE_PRICE_TAG => {
                DiscountType::FixedBundlePrice
            }
            serde_json::Value::String(tag) => DiscountType::Unrecognized(tag),
            other => DiscountType::Unrecognized(other.to_string()),
        }
    }
}

/// The rule set of one discount campaign, stored as JSON in the metafield.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountConfig {
    /// Unsorted. May be empty.
    pub tiers: Vec<Tier>,

    #[serde(default)]
    pub discount_type: DiscountType,

    // Informational, kept as sent. Collection and product filtering happens
    // upstream, so no shape is imposed here.
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub collections: Option<serde_json::Value>,
    #[serde(default)]
    pub products: Option<serde_json::Value>,
    #[serde(default)]
    pub title: Option<serde_json::Value>,
    #[serde(default)]
    pub allow_stacking_with_subscription: Option<serde_json::Value>,
}

impl DiscountConfig {
    /// Parses the metafield value.
    ///
    /// ## Errors
    /// `ConfigParse` when the text is not JSON of this shape, or when a tier
    /// has a negative amount.
    ///
    /// ## Example
    /// ```rust
    /// use bundle_core::types::{DiscountConfig, DiscountType};
    ///
    /// let config = DiscountConfig::parse(
    ///     r#"{"tiers":[{"title":"3+","quantity":3,"amount":10}],"discountType":"PERCENTAGE"}"#,
    /// ).unwrap();
    /// assert_eq!(config.tiers.len(), 1);
    /// assert_eq!(config.discount_type, DiscountType::Percentage);
    /// ```
    pub fn parse(raw: &str) -> DiscountResult<Self> {
        let config: DiscountConfig = serde_json::from_str(raw).map_err(DiscountError::config)?;

        for (index, tier) in config.tiers.iter().enumerate() {
            validate_tier(tier).map_err(|err| DiscountError::ConfigParse {
                reason: format!("tier {index}: {err}"),
            })?;
        }

        debug!(
            id = ?config.id,
            title = ?config.title,
            tiers = config.tiers.len(),
            discount_type = ?config.discount_type,
            "Parsed discount configuration"
        );
        Ok(config)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
