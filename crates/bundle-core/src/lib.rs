//! # bundle-core: Tier Discount Logic for Bundle Builder
//!
//! This crate is the checkout discount function: given a cart and a tier
//! configuration, it picks the tier the cart qualifies for and emits one
//! percentage-off or fixed-bundle-price discount.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Bundle Builder Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Commerce Platform (checkout)                     │   │
//! │  │     cart changes ──► discount evaluation ──► apply discount      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ input JSON / output JSON               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  bundle-function (host adapter)                  │   │
//! │  │        stdin ──► FunctionInput ──► run() ──► stdout              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ bundle-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌──────────┐  ┌─────────────────┐  │   │
//! │  │   │  types  │  │  tier   │  │ discount │  │ output / money  │  │   │
//! │  │   │  Cart   │  │ select  │  │ compute  │  │ FunctionResult  │  │   │
//! │  │   │  Config │  │         │  │          │  │ Money           │  │   │
//! │  │   └─────────┘  └─────────┘  └──────────┘  └─────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STATE • PURE FUNCTIONS                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Input document, cart and discount configuration
//! - [`tier`] - Tier selection with an explicit fallback
//! - [`discount`] - The calculation itself
//! - [`output`] - The discount instruction returned to the host
//! - [`money`] - Integer-cent money for bundle pricing
//! - [`validation`] - Line and tier checks
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use bundle_core::{run, FunctionInput, Value};
//!
//! let input: FunctionInput = serde_json::from_str(r#"{
//!     "cart": { "lines": [
//!         { "quantity": 3, "merchandise": { "id": "gid://shopify/ProductVariant/1" },
//!           "cost": { "amountPerQuantity": { "amount": "10.95", "currencyCode": "EUR" } } },
//!         { "quantity": 3, "merchandise": { "id": "gid://shopify/ProductVariant/2" },
//!           "cost": { "amountPerQuantity": { "amount": "10.95", "currencyCode": "EUR" } } }
//!     ] },
//!     "discountNode": { "metafield": { "value":
//!         "{\"tiers\":[{\"title\":\"6 for 45\",\"quantity\":6,\"amount\":45}],\"discountType\":\"FIXED_BUNDLE_PRICE\"}"
//!     } }
//! }"#).unwrap();
//!
//! let result = run(&input).unwrap();
//! assert_eq!(result.discounts[0].value, Value::fixed_amount("20.70"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod discount;
pub mod error;
pub mod money;
pub mod output;
pub mod tier;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use discount::{compute_discount, run};
pub use error::{DiscountError, DiscountResult, ValidationError};
pub use money::Money;
pub use output::{Discount, DiscountApplicationStrategy, FunctionResult, Target, Value};
pub use types::{
    Cart, CartLine, DiscountConfig, DiscountType, FunctionInput, RawQuantity, Tier,
};
