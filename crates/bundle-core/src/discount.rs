//! # Tier Discount Calculator
//!
//! Turns a cart and a tier configuration into one discount instruction.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FunctionInput                                                          │
//! │       │                                                                 │
//! │       ├── discountNode.metafield.value ──► DiscountConfig::parse        │
//! │       │                                        (ConfigParse on failure) │
//! │       ▼                                                                 │
//! │  compute_discount(cart, config)                                         │
//! │       │                                                                 │
//! │       ├── 1. total quantity = Σ line.quantity                           │
//! │       ├── 2. select_tier ──► Fallback? ──────────────► no discount      │
//! │       ├── 3. discount type                                              │
//! │       │      ├── PERCENTAGE          value = tier.amount   ("17")       │
//! │       │      ├── FIXED_BUNDLE_PRICE  value = Σ unit·qty − tier.amount   │
//! │       │      │                               ("20.70")                  │
//! │       │      └── anything else ──────────────────────► no discount      │
//! │       └── 4. targets = every cart line, in order                        │
//! │                                                                         │
//! │  Result: { discountApplicationStrategy: MAXIMUM, discounts: [0..1] }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The calculation is pure: same input, same output, nothing mutated.

use tracing::{debug, warn};

use crate::error::{DiscountError, DiscountResult, ValidationError};
use crate::money::Money;
use crate::output::{Discount, FunctionResult, Target, Value};
use crate::tier::select_tier;
use crate::types::{Cart, DiscountConfig, DiscountType, FunctionInput, Tier};
use crate::validation::validate_unit_amount;

/// Runs the discount function on a full host input document.
///
/// ## Errors
/// - `ConfigParse` if the discount node has no metafield or its value is
///   not a valid configuration
/// - `MalformedCartLine` as for [`compute_discount`]
pub fn run(input: &FunctionInput) -> DiscountResult<FunctionResult> {
    let raw_config = input
        .discount_node
        .metafield
        .as_ref()
        .map(|metafield| metafield.value.as_str())
        .ok_or_else(|| DiscountError::ConfigParse {
            reason: "discount node has no configuration metafield".to_string(),
        })?;

    let config = DiscountConfig::parse(raw_config)?;
    compute_discount(&input.cart, &config)
}

/// Computes the discount instruction for a cart.
///
/// ## Errors
/// `MalformedCartLine` when a line quantity is missing, not a whole number
/// or negative, when the quantities or line prices overflow, or when the
/// fixed bundle path needs a line's unit amount and it is missing,
/// unparseable or negative.
///
/// ## Example
/// ```rust
/// use bundle_core::discount::compute_discount;
/// use bundle_core::output::Value;
/// use bundle_core::types::{Cart, DiscountConfig};
///
/// let cart: Cart = serde_json::from_str(
///     r#"{"lines":[{"quantity":6,"merchandise":{"id":"gid://shopify/ProductVariant/1"}}]}"#,
/// ).unwrap();
/// let config = DiscountConfig::parse(
///     r#"{"tiers":[{"title":"6+","quantity":6,"amount":17}],"discountType":"PERCENTAGE"}"#,
/// ).unwrap();
///
/// let result = compute_discount(&cart, &config).unwrap();
/// assert_eq!(result.discounts[0].value, Value::percentage("17"));
/// ```
pub fn compute_discount(cart: &Cart, config: &DiscountConfig) -> DiscountResult<FunctionResult> {
    let total_quantity = cart.total_quantity()?;

    let selection = select_tier(&config.tiers, total_quantity);
    if selection.is_fallback() {
        debug!(total_quantity, "No tier qualifies, no discount applied");
        return Ok(FunctionResult::no_discount());
    }
    let tier = selection.tier();

    debug!(
        total_quantity,
        tier_quantity = tier.quantity,
        tier_title = %tier.title,
        "Selected tier"
    );

    let value = match &config.discount_type {
        DiscountType::Percentage => percentage_value(tier),
        DiscountType::FixedBundlePrice => fixed_bundle_value(cart, tier)?,
        DiscountType::Unrecognized(tag) => {
            debug!(discount_type = %tag, "Unrecognized discount type, no discount applied");
            return Ok(FunctionResult::no_discount());
        }
    };

    Ok(FunctionResult::single(Discount {
        message: tier.title.clone(),
        value,
        targets: targets(cart)?,
    }))
}

/// One target per cart line, in cart order.
fn targets(cart: &Cart) -> DiscountResult<Vec<Target>> {
    cart.lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let quantity = line.checked_quantity(index)?;
            Ok(Target::for_variant(line.merchandise.id.clone(), quantity))
        })
        .collect()
}

/// The tier amount, rendered as a plain decimal string (`17` → `"17"`).
fn percentage_value(tier: &Tier) -> Value {
    Value::percentage(tier.amount.to_string())
}

/// The cart's original price minus the tier's bundle price.
fn fixed_bundle_value(cart: &Cart, tier: &Tier) -> DiscountResult<Value> {
    let original_total = original_total(cart)?;
    let bundle_price = Money::from_f64(tier.amount).map_err(|err| DiscountError::ConfigParse {
        reason: format!("tier '{}': {err}", tier.title),
    })?;

    let discount = original_total - bundle_price;
    if discount.is_negative() {
        warn!(
            original_total = %original_total,
            bundle_price = %bundle_price,
            "Bundle price exceeds the cart total, discount amount is negative"
        );
    }

    debug!(
        original_total = %original_total,
        bundle_price = %bundle_price,
        discount = %discount,
        "Computed fixed bundle discount"
    );
    Ok(Value::fixed_amount(discount.to_string()))
}

/// Σ unit amount × quantity over every line.
fn original_total(cart: &Cart) -> DiscountResult<Money> {
    let mut total = Money::zero();
    for (index, line) in cart.lines.iter().enumerate() {
        let out_of_range = || {
            DiscountError::line(
                line.label(index),
                ValidationError::OutOfRange {
                    field: "cart total price".to_string(),
                },
            )
        };

        let quantity = line.checked_quantity(index)?;
        let unit = validate_unit_amount(line.unit_amount())
            .map_err(|err| DiscountError::line(line.label(index), err))?;
        let line_total = unit
            .checked_multiply_quantity(quantity)
            .ok_or_else(out_of_range)?;
        total = total.checked_add(line_total).ok_or_else(out_of_range)?;
    }
    Ok(total)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cart(lines: &[(i64, &str)]) -> Cart {
        let lines: Vec<_> = lines
            .iter()
            .enumerate()
            .map(|(i, (quantity, amount))| {
                json!({
                    "id": format!("gid://shopify/CartLine/{i}"),
                    "quantity": quantity,
                    "cost": { "amountPerQuantity": { "amount": amount, "currencyCode": "EUR" } },
                    "merchandise": {
                        "__typename": "ProductVariant",
                        "id": format!("gid://shopify/ProductVariant/{i}"),
                    },
                })
            })
            .collect();
        serde_json::from_value(json!({ "lines": lines })).unwrap()
    }

    fn config(discount_type: DiscountType, tiers: &[(u64, f64)]) -> DiscountConfig {
        DiscountConfig {
            tiers: tiers
                .iter()
                .map(|&(quantity, amount)| Tier {
                    title: format!("{quantity} ITEMS"),
                    quantity,
                    amount,
                })
                .collect(),
            discount_type,
            id: None,
            collections: None,
            products: None,
            title: None,
            allow_stacking_with_subscription: None,
        }
    }

    #[test]
    fn test_percentage_selects_highest_qualifying_tier() {
        let result = compute_discount(
            &cart(&[(3, "10.95"), (3, "10.95")]),
            &config(DiscountType::Percentage, &[(3, 10.0), (6, 17.0), (9, 20.0)]),
        )
        .unwrap();

        assert_eq!(result.discounts.len(), 1);
        let discount = &result.discounts[0];
        assert_eq!(discount.message, "6 ITEMS");
        assert_eq!(discount.value, Value::percentage("17"));
        assert_eq!(discount.targets.len(), 2);
        assert_eq!(discount.targets[0].product_variant.quantity, 3);
        assert_eq!(
            discount.targets[1].product_variant.id,
            "gid://shopify/ProductVariant/1"
        );
    }

    #[test]
    fn test_percentage_keeps_fractional_amount() {
        let result = compute_discount(
            &cart(&[(2, "1.00")]),
            &config(DiscountType::Percentage, &[(2, 12.5)]),
        )
        .unwrap();
        assert_eq!(result.discounts[0].value, Value::percentage("12.5"));
    }

    #[test]
    fn test_percentage_does_not_need_unit_amounts() {
        let cart: Cart = serde_json::from_value(json!({
            "lines": [{ "quantity": 4, "merchandise": { "id": "v1" } }]
        }))
        .unwrap();
        let result =
            compute_discount(&cart, &config(DiscountType::Percentage, &[(4, 15.0)])).unwrap();
        assert_eq!(result.discounts[0].value, Value::percentage("15"));
    }

    #[test]
    fn test_fixed_bundle_price() {
        let result = compute_discount(
            &cart(&[(3, "10.95"), (3, "10.95")]),
            &config(DiscountType::FixedBundlePrice, &[(3, 25.0), (6, 45.0), (9, 60.0)]),
        )
        .unwrap();

        let discount = &result.discounts[0];
        assert_eq!(discount.value, Value::fixed_amount("20.70"));
        assert_eq!(discount.targets.len(), 2);
    }

    #[test]
    fn test_fixed_bundle_price_above_total_goes_negative() {
        let result = compute_discount(
            &cart(&[(3, "5.00")]),
            &config(DiscountType::FixedBundlePrice, &[(3, 19.1)]),
        )
        .unwrap();
        assert_eq!(result.discounts[0].value, Value::fixed_amount("-4.10"));
    }

    #[test]
    fn test_fixed_bundle_missing_unit_amount_is_malformed() {
        let cart: Cart = serde_json::from_value(json!({
            "lines": [{ "id": "gid://shopify/CartLine/7", "quantity": 3, "merchandise": { "id": "v1" } }]
        }))
        .unwrap();

        let err = compute_discount(&cart, &config(DiscountType::FixedBundlePrice, &[(3, 20.0)]))
            .unwrap_err();
        match err {
            DiscountError::MalformedCartLine { line, reason } => {
                assert_eq!(line, "gid://shopify/CartLine/7");
                assert!(reason.contains("amountPerQuantity.amount"));
            }
            other => panic!("expected MalformedCartLine, got {other:?}"),
        }
    }

    #[test]
    fn test_fixed_bundle_unparseable_unit_amount_is_malformed() {
        let err = compute_discount(
            &cart(&[(3, "ten")]),
            &config(DiscountType::FixedBundlePrice, &[(3, 20.0)]),
        )
        .unwrap_err();
        assert!(matches!(err, DiscountError::MalformedCartLine { .. }));
    }

    #[test]
    fn test_negative_quantity_is_malformed() {
        let err = compute_discount(
            &cart(&[(3, "1.00"), (-1, "1.00")]),
            &config(DiscountType::Percentage, &[(1, 5.0)]),
        )
        .unwrap_err();
        match err {
            DiscountError::MalformedCartLine { line, .. } => {
                assert_eq!(line, "gid://shopify/CartLine/1")
            }
            other => panic!("expected MalformedCartLine, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_quantity_is_malformed() {
        let cart: Cart = serde_json::from_value(json!({
            "lines": [{ "id": "gid://shopify/CartLine/3", "merchandise": { "id": "v1" } }]
        }))
        .unwrap();

        let err = compute_discount(&cart, &config(DiscountType::Percentage, &[(0, 5.0)]))
            .unwrap_err();
        match err {
            DiscountError::MalformedCartLine { line, reason } => {
                assert_eq!(line, "gid://shopify/CartLine/3");
                assert_eq!(reason, "quantity is required");
            }
            other => panic!("expected MalformedCartLine, got {other:?}"),
        }
    }

    #[test]
    fn test_fractional_quantity_is_malformed() {
        let cart: Cart = serde_json::from_value(json!({
            "lines": [{ "quantity": 2.5, "merchandise": { "id": "v1" } }]
        }))
        .unwrap();

        let err = compute_discount(&cart, &config(DiscountType::Percentage, &[(1, 5.0)]))
            .unwrap_err();
        assert!(matches!(err, DiscountError::MalformedCartLine { line, .. } if line == "#0"));
    }

    #[test]
    fn test_quantity_overflow_is_malformed() {
        let cart: Cart = serde_json::from_value(json!({
            "lines": [
                { "quantity": i64::MAX, "merchandise": { "id": "v1" } },
                { "quantity": 1, "merchandise": { "id": "v2" } }
            ]
        }))
        .unwrap();

        let err = compute_discount(&cart, &config(DiscountType::Percentage, &[(3, 10.0)]))
            .unwrap_err();
        match err {
            DiscountError::MalformedCartLine { line, reason } => {
                assert_eq!(line, "#1");
                assert!(reason.contains("out of range"));
            }
            other => panic!("expected MalformedCartLine, got {other:?}"),
        }
    }

    #[test]
    fn test_price_overflow_is_malformed() {
        let err = compute_discount(
            &cart(&[(1, "92233720368547758.07"), (1, "1.00")]),
            &config(DiscountType::FixedBundlePrice, &[(2, 10.0)]),
        )
        .unwrap_err();
        match err {
            DiscountError::MalformedCartLine { line, reason } => {
                assert_eq!(line, "gid://shopify/CartLine/1");
                assert_eq!(reason, "cart total price is out of range");
            }
            other => panic!("expected MalformedCartLine, got {other:?}"),
        }

        let err = compute_discount(
            &cart(&[(2, "92233720368547758.07")]),
            &config(DiscountType::FixedBundlePrice, &[(2, 10.0)]),
        )
        .unwrap_err();
        assert!(matches!(err, DiscountError::MalformedCartLine { .. }));
    }

    #[test]
    fn test_unusable_amount_on_percentage_path_is_ignored() {
        let result = compute_discount(
            &serde_json::from_value(json!({
                "lines": [{
                    "quantity": 3,
                    "cost": { "amountPerQuantity": { "amount": { "cents": 100 } } },
                    "merchandise": { "id": "v1" }
                }]
            }))
            .unwrap(),
            &config(DiscountType::Percentage, &[(3, 10.0)]),
        )
        .unwrap();
        assert_eq!(result.discounts[0].value, Value::percentage("10"));
    }

    #[test]
    fn test_no_qualifying_tier_yields_no_discount() {
        for discount_type in [DiscountType::Percentage, DiscountType::FixedBundlePrice] {
            let result = compute_discount(
                &cart(&[(1, "10.95")]),
                &config(discount_type, &[(3, 10.0), (6, 17.0)]),
            )
            .unwrap();
            assert_eq!(result, FunctionResult::no_discount());
        }
    }

    #[test]
    fn test_empty_cart_yields_no_discount() {
        let result = compute_discount(
            &Cart::default(),
            &config(DiscountType::FixedBundlePrice, &[(1, 10.0)]),
        )
        .unwrap();
        assert!(result.discounts.is_empty());
    }

    #[test]
    fn test_unrecognized_type_yields_no_discount() {
        let result = compute_discount(
            &cart(&[(6, "10.95")]),
            &config(
                DiscountType::Unrecognized("BUY_X_GET_Y".to_string()),
                &[(3, 10.0)],
            ),
        )
        .unwrap();
        assert_eq!(result, FunctionResult::no_discount());
    }

    #[test]
    fn test_unrecognized_type_skips_unit_amount_checks() {
        let result = compute_discount(
            &cart(&[(6, "not a number")]),
            &config(DiscountType::default(), &[(3, 10.0)]),
        )
        .unwrap();
        assert!(result.discounts.is_empty());
    }

    #[test]
    fn test_run_reads_metafield() {
        let raw_config = json!({
            "tiers": [{ "title": "5+", "quantity": 5, "amount": 15 }],
            "discountType": "PERCENTAGE"
        })
        .to_string();
        let input: FunctionInput = serde_json::from_value(json!({
            "cart": { "lines": [{ "quantity": 5, "merchandise": { "id": "v1" } }] },
            "discountNode": { "metafield": { "value": raw_config } }
        }))
        .unwrap();

        let result = run(&input).unwrap();
        assert_eq!(result.discounts[0].message, "5+");
        assert_eq!(result.discounts[0].value, Value::percentage("15"));
    }

    #[test]
    fn test_run_without_metafield_is_config_error() {
        let input: FunctionInput = serde_json::from_value(json!({
            "cart": { "lines": [] },
            "discountNode": { "metafield": null }
        }))
        .unwrap();
        assert!(matches!(run(&input), Err(DiscountError::ConfigParse { .. })));
    }

    #[test]
    fn test_run_with_malformed_config_is_config_error() {
        let input: FunctionInput = serde_json::from_value(json!({
            "cart": { "lines": [] },
            "discountNode": { "metafield": { "value": "{\"tiers\": 3" } }
        }))
        .unwrap();
        assert!(matches!(run(&input), Err(DiscountError::ConfigParse { .. })));
    }
}
