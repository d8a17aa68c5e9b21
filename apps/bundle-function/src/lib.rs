//! # Bundle Function Host Adapter
//!
//! Runs the tier discount calculation as a checkout function: one input
//! document in on stdin, one discount instruction out on stdout.
//!
//! ## Module Organization
//! ```text
//! bundle_function/
//! ├── lib.rs      ◄─── You are here (startup, tracing, execute)
//! ├── config.rs   ◄─── Environment configuration
//! └── error.rs    ◄─── FunctionError and the stderr report
//! ```
//!
//! ## Invocation Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Load FunctionConfig from the environment                            │
//! │  2. Initialize tracing (stderr, EnvFilter)                              │
//! │  3. Read stdin (bounded by max_input_bytes)                             │
//! │  4. Parse FunctionInput                                                 │
//! │  5. bundle_core::run                                                    │
//! │  6. Write FunctionResult JSON to stdout                                 │
//! │                                                                         │
//! │  Any failure: ErrorReport JSON on stderr, exit code 1                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;

use std::io::{self, Read, Write};
use std::process::ExitCode;

use bundle_core::{FunctionInput, FunctionResult};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use config::{FunctionConfig, DEFAULT_LOG_FILTER};
use error::FunctionError;

/// Runs one invocation against the process's stdin and stdout.
pub fn run() -> ExitCode {
    let config = match FunctionConfig::load() {
        Ok(config) => config,
        Err(err) => {
            write_report(&FunctionError::from(err));
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();

    match execute(stdin, stdout, &config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!(code = ?err.code(), %err, "Discount function failed");
            write_report(&err);
            ExitCode::FAILURE
        }
    }
}

/// Reads one input document, computes the discount and writes the result.
///
/// Returns the result as well, so callers other than `run` can inspect it.
pub fn execute<R: Read, W: Write>(
    reader: R,
    mut writer: W,
    config: &FunctionConfig,
) -> Result<FunctionResult, FunctionError> {
    let limit = config.max_input_bytes;
    let mut raw = Vec::new();
    reader
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut raw)?;
    if raw.len() > limit {
        return Err(FunctionError::InputTooLarge { limit });
    }

    let input: FunctionInput = serde_json::from_slice(&raw).map_err(FunctionError::Input)?;
    debug!(
        bytes = raw.len(),
        lines = input.cart.lines.len(),
        "Read function input"
    );

    let result = bundle_core::run(&input)?;

    if config.pretty_output {
        serde_json::to_writer_pretty(&mut writer, &result)
    } else {
        serde_json::to_writer(&mut writer, &result)
    }
    .map_err(FunctionError::Output)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!(
        discounts = result.discounts.len(),
        "Discount function completed"
    );
    Ok(result)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `BUNDLE_LOG=debug` or `RUST_LOG=debug` - Show debug messages
/// - Default: `info,bundle=debug`
///
/// Logs always go to stderr; stdout carries only the output document.
fn init_tracing(config: &FunctionConfig) {
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // A subscriber may already be installed when embedded in a test harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .try_init();
}

fn write_report(err: &FunctionError) {
    match serde_json::to_string(&err.report()) {
        Ok(report) => eprintln!("{report}"),
        Err(_) => eprintln!("{err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    fn input_document(discount_type: &str) -> String {
        let config = json!({
            "tiers": [
                { "title": "3 FRUITS - 10% OFF", "amount": 10, "quantity": 3 },
                { "title": "6 FRUITS - 17% OFF", "amount": 17, "quantity": 6 }
            ],
            "discountType": discount_type
        })
        .to_string();

        json!({
            "cart": { "lines": [
                { "id": "gid://shopify/CartLine/0", "quantity": 6,
                  "cost": { "amountPerQuantity": { "amount": "2.00", "currencyCode": "EUR" } },
                  "merchandise": { "__typename": "ProductVariant", "id": "gid://shopify/ProductVariant/1" } }
            ] },
            "discountNode": { "metafield": { "value": config } }
        })
        .to_string()
    }

    fn execute_str(
        input: &str,
        config: &FunctionConfig,
    ) -> (Result<FunctionResult, FunctionError>, String) {
        let mut output = Vec::new();
        let result = execute(input.as_bytes(), &mut output, config);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_execute_writes_compact_output() {
        let (result, output) =
            execute_str(&input_document("PERCENTAGE"), &FunctionConfig::default());
        result.unwrap();

        assert!(output.ends_with('\n'));
        assert_eq!(output.lines().count(), 1);
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["discountApplicationStrategy"], "MAXIMUM");
        assert_eq!(json["discounts"][0]["message"], "6 FRUITS - 17% OFF");
        assert_eq!(json["discounts"][0]["value"]["percentage"]["value"], "17");
        assert_eq!(json["discounts"][0]["targets"][0]["productVariant"]["quantity"], 6);
    }

    #[test]
    fn test_execute_pretty_output() {
        let config = FunctionConfig {
            pretty_output: true,
            ..FunctionConfig::default()
        };
        let (result, output) = execute_str(&input_document("FIXED_BUNDLE_PRICE"), &config);
        result.unwrap();

        assert!(output.lines().count() > 1);
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        // 6 × 2.00 − 17.00
        assert_eq!(json["discounts"][0]["value"]["fixedAmount"]["amount"], "-5.00");
    }

    #[test]
    fn test_execute_unrecognized_type() {
        let (result, output) =
            execute_str(&input_document("SOMETHING_ELSE"), &FunctionConfig::default());
        assert!(result.unwrap().discounts.is_empty());
        assert_eq!(
            output.trim_end(),
            r#"{"discountApplicationStrategy":"MAXIMUM","discounts":[]}"#
        );
    }

    #[test]
    fn test_execute_rejects_invalid_input() {
        let (result, output) = execute_str("not json", &FunctionConfig::default());
        assert_eq!(result.unwrap_err().code(), ErrorCode::InvalidInput);
        assert!(output.is_empty());
    }

    #[test]
    fn test_execute_rejects_oversized_input() {
        let config = FunctionConfig {
            max_input_bytes: 16,
            ..FunctionConfig::default()
        };
        let (result, _) = execute_str(&input_document("PERCENTAGE"), &config);
        assert!(matches!(
            result,
            Err(FunctionError::InputTooLarge { limit: 16 })
        ));
    }

    #[test]
    fn test_execute_with_largest_input_limit() {
        let config = FunctionConfig {
            max_input_bytes: usize::MAX,
            ..FunctionConfig::default()
        };
        let (result, output) = execute_str(&input_document("PERCENTAGE"), &config);
        assert_eq!(result.unwrap().discounts.len(), 1);
        assert!(!output.is_empty());
    }

    #[test]
    fn test_execute_reports_line_without_quantity() {
        let config = json!({
            "tiers": [{ "title": "ANY", "amount": 5, "quantity": 0 }],
            "discountType": "PERCENTAGE"
        })
        .to_string();
        let input = json!({
            "cart": { "lines": [
                { "id": "gid://shopify/CartLine/0", "merchandise": { "id": "gid://shopify/ProductVariant/1" } }
            ] },
            "discountNode": { "metafield": { "value": config } }
        })
        .to_string();

        let (result, output) = execute_str(&input, &FunctionConfig::default());
        assert_eq!(result.unwrap_err().code(), ErrorCode::MalformedCartLine);
        assert!(output.is_empty());
    }

    #[test]
    fn test_execute_surfaces_discount_errors() {
        let input = json!({
            "cart": { "lines": [] },
            "discountNode": { "metafield": { "value": "{\"tiers\":" } }
        })
        .to_string();
        let (result, output) = execute_str(&input, &FunctionConfig::default());
        assert_eq!(result.unwrap_err().code(), ErrorCode::ConfigParse);
        assert!(output.is_empty());
    }
}
