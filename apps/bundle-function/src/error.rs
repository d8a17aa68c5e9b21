//! # Host Error Type
//!
//! Everything that can stop one invocation of the function binary.
//!
//! ## Error Reporting
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in bundle-function                        │
//! │                                                                         │
//! │  stdin ──► read (Io / InputTooLarge)                                    │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  FunctionInput ──► parse (Input)                                        │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  bundle_core::run ──► DiscountError ──► FunctionError::Discount         │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  stdout ◄── FunctionResult          stderr ◄── ErrorReport (JSON)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The host reads the `ErrorReport` from stderr:
//! ```json
//! { "code": "MALFORMED_CART_LINE", "message": "Cart line #1 is malformed: ..." }
//! ```

use bundle_core::DiscountError;
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised by the host adapter.
#[derive(Debug, Error)]
pub enum FunctionError {
    /// Environment configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reading stdin or writing stdout failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input document exceeds the configured size limit.
    #[error("Input exceeds {limit} bytes")]
    InputTooLarge { limit: usize },

    /// stdin is not a function input document.
    #[error("Invalid function input: {0}")]
    Input(#[source] serde_json::Error),

    /// The output document could not be serialized.
    #[error("Could not serialize function output: {0}")]
    Output(#[source] serde_json::Error),

    /// The discount calculation rejected its input.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Error codes written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad environment configuration
    Config,

    /// stdin/stdout failure
    Io,

    /// Input document too large or not parseable
    InvalidInput,

    /// Discount metafield not parseable
    ConfigParse,

    /// A cart line lacks usable data
    MalformedCartLine,

    /// Output serialization failure
    Internal,
}

/// What the host sees when an invocation fails.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

impl FunctionError {
    /// Machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            FunctionError::Config(_) => ErrorCode::Config,
            FunctionError::Io(_) => ErrorCode::Io,
            FunctionError::InputTooLarge { .. } | FunctionError::Input(_) => {
                ErrorCode::InvalidInput
            }
            FunctionError::Output(_) => ErrorCode::Internal,
            FunctionError::Discount(DiscountError::ConfigParse { .. }) => ErrorCode::ConfigParse,
            FunctionError::Discount(DiscountError::MalformedCartLine { .. }) => {
                ErrorCode::MalformedCartLine
            }
        }
    }

    /// Converts to the serializable report.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code(),
            message: self.to_string(),
        }
    }
}
