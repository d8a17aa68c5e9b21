//! # Bundle Function Entry Point
//!
//! ```text
//! $ bundle-function < input.json > output.json
//! ```
//!
//! The actual setup is in lib.rs for better testability.

use std::process::ExitCode;

fn main() -> ExitCode {
    bundle_function::run()
}
