//! Rational Core - exact fraction arithmetic for native and WASM callers
//!
//! This crate provides:
//! - Canonical rational numbers over `i64` with checked arithmetic
//! - Operand token parsing (`n/d` or integer literals)
//! - A two-pass precedence evaluator for `+ - * /` expressions
//! - Ordered rational sequences with summation and a display ordering
//! - Batch processing of line sources with per-item error containment

use wasm_bindgen::prelude::*;

pub mod batch;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod rational;
pub mod sequence;
#[cfg(not(target_arch = "wasm32"))]
pub mod source;
pub mod token;
pub mod wasm;

#[cfg(test)]
mod proptests;

// Re-export main types for convenience
pub use batch::{Batch, FileOutcome, FileReport, LineSource, MemorySource, Mode};
pub use config::Config;
pub use error::{RationalError, Result, SourceError};
pub use evaluator::{evaluate_expression, Evaluator};
pub use rational::{Field, Operand, Rational, RenderStyle};
pub use sequence::RationalSequence;
pub use token::parse_token;

/// Initialize the WASM module
/// Call this once when loading the module to set up panic hooks
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the version of the rational-core library
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
