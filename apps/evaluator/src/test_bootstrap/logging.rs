#![cfg(test)]

//! Test logging initialization for unit tests.
//!
//! Integration tests use `evaluator_test_support::logging::init`, which
//! follows the same rules.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Initialize structured logging for tests.
///
/// Idempotent. The level comes from `TEST_LOG`, then `RUST_LOG`, then
/// defaults to `warn`. Round transcripts are visible with
/// `TEST_LOG=evaluator::round=debug`.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
