//! Evaluator test support utilities
//!
//! Shared by the evaluator's integration tests: idempotent logging
//! initialisation and the common proptest configuration.

pub mod logging;
pub mod proptest_prelude;
