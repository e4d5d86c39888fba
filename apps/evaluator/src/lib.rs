//! Indian poker strategy evaluator.
//!
//! Every seat sees its opponents' cards but not its own. The crate provides
//! the single-hand betting engine, multi-round game sessions, the strategy
//! plug-in interface and a background evaluator that keeps pitting every
//! 3-combination of loaded strategies against each other.

pub mod config;
pub mod domain;
pub mod error;
pub mod strategy;
pub mod telemetry;
pub mod tournament;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use config::EvaluatorConfig;
pub use domain::{
    Action, ActionKind, Card, Chips, DomainError, GameReport, PlayerId, PlayerInformation,
    RoundState, SessionConfig,
};
pub use error::EvaluatorError;
pub use strategy::{Registration, Strategy, StrategyCatalog, StrategyError};
pub use tournament::{Evaluator, EvaluatorStatus, FileSink, MemorySink, Trio};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
