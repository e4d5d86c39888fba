//! Strategy trait definition.

use thiserror::Error;

use crate::domain::{Action, DomainError, RoundState};

/// Errors a strategy can report. The engine treats every one of them as a
/// fold during play; during instantiation they cause the registration to be
/// skipped.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// Strategy encountered an internal error
    #[error("strategy internal error: {0}")]
    Internal(String),
    /// Strategy knowingly produced nothing usable
    #[error("strategy invalid move: {0}")]
    InvalidMove(String),
    /// Strategy could not be constructed
    #[error("strategy failed to load: {0}")]
    Load(String),
    /// A round-state query failed
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// A betting strategy.
///
/// `decide` receives a copy of the round state with the caller's own card
/// hidden and returns the action to take. The engine validates the action;
/// anything illegal, any `Err` and any panic all fold the seat.
///
/// Calls on one instance are always sequential, so implementations may keep
/// plain mutable state between rounds.
pub trait Strategy: Send {
    fn decide(&mut self, state: &RoundState) -> Result<Action, StrategyError>;

    /// Called once per round with every card visible, including the
    /// strategy's own.
    fn reveal(&mut self, _state: &RoundState) -> Result<(), StrategyError> {
        Ok(())
    }

    /// Free-form dump of internal state for debugging.
    fn describe(&self) -> String {
        "describe not implemented".to_string()
    }
}
