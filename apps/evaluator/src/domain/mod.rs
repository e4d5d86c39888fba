//! Domain layer: pure game logic types and the betting state machine.

pub mod action;
pub mod cards;
pub mod engine;
pub mod errors;
pub mod player;
pub mod round_state;
pub mod session;
pub mod transcript;

#[cfg(test)]
mod test_prelude;
#[cfg(test)]
pub(crate) mod test_strategies;
#[cfg(test)]
mod tests_props_engine;
#[cfg(test)]
mod tests_round_state;
#[cfg(test)]
mod tests_session;

/// Chip amounts. Stacks, pots and deltas are never negative.
pub type Chips = u32;

/// Stable identifier a strategy plays under.
pub type PlayerId = String;

// Re-exports for ergonomics
pub use action::{Action, ActionKind};
pub use cards::{Card, Deck, Suit};
pub use engine::{deal, play_round, table_total, Entrant, RoundOutcome};
pub use errors::DomainError;
pub use player::PlayerInformation;
pub use round_state::RoundState;
pub use session::{simulate_game, GameReport, GameSession, RoundRecord, SessionConfig};
pub use transcript::Transcript;
