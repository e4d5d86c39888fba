use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::PlayerId;

/// Errors raised by pure game logic.
///
/// The betting engine itself never produces these for strategy misbehaviour
/// (that degrades to a fold); they surface only when a caller asks about a
/// player that is not seated, or builds a session from an unusable roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    UnknownPlayer(PlayerId),
    TooFewPlayers { needed: usize, found: usize },
    DuplicatePlayer(PlayerId),
    InvalidConfig(String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::UnknownPlayer(id) => write!(f, "unknown player: {id}"),
            DomainError::TooFewPlayers { needed, found } => {
                write!(f, "too few players: needed {needed}, found {found}")
            }
            DomainError::DuplicatePlayer(id) => write!(f, "duplicate player: {id}"),
            DomainError::InvalidConfig(s) => write!(f, "invalid config: {s}"),
        }
    }
}

impl Error for DomainError {}
