use super::trait_def::{Strategy, StrategyError};
use crate::domain::{Action, PlayerId, RoundState};

/// Checks when it can, calls otherwise. Never folds, never raises.
pub struct CallingStation {
    player_id: PlayerId,
}

impl CallingStation {
    pub const NAME: &'static str = "CallingStation";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new(player_id: impl Into<PlayerId>) -> Self {
        Self {
            player_id: player_id.into(),
        }
    }
}

impl Strategy for CallingStation {
    fn decide(&mut self, state: &RoundState) -> Result<Action, StrategyError> {
        Ok(state.check_call(&self.player_id)?)
    }
}
