//! Random strategy - picks one of the four action kinds uniformly.
//!
//! Calls and raises are sized with the round-state helpers, so the action is
//! well-formed but frequently illegal (checking into a bet, calling when
//! nothing is owed). That makes it a useful baseline: it exercises the
//! engine's fold-on-invalid path constantly.

use rand::prelude::*;

use super::trait_def::{Strategy, StrategyError};
use crate::domain::{Action, ActionKind, PlayerId, RoundState};

pub struct RandomStrategy {
    player_id: PlayerId,
    rng: StdRng,
    decisions: u64,
}

impl RandomStrategy {
    pub const NAME: &'static str = "RandomStrategy";
    pub const VERSION: &'static str = "1.0.0";

    /// `seed` makes every decision reproducible; `None` uses OS entropy.
    pub fn new(player_id: impl Into<PlayerId>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            player_id: player_id.into(),
            rng,
            decisions: 0,
        }
    }
}

impl Strategy for RandomStrategy {
    fn decide(&mut self, state: &RoundState) -> Result<Action, StrategyError> {
        let kind = ActionKind::ALL
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| StrategyError::Internal("no action kinds to choose from".into()))?;
        self.decisions += 1;

        let action = match kind {
            ActionKind::Fold => Action::fold(),
            ActionKind::Check => Action::check(),
            ActionKind::Call => Action::call(state.to_call(&self.player_id)?),
            ActionKind::Raise => Action::raise(state.min_raise(&self.player_id)?),
        };
        Ok(action)
    }

    fn describe(&self) -> String {
        format!("{} made {} random decisions", self.player_id, self.decisions)
    }
}
