//! Card reader - bets on the chance that its hidden card beats the table.
//!
//! Every card except its own is visible, so the odds are exact: of the cards
//! it cannot see, count the ones higher than the best card still in the
//! hand. Folded opponents' cards are visible too and are excluded from the
//! unseen pool.

use super::trait_def::{Strategy, StrategyError};
use crate::domain::cards::full_deck;
use crate::domain::{Action, Card, PlayerId, RoundState};

pub struct CardReader {
    player_id: PlayerId,
    /// Win probability at or above which it raises.
    raise_at: f64,
    /// Win probability at or above which it stays in the hand.
    call_at: f64,
    rounds_seen: u64,
    rounds_won: u64,
}

impl CardReader {
    pub const NAME: &'static str = "CardReader";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new(player_id: impl Into<PlayerId>) -> Self {
        Self::with_thresholds(player_id, 0.75, 0.4)
    }

    pub fn with_thresholds(player_id: impl Into<PlayerId>, raise_at: f64, call_at: f64) -> Self {
        Self {
            player_id: player_id.into(),
            raise_at,
            call_at,
            rounds_seen: 0,
            rounds_won: 0,
        }
    }

    /// Probability that the hidden card beats every live opponent.
    pub fn win_probability(&self, state: &RoundState) -> f64 {
        let visible: Vec<Card> = state
            .opponents(&self.player_id)
            .filter_map(|p| p.card)
            .collect();
        let best_live = state
            .opponents(&self.player_id)
            .filter(|p| !p.folded)
            .filter_map(|p| p.card)
            .max();

        let unseen: Vec<Card> = full_deck()
            .into_iter()
            .filter(|c| !visible.contains(c))
            .collect();
        if unseen.is_empty() {
            return 0.0;
        }
        let winners = match best_live {
            Some(best) => unseen.iter().filter(|c| **c > best).count(),
            None => unseen.len(),
        };
        winners as f64 / unseen.len() as f64
    }
}

impl Strategy for CardReader {
    fn decide(&mut self, state: &RoundState) -> Result<Action, StrategyError> {
        let odds = self.win_probability(state);
        if odds >= self.raise_at {
            let min_raise = state.min_raise(&self.player_id)?;
            let stack = state
                .player(&self.player_id)
                .map(|p| p.remaining_stack)
                .unwrap_or_default();
            if stack == 0 {
                return Ok(state.check_fold(&self.player_id)?);
            }
            // Near-certain winners shove.
            if odds >= 0.95 {
                return Ok(state.all_in_action(&self.player_id)?);
            }
            return Ok(Action::raise(min_raise));
        }
        if odds >= self.call_at {
            return Ok(state.check_call(&self.player_id)?);
        }
        Ok(state.check_fold(&self.player_id)?)
    }

    fn reveal(&mut self, state: &RoundState) -> Result<(), StrategyError> {
        self.rounds_seen += 1;
        if state.winner().is_some_and(|w| w.player_id == self.player_id) {
            self.rounds_won += 1;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "{} raise_at={} call_at={} won {}/{} rounds",
            self.player_id, self.raise_at, self.call_at, self.rounds_won, self.rounds_seen
        )
    }
}
