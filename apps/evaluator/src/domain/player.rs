use serde::{Deserialize, Serialize};

use super::cards::Card;
use super::{Chips, PlayerId};

/// What the engine knows about one seated player during a round.
///
/// `card` is `None` only in the copy handed to the card's owner; every other
/// view, including the final state passed to `reveal`, carries all cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInformation {
    pub player_id: PlayerId,
    /// 0-indexed position in this round's acting order.
    pub order: usize,
    pub card: Option<Card>,
    pub remaining_stack: Chips,
    pub folded: bool,
}

impl PlayerInformation {
    pub fn new(player_id: impl Into<PlayerId>, order: usize, card: Card, stack: Chips) -> Self {
        Self {
            player_id: player_id.into(),
            order,
            card: Some(card),
            remaining_stack: stack,
            folded: false,
        }
    }

    /// Encoded card value, or -1.0 for a hidden card.
    pub fn card_value(&self) -> f64 {
        self.card.map_or(-1.0, Card::value)
    }
}
