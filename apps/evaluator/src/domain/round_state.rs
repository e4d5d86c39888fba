//! Authoritative state of a single hand.
//!
//! A `RoundState` is created fresh when cards are dealt and thrown away once
//! its outcome has been folded back into the session's stacks. Strategies
//! only ever see a clone of it (with their own card hidden) and use the
//! query methods here to size legal actions.

use serde::{Deserialize, Serialize};

use super::action::{Action, ActionKind};
use super::errors::DomainError;
use super::player::PlayerInformation;
use super::{Chips, PlayerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pot: Chips,
    ante: Chips,
    current_bet_total: Chips,
    last_raise_delta: Chips,
    betting_history: Vec<Action>,
    /// Seating order for this round; the first entry acts first.
    players: Vec<PlayerInformation>,
}

impl RoundState {
    /// `ante` is the amount already taken from the ante payer's stack; it
    /// seeds the pot but is not part of anybody's betting history.
    pub fn new(ante: Chips, players: Vec<PlayerInformation>) -> Self {
        Self {
            pot: ante,
            ante,
            current_bet_total: 0,
            last_raise_delta: 0,
            betting_history: Vec::new(),
            players,
        }
    }

    pub fn pot(&self) -> Chips {
        self.pot
    }

    pub fn ante(&self) -> Chips {
        self.ante
    }

    pub fn current_bet_total(&self) -> Chips {
        self.current_bet_total
    }

    pub fn last_raise_delta(&self) -> Chips {
        self.last_raise_delta
    }

    pub fn betting_history(&self) -> &[Action] {
        &self.betting_history
    }

    pub fn players(&self) -> &[PlayerInformation] {
        &self.players
    }

    pub fn player(&self, player_id: &str) -> Option<&PlayerInformation> {
        self.players.iter().find(|p| p.player_id == player_id)
    }

    /// Everyone at the table except `player_id`, in seating order.
    pub fn opponents<'a>(
        &'a self,
        player_id: &'a str,
    ) -> impl Iterator<Item = &'a PlayerInformation> + 'a {
        self.players.iter().filter(move |p| p.player_id != player_id)
    }

    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| !p.folded).count()
    }

    /// Total chips `player_id` has put in during this round.
    pub fn money_in(&self, player_id: &str) -> Result<Chips, DomainError> {
        self.seat_of(player_id).map(|seat| self.money_in_at(seat))
    }

    pub fn can_check(&self, player_id: &str) -> Result<bool, DomainError> {
        self.seat_of(player_id).map(|seat| self.can_check_at(seat))
    }

    /// Exact delta a call must carry. Capped by the stack, so a short stack
    /// calls all-in for less.
    pub fn to_call(&self, player_id: &str) -> Result<Chips, DomainError> {
        self.seat_of(player_id).map(|seat| self.to_call_at(seat))
    }

    /// Smallest legal raise delta, call portion included.
    ///
    /// A raise must add at least the previous raise increment (or 1 when
    /// nobody has raised yet). Going all-in is exempt from that floor.
    pub fn min_raise(&self, player_id: &str) -> Result<Chips, DomainError> {
        self.seat_of(player_id).map(|seat| self.min_raise_at(seat))
    }

    pub fn is_all_in(&self, player_id: &str) -> Result<bool, DomainError> {
        self.seat_of(player_id)
            .map(|seat| self.players[seat].remaining_stack == 0)
    }

    /// Shove the whole stack: a raise when the stack covers more than the
    /// call, otherwise a (possibly short) call. An empty stack checks or folds.
    pub fn all_in_action(&self, player_id: &str) -> Result<Action, DomainError> {
        let seat = self.seat_of(player_id)?;
        let stack = self.players[seat].remaining_stack;
        if stack == 0 {
            self.check_fold(player_id)
        } else if stack > self.to_call_at(seat) {
            Ok(Action::raise(stack))
        } else {
            Ok(Action::call(stack))
        }
    }

    pub fn check_fold(&self, player_id: &str) -> Result<Action, DomainError> {
        if self.can_check(player_id)? {
            Ok(Action::check())
        } else {
            Ok(Action::fold())
        }
    }

    /// Check when possible, otherwise call. A broke seat facing a bet folds.
    pub fn check_call(&self, player_id: &str) -> Result<Action, DomainError> {
        let seat = self.seat_of(player_id)?;
        if self.can_check_at(seat) {
            return Ok(Action::check());
        }
        match self.to_call_at(seat) {
            0 => Ok(Action::fold()),
            owed => Ok(Action::call(owed)),
        }
    }

    /// Highest card among players still in the hand.
    pub fn winner(&self) -> Option<&PlayerInformation> {
        self.players
            .iter()
            .filter(|p| !p.folded)
            .max_by_key(|p| p.card)
    }

    /// The pot must always equal the ante plus every recorded delta.
    pub fn pot_is_consistent(&self) -> bool {
        let bets: Chips = self.betting_history.iter().map(Action::delta).sum();
        self.pot == self.ante + bets
    }

    /// Copy of this state with exactly `player_id`'s own card hidden.
    pub fn hidden_for(&self, player_id: &str) -> RoundState {
        let mut view = self.clone();
        if let Some(p) = view.players.iter_mut().find(|p| p.player_id == player_id) {
            p.card = None;
        }
        view
    }

    // ---------------------------------------------------------------------
    // Seat-indexed primitives used by the engine
    // ---------------------------------------------------------------------

    fn seat_of(&self, player_id: &str) -> Result<usize, DomainError> {
        self.players
            .iter()
            .position(|p| p.player_id == player_id)
            .ok_or_else(|| DomainError::UnknownPlayer(PlayerId::from(player_id)))
    }

    pub(crate) fn seat(&self, seat: usize) -> &PlayerInformation {
        &self.players[seat]
    }

    pub(crate) fn money_in_at(&self, seat: usize) -> Chips {
        let id = self.players[seat].player_id.as_str();
        self.betting_history
            .iter()
            .filter(|a| a.actor() == id)
            .map(Action::delta)
            .sum()
    }

    pub(crate) fn can_check_at(&self, seat: usize) -> bool {
        self.money_in_at(seat) == self.current_bet_total
    }

    pub(crate) fn to_call_at(&self, seat: usize) -> Chips {
        let owed = self
            .current_bet_total
            .saturating_sub(self.money_in_at(seat));
        self.players[seat].remaining_stack.min(owed)
    }

    pub(crate) fn min_raise_at(&self, seat: usize) -> Chips {
        let stack = self.players[seat].remaining_stack;
        self.last_raise_delta
            .saturating_add(self.to_call_at(seat))
            .min(stack)
            .max(1)
    }

    pub(crate) fn fold_at(&mut self, seat: usize) {
        self.players[seat].folded = true;
    }

    /// Moves `delta` from the seat's stack into the pot.
    pub(crate) fn commit_at(&mut self, seat: usize, delta: Chips) {
        let player = &mut self.players[seat];
        player.remaining_stack -= delta;
        self.pot += delta;
    }

    /// Applies a validated raise. The bet total never moves backwards: a
    /// short all-in "raise" for less than the call leaves it where it was.
    pub(crate) fn raise_at(&mut self, seat: usize, delta: Chips) {
        let before = self.money_in_at(seat);
        let call = self.to_call_at(seat);
        self.last_raise_delta = delta.saturating_sub(call);
        self.current_bet_total = self.current_bet_total.max(before + delta);
        self.commit_at(seat, delta);
    }

    pub(crate) fn record(&mut self, action: Action) {
        debug_assert!(
            action.kind() != ActionKind::Fold || action.delta() == 0,
            "folds never carry chips"
        );
        self.betting_history.push(action);
    }
}
