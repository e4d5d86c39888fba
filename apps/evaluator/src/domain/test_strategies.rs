// Strategies and table builders for domain tests.

use std::collections::VecDeque;

use crate::domain::{Action, Card, Chips, PlayerInformation, RoundState, Suit};
use crate::strategy::{Strategy, StrategyError};

/// Plays a fixed script, then repeats `fallback`.
pub(crate) struct Scripted {
    script: VecDeque<Action>,
    fallback: Action,
    pub decisions: usize,
    pub views: Vec<RoundState>,
    pub reveals: Vec<RoundState>,
}

impl Scripted {
    pub fn new(script: impl IntoIterator<Item = Action>, fallback: Action) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback,
            decisions: 0,
            views: Vec::new(),
            reveals: Vec::new(),
        }
    }

    pub fn checks() -> Self {
        Self::new([], Action::check())
    }

    pub fn folds() -> Self {
        Self::new([], Action::fold())
    }

    pub fn then(script: impl IntoIterator<Item = Action>) -> Self {
        Self::new(script, Action::fold())
    }
}

impl Strategy for Scripted {
    fn decide(&mut self, state: &RoundState) -> Result<Action, StrategyError> {
        self.decisions += 1;
        self.views.push(state.clone());
        Ok(self
            .script
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone()))
    }

    fn reveal(&mut self, state: &RoundState) -> Result<(), StrategyError> {
        self.reveals.push(state.clone());
        Ok(())
    }
}

/// Panics on every call.
pub(crate) struct Panicker;

impl Strategy for Panicker {
    fn decide(&mut self, _state: &RoundState) -> Result<Action, StrategyError> {
        panic!("strategy bug");
    }

    fn reveal(&mut self, _state: &RoundState) -> Result<(), StrategyError> {
        panic!("reveal bug");
    }
}

/// Returns an error on every call.
pub(crate) struct Failing;

impl Strategy for Failing {
    fn decide(&mut self, _state: &RoundState) -> Result<Action, StrategyError> {
        Err(StrategyError::Internal("cannot decide".into()))
    }

    fn reveal(&mut self, _state: &RoundState) -> Result<(), StrategyError> {
        Err(StrategyError::Internal("cannot reveal".into()))
    }
}

pub(crate) fn card(rank: u8, suit: Suit) -> Card {
    Card::new(rank, suit).unwrap()
}

/// Builds a dealt round directly. Seats are given in acting order; stacks are
/// after the ante has been taken.
pub(crate) fn table(ante: Chips, seats: &[(&str, Card, Chips)]) -> RoundState {
    let players = seats
        .iter()
        .enumerate()
        .map(|(order, (id, card, stack))| PlayerInformation::new(*id, order, *card, *stack))
        .collect();
    RoundState::new(ante, players)
}
