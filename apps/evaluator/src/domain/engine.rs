//! Betting round engine.
//!
//! `deal` builds a fresh [`RoundState`] for one hand and `play_round` drives
//! it to resolution against a fixed set of seated strategies. Strategy
//! misbehaviour of any kind (an `Err`, a panic, an illegal action) folds the
//! offending seat; nothing a strategy does can abort the round.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, warn};

use super::action::{Action, ActionKind};
use super::cards::Deck;
use super::errors::DomainError;
use super::player::PlayerInformation;
use super::round_state::RoundState;
use super::transcript::Transcript;
use super::{Chips, PlayerId};
use crate::strategy::{guard, Strategy};

/// A strategy seated for one round under the id it plays as.
pub struct Entrant<'a> {
    pub player_id: PlayerId,
    pub strategy: &'a mut dyn Strategy,
}

impl<'a> Entrant<'a> {
    pub fn new(player_id: impl Into<PlayerId>, strategy: &'a mut dyn Strategy) -> Self {
        Self {
            player_id: player_id.into(),
            strategy,
        }
    }
}

/// Result of a resolved round.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    /// Final state with every card visible.
    pub state: RoundState,
    pub winner: PlayerId,
    /// Stack of every seated player after the pot was paid out.
    pub stacks: BTreeMap<PlayerId, Chips>,
    pub transcript: Transcript,
}

/// Why a returned action was converted into a fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    CannotCheck,
    EmptyCall,
    CallMismatch { expected: Chips, got: Chips },
    CallOverStack { stack: Chips, got: Chips },
    RaiseBelowMinimum { minimum: Chips, got: Chips },
    RaiseOverStack { stack: Chips, got: Chips },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::CannotCheck => f.write_str("checking while facing a bet"),
            Rejection::EmptyCall => f.write_str("calling for zero chips"),
            Rejection::CallMismatch { expected, got } => {
                write!(f, "calling {got} when {expected} was owed")
            }
            Rejection::CallOverStack { stack, got } => {
                write!(f, "calling {got} with only {stack} behind")
            }
            Rejection::RaiseBelowMinimum { minimum, got } => {
                write!(f, "raising {got} below the minimum of {minimum}")
            }
            Rejection::RaiseOverStack { stack, got } => {
                write!(f, "raising {got} with only {stack} behind")
            }
        }
    }
}

/// Chips on a table of `players` seats holding `stack` each, or `None` when
/// that does not fit in [`Chips`]. Pot and stack arithmetic cannot overflow
/// while the table total fits.
pub fn table_total(players: usize, stack: Chips) -> Option<Chips> {
    Chips::try_from(players).ok()?.checked_mul(stack)
}

/// Deals one hand.
///
/// `rotation` lists the funded players with their current stacks. The seat at
/// `ante_seat` pays `min(ante, stack)` and acts last; action starts with the
/// seat after it and wraps around.
pub fn deal(
    rotation: &[(PlayerId, Chips)],
    ante_seat: usize,
    ante: Chips,
    deck: &mut Deck,
) -> Result<RoundState, DomainError> {
    let n = rotation.len();
    if n < 2 {
        return Err(DomainError::TooFewPlayers {
            needed: 2,
            found: n,
        });
    }
    if ante_seat >= n {
        return Err(DomainError::InvalidConfig(format!(
            "ante seat {ante_seat} out of range for {n} players"
        )));
    }
    if rotation
        .iter()
        .try_fold(0, |total: Chips, (_, stack)| total.checked_add(*stack))
        .is_none()
    {
        return Err(DomainError::InvalidConfig(
            "table stacks overflow the chip type".into(),
        ));
    }

    let mut paid = 0;
    let mut players = Vec::with_capacity(n);
    for order in 0..n {
        let idx = (ante_seat + 1 + order) % n;
        let (player_id, mut stack) = rotation[idx].clone();
        if idx == ante_seat {
            paid = ante.min(stack);
            stack -= paid;
        }
        let card = deck
            .draw()
            .ok_or_else(|| DomainError::InvalidConfig("deck exhausted".into()))?;
        players.push(PlayerInformation::new(player_id, order, card, stack));
    }
    Ok(RoundState::new(paid, players))
}

/// Checks `action` against what the seat may legally do right now.
pub fn validate(state: &RoundState, seat: usize, action: &Action) -> Result<(), Rejection> {
    let stack = state.seat(seat).remaining_stack;
    let got = action.delta();
    match action.kind() {
        ActionKind::Fold => Ok(()),
        ActionKind::Check if state.can_check_at(seat) => Ok(()),
        ActionKind::Check => Err(Rejection::CannotCheck),
        ActionKind::Call => {
            let expected = state.to_call_at(seat);
            if got == 0 {
                Err(Rejection::EmptyCall)
            } else if got != expected {
                Err(Rejection::CallMismatch { expected, got })
            } else if got > stack {
                Err(Rejection::CallOverStack { stack, got })
            } else {
                Ok(())
            }
        }
        ActionKind::Raise => {
            let minimum = state.min_raise_at(seat);
            if got < minimum {
                Err(Rejection::RaiseBelowMinimum { minimum, got })
            } else if got > stack {
                Err(Rejection::RaiseOverStack { stack, got })
            } else {
                Ok(())
            }
        }
    }
}

/// Plays a dealt hand to completion and pays out the pot.
///
/// Every entrant gets `reveal` with the final state afterwards, whether or not
/// it was still in the hand.
pub fn play_round(
    mut state: RoundState,
    entrants: &mut [Entrant<'_>],
) -> Result<RoundOutcome, DomainError> {
    let n = state.players().len();
    if n < 2 {
        return Err(DomainError::TooFewPlayers {
            needed: 2,
            found: n,
        });
    }

    let mut transcript = Transcript::new();
    for p in state.players() {
        if let Some(card) = p.card {
            transcript.line(format!("{} was dealt {card}.", p.player_id));
        }
    }
    transcript.line(format!("The pot starts at {}.", state.pot()));

    let mut cursor = 0;
    let mut last_was_raise = false;
    loop {
        let needed = state
            .active_count()
            .saturating_sub(usize::from(last_was_raise));
        let mut settled = 0;
        last_was_raise = false;

        while settled < needed {
            if state.active_count() == 1 {
                settled = needed;
                break;
            }
            while state.seat(cursor).folded {
                cursor = (cursor + 1) % n;
            }
            let seat = cursor;
            cursor = (cursor + 1) % n;

            if take_turn(&mut state, seat, entrants, &mut transcript) {
                last_was_raise = true;
                break;
            }
            settled += 1;
        }

        if settled == needed {
            break;
        }
    }

    resolve(state, entrants, transcript)
}

/// Solicits, validates and applies one decision. Returns true for a raise.
fn take_turn(
    state: &mut RoundState,
    seat: usize,
    entrants: &mut [Entrant<'_>],
    transcript: &mut Transcript,
) -> bool {
    let player_id = state.seat(seat).player_id.clone();
    let view = state.hidden_for(&player_id);

    let decision = match entrants.iter_mut().find(|e| e.player_id == player_id) {
        Some(entrant) => guard::decide(&mut *entrant.strategy, &view),
        None => Err(crate::strategy::StrategyError::Internal(
            "no strategy seated".into(),
        )),
    };
    let action = match decision {
        Ok(action) => action,
        Err(err) => {
            warn!(player_id = %player_id, seat, phase = "decide", error = %err, "Strategy fault; folding seat");
            transcript.line(format!("{player_id} raised an error ({err}) and folds."));
            state.fold_at(seat);
            state.record(Action::fold().by(&player_id));
            return false;
        }
    };

    if let Err(rejection) = validate(state, seat, &action) {
        debug!(player_id = %player_id, seat, kind = %action.kind(), delta = action.delta(), reason = %rejection, "Rejected action");
        transcript.line(format!("{player_id} folds for {rejection}."));
        state.fold_at(seat);
        state.record(Action::fold().by(&player_id));
        return false;
    }

    let delta = action.delta();
    let raised = match action.kind() {
        ActionKind::Fold => {
            state.fold_at(seat);
            transcript.line(format!("{player_id} folds."));
            false
        }
        ActionKind::Check => {
            transcript.line(format!("{player_id} checks."));
            false
        }
        ActionKind::Call => {
            state.commit_at(seat, delta);
            transcript.line(format!("{player_id} calls {delta}."));
            false
        }
        ActionKind::Raise => {
            let call = state.to_call_at(seat);
            state.raise_at(seat, delta);
            transcript.line(format!(
                "{player_id} raises {} (calling {call}) for a total bet of {}.",
                delta.saturating_sub(call),
                state.current_bet_total()
            ));
            true
        }
    };
    debug!(player_id = %player_id, seat, kind = %action.kind(), delta, pot = state.pot(), "Applied action");
    state.record(action.by(&player_id));
    raised
}

fn resolve(
    state: RoundState,
    entrants: &mut [Entrant<'_>],
    mut transcript: Transcript,
) -> Result<RoundOutcome, DomainError> {
    let winner = state
        .winner()
        .map(|p| p.player_id.clone())
        .ok_or(DomainError::TooFewPlayers {
            needed: 1,
            found: 0,
        })?;

    if state.active_count() == 1 {
        transcript.line(format!("{winner} wins the pot of {} uncontested.", state.pot()));
    } else {
        transcript.line(format!(
            "{winner} wins the pot of {} with the highest card.",
            state.pot()
        ));
    }

    let mut stacks = BTreeMap::new();
    for p in state.players() {
        let mut stack = p.remaining_stack;
        if p.player_id == winner {
            stack += state.pot();
        }
        transcript.line(format!("{} now has {stack}.", p.player_id));
        stacks.insert(p.player_id.clone(), stack);
    }

    for entrant in entrants.iter_mut() {
        if let Err(err) = guard::reveal(&mut *entrant.strategy, &state) {
            warn!(player_id = %entrant.player_id, phase = "reveal", error = %err, "Strategy fault ignored");
            transcript.line(format!("{} failed to take the reveal: {err}", entrant.player_id));
        }
    }

    Ok(RoundOutcome {
        state,
        winner,
        stacks,
        transcript,
    })
}
