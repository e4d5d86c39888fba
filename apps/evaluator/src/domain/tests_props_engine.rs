//! Property tests for the betting round engine (pure domain).
//!
//! Developer notes:
//! - Increase cases locally with: PROPTEST_CASES=800 cargo test
//! - Random play comes from seeded `RandomStrategy` instances, so every
//!   failing case is reproducible from the shrunk inputs.

use std::collections::HashSet;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::test_prelude;
use crate::domain::test_strategies::{card, table, Scripted};
use crate::domain::{deal, play_round, Action, Chips, Deck, Entrant, RoundState, Suit};
use crate::strategy::{RandomStrategy, Strategy, StrategyError};

/// Random play that keeps every view it was shown.
struct Probe {
    inner: RandomStrategy,
    views: Vec<RoundState>,
}

impl Strategy for Probe {
    fn decide(&mut self, state: &RoundState) -> Result<Action, StrategyError> {
        self.views.push(state.clone());
        self.inner.decide(state)
    }
}

fn rotation(stacks: &[Chips]) -> Vec<(String, Chips)> {
    stacks
        .iter()
        .enumerate()
        .map(|(i, s)| (format!("p{i}"), *s))
        .collect()
}

fn probes(n: usize, seed: u64) -> Vec<Probe> {
    (0..n)
        .map(|i| Probe {
            inner: RandomStrategy::new(format!("p{i}"), Some(seed.wrapping_add(i as u64))),
            views: Vec::new(),
        })
        .collect()
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: chips are conserved and the pot always matches the history.
    #[test]
    fn prop_chip_conservation(
        stacks in prop::collection::vec(1u32..=300, 2..=6),
        ante in 0u32..=20,
        ante_seat_pick in any::<prop::sample::Index>(),
        seed in any::<u64>(),
    ) {
        let ante_seat = ante_seat_pick.index(stacks.len());
        let mut deck = Deck::shuffled(&mut ChaCha8Rng::seed_from_u64(seed));
        let state = deal(&rotation(&stacks), ante_seat, ante, &mut deck).unwrap();
        let before: Chips = stacks.iter().sum();

        let mut players = probes(stacks.len(), seed);
        let mut entrants: Vec<Entrant<'_>> = players
            .iter_mut()
            .enumerate()
            .map(|(i, p)| Entrant::new(format!("p{i}"), p))
            .collect();
        let outcome = play_round(state, &mut entrants).unwrap();

        prop_assert!(outcome.state.pot_is_consistent());
        let after: Chips = outcome.stacks.values().sum();
        prop_assert_eq!(after, before);
        let survivors = outcome.state.players().iter().filter(|p| !p.folded).count();
        prop_assert!(survivors >= 1);
    }

    /// Property: no two seats are ever dealt the same card.
    #[test]
    fn prop_deck_uniqueness(
        n in 2usize..=52,
        seed in any::<u64>(),
    ) {
        let stacks = vec![100; n];
        let mut deck = Deck::shuffled(&mut ChaCha8Rng::seed_from_u64(seed));
        let state = deal(&rotation(&stacks), 0, 5, &mut deck).unwrap();
        let values: HashSet<u64> = state
            .players()
            .iter()
            .map(|p| p.card_value().to_bits())
            .collect();
        prop_assert_eq!(values.len(), n);
    }

    /// Property: for every funded player at every decision point,
    /// 1 <= min_raise <= remaining stack.
    #[test]
    fn prop_raise_bound(
        stacks in prop::collection::vec(1u32..=300, 2..=5),
        seed in any::<u64>(),
    ) {
        let mut deck = Deck::shuffled(&mut ChaCha8Rng::seed_from_u64(seed));
        let state = deal(&rotation(&stacks), 0, 5, &mut deck).unwrap();
        let mut players = probes(stacks.len(), seed);
        {
            let mut entrants: Vec<Entrant<'_>> = players
                .iter_mut()
                .enumerate()
                .map(|(i, p)| Entrant::new(format!("p{i}"), p))
                .collect();
            play_round(state, &mut entrants).unwrap();
        }

        for view in players.iter().flat_map(|p| p.views.iter()) {
            for p in view.players() {
                if p.remaining_stack == 0 {
                    continue;
                }
                let min = view.min_raise(&p.player_id).unwrap();
                prop_assert!(min >= 1);
                prop_assert!(min <= p.remaining_stack);
            }
        }
    }

    /// Property: an over-stack raise or a mismatched call folds the seat and
    /// leaves its stack untouched.
    #[test]
    fn prop_invalid_action_is_fold(
        stack in 10u32..=300,
        over in 1u32..1000,
        as_call in any::<bool>(),
    ) {
        let state = table(
            5,
            &[
                ("bad", card(13, Suit::Spades), stack),
                ("x", card(2, Suit::Clubs), 200),
                ("y", card(3, Suit::Clubs), 195),
            ],
        );
        // Nothing is owed yet, so any call amount is a mismatch.
        let bad = if as_call {
            Action::call(over)
        } else {
            Action::raise(stack + over)
        };

        let mut offender = Scripted::then([bad]);
        let (mut x, mut y) = (Scripted::checks(), Scripted::checks());
        let mut entrants = vec![
            Entrant::new("bad", &mut offender),
            Entrant::new("x", &mut x),
            Entrant::new("y", &mut y),
        ];
        let outcome = play_round(state, &mut entrants).unwrap();

        prop_assert_eq!(&outcome.state.betting_history()[0], &Action::fold().by("bad"));
        prop_assert!(outcome.state.player("bad").map(|p| p.folded).unwrap_or(false));
        prop_assert_eq!(outcome.stacks["bad"], stack);
        prop_assert_eq!(outcome.winner.as_str(), "y");
    }

    /// Property: once everyone but one player has folded, nobody else is asked.
    #[test]
    fn prop_single_survivor_short_circuit(n in 2usize..=8) {
        let seats: Vec<(String, Chips)> = (0..n).map(|i| (format!("p{i}"), 100)).collect();
        let mut deck = Deck::shuffled(&mut ChaCha8Rng::seed_from_u64(n as u64));
        // Ante seat is the last to act.
        let state = deal(&seats, n - 1, 5, &mut deck).unwrap();

        let mut folders: Vec<Scripted> = (0..n - 1).map(|_| Scripted::folds()).collect();
        let mut last = Scripted::checks();
        let mut entrants: Vec<Entrant<'_>> = folders
            .iter_mut()
            .enumerate()
            .map(|(i, s)| Entrant::new(format!("p{i}"), s))
            .collect();
        let last_id = format!("p{}", n - 1);
        entrants.push(Entrant::new(last_id.clone(), &mut last));
        let outcome = play_round(state, &mut entrants).unwrap();
        drop(entrants);

        prop_assert_eq!(last.decisions, 0);
        prop_assert_eq!(outcome.winner, last_id);
        prop_assert!(folders.iter().all(|f| f.decisions == 1));
    }
}
