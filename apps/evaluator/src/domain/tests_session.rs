//! Game session tests: rotation, busts, history and replay.

use proptest::prelude::*;

use crate::domain::test_prelude;
use crate::domain::test_strategies::Scripted;
use crate::domain::{simulate_game, Chips, DomainError, Entrant, GameSession, SessionConfig};
use crate::domain::{Action, RoundState};
use crate::strategy::{CallingStation, CardReader, RandomStrategy, Strategy, StrategyError};

/// Pushes its whole stack in every time.
struct Shover(&'static str);

impl Strategy for Shover {
    fn decide(&mut self, state: &RoundState) -> Result<Action, StrategyError> {
        Ok(state.all_in_action(self.0)?)
    }
}

fn config(ante: Chips, starting_stack: Chips, max_rounds: u32, seed: u64) -> SessionConfig {
    SessionConfig {
        ante,
        starting_stack,
        max_rounds,
        seed: Some(seed),
    }
}

#[test]
fn ante_rotates_through_seating() {
    let (mut a, mut b, mut c) = (Scripted::checks(), Scripted::checks(), Scripted::checks());
    let entrants = vec![
        Entrant::new("a", &mut a),
        Entrant::new("b", &mut b),
        Entrant::new("c", &mut c),
    ];
    let report = simulate_game(&config(5, 200, 7, 11), entrants).unwrap();

    assert_eq!(report.rounds_played, 7);
    for round in &report.rounds {
        let payer = &round.final_state.players().last().unwrap().player_id;
        let expected = &report.seating[(round.number as usize - 1) % 3];
        assert_eq!(payer, expected, "ante payer in round {}", round.number);
        assert_eq!(round.final_state.ante(), 5);
    }
}

#[test]
fn stack_history_and_conservation() {
    let (mut a, mut b, mut c) = (Scripted::checks(), Scripted::checks(), Scripted::checks());
    let entrants = vec![
        Entrant::new("a", &mut a),
        Entrant::new("b", &mut b),
        Entrant::new("c", &mut c),
    ];
    let report = simulate_game(&config(5, 200, 25, 4), entrants).unwrap();

    assert_eq!(report.stack_history.len(), report.rounds_played as usize + 1);
    assert!(report.stack_history[0].values().all(|s| *s == 200));
    for snapshot in &report.stack_history {
        assert_eq!(snapshot.values().sum::<Chips>(), 600);
    }
    let net: i64 = ["a", "b", "c"].iter().filter_map(|id| report.pnl(id)).sum();
    assert_eq!(net, 0);
}

#[test]
fn busted_players_leave_the_rotation() {
    let (mut a, mut b, mut c) = (Scripted::checks(), Scripted::checks(), Scripted::checks());
    let entrants = vec![
        Entrant::new("a", &mut a),
        Entrant::new("b", &mut b),
        Entrant::new("c", &mut c),
    ];
    // One ante wipes out a stack.
    let report = simulate_game(&config(5, 5, 500, 21), entrants).unwrap();

    assert!(report.final_stacks.values().filter(|s| **s > 0).count() < 2 || report.rounds_played == 500);
    for (id, round) in &report.bust_round {
        assert_eq!(report.final_stack(id), Some(0));
        assert_eq!(report.rounds_for(id), *round);
        assert_eq!(report.stack_history[*round as usize][id], 0);
        assert!(report.stack_history[*round as usize - 1][id] > 0);
        for later in &report.rounds[*round as usize..] {
            assert!(later.final_state.player(id).is_none(), "{id} dealt after busting");
        }
    }
    let total: Chips = report.final_stacks.values().sum();
    assert_eq!(total, 15);
}

#[test]
fn unbusted_players_count_every_round() {
    let (mut a, mut b, mut c) = (Scripted::checks(), Scripted::checks(), Scripted::checks());
    let entrants = vec![
        Entrant::new("a", &mut a),
        Entrant::new("b", &mut b),
        Entrant::new("c", &mut c),
    ];
    let report = simulate_game(&config(1, 200, 10, 8), entrants).unwrap();
    assert!(report.bust_round.is_empty());
    for id in ["a", "b", "c"] {
        assert_eq!(report.rounds_for(id), 10);
    }
}

#[test]
fn session_steps_round_by_round() {
    let (mut a, mut b) = (Scripted::checks(), Scripted::checks());
    let entrants = vec![Entrant::new("a", &mut a), Entrant::new("b", &mut b)];
    let mut session = GameSession::new(config(5, 200, 2, 1), entrants).unwrap();

    assert_eq!(session.funded().len(), 2);
    let first = session.play_next_round().unwrap().map(|r| r.number);
    assert_eq!(first, Some(1));
    assert_eq!(session.rounds_played(), 1);
    assert_eq!(session.stacks().values().sum::<Chips>(), 400);
    assert!(session.play_next_round().unwrap().is_some());
    assert!(session.is_over());
    assert!(session.play_next_round().unwrap().is_none());
}

#[test]
fn seeded_sessions_are_reproducible() {
    let play = || {
        let mut r = RandomStrategy::new("r", Some(3));
        let mut s = CallingStation::new("s");
        let mut c = CardReader::new("c");
        let entrants = vec![
            Entrant::new("r", &mut r),
            Entrant::new("s", &mut s),
            Entrant::new("c", &mut c),
        ];
        simulate_game(&config(5, 200, 50, 99), entrants).unwrap()
    };
    let first = play();
    let second = play();
    assert_eq!(first.seating, second.seating);
    assert_eq!(first.final_stacks, second.final_stacks);
    assert_eq!(first.stack_history, second.stack_history);
}

#[test]
fn replay_renders_every_round() {
    let (mut a, mut b) = (Scripted::checks(), Scripted::checks());
    let entrants = vec![Entrant::new("a", &mut a), Entrant::new("b", &mut b)];
    let report = simulate_game(&config(5, 200, 3, 5), entrants).unwrap();

    let text = report.replay();
    assert!(text.contains("--- Round 1 ---"));
    assert!(text.contains("--- Round 3 ---"));
    assert!(text.contains("checks."));
    assert!(report.round(2).unwrap().replay().starts_with("--- Round 2 ---"));
    assert!(report.round(0).is_none());
    assert!(report.round(4).is_none());
}

#[test]
fn construction_errors() {
    let mut a = Scripted::checks();
    let one = vec![Entrant::new("a", &mut a)];
    assert_eq!(
        GameSession::new(SessionConfig::default(), one).err(),
        Some(DomainError::TooFewPlayers { needed: 2, found: 1 })
    );

    let (mut a, mut b) = (Scripted::checks(), Scripted::checks());
    let dup = vec![Entrant::new("a", &mut a), Entrant::new("a", &mut b)];
    assert_eq!(
        GameSession::new(SessionConfig::default(), dup).err(),
        Some(DomainError::DuplicatePlayer("a".into()))
    );

    let (mut a, mut b) = (Scripted::checks(), Scripted::checks());
    let broke = vec![Entrant::new("a", &mut a), Entrant::new("b", &mut b)];
    let cfg = SessionConfig {
        starting_stack: 0,
        ..SessionConfig::default()
    };
    assert!(matches!(
        GameSession::new(cfg, broke).err(),
        Some(DomainError::InvalidConfig(_))
    ));
}

#[test]
fn stacks_that_overflow_the_table_are_rejected() {
    let (mut a, mut b, mut c) = (Scripted::checks(), Scripted::checks(), Scripted::checks());
    let entrants = vec![
        Entrant::new("a", &mut a),
        Entrant::new("b", &mut b),
        Entrant::new("c", &mut c),
    ];
    assert!(matches!(
        GameSession::new(config(5, 2_000_000_000, 10, 1), entrants).err(),
        Some(DomainError::InvalidConfig(_))
    ));
}

#[test]
fn full_table_all_in_conserves_chips() {
    let stack = Chips::MAX / 3;
    let mut shover = Shover("a");
    let (mut b, mut c) = (CallingStation::new("b"), CallingStation::new("c"));
    let entrants = vec![
        Entrant::new("a", &mut shover),
        Entrant::new("b", &mut b),
        Entrant::new("c", &mut c),
    ];
    let report = simulate_game(&config(5, stack, 5, 2), entrants).unwrap();

    assert!(report.rounds_played >= 1);
    for snapshot in &report.stack_history {
        assert_eq!(snapshot.values().sum::<Chips>(), Chips::MAX);
    }
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: over any number of games for one trio, pnl sums to zero.
    #[test]
    fn prop_tournament_zero_sum(
        games in 1usize..=4,
        seed in any::<u64>(),
        ante in 1u32..=10,
    ) {
        let mut r = RandomStrategy::new("random", Some(seed));
        let mut s = CallingStation::new("station");
        let mut c = CardReader::new("reader");
        let mut total = 0i64;
        for game in 0..games {
            let entrants = vec![
                Entrant::new("random", &mut r),
                Entrant::new("station", &mut s),
                Entrant::new("reader", &mut c),
            ];
            let cfg = config(ante, 100, 60, seed.wrapping_add(game as u64));
            let report = simulate_game(&cfg, entrants).unwrap();
            total += ["random", "station", "reader"]
                .iter()
                .filter_map(|id| report.pnl(id))
                .sum::<i64>();
        }
        prop_assert_eq!(total, 0);
    }
}
