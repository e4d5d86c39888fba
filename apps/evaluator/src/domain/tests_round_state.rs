//! RoundState query tests (pure domain, no strategies involved).

use crate::domain::test_strategies::{card, table};
use crate::domain::{Action, ActionKind, DomainError, RoundState, Suit};

/// a raises 10, then b raises 30 (20 over the call).
fn raised_twice() -> RoundState {
    let mut state = table(
        5,
        &[
            ("a", card(4, Suit::Clubs), 100),
            ("b", card(9, Suit::Hearts), 100),
            ("c", card(12, Suit::Spades), 95),
            ("d", card(2, Suit::Diamonds), 15),
        ],
    );
    state.raise_at(0, 10);
    state.record(Action::raise(10).by("a"));
    state.raise_at(1, 30);
    state.record(Action::raise(30).by("b"));
    state
}

#[test]
fn fresh_round_everyone_can_check() {
    let state = table(
        5,
        &[
            ("a", card(4, Suit::Clubs), 100),
            ("b", card(9, Suit::Hearts), 95),
        ],
    );
    assert_eq!(state.pot(), 5);
    assert_eq!(state.current_bet_total(), 0);
    for id in ["a", "b"] {
        assert_eq!(state.money_in(id), Ok(0));
        assert_eq!(state.can_check(id), Ok(true));
        assert_eq!(state.to_call(id), Ok(0));
        assert_eq!(state.min_raise(id), Ok(1));
    }
}

#[test]
fn queries_track_raises() {
    let state = raised_twice();
    assert_eq!(state.pot(), 45);
    assert_eq!(state.current_bet_total(), 30);
    assert_eq!(state.last_raise_delta(), 20);
    assert!(state.pot_is_consistent());

    assert_eq!(state.money_in("a"), Ok(10));
    assert_eq!(state.to_call("a"), Ok(20));
    assert_eq!(state.min_raise("a"), Ok(40));
    assert_eq!(state.can_check("a"), Ok(false));

    assert_eq!(state.to_call("c"), Ok(30));
    assert_eq!(state.min_raise("c"), Ok(50));

    assert_eq!(state.can_check("b"), Ok(true));
    assert_eq!(state.to_call("b"), Ok(0));
}

#[test]
fn short_stack_calls_and_raises_all_in() {
    let state = raised_twice();
    assert_eq!(state.to_call("d"), Ok(15));
    assert_eq!(state.min_raise("d"), Ok(15));
    assert_eq!(state.all_in_action("d"), Ok(Action::call(15)));
    assert_eq!(state.all_in_action("c"), Ok(Action::raise(95)));
}

#[test]
fn convenience_actions() {
    let state = raised_twice();
    assert_eq!(state.check_fold("c").map(|a| a.kind()), Ok(ActionKind::Fold));
    assert_eq!(state.check_call("c"), Ok(Action::call(30)));
    assert_eq!(state.check_fold("b").map(|a| a.kind()), Ok(ActionKind::Check));
    assert_eq!(state.check_call("b"), Ok(Action::check()));
}

#[test]
fn broke_seat_facing_a_bet_folds() {
    let mut state = table(
        5,
        &[
            ("a", card(4, Suit::Clubs), 100),
            ("b", card(9, Suit::Hearts), 0),
        ],
    );
    assert_eq!(state.check_call("b"), Ok(Action::check()));
    state.raise_at(0, 10);
    state.record(Action::raise(10).by("a"));
    assert_eq!(state.check_call("b").map(|a| a.kind()), Ok(ActionKind::Fold));
    assert_eq!(state.all_in_action("b").map(|a| a.kind()), Ok(ActionKind::Fold));
}

#[test]
fn unknown_player_is_an_error() {
    let state = raised_twice();
    let unknown = Err(DomainError::UnknownPlayer("zed".into()));
    assert_eq!(state.money_in("zed"), unknown);
    assert!(state.min_raise("zed").is_err());
    assert!(state.is_all_in("zed").is_err());
    assert!(state.player("zed").is_none());
}

#[test]
fn hidden_view_hides_only_own_card() {
    let state = raised_twice();
    let view = state.hidden_for("b");
    assert_eq!(view.player("b").and_then(|p| p.card), None);
    assert_eq!(view.player("b").map(|p| p.card_value()), Some(-1.0));
    for other in view.opponents("b") {
        assert!(other.card.is_some(), "{} should stay visible", other.player_id);
    }
    assert_eq!(view.opponents("b").count(), 3);
    assert!(state.player("b").and_then(|p| p.card).is_some());
}

#[test]
fn winner_ignores_folded_players() {
    let mut state = raised_twice();
    assert_eq!(state.winner().map(|p| p.player_id.as_str()), Some("c"));
    state.fold_at(2);
    assert_eq!(state.winner().map(|p| p.player_id.as_str()), Some("b"));
    assert_eq!(state.active_count(), 3);
}

#[test]
fn all_in_detection() {
    let mut state = raised_twice();
    assert_eq!(state.is_all_in("d"), Ok(false));
    state.commit_at(3, 15);
    state.record(Action::call(15).by("d"));
    assert_eq!(state.is_all_in("d"), Ok(true));
    assert!(state.pot_is_consistent());
}

#[test]
fn short_all_in_raise_keeps_bet_total() {
    let mut state = raised_twice();
    state.raise_at(3, 15);
    state.record(Action::raise(15).by("d"));
    assert_eq!(state.current_bet_total(), 30);
    assert_eq!(state.last_raise_delta(), 0);
}
