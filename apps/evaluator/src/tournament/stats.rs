//! Running tournament statistics.

use std::collections::BTreeMap;

use serde::Serialize;

use super::trio::Trio;
use crate::domain::{GameReport, PlayerId};

/// Accumulated result for one player within one scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub pnl: i64,
    pub rounds: u64,
}

impl Tally {
    pub fn add(&mut self, pnl: i64, rounds: u64) {
        self.pnl += pnl;
        self.rounds += rounds;
    }

    /// Chips won per thousand rounds played.
    pub fn win_rate(&self) -> f64 {
        self.pnl as f64 * 1000.0 / self.rounds.max(1) as f64
    }
}

/// Statistics for one scope: the whole tournament or a single trio.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScopeStats {
    pub games_played: u64,
    pub tallies: BTreeMap<PlayerId, Tally>,
}

impl ScopeStats {
    fn fold_game(&mut self, report: &GameReport) {
        self.games_played += 1;
        for player_id in report.final_stacks.keys() {
            let pnl = report.pnl(player_id).unwrap_or_default();
            let rounds = u64::from(report.rounds_for(player_id));
            self.tallies
                .entry(player_id.clone())
                .or_default()
                .add(pnl, rounds);
        }
    }

    pub fn tally(&self, player_id: &str) -> Tally {
        self.tallies.get(player_id).copied().unwrap_or_default()
    }

    pub fn win_rates(&self) -> BTreeMap<PlayerId, f64> {
        self.tallies
            .iter()
            .map(|(id, t)| (id.clone(), t.win_rate()))
            .collect()
    }

    pub fn rounds(&self) -> BTreeMap<PlayerId, u64> {
        self.tallies
            .iter()
            .map(|(id, t)| (id.clone(), t.rounds))
            .collect()
    }

    /// Sum of every player's pnl. Zero whenever only whole games were folded in.
    pub fn net_pnl(&self) -> i64 {
        self.tallies.values().map(|t| t.pnl).sum()
    }
}

/// Global and per-trio statistics since the last reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Standings {
    /// Roster generation these numbers belong to.
    pub generation: u64,
    /// Number of snapshot emissions so far.
    pub evaluations: u64,
    pub global: ScopeStats,
    pub per_trio: BTreeMap<Trio, ScopeStats>,
}

impl Standings {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            ..Self::default()
        }
    }

    /// Fresh standings listing every loaded strategy at zero.
    pub fn seeded(generation: u64, player_ids: &[PlayerId]) -> Self {
        let mut standings = Self::new(generation);
        for id in player_ids {
            standings.global.tallies.insert(id.clone(), Tally::default());
        }
        standings
    }

    pub fn record_game(&mut self, trio: &Trio, report: &GameReport) {
        self.global.fold_game(report);
        self.per_trio
            .entry(trio.clone())
            .or_default()
            .fold_game(report);
    }

    pub fn trio(&self, trio: &Trio) -> Option<&ScopeStats> {
        self.per_trio.get(trio)
    }

    pub fn games_played(&self) -> u64 {
        self.global.games_played
    }
}
