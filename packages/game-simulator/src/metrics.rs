//! Metrics collection and output for simulated games.

use std::collections::BTreeMap;

use evaluator::{Chips, PlayerId};
use serde::Serialize;

use crate::simulator::GameResult;

/// Complete game metrics for output.
#[derive(Debug, Clone, Serialize)]
pub struct GameMetrics {
    pub game_id: u32,
    pub seed: u64,
    pub timestamp: String,
    pub config: GameConfig,
    pub result: GameResultMetrics,
    pub player_metrics: Vec<PlayerMetrics>,
    /// Stacks before the first round and after every round.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stack_history: Vec<BTreeMap<PlayerId, Chips>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameConfig {
    pub strategies: Vec<String>,
    pub total_games: u32,
    pub ante: Chips,
    pub starting_stack: Chips,
    pub max_rounds: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameResultMetrics {
    pub final_stacks: BTreeMap<PlayerId, Chips>,
    /// Ties list every leader.
    pub leaders: Vec<PlayerId>,
    pub rounds_played: u32,
    pub bust_round: BTreeMap<PlayerId, u32>,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerMetrics {
    pub player_id: PlayerId,
    pub strategy: String,
    pub pnl: i64,
    pub rounds_played: u32,
    pub rounds_won: u32,
    /// Chips won per thousand rounds played.
    pub win_rate: f64,
}

pub struct MetricsContext {
    pub total_games: u32,
    pub ante: Chips,
    pub max_rounds: u32,
    pub with_history: bool,
}

/// Build metrics from a finished game.
pub fn build_game_metrics(
    game_id: u32,
    ctx: &MetricsContext,
    result: &GameResult,
    duration_ms: f64,
) -> GameMetrics {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"));
    let report = &result.report;

    let player_metrics = result
        .lineup
        .iter()
        .map(|(id, strategy)| {
            let pnl = report.pnl(id).unwrap_or_default();
            let rounds_played = report.rounds_for(id);
            PlayerMetrics {
                player_id: id.clone(),
                strategy: strategy.to_string(),
                pnl,
                rounds_played,
                rounds_won: report.rounds.iter().filter(|r| &r.winner == id).count() as u32,
                win_rate: pnl as f64 * 1000.0 / f64::from(rounds_played.max(1)),
            }
        })
        .collect();

    GameMetrics {
        game_id,
        seed: result.seed,
        timestamp,
        config: GameConfig {
            strategies: result.lineup.iter().map(|(_, s)| s.to_string()).collect(),
            total_games: ctx.total_games,
            ante: ctx.ante,
            starting_stack: report.starting_stack,
            max_rounds: ctx.max_rounds,
        },
        result: GameResultMetrics {
            final_stacks: report.final_stacks.clone(),
            leaders: result.leaders().into_iter().map(str::to_string).collect(),
            rounds_played: report.rounds_played,
            bust_round: report.bust_round.clone(),
            duration_ms,
        },
        player_metrics,
        stack_history: if ctx.with_history {
            report.stack_history.clone()
        } else {
            Vec::new()
        },
    }
}

/// CSV summary row: one per player per game.
#[derive(Debug, Serialize)]
pub struct CsvSummaryRow {
    pub game_id: u32,
    pub seed: u64,
    pub player_id: PlayerId,
    pub strategy: String,
    pub final_stack: Chips,
    pub pnl: i64,
    pub rounds_played: u32,
    pub rounds_won: u32,
    pub leader: bool,
}

impl CsvSummaryRow {
    pub fn rows(metrics: &GameMetrics) -> Vec<CsvSummaryRow> {
        metrics
            .player_metrics
            .iter()
            .map(|p| CsvSummaryRow {
                game_id: metrics.game_id,
                seed: metrics.seed,
                player_id: p.player_id.clone(),
                strategy: p.strategy.clone(),
                final_stack: metrics
                    .result
                    .final_stacks
                    .get(&p.player_id)
                    .copied()
                    .unwrap_or_default(),
                pnl: p.pnl,
                rounds_played: p.rounds_played,
                rounds_won: p.rounds_won,
                leader: metrics.result.leaders.contains(&p.player_id),
            })
            .collect()
    }
}
