//! Runs standalone game sessions outside the evaluator.
//!
//! Every seat gets its own strategy instance per game, built from the
//! evaluator's static factory table. Seeds are derived from the game seed so
//! a whole run replays exactly from one `--seed`.

use evaluator::domain::{simulate_game, Entrant, GameReport, SessionConfig};
use evaluator::strategy::by_name;
use evaluator::{Chips, DomainError, PlayerId, Strategy};

use crate::types::StrategyKind;

/// Result of simulating a complete game.
#[derive(Debug, Clone)]
pub struct GameResult {
    pub seed: u64,
    /// Strategy name per player id, in command-line order.
    pub lineup: Vec<(PlayerId, &'static str)>,
    pub report: GameReport,
}

impl GameResult {
    /// Players holding the largest final stack.
    pub fn leaders(&self) -> Vec<&str> {
        let best = self.report.final_stacks.values().max().copied().unwrap_or(0);
        self.report
            .final_stacks
            .iter()
            .filter(|(_, stack)| **stack == best)
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

pub struct Simulator {
    lineup: Vec<(PlayerId, &'static str)>,
    ante: Chips,
    starting_stack: Chips,
    max_rounds: u32,
}

impl Simulator {
    pub fn new(kinds: &[StrategyKind], ante: Chips, starting_stack: Chips, max_rounds: u32) -> Self {
        Self {
            lineup: player_ids(kinds),
            ante,
            starting_stack,
            max_rounds,
        }
    }

    pub fn lineup(&self) -> &[(PlayerId, &'static str)] {
        &self.lineup
    }

    /// Plays one game. Strategy `i` is seeded with `seed + i + 1`; the
    /// session itself uses `seed`.
    pub fn simulate_game(&self, seed: u64) -> Result<GameResult, SimulatorError> {
        let mut strategies: Vec<Box<dyn Strategy>> = Vec::with_capacity(self.lineup.len());
        for ((id, name), offset) in self.lineup.iter().zip(1u64..) {
            let factory = by_name(name).ok_or(SimulatorError::UnknownStrategy(*name))?;
            strategies.push((factory.make)(id, Some(seed.wrapping_add(offset))));
        }

        let entrants: Vec<Entrant<'_>> = self
            .lineup
            .iter()
            .zip(strategies.iter_mut())
            .map(|((id, _), strategy)| Entrant::new(id.clone(), strategy.as_mut()))
            .collect();
        let config = SessionConfig {
            ante: self.ante,
            starting_stack: self.starting_stack,
            max_rounds: self.max_rounds,
            seed: Some(seed),
        };
        let report = simulate_game(&config, entrants)?;

        Ok(GameResult {
            seed,
            lineup: self.lineup.clone(),
            report,
        })
    }
}

/// Plain strategy names, suffixed with the seat index when a name repeats.
fn player_ids(kinds: &[StrategyKind]) -> Vec<(PlayerId, &'static str)> {
    kinds
        .iter()
        .enumerate()
        .map(|(seat, kind)| {
            let name = kind.name();
            let repeated = kinds.iter().filter(|k| k.name() == name).count() > 1;
            let id = if repeated {
                format!("{name}#{seat}")
            } else {
                name.to_string()
            };
            (id, name)
        })
        .collect()
}

#[derive(Debug)]
pub enum SimulatorError {
    /// No factory is registered under this name
    UnknownStrategy(&'static str),
    /// Session setup or game logic failed
    Domain(DomainError),
}

impl From<DomainError> for SimulatorError {
    fn from(err: DomainError) -> Self {
        SimulatorError::Domain(err)
    }
}

impl std::fmt::Display for SimulatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulatorError::UnknownStrategy(name) => write!(f, "Unknown strategy: {name}"),
            SimulatorError::Domain(err) => write!(f, "Domain error: {err}"),
        }
    }
}

impl std::error::Error for SimulatorError {}
