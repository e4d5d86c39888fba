//! Shared types for the simulator.

use clap::ValueEnum;
use evaluator::strategy::{CallingStation, CardReader, RandomStrategy};

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Jsonl,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyKind {
    Random,
    CallingStation,
    CardReader,
}

impl StrategyKind {
    /// Name of the built-in factory in the evaluator's registry.
    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Random => RandomStrategy::NAME,
            StrategyKind::CallingStation => CallingStation::NAME,
            StrategyKind::CardReader => CardReader::NAME,
        }
    }
}
