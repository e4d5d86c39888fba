//! Evaluator configuration.
//!
//! Every field has a default and can be overridden from the environment:
//!
//! | Field               | Variable                         | Default   |
//! |---------------------|----------------------------------|-----------|
//! | `ante`              | `EVALUATOR_ANTE`                 | 5         |
//! | `starting_stack`    | `EVALUATOR_STARTING_STACK`       | 200       |
//! | `rounds_per_game`   | `EVALUATOR_ROUNDS_PER_GAME`      | 1000      |
//! | `snapshot_interval` | `EVALUATOR_SNAPSHOT_INTERVAL_MS` | 1000      |
//! | `results_dir`       | `EVALUATOR_RESULTS_DIR`          | `results` |
//! | `seed`              | `EVALUATOR_SEED`                 | unset     |
//! | `series_slots`      | `EVALUATOR_SERIES_SLOTS`         | 10        |

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{table_total, Chips, SessionConfig};
use crate::tournament::MIN_STRATEGIES;
use crate::error::EvaluatorError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub ante: Chips,
    pub starting_stack: Chips,
    pub rounds_per_game: u32,
    /// Minimum time between snapshot emissions, in milliseconds.
    pub snapshot_interval_ms: u64,
    pub results_dir: PathBuf,
    pub seed: Option<u64>,
    /// Stack series files rotate through this many slots per scope.
    pub series_slots: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            ante: 5,
            starting_stack: 200,
            rounds_per_game: 1000,
            snapshot_interval_ms: 1000,
            results_dir: PathBuf::from("results"),
            seed: None,
            series_slots: 10,
        }
    }
}

impl EvaluatorConfig {
    /// Defaults overridden by any `EVALUATOR_*` variables that are set.
    pub fn from_env() -> Result<Self, EvaluatorError> {
        let defaults = Self::default();
        let config = Self {
            ante: parsed_var("EVALUATOR_ANTE")?.unwrap_or(defaults.ante),
            starting_stack: parsed_var("EVALUATOR_STARTING_STACK")?
                .unwrap_or(defaults.starting_stack),
            rounds_per_game: parsed_var("EVALUATOR_ROUNDS_PER_GAME")?
                .unwrap_or(defaults.rounds_per_game),
            snapshot_interval_ms: parsed_var("EVALUATOR_SNAPSHOT_INTERVAL_MS")?
                .unwrap_or(defaults.snapshot_interval_ms),
            results_dir: env::var("EVALUATOR_RESULTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.results_dir),
            seed: parsed_var("EVALUATOR_SEED")?,
            series_slots: parsed_var("EVALUATOR_SERIES_SLOTS")?.unwrap_or(defaults.series_slots),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EvaluatorError> {
        if self.starting_stack == 0 {
            return Err(EvaluatorError::config("starting_stack must be positive"));
        }
        if table_total(MIN_STRATEGIES, self.starting_stack).is_none() {
            return Err(EvaluatorError::config(format!(
                "starting_stack {} is too large for a table of {MIN_STRATEGIES}",
                self.starting_stack
            )));
        }
        if self.rounds_per_game == 0 {
            return Err(EvaluatorError::config("rounds_per_game must be positive"));
        }
        if self.series_slots == 0 {
            return Err(EvaluatorError::config("series_slots must be positive"));
        }
        Ok(())
    }

    pub fn with_ante(mut self, ante: Chips) -> Self {
        self.ante = ante;
        self
    }

    pub fn with_starting_stack(mut self, starting_stack: Chips) -> Self {
        self.starting_stack = starting_stack;
        self
    }

    pub fn with_rounds_per_game(mut self, rounds: u32) -> Self {
        self.rounds_per_game = rounds;
        self
    }

    pub fn with_snapshot_interval(mut self, interval: Duration) -> Self {
        self.snapshot_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_series_slots(mut self, slots: usize) -> Self {
        self.series_slots = slots;
        self
    }

    pub fn snapshot_interval(&self) -> Duration {
        Duration::from_millis(self.snapshot_interval_ms)
    }

    /// Session settings for one game. `game_index` perturbs the seed so
    /// successive games of a seeded run are not identical.
    pub fn session(&self, game_index: u64) -> SessionConfig {
        SessionConfig {
            ante: self.ante,
            starting_stack: self.starting_stack,
            max_rounds: self.rounds_per_game,
            seed: self.seed.map(|s| s.wrapping_add(game_index)),
        }
    }
}

/// Parses an optional environment variable.
fn parsed_var<T: FromStr>(key: &str) -> Result<Option<T>, EvaluatorError>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| EvaluatorError::config(format!("{key}={raw:?} is invalid: {e}"))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(EvaluatorError::config(format!("{key}: {e}"))),
    }
}
