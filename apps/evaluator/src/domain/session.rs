//! A game session: many rounds between one fixed group of strategies.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cards::{Deck, DECK_SIZE};
use super::engine::{deal, play_round, table_total, Entrant};
use super::errors::DomainError;
use super::round_state::RoundState;
use super::transcript::Transcript;
use super::{Chips, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub ante: Chips,
    pub starting_stack: Chips,
    /// Round budget; the session also ends early once fewer than two players
    /// have chips.
    pub max_rounds: u32,
    /// Fixes seating and every deal. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ante: 5,
            starting_stack: 200,
            max_rounds: 1000,
            seed: None,
        }
    }
}

/// Everything kept about one finished round.
#[derive(Debug, Clone, Serialize)]
pub struct RoundRecord {
    /// 1-based.
    pub number: u32,
    pub final_state: RoundState,
    pub winner: PlayerId,
    pub stacks: BTreeMap<PlayerId, Chips>,
    pub transcript: Transcript,
}

impl RoundRecord {
    pub fn replay(&self) -> String {
        format!("--- Round {} ---\n{}", self.number, self.transcript.render())
    }
}

/// Completed session, detached from the strategies that played it.
#[derive(Debug, Clone, Serialize)]
pub struct GameReport {
    /// Seating order after the initial shuffle.
    pub seating: Vec<PlayerId>,
    pub starting_stack: Chips,
    pub final_stacks: BTreeMap<PlayerId, Chips>,
    /// Round number at whose end each busted player hit zero.
    pub bust_round: BTreeMap<PlayerId, u32>,
    pub rounds_played: u32,
    /// Stacks before the first round and after every round.
    pub stack_history: Vec<BTreeMap<PlayerId, Chips>>,
    pub rounds: Vec<RoundRecord>,
}

impl GameReport {
    pub fn final_stack(&self, player_id: &str) -> Option<Chips> {
        self.final_stacks.get(player_id).copied()
    }

    /// Net chips won or lost over the session.
    pub fn pnl(&self, player_id: &str) -> Option<i64> {
        self.final_stack(player_id)
            .map(|stack| i64::from(stack) - i64::from(self.starting_stack))
    }

    /// Rounds `player_id` took part in: its bust round, or every round played.
    pub fn rounds_for(&self, player_id: &str) -> u32 {
        self.bust_round
            .get(player_id)
            .copied()
            .unwrap_or(self.rounds_played)
    }

    pub fn round(&self, number: u32) -> Option<&RoundRecord> {
        number
            .checked_sub(1)
            .and_then(|idx| self.rounds.get(idx as usize))
    }

    pub fn replay(&self) -> String {
        let mut out = format!("Seating: {}\n", self.seating.join(", "));
        for round in &self.rounds {
            out.push_str(&round.replay());
        }
        let _ = write!(out, "Final stacks:");
        for (id, stack) in &self.final_stacks {
            let _ = write!(out, " {id}={stack}");
        }
        out.push('\n');
        out
    }
}

pub struct GameSession<'a> {
    config: SessionConfig,
    entrants: Vec<Entrant<'a>>,
    seating: Vec<PlayerId>,
    /// Funded players in seating order.
    order: Vec<PlayerId>,
    stacks: BTreeMap<PlayerId, Chips>,
    first_seat: usize,
    rng: ChaCha8Rng,
    round: u32,
    bust_round: BTreeMap<PlayerId, u32>,
    stack_history: Vec<BTreeMap<PlayerId, Chips>>,
    rounds: Vec<RoundRecord>,
}

impl<'a> GameSession<'a> {
    pub fn new(config: SessionConfig, entrants: Vec<Entrant<'a>>) -> Result<Self, DomainError> {
        if entrants.len() < 2 {
            return Err(DomainError::TooFewPlayers {
                needed: 2,
                found: entrants.len(),
            });
        }
        if entrants.len() > DECK_SIZE {
            return Err(DomainError::InvalidConfig(format!(
                "{} players cannot share a {DECK_SIZE}-card deck",
                entrants.len()
            )));
        }
        if config.starting_stack == 0 {
            return Err(DomainError::InvalidConfig(
                "starting stack must be positive".into(),
            ));
        }
        if table_total(entrants.len(), config.starting_stack).is_none() {
            return Err(DomainError::InvalidConfig(format!(
                "{} stacks of {} overflow the chip type",
                entrants.len(),
                config.starting_stack
            )));
        }
        let mut seen = BTreeSet::new();
        for entrant in &entrants {
            if !seen.insert(entrant.player_id.as_str()) {
                return Err(DomainError::DuplicatePlayer(entrant.player_id.clone()));
            }
        }

        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        let mut seating: Vec<PlayerId> = entrants.iter().map(|e| e.player_id.clone()).collect();
        seating.shuffle(&mut rng);

        let stacks: BTreeMap<PlayerId, Chips> = seating
            .iter()
            .map(|id| (id.clone(), config.starting_stack))
            .collect();

        Ok(Self {
            order: seating.clone(),
            stack_history: vec![stacks.clone()],
            seating,
            stacks,
            config,
            entrants,
            first_seat: 0,
            rng,
            round: 0,
            bust_round: BTreeMap::new(),
            rounds: Vec::new(),
        })
    }

    pub fn is_over(&self) -> bool {
        self.order.len() < 2 || self.round >= self.config.max_rounds
    }

    pub fn rounds_played(&self) -> u32 {
        self.round
    }

    pub fn stacks(&self) -> &BTreeMap<PlayerId, Chips> {
        &self.stacks
    }

    /// Players still funded, in seating order.
    pub fn funded(&self) -> &[PlayerId] {
        &self.order
    }

    /// Plays one round. Returns `None` once the session is over.
    pub fn play_next_round(&mut self) -> Result<Option<&RoundRecord>, DomainError> {
        if self.is_over() {
            return Ok(None);
        }

        let rotation: Vec<(PlayerId, Chips)> = self
            .order
            .iter()
            .map(|id| (id.clone(), self.stacks.get(id).copied().unwrap_or_default()))
            .collect();
        let ante_seat = self.first_seat % rotation.len();
        self.first_seat = (ante_seat + 1) % rotation.len();

        let mut deck = Deck::shuffled(&mut self.rng);
        let state = deal(&rotation, ante_seat, self.config.ante, &mut deck)?;
        let outcome = play_round(state, &mut self.entrants)?;
        self.round += 1;

        for (id, stack) in &outcome.stacks {
            self.stacks.insert(id.clone(), *stack);
        }
        self.stack_history.push(self.stacks.clone());

        let round = self.round;
        let busted: Vec<PlayerId> = self
            .order
            .iter()
            .filter(|id| self.stacks.get(*id).copied().unwrap_or_default() == 0)
            .cloned()
            .collect();
        for id in busted {
            debug!(player_id = %id, round, "Player busted");
            self.order.retain(|p| p != &id);
            self.bust_round.insert(id, round);
        }

        self.rounds.push(RoundRecord {
            number: round,
            final_state: outcome.state,
            winner: outcome.winner,
            stacks: outcome.stacks,
            transcript: outcome.transcript,
        });
        Ok(self.rounds.last())
    }

    /// Plays until the session is over and returns the report.
    pub fn run(mut self) -> Result<GameReport, DomainError> {
        while self.play_next_round()?.is_some() {}
        Ok(self.into_report())
    }

    pub fn into_report(self) -> GameReport {
        GameReport {
            seating: self.seating,
            starting_stack: self.config.starting_stack,
            final_stacks: self.stacks,
            bust_round: self.bust_round,
            rounds_played: self.round,
            stack_history: self.stack_history,
            rounds: self.rounds,
        }
    }
}

/// Runs a whole session for `entrants` under `config`.
pub fn simulate_game(
    config: &SessionConfig,
    entrants: Vec<Entrant<'_>>,
) -> Result<GameReport, DomainError> {
    GameSession::new(config.clone(), entrants)?.run()
}
