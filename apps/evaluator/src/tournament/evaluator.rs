//! Long-running tournament evaluator.
//!
//! One scheduler thread sweeps every 3-combination of the loaded strategies,
//! plays a bounded game session for each and folds the result into the
//! running standings. Other threads reload, restart and read standings
//! through the shared [`Evaluator`] handle.
//!
//! Locking:
//! - `roster` is held for the duration of each game. A reload therefore waits
//!   for the game in flight and never swaps strategies mid-game.
//! - `ledger` (standings, last games, loaded ids) is only ever replaced as a
//!   whole while `roster` is held, so readers see either the state before a
//!   reload or the state after it.
//! - Stop requests are honoured between combinations, never inside a game.
//!   There is no per-decision timeout: a strategy that never returns from
//!   `decide` stalls the scheduler and any caller waiting on it.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use parking_lot::{Condvar, Mutex, RwLock};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::sink::{SinkDispatcher, SinkEvent, SnapshotRecord, SnapshotSink, StackSeries, GLOBAL_SCOPE};
use super::stats::Standings;
use super::trio::{trios, Trio};
use crate::config::EvaluatorConfig;
use crate::domain::{simulate_game, GameReport, PlayerId};
use crate::error::EvaluatorError;
use crate::strategy::guard::panic_message;
use crate::strategy::{Registration, Roster, StrategyCatalog};

/// Fewest strategies a sweep needs.
pub const MIN_STRATEGIES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "lowercase")]
pub enum EvaluatorStatus {
    /// Never started.
    Idle,
    Running,
    /// Started, but fewer than three strategies are loaded.
    Waiting,
    Stopped,
    /// The scheduler hit a fault in game logic and exited.
    Stalled(String),
}

impl fmt::Display for EvaluatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluatorStatus::Idle => f.write_str("idle"),
            EvaluatorStatus::Running => f.write_str("running"),
            EvaluatorStatus::Waiting => f.write_str("waiting for strategies"),
            EvaluatorStatus::Stopped => f.write_str("stopped"),
            EvaluatorStatus::Stalled(reason) => write!(f, "stalled: {reason}"),
        }
    }
}

struct RosterSlot {
    roster: Roster,
    generation: u64,
}

#[derive(Default)]
struct Ledger {
    standings: Standings,
    last_games: BTreeMap<Trio, Arc<GameReport>>,
    strategy_ids: Vec<PlayerId>,
}

struct Shared {
    config: EvaluatorConfig,
    roster: Mutex<RosterSlot>,
    roster_changed: Condvar,
    ledger: RwLock<Ledger>,
    status: Mutex<EvaluatorStatus>,
    sinks: SinkDispatcher,
}

impl Shared {
    fn set_status(&self, status: EvaluatorStatus) {
        let mut current = self.status.lock();
        if *current != status {
            debug!(from = %*current, to = %status, "Evaluator status changed");
            *current = status;
        }
    }

    /// Wakes an idle scheduler. Taking the roster lock first means the
    /// scheduler is either already waiting or will see the change before it
    /// waits.
    fn wake(&self) {
        let _slot = self.roster.lock();
        self.roster_changed.notify_all();
    }
}

struct Worker {
    cancel: CancellationToken,
    /// Taken by `wait`.
    handle: Option<JoinHandle<()>>,
}

pub struct Evaluator {
    shared: Arc<Shared>,
    catalog: Mutex<StrategyCatalog>,
    worker: Mutex<Option<Worker>>,
}

impl Evaluator {
    pub fn new(
        config: EvaluatorConfig,
        catalog: StrategyCatalog,
        sinks: Vec<Box<dyn SnapshotSink>>,
    ) -> Result<Self, EvaluatorError> {
        config.validate()?;
        Self::assemble(config, catalog, sinks)
    }

    fn assemble(
        config: EvaluatorConfig,
        catalog: StrategyCatalog,
        sinks: Vec<Box<dyn SnapshotSink>>,
    ) -> Result<Self, EvaluatorError> {
        let shared = Shared {
            config,
            roster: Mutex::new(RosterSlot {
                roster: Roster::default(),
                generation: 0,
            }),
            roster_changed: Condvar::new(),
            ledger: RwLock::new(Ledger::default()),
            status: Mutex::new(EvaluatorStatus::Idle),
            sinks: SinkDispatcher::spawn(sinks)?,
        };
        Ok(Self {
            shared: Arc::new(shared),
            catalog: Mutex::new(catalog),
            worker: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.shared.config
    }

    /// Adds or shadows a registration. Takes effect on the next reload.
    pub fn register(&self, registration: Registration) -> Option<Registration> {
        self.catalog.lock().register(registration)
    }

    pub fn unregister(&self, player_id: &str) -> Option<Registration> {
        self.catalog.lock().unregister(player_id)
    }

    /// Rebuilds every strategy from the catalog and resets all statistics.
    ///
    /// Blocks until any game in flight has finished. Returns how many
    /// strategies loaded.
    pub fn reload(&self) -> usize {
        let roster = self.catalog.lock().instantiate_all();
        let loaded = roster.len();
        let ids = roster.ids();

        let mut slot = self.shared.roster.lock();
        slot.roster = roster;
        slot.generation += 1;
        let generation = slot.generation;
        {
            let mut ledger = self.shared.ledger.write();
            *ledger = Ledger {
                standings: Standings::seeded(generation, &ids),
                last_games: BTreeMap::new(),
                strategy_ids: ids.clone(),
            };
            self.shared.sinks.send(SinkEvent::Reset);
        }
        self.shared.roster_changed.notify_all();
        drop(slot);

        if loaded < MIN_STRATEGIES {
            warn!(loaded, needed = MIN_STRATEGIES, "Too few strategies loaded to evaluate");
        }
        info!(generation, loaded, strategies = ?ids, "Strategies reloaded");
        loaded
    }

    /// Spawns the scheduler thread.
    pub fn start(&self) -> Result<(), EvaluatorError> {
        let mut worker = self.worker.lock();
        if let Some(existing) = worker.as_mut() {
            let alive = match &existing.handle {
                Some(handle) => !handle.is_finished(),
                None => !existing.cancel.is_cancelled(),
            };
            if alive {
                return Err(EvaluatorError::AlreadyRunning);
            }
            if let Some(handle) = existing.handle.take() {
                join_scheduler(handle)?;
            }
        }

        let cancel = CancellationToken::new();
        let shared = Arc::clone(&self.shared);
        let token = cancel.clone();
        // The scheduler logs through whatever subscriber the caller has.
        let dispatch = tracing::dispatcher::get_default(|d| d.clone());
        self.shared.set_status(EvaluatorStatus::Running);
        let handle = thread::Builder::new()
            .name("evaluator-scheduler".into())
            .spawn(move || tracing::dispatcher::with_default(&dispatch, || run(&shared, &token)))?;
        *worker = Some(Worker {
            cancel,
            handle: Some(handle),
        });
        info!("Evaluator started");
        Ok(())
    }

    /// Requests a stop and blocks until the scheduler has exited. The stop
    /// lands between combinations, so this can take as long as one game.
    pub fn stop(&self) -> Result<(), EvaluatorError> {
        let Some(worker) = self.worker.lock().take() else {
            return Ok(());
        };
        worker.cancel.cancel();
        self.shared.wake();
        let joined = match worker.handle {
            Some(handle) => join_scheduler(handle),
            None => Ok(()),
        };
        let mut status = self.shared.status.lock();
        if !matches!(*status, EvaluatorStatus::Stalled(_)) {
            *status = EvaluatorStatus::Stopped;
        }
        drop(status);
        info!("Evaluator stopped");
        joined
    }

    /// Stop, reload, start.
    pub fn restart(&self) -> Result<(), EvaluatorError> {
        self.stop()?;
        self.reload();
        self.start()
    }

    /// Blocks until the scheduler exits on its own or is stopped elsewhere.
    pub fn wait(&self) -> Result<(), EvaluatorError> {
        let taken = self
            .worker
            .lock()
            .as_mut()
            .and_then(|w| w.handle.take().map(|h| (h, w.cancel.clone())));
        let Some((handle, cancel)) = taken else {
            return Ok(());
        };
        let joined = join_scheduler(handle);
        // Marks the joined worker finished so a later `start` can replace it.
        cancel.cancel();
        joined
    }

    pub fn status(&self) -> EvaluatorStatus {
        self.shared.status.lock().clone()
    }

    pub fn standings(&self) -> Standings {
        self.shared.ledger.read().standings.clone()
    }

    /// Ids of the strategies loaded by the last reload.
    pub fn strategy_ids(&self) -> Vec<PlayerId> {
        self.shared.ledger.read().strategy_ids.clone()
    }

    /// Internal state dump of a loaded strategy. Waits for the game in flight.
    pub fn describe(&self, player_id: &str) -> Option<String> {
        self.shared.roster.lock().roster.describe(player_id)
    }

    /// Most recently completed game for `trio`.
    pub fn last_game(&self, trio: &Trio) -> Option<Arc<GameReport>> {
        self.shared.ledger.read().last_games.get(trio).cloned()
    }

    pub fn replay_game(&self, trio: &Trio) -> Option<String> {
        self.last_game(trio).map(|game| game.replay())
    }

    /// `round` is 1-based.
    pub fn replay_round(&self, trio: &Trio, round: u32) -> Option<String> {
        self.last_game(trio)
            .and_then(|game| game.round(round).map(|r| r.replay()))
    }

    /// Blocks until every snapshot emitted so far has reached the sinks.
    pub fn flush_sinks(&self) {
        self.shared.sinks.flush();
    }
}

impl Drop for Evaluator {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            warn!(error = %err, "Evaluator did not shut down cleanly");
        }
    }
}

fn join_scheduler(handle: JoinHandle<()>) -> Result<(), EvaluatorError> {
    handle
        .join()
        .map_err(|payload| EvaluatorError::SchedulerPanicked(panic_message(payload.as_ref())))
}

/// Scheduler loop.
fn run(shared: &Shared, cancel: &CancellationToken) {
    let interval = shared.config.snapshot_interval();
    let mut last_emit = Instant::now();
    let mut game_index: u64 = 0;

    'sweeps: while !cancel.is_cancelled() {
        let (generation, sweep) = {
            let mut slot = shared.roster.lock();
            while slot.roster.len() < MIN_STRATEGIES && !cancel.is_cancelled() {
                shared.set_status(EvaluatorStatus::Waiting);
                debug!(loaded = slot.roster.len(), "Waiting for strategies");
                shared.roster_changed.wait(&mut slot);
            }
            if cancel.is_cancelled() {
                break 'sweeps;
            }
            shared.set_status(EvaluatorStatus::Running);
            (slot.generation, trios(&slot.roster.ids()))
        };
        debug!(generation, combinations = sweep.len(), "Starting sweep");

        for trio in sweep {
            if cancel.is_cancelled() {
                break 'sweeps;
            }

            let played = {
                let mut slot = shared.roster.lock();
                if slot.generation != generation {
                    debug!(generation, "Roster changed; abandoning sweep");
                    continue 'sweeps;
                }
                let entrants = slot.roster.entrants(trio.members());
                let session = shared.config.session(game_index);
                catch_unwind(AssertUnwindSafe(|| simulate_game(&session, entrants)))
            };
            game_index += 1;

            let report = match played {
                Ok(Ok(report)) => Arc::new(report),
                Ok(Err(err)) => {
                    stall(shared, &trio, err.to_string());
                    return;
                }
                Err(payload) => {
                    stall(shared, &trio, panic_message(payload.as_ref()));
                    return;
                }
            };
            debug!(trio = %trio, rounds = report.rounds_played, "Game finished");

            {
                let mut ledger = shared.ledger.write();
                if ledger.standings.generation != generation {
                    continue 'sweeps;
                }
                ledger.standings.record_game(&trio, &report);
                ledger.last_games.insert(trio, report);
            }

            if last_emit.elapsed() >= interval {
                emit_snapshots(shared, generation);
                last_emit = Instant::now();
            }
        }
    }
    debug!("Scheduler loop exiting");
}

fn stall(shared: &Shared, trio: &Trio, reason: String) {
    error!(trio = %trio, reason = %reason, "Game logic fault; evaluator stalled");
    shared.set_status(EvaluatorStatus::Stalled(format!("{trio}: {reason}")));
}

/// Sends the global record plus a record and stack series per played trio.
fn emit_snapshots(shared: &Shared, generation: u64) {
    let mut ledger = shared.ledger.write();
    if ledger.standings.generation != generation {
        return;
    }
    let evaluations = ledger.standings.evaluations;
    ledger.standings.evaluations += 1;

    let global = SnapshotRecord::from_stats(GLOBAL_SCOPE, evaluations, &ledger.standings.global);
    info!(
        evaluations,
        games_played = global.games_played,
        win_rates = ?global.strategy_win_rate,
        "Average pnl per 1000 rounds"
    );
    shared.sinks.send(SinkEvent::Record(global));

    let slot = usize::try_from(evaluations).unwrap_or_default() % shared.config.series_slots;
    for (trio, game) in &ledger.last_games {
        let scope = trio.to_string();
        if let Some(stats) = ledger.standings.trio(trio) {
            let record = SnapshotRecord::from_stats(scope.clone(), evaluations, stats);
            debug!(trio = %scope, win_rates = ?record.strategy_win_rate, "Trio snapshot");
            shared.sinks.send(SinkEvent::Record(record));
        }
        shared.sinks.send(SinkEvent::Series(StackSeries {
            scope,
            slot,
            stacks: game.stack_history.clone(),
        }));
    }
}
