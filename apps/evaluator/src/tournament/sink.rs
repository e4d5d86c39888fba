//! Snapshot records and the sinks that receive them.
//!
//! Sinks never run on the scheduling thread. The scheduler hands events to a
//! [`SinkDispatcher`], which forwards them to every sink from its own thread.

use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, warn};

use super::stats::ScopeStats;
use crate::domain::{Chips, PlayerId};
use crate::error::EvaluatorError;

/// Scope name used for tournament-wide records.
pub const GLOBAL_SCOPE: &str = "global";

/// Periodic statistics for one scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// `global` or a trio rendered as `a,b,c`.
    pub scope: String,
    pub evaluations: u64,
    pub games_played: u64,
    pub strategy_win_rate: BTreeMap<PlayerId, f64>,
    pub rounds: BTreeMap<PlayerId, u64>,
    /// RFC 3339, UTC.
    pub timestamp: String,
}

impl SnapshotRecord {
    pub fn from_stats(scope: impl Into<String>, evaluations: u64, stats: &ScopeStats) -> Self {
        Self {
            scope: scope.into(),
            evaluations,
            games_played: stats.games_played,
            strategy_win_rate: stats.win_rates(),
            rounds: stats.rounds(),
            timestamp: now_rfc3339(),
        }
    }
}

/// Stack sizes over the course of a scope's most recent game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSeries {
    pub scope: String,
    /// Rotating slot index; older series in the same slot are overwritten.
    pub slot: usize,
    pub stacks: Vec<BTreeMap<PlayerId, Chips>>,
}

/// Receives snapshot output.
pub trait SnapshotSink: Send {
    fn record(&mut self, record: &SnapshotRecord) -> Result<(), EvaluatorError>;

    fn stack_series(&mut self, series: &StackSeries) -> Result<(), EvaluatorError>;

    /// Statistics were reset; drop everything received so far.
    fn reset(&mut self) -> Result<(), EvaluatorError>;
}

pub(crate) enum SinkEvent {
    Record(SnapshotRecord),
    Series(StackSeries),
    Reset,
    /// Acknowledged once every earlier event has been delivered.
    Flush(Sender<()>),
}

/// Owns the sink thread. Dropping it delivers pending events and joins.
pub(crate) struct SinkDispatcher {
    tx: Option<Sender<SinkEvent>>,
    handle: Option<JoinHandle<()>>,
}

impl SinkDispatcher {
    pub(crate) fn spawn(sinks: Vec<Box<dyn SnapshotSink>>) -> Result<Self, EvaluatorError> {
        let (tx, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("snapshot-sinks".into())
            .spawn(move || deliver(rx, sinks))?;
        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    pub(crate) fn send(&self, event: SinkEvent) {
        let Some(tx) = &self.tx else { return };
        if tx.send(event).is_err() {
            warn!("Snapshot sink thread is gone; event dropped");
        }
    }

    /// Blocks until everything sent so far has reached the sinks.
    pub(crate) fn flush(&self) {
        let (ack_tx, ack_rx) = mpsc::channel();
        self.send(SinkEvent::Flush(ack_tx));
        let _ = ack_rx.recv();
    }
}

impl Drop for SinkDispatcher {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Snapshot sink thread panicked");
            }
        }
    }
}

fn deliver(rx: Receiver<SinkEvent>, mut sinks: Vec<Box<dyn SnapshotSink>>) {
    for event in rx {
        match event {
            SinkEvent::Record(record) => {
                for sink in &mut sinks {
                    if let Err(err) = sink.record(&record) {
                        warn!(scope = %record.scope, error = %err, "Snapshot sink failed to record");
                    }
                }
            }
            SinkEvent::Series(series) => {
                for sink in &mut sinks {
                    if let Err(err) = sink.stack_series(&series) {
                        warn!(scope = %series.scope, error = %err, "Snapshot sink failed to write stack series");
                    }
                }
            }
            SinkEvent::Reset => {
                for sink in &mut sinks {
                    if let Err(err) = sink.reset() {
                        warn!(error = %err, "Snapshot sink failed to reset");
                    }
                }
            }
            SinkEvent::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    debug!("Snapshot sink thread exiting");
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string())
}
