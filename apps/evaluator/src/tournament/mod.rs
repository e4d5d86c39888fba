//! Tournament layer: the background evaluator, its statistics and snapshot
//! output.

pub mod evaluator;
pub mod file_sink;
pub mod memory_sink;
pub mod sink;
pub mod stats;
pub mod trio;

pub use evaluator::{Evaluator, EvaluatorStatus, MIN_STRATEGIES};
pub use file_sink::FileSink;
pub use memory_sink::MemorySink;
pub use sink::{SnapshotRecord, SnapshotSink, StackSeries, GLOBAL_SCOPE};
pub use stats::{ScopeStats, Standings, Tally};
pub use trio::{trios, Trio};
