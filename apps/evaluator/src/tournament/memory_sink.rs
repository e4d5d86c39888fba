use std::sync::Arc;

use parking_lot::Mutex;

use super::sink::{SnapshotRecord, SnapshotSink, StackSeries};
use crate::error::EvaluatorError;

#[derive(Debug, Default)]
struct Received {
    records: Vec<SnapshotRecord>,
    series: Vec<StackSeries>,
    resets: usize,
}

/// Keeps everything in memory. Clones share the same buffer, so a test can
/// hand one clone to the evaluator and read through another.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    inner: Arc<Mutex<Received>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<SnapshotRecord> {
        self.inner.lock().records.clone()
    }

    pub fn series(&self) -> Vec<StackSeries> {
        self.inner.lock().series.clone()
    }

    pub fn resets(&self) -> usize {
        self.inner.lock().resets
    }
}

impl SnapshotSink for MemorySink {
    fn record(&mut self, record: &SnapshotRecord) -> Result<(), EvaluatorError> {
        self.inner.lock().records.push(record.clone());
        Ok(())
    }

    fn stack_series(&mut self, series: &StackSeries) -> Result<(), EvaluatorError> {
        self.inner.lock().series.push(series.clone());
        Ok(())
    }

    fn reset(&mut self) -> Result<(), EvaluatorError> {
        let mut inner = self.inner.lock();
        inner.records.clear();
        inner.series.clear();
        inner.resets += 1;
        Ok(())
    }
}
