//! Writes snapshots under a results directory.
//!
//! ```text
//! results/
//!   results.jsonl            global records, one JSON object per line
//!   a,b,c/results.jsonl      records for one trio
//!   a,b,c/stacks3.csv        stack series in slot 3
//! ```

use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::sink::{SnapshotRecord, SnapshotSink, StackSeries, GLOBAL_SCOPE};
use crate::error::EvaluatorError;

pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Creates `dir` if needed. Existing contents are kept until the first reset.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, EvaluatorError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn scope_dir(&self, scope: &str) -> Result<PathBuf, EvaluatorError> {
        if scope == GLOBAL_SCOPE {
            return Ok(self.dir.clone());
        }
        if scope.is_empty() || scope.contains(['/', '\\']) || scope.starts_with('.') {
            return Err(EvaluatorError::sink(format!("unusable scope name {scope:?}")));
        }
        let dir = self.dir.join(scope);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

impl SnapshotSink for FileSink {
    fn record(&mut self, record: &SnapshotRecord) -> Result<(), EvaluatorError> {
        let path = self.scope_dir(&record.scope)?.join("results.jsonl");
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = BufWriter::new(file);
        let json = serde_json::to_string(record)?;
        writeln!(writer, "{json}")?;
        writer.flush()?;
        Ok(())
    }

    fn stack_series(&mut self, series: &StackSeries) -> Result<(), EvaluatorError> {
        let path = self
            .scope_dir(&series.scope)?
            .join(format!("stacks{}.csv", series.slot));
        let players: BTreeSet<&str> = series
            .stacks
            .iter()
            .flat_map(|snapshot| snapshot.keys().map(String::as_str))
            .collect();

        let mut writer = csv::Writer::from_path(&path)?;
        let mut header = vec!["round"];
        header.extend(players.iter().copied());
        writer.write_record(&header)?;
        for (round, snapshot) in series.stacks.iter().enumerate() {
            let mut row = vec![round.to_string()];
            row.extend(
                players
                    .iter()
                    .map(|p| snapshot.get(*p).map(u32::to_string).unwrap_or_default()),
            );
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn reset(&mut self) -> Result<(), EvaluatorError> {
        if self.dir.exists() {
            for entry in fs::read_dir(&self.dir)? {
                let path = entry?.path();
                if path.is_dir() {
                    fs::remove_dir_all(&path)?;
                } else {
                    fs::remove_file(&path)?;
                }
            }
        }
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }
}
