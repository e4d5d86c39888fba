use serde::{Deserialize, Serialize};
use tracing::debug;

/// Human-readable narration of one round, kept for on-demand replay.
///
/// Every line is also emitted as a `debug!` event so a live run can be
/// followed with `RUST_LOG=evaluator::round=debug`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, line: impl Into<String>) {
        let line = line.into();
        debug!(target: "evaluator::round", "{line}");
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}
