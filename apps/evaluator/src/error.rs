use thiserror::Error;

use crate::domain::DomainError;

#[derive(Error, Debug)]
pub enum EvaluatorError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Sink error: {0}")]
    Sink(String),
    #[error("Evaluator is already running")]
    AlreadyRunning,
    #[error("Scheduler thread panicked: {0}")]
    SchedulerPanicked(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl EvaluatorError {
    pub fn config(detail: impl Into<String>) -> Self {
        EvaluatorError::Config(detail.into())
    }

    pub fn sink(detail: impl Into<String>) -> Self {
        EvaluatorError::Sink(detail.into())
    }
}

impl From<serde_json::Error> for EvaluatorError {
    fn from(err: serde_json::Error) -> Self {
        EvaluatorError::Sink(format!("serialization failed: {err}"))
    }
}

impl From<csv::Error> for EvaluatorError {
    fn from(err: csv::Error) -> Self {
        EvaluatorError::Sink(format!("csv write failed: {err}"))
    }
}
