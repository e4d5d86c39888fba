use std::process::ExitCode;

use evaluator::strategy::builtin_catalog;
use evaluator::telemetry::init_tracing;
use evaluator::tournament::{Evaluator, EvaluatorStatus, FileSink, SnapshotSink};
use evaluator::{EvaluatorConfig, EvaluatorError};
use tracing::{error, info};

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(EvaluatorStatus::Stalled(reason)) => {
            error!(reason = %reason, "Evaluator stalled");
            ExitCode::FAILURE
        }
        Ok(status) => {
            info!(status = %status, "Evaluator exited");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "Evaluator failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<EvaluatorStatus, EvaluatorError> {
    let config = EvaluatorConfig::from_env()?;
    info!(
        ante = config.ante,
        starting_stack = config.starting_stack,
        rounds_per_game = config.rounds_per_game,
        results_dir = %config.results_dir.display(),
        "Starting evaluator"
    );

    let sinks: Vec<Box<dyn SnapshotSink>> = vec![Box::new(FileSink::new(&config.results_dir)?)];
    let catalog = builtin_catalog(config.seed);
    let evaluator = Evaluator::new(config, catalog, sinks)?;

    evaluator.reload();
    evaluator.start()?;
    evaluator.wait()?;
    Ok(evaluator.status())
}
