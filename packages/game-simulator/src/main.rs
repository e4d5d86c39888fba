//! Game simulator CLI - runs Indian poker games in memory.
//!
//! Two modes:
//! - standalone games (default): plays `--games` sessions with a fixed
//!   lineup and writes per-game metrics
//! - `--evaluate-secs N`: runs the background evaluator over every trio of
//!   the lineup for N seconds and prints the standings

mod metrics;
mod output;
mod simulator;
mod types;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use evaluator::strategy::by_name;
use evaluator::tournament::{SnapshotSink, GLOBAL_SCOPE};
use evaluator::{Evaluator, EvaluatorConfig, EvaluatorStatus, FileSink, StrategyCatalog};
use metrics::{build_game_metrics, MetricsContext};
use output::OutputWriter;
use simulator::{GameResult, Simulator};
use tracing::{info, warn};
use types::{OutputFormat, StrategyKind};

#[derive(Parser)]
#[command(name = "game-simulator")]
#[command(about = "In-memory Indian poker simulator for strategy development")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Strategies to seat, comma separated; repeats are allowed
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "random,calling-station,card-reader"
    )]
    strategies: Vec<StrategyKind>,

    /// Base seed; game N uses seed + N. Random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum rounds per game
    #[arg(long, default_value = "1000")]
    rounds: u32,

    #[arg(long, default_value = "5")]
    ante: u32,

    /// Starting stack for every player
    #[arg(long, default_value = "200")]
    stack: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Show output summary and file paths
    #[arg(long)]
    show_output: bool,

    /// Print the transcript of the last game
    #[arg(long)]
    replay: bool,

    /// Include per-round stack history in the detailed output
    #[arg(long)]
    history: bool,

    /// Output directory for results
    #[arg(long, default_value = "./simulation-results")]
    output_dir: PathBuf,

    /// Output format
    #[arg(long, default_value = "jsonl")]
    output_format: OutputFormat,

    /// Compress output files
    #[arg(long)]
    compress: bool,

    /// Run the tournament evaluator for this many seconds instead
    #[arg(long)]
    evaluate_secs: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Silent by default, only warnings and errors
    let filter = if args.verbose {
        "debug"
    } else if args.show_output {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if args.strategies.len() < 2 {
        return Err("at least two strategies are needed".into());
    }

    match args.evaluate_secs {
        Some(secs) => run_evaluator(&args, Duration::from_secs(secs)),
        None => run_games(&args),
    }
}

fn run_games(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let simulator = Simulator::new(&args.strategies, args.ante, args.stack, args.rounds);
    if args.show_output {
        info!(games = args.games, lineup = ?simulator.lineup(), "Starting game simulator");
    }

    let mut output_writer = OutputWriter::new(&args.output_dir, &args.output_format, args.compress)?;
    let ctx = MetricsContext {
        total_games: args.games,
        ante: args.ante,
        max_rounds: args.rounds,
        with_history: args.history,
    };

    let start = Instant::now();
    let mut results = Vec::new();
    let mut errors = 0;
    for game_num in 1..=args.games {
        let game_start = Instant::now();
        let seed = match args.seed {
            Some(s) => s.wrapping_add(u64::from(game_num)),
            None => rand::random(),
        };

        match simulator.simulate_game(seed) {
            Ok(result) => {
                let duration_ms = game_start.elapsed().as_secs_f64() * 1000.0;
                let metrics = build_game_metrics(game_num, &ctx, &result, duration_ms);
                if let Err(e) = output_writer.write_game(&metrics) {
                    warn!("Failed to write metrics for game {}: {}", game_num, e);
                }
                if args.verbose {
                    info!(game_num, stacks = ?result.report.final_stacks, "Game completed");
                }
                results.push(result);
            }
            Err(e) => {
                errors += 1;
                warn!("Game {} failed: {}", game_num, e);
            }
        }
    }
    let elapsed = start.elapsed();

    let (detail_path, csv_path) = output_writer.output_paths();
    let (detail_path, csv_path) = (detail_path.to_path_buf(), csv_path.to_path_buf());
    output_writer.finish()?;

    if args.replay {
        if let Some(last) = results.last() {
            println!("{}", last.report.replay());
        }
    }
    if args.show_output {
        info!("Detailed results written to: {}", detail_path.display());
        info!("Summary CSV written to: {}", csv_path.display());
        print_summary(&results, errors, elapsed, args.games);
    }
    Ok(())
}

fn print_summary(results: &[GameResult], errors: u32, elapsed: Duration, total: u32) {
    println!("\n=== Simulation Summary ===");
    println!("Games completed: {}/{}", results.len(), total);
    if errors > 0 {
        println!("Errors: {}", errors);
    }
    println!("Total time: {:?}", elapsed);
    let Some(first) = results.first() else {
        return;
    };
    println!("Average time per game: {:?}", elapsed / results.len() as u32);

    println!("\n=== Results by Player ===");
    for (id, strategy) in &first.lineup {
        let mut pnl = 0i64;
        let mut rounds = 0u64;
        let mut leads = 0u32;
        for result in results {
            pnl += result.report.pnl(id).unwrap_or_default();
            rounds += u64::from(result.report.rounds_for(id));
            if result.leaders().contains(&id.as_str()) {
                leads += 1;
            }
        }
        println!(
            "{} ({}): pnl={}, per 1000 rounds={:.1}, led={} ({:.1}%)",
            id,
            strategy,
            pnl,
            pnl as f64 * 1000.0 / rounds.max(1) as f64,
            leads,
            f64::from(leads) * 100.0 / results.len() as f64
        );
    }
}

fn run_evaluator(args: &Args, duration: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let lineup = Simulator::new(&args.strategies, args.ante, args.stack, args.rounds);
    let mut catalog = StrategyCatalog::new();
    for ((id, name), offset) in lineup.lineup().iter().zip(0u64..) {
        let factory = by_name(name).ok_or_else(|| format!("Unknown strategy: {name}"))?;
        catalog.register(factory.registration(id.clone(), args.seed.map(|s| s.wrapping_add(offset))));
    }

    let results_dir = args.output_dir.join("evaluator");
    let config = EvaluatorConfig::default()
        .with_ante(args.ante)
        .with_starting_stack(args.stack)
        .with_rounds_per_game(args.rounds)
        .with_seed(args.seed)
        .with_results_dir(&results_dir);
    let sinks: Vec<Box<dyn SnapshotSink>> = vec![Box::new(FileSink::new(&results_dir)?)];
    let evaluator = Evaluator::new(config, catalog, sinks)?;

    evaluator.reload();
    evaluator.start()?;
    std::thread::sleep(duration);
    evaluator.stop()?;
    evaluator.flush_sinks();

    let status = evaluator.status();
    let standings = evaluator.standings();
    println!("\n=== Evaluator Standings ({status}) ===");
    println!("Games played: {}", standings.games_played());
    for (id, tally) in &standings.global.tallies {
        println!(
            "{}: pnl={}, rounds={}, per 1000 rounds={:.1}",
            id,
            tally.pnl,
            tally.rounds,
            tally.win_rate()
        );
    }
    if args.show_output {
        info!(scope = GLOBAL_SCOPE, dir = %results_dir.display(), "Snapshots written");
    }
    if let EvaluatorStatus::Stalled(reason) = status {
        return Err(format!("evaluator stalled: {reason}").into());
    }
    Ok(())
}
