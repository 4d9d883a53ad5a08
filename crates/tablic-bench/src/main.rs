use std::path::PathBuf;

use clap::Parser;

use tablic_bench::config::{BenchmarkConfig, ResolvedOutputs};
use tablic_bench::logging::init_logging;
use tablic_bench::tournament::TournamentRunner;

/// Match harness for Tablic bots.
#[derive(Debug, Parser)]
#[command(
    name = "tablic-bench",
    author,
    version,
    about = "Deterministic Tablic match harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of matches to play.
    #[arg(long, value_name = "COUNT")]
    matches: Option<usize>,

    /// Override the RNG seed for deck shuffles.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no match is played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(matches) = cli.matches {
        config.matches.count = matches;
    }

    if let Some(seed) = cli.seed {
        config.matches.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let player_count = config.players.len();
    let run_id = config.run_id.clone();
    let matches = config.matches.count;

    println!("Loaded configuration '{run_id}' with {player_count} players ({matches} matches)");

    let logging = config.logging.clone();
    let runner = TournamentRunner::new(config, outputs.clone())?;

    if cli.validate_only {
        println!("Validation-only mode: no matches played.");
        return Ok(());
    }

    let _logging_guard = init_logging(&logging, &outputs)?;

    let summary = runner.run()?;
    println!(
        "Run complete for '{run_id}': {} matches → {} rows at {}",
        summary.matches_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(moves_path) = summary.moves_path.as_ref() {
        println!("Move log: {} moves at {}", summary.moves_written, moves_path.display());
    }
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }
    for standing in &summary.standings {
        println!(
            "  {:<12} total {:>5}  wins {:>3}  ties {:>3}",
            standing.name, standing.total_score, standing.wins, standing.ties
        );
    }

    Ok(())
}
