use std::path::PathBuf;

use clap::Parser;

use euchre_bench::config::{ResolvedOutputs, SimulationConfig};
use euchre_bench::logging::init_logging;
use euchre_bench::simulation::SimulationRunner;
use euchre_core::AppInfo;

/// Offline simulation harness for the Euchre heuristics.
#[derive(Debug, Parser)]
#[command(
    name = "euchre-bench",
    author,
    version,
    about = "Deterministic Euchre self-play simulation"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/sim.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for per-game seeds.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the worker thread count (0 uses every core).
    #[arg(long, value_name = "COUNT")]
    threads: Option<usize>,

    /// Exit after validating the configuration (no games are played).
    #[arg(long)]
    validate_only: bool,

    /// Write per-decision feature rows even if the config does not ask for them.
    #[arg(long)]
    log_features: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = SimulationConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.games.count = games;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }

    if let Some(threads) = cli.threads {
        config.games.threads = threads;
    }

    if cli.log_features {
        config.outputs.enable_features();
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let games = config.games.count;

    println!(
        "{} {}: loaded configuration '{run_id}' ({games} game{}, stick-the-dealer {})",
        AppInfo::name(),
        AppInfo::version(),
        if games == 1 { "" } else { "s" },
        if config.strategy.stick_the_dealer { "on" } else { "off" }
    );

    let logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = SimulationRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: simulation skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Simulation complete for '{run_id}': {} games ({} failed) on {} threads, {} rounds in {:.2}s",
        summary.games_played,
        summary.games_failed,
        summary.threads,
        summary.rounds,
        summary.elapsed.as_secs_f64()
    );
    println!(
        "Hand log: {} ({} rows)",
        summary.hands_path.display(),
        summary.rows_written
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(path) = summary.features_path.as_ref() {
        println!(
            "Feature rows: {} ({} rows)",
            path.display(),
            summary.features_written
        );
    }
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
