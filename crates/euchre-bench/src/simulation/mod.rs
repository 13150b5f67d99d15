mod game;

pub use game::{ContractRecord, GameError, GameRecord, HandRecord, MAX_ROUNDS, play_game};

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rand::{RngCore, SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::analytics::{AnalyticsError, SimulationStats};
use crate::config::{ResolvedOutputs, SimulationConfig};
use crate::features::FeatureRow;

/// Plays the configured number of games on a worker pool and writes the
/// hand log, optional feature rows and the summary table.
pub struct SimulationRunner {
    config: SimulationConfig,
    outputs: ResolvedOutputs,
    threads: usize,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub games_played: u64,
    pub games_failed: u64,
    pub rounds: u64,
    pub threads: usize,
    pub rows_written: usize,
    pub features_written: usize,
    pub hands_path: PathBuf,
    pub summary_path: PathBuf,
    pub features_path: Option<PathBuf>,
    pub elapsed: Duration,
    pub stats: SimulationStats,
}

impl SimulationRunner {
    pub fn new(config: SimulationConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let threads = match config.games.threads {
            0 => std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            n => n,
        };
        Ok(Self {
            config,
            outputs,
            threads,
        })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Execute every game. Output files depend only on the seed, never on
    /// the number of worker threads.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.hands_jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;
        if let Some(path) = self.outputs.features_jsonl.as_ref() {
            ensure_parent(path.parent())?;
        }

        let run_id = self.config.run_id.as_str();
        let seeds = game_seeds(self.config.games.seed.unwrap_or(0), self.config.games.count);
        let params = self.config.strategy;
        let record_features = self.outputs.features_jsonl.is_some();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()?;

        event!(
            target: "euchre_bench::run",
            Level::INFO,
            run_id,
            games = seeds.len() as u64,
            threads = self.threads as u64,
            "simulation started"
        );
        let started = Instant::now();

        let results: Vec<Result<GameRecord, GameError>> = pool.install(|| {
            seeds
                .par_iter()
                .enumerate()
                .map(|(index, &seed)| {
                    isolate_game(|| play_game(index, seed, &params, record_features))
                })
                .collect()
        });

        let stats = pool.install(|| {
            results
                .par_iter()
                .fold(SimulationStats::new, |mut stats, result| {
                    match result {
                        Ok(game) => stats.record_game(game),
                        Err(_) => stats.record_failure(),
                    }
                    stats
                })
                .reduce(SimulationStats::new, SimulationStats::merge)
        });

        let mut hands_writer = BufWriter::new(File::create(&self.outputs.hands_jsonl)?);
        let mut features_writer = match self.outputs.features_jsonl.as_ref() {
            Some(path) => Some(BufWriter::new(File::create(path)?)),
            None => None,
        };
        let mut rows_written = 0usize;
        let mut features_written = 0usize;

        for (index, result) in results.iter().enumerate() {
            let game = match result {
                Ok(game) => game,
                Err(err) => {
                    event!(
                        target: "euchre_bench::run",
                        Level::WARN,
                        run_id,
                        game_index = index as u64,
                        seed = seeds[index],
                        error = %err,
                        "game failed and was skipped"
                    );
                    continue;
                }
            };

            event!(
                target: "euchre_bench::game",
                Level::DEBUG,
                run_id,
                game_index = index as u64,
                seed = game.seed,
                rounds = game.rounds() as u64,
                winner = %game.winner,
                "game complete"
            );

            for hand in &game.hands {
                write_row(&mut hands_writer, &LogRow { run_id, row: hand })?;
                rows_written += 1;
            }
            if let Some(writer) = features_writer.as_mut() {
                for feature in &game.features {
                    write_row(writer, &LogRow { run_id, row: feature })?;
                    features_written += 1;
                }
            }
        }

        hands_writer.flush()?;
        if let Some(writer) = features_writer.as_mut() {
            writer.flush()?;
        }

        stats.write_markdown(run_id, &self.outputs.summary_md)?;
        let elapsed = started.elapsed();

        event!(
            target: "euchre_bench::run",
            Level::INFO,
            run_id,
            games_played = stats.games,
            games_failed = stats.games_failed,
            rounds = stats.rounds,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "simulation finished"
        );

        Ok(RunSummary {
            games_played: stats.games,
            games_failed: stats.games_failed,
            rounds: stats.rounds,
            threads: self.threads,
            rows_written,
            features_written,
            hands_path: self.outputs.hands_jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            features_path: self.outputs.features_jsonl.clone(),
            elapsed,
            stats,
        })
    }
}

/// Runs one game so that a panic fails that game alone.
fn isolate_game<F>(game: F) -> Result<GameRecord, GameError>
where
    F: FnOnce() -> Result<GameRecord, GameError>,
{
    panic::catch_unwind(AssertUnwindSafe(game)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|text| (*text).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Err(GameError::Panicked { message })
    })
}

/// One seed per game, drawn in order from the run seed.
pub fn game_seeds(run_seed: u64, count: usize) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(run_seed);
    (0..count).map(|_| rng.next_u64()).collect()
}

#[derive(Serialize)]
struct LogRow<'a, T: Serialize> {
    run_id: &'a str,
    #[serde(flatten)]
    row: &'a T,
}

fn write_row<W: Write, T: Serialize>(writer: &mut W, row: &T) -> Result<(), RunnerError> {
    serde_json::to_writer(&mut *writer, row)?;
    writer.write_all(b"\n")?;
    Ok(())
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}
