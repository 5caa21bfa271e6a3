//! Greedy playouts of a frozen weight vector.
//!
//! Each game gets its own [`GameSeed`], drawn sequentially from a master generator, so the
//! outcome of a benchmark depends only on the master seed and never on thread scheduling.
//! Games are spread over scoped threads; results come back in game order.

use std::{io, iter, num::NonZero, thread};

use rand::Rng;
use serde::{Deserialize, Serialize};

use sarsa2048_engine::{GameSeed, GameSession, WINNING_TILE};
use sarsa2048_evaluator::{
    action_value::{ActionValue, ConfigurationError},
    environment::{Environment as _, EnvironmentError, Game2048Env},
    policy::Policy,
};
use sarsa2048_stats::{descriptive::DescriptiveStats, tally::Tally};

use crate::TrainingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkParams {
    pub games: usize,
    /// Per-game move cap.
    pub max_moves: Option<usize>,
    /// Worker threads; defaults to the available parallelism.
    pub threads: Option<usize>,
}

impl Default for BenchmarkParams {
    fn default() -> Self {
        Self {
            games: 100,
            max_moves: None,
            threads: None,
        }
    }
}

/// Outcome of one greedy game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoutResult {
    pub game: usize,
    pub seed: GameSeed,
    pub highest_tile: u32,
    pub score: u64,
    pub total_moves: usize,
}

/// Draws one seed per game from `rng`, in game order.
pub fn draw_seeds<R>(rng: &mut R, games: usize) -> Vec<GameSeed>
where
    R: Rng + ?Sized,
{
    (0..games).map(|_| rng.random()).collect()
}

/// Plays one game choosing every move greedily under `weights`.
pub fn play_greedy_game(
    env: &Game2048Env,
    weights: &[f64],
    seed: GameSeed,
    max_moves: Option<usize>,
) -> Result<PlayoutResult, TrainingError> {
    let q = ActionValue::new(env);
    let mut session = GameSession::new(seed);
    let mut steps = 0;
    while !session.status().is_terminal() && max_moves.is_none_or(|max| steps < max) {
        let state = session
            .board()
            .to_state_id()
            .map_err(EnvironmentError::from)?;
        let action = Policy::Greedy.select(q, state, weights, session.rng_mut())?;
        session
            .play_move(action)
            .map_err(EnvironmentError::from)?;
        steps += 1;
    }
    let stats = session.stats();
    Ok(PlayoutResult {
        game: 0,
        seed,
        highest_tile: stats.highest_tile(),
        score: stats.score(),
        total_moves: stats.moves(),
    })
}

/// Plays one greedy game per seed in parallel.
pub fn play_greedy_games(
    env: &Game2048Env,
    weights: &[f64],
    seeds: &[GameSeed],
    params: &BenchmarkParams,
) -> Result<Vec<PlayoutResult>, TrainingError> {
    ConfigurationError::check(env.feature_len(), weights.len())?;
    let threads = params
        .threads
        .unwrap_or_else(|| thread::available_parallelism().map_or(1, NonZero::get))
        .max(1);
    let chunk_size = seeds.len().div_ceil(threads).max(1);

    let mut results = vec![None; seeds.len()];
    thread::scope(|s| {
        for (seeds, slots) in iter::zip(seeds.chunks(chunk_size), results.chunks_mut(chunk_size)) {
            s.spawn(move || {
                for (&seed, slot) in iter::zip(seeds, slots) {
                    *slot = Some(play_greedy_game(env, weights, seed, params.max_moves));
                }
            });
        }
    });

    results
        .into_iter()
        .flatten()
        .enumerate()
        .map(|(game, result)| result.map(|r| PlayoutResult { game, ..r }))
        .collect()
}

/// Writes one CSV row per game.
pub fn write_results_csv<W>(results: &[PlayoutResult], writer: W) -> Result<(), csv::Error>
where
    W: io::Write,
{
    let mut writer = csv::Writer::from_writer(writer);
    for result in results {
        writer.serialize(result)?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkSummary {
    pub games: usize,
    pub highest_tile: Tally<u32>,
    pub score: DescriptiveStats,
    pub total_moves: DescriptiveStats,
    /// Fraction of games reaching the winning tile.
    pub win_rate: f64,
}

impl BenchmarkSummary {
    /// Summarizes `results`; `None` when empty.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_results(results: &[PlayoutResult]) -> Option<Self> {
        let highest_tile = Tally::from_values(results.iter().map(|r| r.highest_tile));
        let wins = highest_tile
            .iter()
            .filter(|(tile, _)| **tile >= WINNING_TILE)
            .map(|(_, count)| count)
            .sum::<usize>();
        Some(Self {
            games: results.len(),
            score: DescriptiveStats::new(results.iter().map(|r| r.score as f64))?,
            total_moves: DescriptiveStats::new(results.iter().map(|r| r.total_moves as f64))?,
            win_rate: wins as f64 / results.len() as f64,
            highest_tile,
        })
    }
}
