use std::path::PathBuf;

use anyhow::Context;
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

use sarsa2048_evaluator::{
    board_feature::FeatureSet, environment::Game2048Env, feature_extractor::FeatureExtractor,
};
use sarsa2048_training::benchmark::{self, BenchmarkParams, BenchmarkSummary};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BenchmarkArg {
    /// JSON weight model written by `train`
    #[arg(long, required_unless_present = "weights")]
    model: Option<PathBuf>,
    /// Flat weight file, used with `--features`
    #[arg(long, conflicts_with = "model")]
    weights: Option<PathBuf>,
    /// Feature set the flat weights were trained with
    #[arg(long, default_value = "full")]
    features: FeatureSet,
    /// Number of games
    #[arg(long, default_value_t = 100)]
    games: usize,
    /// Per-game move cap
    #[arg(long)]
    max_moves: Option<usize>,
    /// Worker threads (default: available parallelism)
    #[arg(long)]
    threads: Option<usize>,
    /// Master random seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Write per-game results as CSV
    #[arg(long)]
    output: Option<PathBuf>,
}

fn load(arg: &BenchmarkArg) -> anyhow::Result<(Game2048Env, Vec<f64>)> {
    if let Some(path) = &arg.model {
        let model = util::read_weight_model_file(path)?;
        let env = model
            .to_env()
            .with_context(|| format!("Invalid weight model: {}", path.display()))?;
        return Ok((env, model.weights()));
    }
    let path = arg
        .weights
        .as_ref()
        .context("Either --model or --weights is required")?;
    let weights = util::read_flat_weights_file(path)?;
    Ok((
        Game2048Env::new(FeatureExtractor::from_set(arg.features)),
        weights,
    ))
}

pub(crate) fn run(arg: &BenchmarkArg) -> anyhow::Result<()> {
    let (env, weights) = load(arg)?;
    let params = BenchmarkParams {
        games: arg.games,
        max_moves: arg.max_moves,
        threads: arg.threads,
    };
    let mut rng = match arg.seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_rng(&mut rand::rng()),
    };

    let seeds = benchmark::draw_seeds(&mut rng, params.games);
    eprintln!("Playing {} greedy games...", seeds.len());
    let results = benchmark::play_greedy_games(&env, &weights, &seeds, &params)?;

    if let Some(path) = &arg.output {
        let mut output = Output::create(Some(path.as_path()))?;
        benchmark::write_results_csv(&results, &mut output)
            .with_context(|| format!("Failed to write results to {}", path.display()))?;
        eprintln!("Results saved to {}", output.label());
    }

    let Some(summary) = BenchmarkSummary::from_results(&results) else {
        eprintln!("No games played");
        return Ok(());
    };
    eprintln!("Benchmark summary ({} games):", summary.games);
    eprintln!("  Highest tiles: {}", summary.highest_tile);
    eprintln!("  Win rate:      {:.1}%", summary.win_rate * 100.0);
    for (label, stats) in [("Score", &summary.score), ("Moves", &summary.total_moves)] {
        eprintln!(
            "  {label:<6} min {:.0}, median {:.0}, mean {:.1}, max {:.0}, std {:.1}",
            stats.min, stats.median, stats.mean, stats.max, stats.std_dev
        );
    }

    Ok(())
}
