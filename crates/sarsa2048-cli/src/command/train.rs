use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

use sarsa2048_evaluator::{
    board_feature::{BoardFeature as _, FeatureSet},
    environment::{ActionSpace, Game2048Env, RewardScheme},
    feature_extractor::FeatureExtractor,
    policy::Policy,
};
use sarsa2048_training::{
    sarsa::{SarsaAgent, SarsaParams, WeightInit},
    weights,
};

use crate::{
    schema::weight_model::{TrainedFeature, WeightModel},
    util::{self, Output},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PolicyKind {
    Random,
    Greedy,
    EpsilonGreedy,
    DecayingEpsilonGreedy,
    Softmax,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ActionSpaceKind {
    ValidOnly,
    All,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Feature set (full, moments)
    #[arg(long, default_value = "full")]
    features: FeatureSet,
    /// Behavior policy
    #[arg(long, value_enum, default_value = "softmax")]
    policy: PolicyKind,
    /// Exploration rate for `epsilon-greedy`
    #[arg(long, default_value_t = 0.1)]
    epsilon: f64,
    /// Actions the policy may choose from
    #[arg(long, value_enum, default_value = "valid-only")]
    action_space: ActionSpaceKind,
    /// Base step size
    #[arg(long, default_value_t = 1e-5)]
    alpha: f64,
    /// Keep the step size constant instead of dividing it by the update count
    #[arg(long)]
    no_alpha_decay: bool,
    /// Discount factor
    #[arg(long, default_value_t = 1.0)]
    discount: f64,
    /// Stop once an episode changes the weights by less than this
    #[arg(long, default_value_t = 1e-3)]
    tolerance: f64,
    /// Stop after this many episodes
    #[arg(long)]
    max_episodes: Option<usize>,
    /// Truncate episodes after this many moves
    #[arg(long)]
    max_steps: Option<usize>,
    /// Episodes between progress reports
    #[arg(long, default_value_t = 10)]
    progress_period: usize,
    /// Initialize weights from N(0, sigma) instead of zeros
    #[arg(long)]
    init_sigma: Option<f64>,
    /// Start from an existing weight model instead of fresh weights
    #[arg(long, conflicts_with = "init_sigma")]
    resume: Option<PathBuf>,
    /// Master random seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Output file for the JSON weight model (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Also write the weights as flat text, one per line
    #[arg(long)]
    weights: Option<PathBuf>,
    /// Write the per-episode log as CSV
    #[arg(long)]
    log: Option<PathBuf>,
}

impl TrainArg {
    fn policy(&self) -> Policy {
        match self.policy {
            PolicyKind::Random => Policy::Random,
            PolicyKind::Greedy => Policy::Greedy,
            PolicyKind::EpsilonGreedy => Policy::EpsilonGreedy {
                epsilon: self.epsilon,
            },
            PolicyKind::DecayingEpsilonGreedy => Policy::DecayingEpsilonGreedy,
            PolicyKind::Softmax => Policy::Softmax,
        }
    }

    fn action_space(&self) -> ActionSpace {
        match self.action_space {
            ActionSpaceKind::ValidOnly => ActionSpace::ValidOnly,
            ActionSpaceKind::All => ActionSpace::All,
        }
    }

    pub(crate) fn params(&self) -> SarsaParams {
        SarsaParams {
            alpha: self.alpha,
            discount: self.discount,
            tolerance: self.tolerance,
            alpha_decay: !self.no_alpha_decay,
            max_episodes: self.max_episodes,
            max_steps_per_episode: self.max_steps,
            progress_period: self.progress_period,
            policy: self.policy(),
            weight_init: self
                .init_sigma
                .map_or(WeightInit::Zeros, |sigma| WeightInit::Gaussian { sigma }),
        }
    }
}

/// Rebuilds the agent saved in `model`, continuing its step-size schedule.
fn resume_agent(
    model: &WeightModel,
    params: SarsaParams,
    action_space: ActionSpace,
) -> anyhow::Result<SarsaAgent<Game2048Env>> {
    let env = model.to_env()?.with_action_space(action_space);
    let agent = SarsaAgent::with_weights(env, params, model.weights())?
        .with_update_count(model.update_count);
    Ok(agent)
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let params = arg.params();
    let mut rng = match arg.seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_rng(&mut rand::rng()),
    };

    let mut prior_episodes = 0;
    let mut agent = match &arg.resume {
        Some(path) => {
            let model = util::read_weight_model_file(path)?;
            eprintln!(
                "Resuming from {} ({} episodes, {} updates, {} features)",
                path.display(),
                model.episodes,
                model.update_count,
                model.features.len()
            );
            prior_episodes = model.episodes;
            resume_agent(&model, params, arg.action_space())?
        }
        None => {
            let env = Game2048Env::new(FeatureExtractor::from_set(arg.features))
                .with_rewards(RewardScheme::default())
                .with_action_space(arg.action_space());
            SarsaAgent::new(env, params, &mut rng)?
        }
    };

    eprintln!(
        "Training with features {:?}, policy {}",
        agent.env().extractor().ids(),
        params.policy
    );
    let report = agent.train(&mut rng)?;

    eprintln!("Training finished:");
    eprintln!("  Episodes:      {}", report.episodes);
    eprintln!("  Updates:       {}", report.update_count);
    eprintln!("  Converged:     {}", report.converged);
    eprintln!("  Weights OK:    {}", report.weights_finite);
    eprintln!("  Last change:   {:.3e}", report.last_weight_change);
    eprintln!("  Elapsed:       {:.2?}", report.elapsed);
    eprintln!("  Highest tiles: {}", agent.log().highest_tile_tally());
    if let Some(avg) = agent.log().recent_average_moves(params.progress_period) {
        eprintln!("  Recent moves:  {avg:.1}");
    }

    if let Some(path) = &arg.log {
        let mut output = Output::create(Some(path.as_path()))?;
        agent
            .log()
            .write_csv(&mut output)
            .with_context(|| format!("Failed to write training log to {}", path.display()))?;
        eprintln!("Training log saved to {}", output.label());
    }

    if let Some(path) = &arg.weights {
        let mut output = Output::create(Some(path.as_path()))?;
        weights::write_flat(agent.weights(), &mut output)
            .with_context(|| format!("Failed to write weights to {}", path.display()))?;
        eprintln!("Weights saved to {}", output.label());
    }

    let env = agent.env();
    let model = WeightModel {
        trained_at: Utc::now(),
        episodes: prior_episodes + report.episodes,
        update_count: report.update_count,
        converged: report.converged,
        params,
        rewards: *env.rewards(),
        action_space: env.action_space(),
        features: env
            .extractor()
            .features()
            .iter()
            .zip(agent.weights())
            .map(|(feature, &weight)| TrainedFeature {
                id: feature.id().to_owned(),
                name: feature.name().to_owned(),
                weight,
            })
            .collect(),
    };
    Output::create(arg.output.as_deref())?.write_json(&model)?;

    Ok(())
}
