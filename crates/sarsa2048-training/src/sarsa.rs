//! Episodic semi-gradient Sarsa with a linear action-value estimate.
//!
//! # Algorithm
//!
//! For every episode:
//!
//! 1. `S = initial_state`, `A = policy(S)`
//! 2. Repeat:
//!    - `lr = alpha / (1 + updates)` when `alpha_decay`, else `alpha`
//!    - `S' = transition(S, A)`, `R = reward(S, A, S')`, `grad = φ(S, A)`
//!    - terminal `S'`: `w += lr · (R - Q(S, A)) · grad`, end the episode
//!    - otherwise `A' = policy(S')`, `w += lr · (R + γ · Q(S', A') - Q(S, A)) · grad`,
//!      then `S, A = S', A'`
//! 3. Record the episode; stop once the episode moved the weights by less than `tolerance`
//!    (Euclidean norm), or when `max_episodes` is reached.
//!
//! Episodes hitting `max_steps_per_episode` are cut short and recorded like any other.
//!
//! Divergence is not corrected: non-finite weights are reported through `warn!` events and
//! [`TrainingReport::weights_finite`].

use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use sarsa2048_evaluator::{
    action_value::{ActionValue, ConfigurationError},
    environment::Environment,
    policy::Policy,
};

use crate::{
    TrainingError,
    training_log::{EpisodeRecord, TrainingLog},
    weights,
};

/// How the weight vector starts out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeightInit {
    #[default]
    Zeros,
    /// Independent `N(0, sigma)` samples.
    Gaussian { sigma: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SarsaParams {
    /// Base step size.
    pub alpha: f64,
    /// Discount factor γ.
    pub discount: f64,
    /// Convergence threshold on the per-episode weight change.
    pub tolerance: f64,
    /// Divide `alpha` by `1 + updates` before every update.
    pub alpha_decay: bool,
    pub max_episodes: Option<usize>,
    pub max_steps_per_episode: Option<usize>,
    /// Log a progress report every this many episodes.
    pub progress_period: usize,
    pub policy: Policy,
    pub weight_init: WeightInit,
}

impl Default for SarsaParams {
    fn default() -> Self {
        Self {
            alpha: 1e-5,
            discount: 1.0,
            tolerance: 1e-3,
            alpha_decay: true,
            max_episodes: None,
            max_steps_per_episode: None,
            progress_period: 10,
            policy: Policy::Softmax,
            weight_init: WeightInit::Zeros,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub episodes: usize,
    pub update_count: u64,
    /// `true` when training stopped because the weights settled.
    pub converged: bool,
    pub weights_finite: bool,
    /// Weight change of the last episode.
    pub last_weight_change: f64,
    pub elapsed: Duration,
}

/// Learner owning the weight vector.
///
/// The weights are lent read-only to the estimator and the policy, and mutated only by the
/// update step.
#[derive(Debug)]
pub struct SarsaAgent<E>
where
    E: Environment,
{
    env: E,
    params: SarsaParams,
    weights: Vec<f64>,
    log: TrainingLog,
    update_count: u64,
    last_state: Option<E::State>,
}

impl<E> SarsaAgent<E>
where
    E: Environment,
{
    /// Creates an agent with weights initialized per [`SarsaParams::weight_init`].
    pub fn new<R>(env: E, params: SarsaParams, rng: &mut R) -> Result<Self, TrainingError>
    where
        R: Rng + ?Sized,
    {
        let len = env.feature_len();
        let weights = match params.weight_init {
            WeightInit::Zeros => weights::zeros(len),
            WeightInit::Gaussian { sigma } => weights::gaussian(rng, sigma, len)?,
        };
        Self::with_weights(env, params, weights)
    }

    /// Creates an agent continuing from existing weights.
    pub fn with_weights(
        env: E,
        params: SarsaParams,
        weights: Vec<f64>,
    ) -> Result<Self, TrainingError> {
        ConfigurationError::check(env.feature_len(), weights.len())?;
        Ok(Self {
            env,
            params,
            weights,
            log: TrainingLog::new(),
            update_count: 0,
            last_state: None,
        })
    }

    /// Continues the step-size schedule of an earlier run that performed `update_count`
    /// updates.
    #[must_use]
    pub fn with_update_count(mut self, update_count: u64) -> Self {
        self.update_count = update_count;
        self
    }

    #[must_use]
    pub fn env(&self) -> &E {
        &self.env
    }

    #[must_use]
    pub fn params(&self) -> &SarsaParams {
        &self.params
    }

    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[must_use]
    pub fn into_weights(self) -> Vec<f64> {
        self.weights
    }

    #[must_use]
    pub fn log(&self) -> &TrainingLog {
        &self.log
    }

    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    #[expect(clippy::cast_precision_loss)]
    fn learning_rate(&self) -> f64 {
        if self.params.alpha_decay {
            self.params.alpha / (self.update_count + 1) as f64
        } else {
            self.params.alpha
        }
    }

    /// Plays and learns from a single episode.
    pub fn run_episode<R>(&mut self, rng: &mut R) -> Result<EpisodeRecord, TrainingError>
    where
        R: Rng + ?Sized,
    {
        let episode_id = self.log.len() + 1;
        let policy = self.params.policy.for_episode(episode_id);
        let q = ActionValue::new(&self.env);

        let mut state = self.env.initial_state(rng)?;
        let mut action = policy.select(q, state, &self.weights, rng)?;
        let mut moves = 0;
        let final_state = loop {
            let lr = self.learning_rate();
            let next = self.env.transition(state, action, rng)?;
            moves += 1;
            let reward = self.env.reward(state, action, next)?;
            let grad = self.env.feature_vector(state, action)?;
            ConfigurationError::check(grad.len(), self.weights.len())?;
            let current = q.q(state, action, &self.weights)?;

            if self.env.is_terminal(next)? {
                weights::add_scaled(&mut self.weights, lr * (reward - current), &grad);
                self.update_count += 1;
                break next;
            }

            let next_action = policy.select(q, next, &self.weights, rng)?;
            let target = reward + self.params.discount * q.q(next, next_action, &self.weights)?;
            weights::add_scaled(&mut self.weights, lr * (target - current), &grad);
            self.update_count += 1;
            state = next;
            action = next_action;

            if self.params.max_steps_per_episode.is_some_and(|max| moves >= max) {
                debug!(episode_id, moves, "episode truncated");
                break state;
            }
        };

        let record = EpisodeRecord {
            episode_id,
            moves,
            highest_tile: self.env.highest_tile(final_state)?,
            update_count: self.update_count,
        };
        debug!(
            episode_id,
            moves,
            highest_tile = record.highest_tile,
            update_count = record.update_count,
            "episode finished"
        );
        self.log.push(record);
        self.last_state = Some(final_state);
        Ok(record)
    }

    /// Runs episodes until the weights settle or the episode cap is reached.
    pub fn train<R>(&mut self, rng: &mut R) -> Result<TrainingReport, TrainingError>
    where
        R: Rng + ?Sized,
    {
        let start = Instant::now();
        let first_episode = self.log.len();
        let mut weights_finite = weights::is_finite(&self.weights);
        let (converged, last_weight_change) = loop {
            let before = self.weights.clone();
            let record = self.run_episode(rng)?;
            let change = weights::l2_distance(&before, &self.weights);

            if weights_finite && !weights::is_finite(&self.weights) {
                warn!(
                    episode_id = record.episode_id,
                    "weights are no longer finite: {:?}", self.weights
                );
                weights_finite = false;
            }
            if self.params.progress_period > 0
                && record.episode_id % self.params.progress_period == 0
            {
                self.report_progress();
            }
            if change < self.params.tolerance {
                break (true, change);
            }
            if self
                .params
                .max_episodes
                .is_some_and(|max| self.log.len() - first_episode >= max)
            {
                break (false, change);
            }
        };

        let report = TrainingReport {
            episodes: self.log.len() - first_episode,
            update_count: self.update_count,
            converged,
            weights_finite: weights::is_finite(&self.weights),
            last_weight_change,
            elapsed: start.elapsed(),
        };
        info!(
            episodes = report.episodes,
            update_count = report.update_count,
            converged = report.converged,
            "training finished in {:.2?}",
            report.elapsed
        );
        self.report_progress();
        Ok(report)
    }

    fn report_progress(&self) {
        let Some(last) = self.log.last() else {
            return;
        };
        info!("episode {}: weights {:?}", last.episode_id, self.weights);
        if let Some(state) = self.last_state {
            info!("final board:\n{}", self.env.render_state(state));
        }
        let tail = self.log.records().iter().rev().take(5).rev();
        for record in tail {
            info!(
                "  episode {:>6}  moves {:>5}  highest {:>5}  updates {:>9}",
                record.episode_id, record.moves, record.highest_tile, record.update_count
            );
        }
        let window = self.params.progress_period.max(1);
        if let Some(average) = self.log.recent_average_moves(window) {
            info!("average moves (last {window}): {average:.1}");
        }
        info!("highest tile: {}", self.log.highest_tile_tally());
    }
}
