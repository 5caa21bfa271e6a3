//! Learning and evaluating linear 2048 agents.
//!
//! - [`sarsa`] - Episodic semi-gradient Sarsa ([`sarsa::SarsaAgent`]) and its parameters
//! - [`training_log`] - Per-episode statistics, exportable as CSV
//! - [`weights`] - Weight vector initialization, updates and flat-text persistence
//! - [`benchmark`] - Parallel greedy playouts of a frozen weight vector
//!
//! # Architecture
//!
//! ```text
//! SarsaAgent (owns weights, runs episodes)
//!     ↓ lends &[f64] to
//! Policy + ActionValue (sarsa2048-evaluator)
//!     ↓ query
//! Environment (sarsa2048-evaluator)
//!     ↓ built on
//! Board / StateId (sarsa2048-engine)
//! ```
//!
//! Training is single-threaded: the agent is the only writer of its weights. Only
//! [`benchmark::play_greedy_games`] runs in parallel, over weights that no longer change.
//!
//! # Example
//!
//! ```no_run
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//! use sarsa2048_evaluator::{
//!     board_feature::FeatureSet, environment::Game2048Env, feature_extractor::FeatureExtractor,
//! };
//! use sarsa2048_training::sarsa::{SarsaAgent, SarsaParams};
//!
//! let env = Game2048Env::new(FeatureExtractor::from_set(FeatureSet::Moments));
//! let mut rng = Pcg32::seed_from_u64(0);
//! let mut agent = SarsaAgent::new(env, SarsaParams::default(), &mut rng)?;
//! let report = agent.train(&mut rng)?;
//! println!("{} episodes, converged: {}", report.episodes, report.converged);
//! # Ok::<(), sarsa2048_training::TrainingError>(())
//! ```

use sarsa2048_evaluator::{
    EvaluationError, action_value::ConfigurationError, environment::EnvironmentError,
    policy::PolicyError,
};

pub mod benchmark;
pub mod sarsa;
pub mod training_log;
pub mod weights;

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TrainingError {
    #[display("{_0}")]
    Evaluation(EvaluationError),
    #[display("invalid weight initialization: {_0}")]
    WeightInit(weights::InvalidSigmaError),
}

impl From<EnvironmentError> for TrainingError {
    fn from(err: EnvironmentError) -> Self {
        Self::Evaluation(err.into())
    }
}

impl From<ConfigurationError> for TrainingError {
    fn from(err: ConfigurationError) -> Self {
        Self::Evaluation(err.into())
    }
}

impl From<PolicyError> for TrainingError {
    fn from(err: PolicyError) -> Self {
        Self::Evaluation(err.into())
    }
}
