//! Feature extraction, action values and policies for a linear 2048 agent.
//!
//! The crate is layered bottom-up:
//!
//! ```text
//! Policy (choose an action from estimated values)
//!     ↓ uses
//! ActionValue (Q(s, a) = w · φ(s, a), zero at terminal states)
//!     ↓ uses
//! Environment (transitions, rewards, feature vectors)
//!     ↓ uses
//! FeatureExtractor (φ from the afterstate of a move)
//! ```
//!
//! - [`board_analysis`] - Lazily evaluated board metrics (neighbour differences, moments,
//!   positional sums)
//! - [`move_analysis`] - Afterstate of a move plus what the move achieved
//! - [`board_feature`] - The 13 named features and the [`FeatureSet`](board_feature::FeatureSet)s
//!   built from them
//! - [`feature_extractor`] - Ordered feature lists producing fixed-length vectors
//! - [`environment`] - The agent/environment boundary and its 2048 implementation
//! - [`action_value`] - Linear action-value estimation
//! - [`policy`] - Random, greedy, epsilon-greedy and softmax action selection
//!
//! Weights are never owned here: estimators and policies borrow them as `&[f64]`.

use self::{action_value::ConfigurationError, environment::EnvironmentError, policy::PolicyError};

pub mod action_value;
pub mod board_analysis;
pub mod board_feature;
pub mod environment;
pub mod feature_extractor;
pub mod move_analysis;
pub mod policy;

/// Failure while estimating values or selecting an action.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum EvaluationError {
    #[display("{_0}")]
    Environment(EnvironmentError),
    #[display("{_0}")]
    Configuration(ConfigurationError),
    #[display("{_0}")]
    Policy(PolicyError),
}
