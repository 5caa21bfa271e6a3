//! Linear action-value estimation: `Q(s, a) = w · φ(s, a)`.

use std::iter;

use crate::{
    EvaluationError,
    environment::{Environment, EnvironmentError},
};

/// Feature vector and weight vector lengths disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("feature vector has {features} entries but weight vector has {weights}")]
pub struct ConfigurationError {
    pub features: usize,
    pub weights: usize,
}

impl ConfigurationError {
    /// Checks that `weights` has `features` entries.
    pub fn check(features: usize, weights: usize) -> Result<(), Self> {
        if features == weights {
            Ok(())
        } else {
            Err(Self { features, weights })
        }
    }
}

/// Read-only view of an environment's action values under externally owned weights.
#[derive(Debug)]
pub struct ActionValue<'a, E> {
    env: &'a E,
}

impl<E> Clone for ActionValue<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for ActionValue<'_, E> {}

impl<'a, E> ActionValue<'a, E>
where
    E: Environment,
{
    #[must_use]
    pub fn new(env: &'a E) -> Self {
        Self { env }
    }

    #[must_use]
    pub fn env(&self) -> &'a E {
        self.env
    }

    /// Estimates `Q(state, action)`.
    ///
    /// Returns exactly `0.0` for terminal states, whatever the weights.
    pub fn q(
        &self,
        state: E::State,
        action: E::Action,
        weights: &[f64],
    ) -> Result<f64, EvaluationError> {
        if self.env.is_terminal(state)? {
            return Ok(0.0);
        }
        let phi = self.env.feature_vector(state, action)?;
        ConfigurationError::check(phi.len(), weights.len())?;
        Ok(dot(&phi, weights))
    }

    /// Estimates the values of every action in `actions`, in order.
    pub fn q_all(
        &self,
        state: E::State,
        actions: &[E::Action],
        weights: &[f64],
    ) -> Result<Vec<f64>, EvaluationError> {
        actions
            .iter()
            .map(|&action| self.q(state, action, weights))
            .collect()
    }

    /// Gradient of `Q(state, action)` with respect to the weights, i.e. `φ(state, action)`.
    pub fn gradient(
        &self,
        state: E::State,
        action: E::Action,
    ) -> Result<Vec<f64>, EnvironmentError> {
        self.env.feature_vector(state, action)
    }
}

#[must_use]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    iter::zip(a, b).map(|(x, y)| x * y).sum()
}
