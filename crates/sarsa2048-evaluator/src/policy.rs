//! Action selection policies.
//!
//! A [`Policy`] turns the estimated action values of a state into a concrete action. Every
//! stochastic choice draws from the generator handed in, so a seeded generator reproduces a
//! whole run.
//!
//! | policy | choice |
//! |--------|--------|
//! | [`Policy::Random`] | uniform over the available actions |
//! | [`Policy::Greedy`] | an action with the highest value, ties broken uniformly |
//! | [`Policy::EpsilonGreedy`] | random with probability `epsilon`, greedy otherwise |
//! | [`Policy::DecayingEpsilonGreedy`] | epsilon-greedy with `epsilon = 1 / episode` |
//! | [`Policy::Softmax`] | action `a` with probability `exp(Q(a) - max Q) / Σ exp(Q(b) - max Q)` |

use rand::{
    Rng,
    distr::{Distribution as _, weighted::WeightedIndex},
    seq::IndexedRandom as _,
};
use serde::{Deserialize, Serialize};

use crate::{EvaluationError, action_value::ActionValue, environment::Environment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PolicyError {
    #[display("no action available in a non-terminal state")]
    NoActions,
    #[display("action values are not finite")]
    NonFiniteValues,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, derive_more::Display)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Policy {
    #[display("random")]
    Random,
    #[display("greedy")]
    Greedy,
    #[display("epsilon-greedy (epsilon = {epsilon})")]
    EpsilonGreedy { epsilon: f64 },
    /// Epsilon-greedy whose exploration rate decays as `1 / episode`.
    ///
    /// Resolve it per episode with [`Policy::for_episode`]; used unresolved it behaves as in
    /// the first episode.
    #[display("decaying epsilon-greedy")]
    DecayingEpsilonGreedy,
    #[default]
    #[display("softmax")]
    Softmax,
}

impl Policy {
    /// Returns the concrete policy to use during episode `episode` (1-based).
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn for_episode(self, episode: usize) -> Self {
        match self {
            Self::DecayingEpsilonGreedy => Self::EpsilonGreedy {
                epsilon: 1.0 / episode.max(1) as f64,
            },
            policy => policy,
        }
    }

    /// Chooses an action for the non-terminal `state`.
    pub fn select<E, R>(
        self,
        values: ActionValue<'_, E>,
        state: E::State,
        weights: &[f64],
        rng: &mut R,
    ) -> Result<E::Action, EvaluationError>
    where
        E: Environment,
        R: Rng + ?Sized,
    {
        let actions = values.env().valid_actions(state)?;
        if actions.is_empty() {
            return Err(PolicyError::NoActions.into());
        }
        let action = match self {
            Self::Random => choose_random(&actions, rng)?,
            Self::Greedy => {
                let q = values.q_all(state, &actions, weights)?;
                choose_greedy(&actions, &q, rng)?
            }
            Self::EpsilonGreedy { epsilon } => {
                if rng.random::<f64>() < epsilon {
                    choose_random(&actions, rng)?
                } else {
                    let q = values.q_all(state, &actions, weights)?;
                    choose_greedy(&actions, &q, rng)?
                }
            }
            Self::Softmax => {
                let q = values.q_all(state, &actions, weights)?;
                choose_softmax(&actions, &q, rng)?
            }
            // epsilon = 1 in the first episode
            Self::DecayingEpsilonGreedy => choose_random(&actions, rng)?,
        };
        Ok(action)
    }
}

fn choose_random<A, R>(actions: &[A], rng: &mut R) -> Result<A, PolicyError>
where
    A: Copy,
    R: Rng + ?Sized,
{
    actions.choose(rng).copied().ok_or(PolicyError::NoActions)
}

/// Picks uniformly among the actions sharing the highest value.
fn choose_greedy<A, R>(actions: &[A], values: &[f64], rng: &mut R) -> Result<A, PolicyError>
where
    A: Copy,
    R: Rng + ?Sized,
{
    if values.iter().any(|v| v.is_nan()) {
        return Err(PolicyError::NonFiniteValues);
    }
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let best = actions
        .iter()
        .zip(values)
        .filter(|(_, v)| **v == max)
        .map(|(a, _)| *a)
        .collect::<Vec<_>>();
    choose_random(&best, rng)
}

fn choose_softmax<A, R>(actions: &[A], values: &[f64], rng: &mut R) -> Result<A, PolicyError>
where
    A: Copy,
    R: Rng + ?Sized,
{
    if values.iter().any(|v| !v.is_finite()) {
        return Err(PolicyError::NonFiniteValues);
    }
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let weights = values.iter().map(|v| (v - max).exp());
    let dist = WeightedIndex::new(weights).map_err(|_| PolicyError::NonFiniteValues)?;
    Ok(actions[dist.sample(rng)])
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::environment::EnvironmentError;

    /// One non-terminal state (`0`) whose action `a` has the single feature `values[a]`.
    #[derive(Debug)]
    struct Bandit {
        values: Vec<f64>,
    }

    impl Environment for Bandit {
        type State = u8;
        type Action = usize;

        fn feature_len(&self) -> usize {
            1
        }

        fn initial_state<R>(&self, _rng: &mut R) -> Result<u8, EnvironmentError>
        where
            R: Rng + ?Sized,
        {
            Ok(0)
        }

        fn valid_actions(&self, state: u8) -> Result<Vec<usize>, EnvironmentError> {
            if state == 0 {
                Ok((0..self.values.len()).collect())
            } else {
                Ok(vec![])
            }
        }

        fn transition<R>(&self, _: u8, _: usize, _: &mut R) -> Result<u8, EnvironmentError>
        where
            R: Rng + ?Sized,
        {
            Ok(1)
        }

        fn reward(&self, _: u8, _: usize, _: u8) -> Result<f64, EnvironmentError> {
            Ok(0.0)
        }

        fn is_terminal(&self, state: u8) -> Result<bool, EnvironmentError> {
            Ok(state != 0)
        }

        fn feature_vector(&self, _: u8, action: usize) -> Result<Vec<f64>, EnvironmentError> {
            Ok(vec![self.values[action]])
        }

        fn highest_tile(&self, _: u8) -> Result<u32, EnvironmentError> {
            Ok(0)
        }
    }

    fn counts(policy: Policy, env: &Bandit, trials: usize, seed: u64) -> Vec<usize> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let values = ActionValue::new(env);
        let mut counts = vec![0; env.values.len()];
        for _ in 0..trials {
            let a = policy.select(values, 0, &[1.0], &mut rng).unwrap();
            counts[a] += 1;
        }
        counts
    }

    #[test]
    fn test_greedy_picks_maximum() {
        let env = Bandit {
            values: vec![1.0, 5.0, 3.0],
        };
        assert_eq!(counts(Policy::Greedy, &env, 100, 0), [0, 100, 0]);
    }

    #[test]
    fn test_greedy_breaks_ties_uniformly() {
        let env = Bandit {
            values: vec![2.0, 2.0],
        };
        let counts = counts(Policy::Greedy, &env, 10_000, 1);
        assert!((4_500..=5_500).contains(&counts[0]), "{counts:?}");
    }

    #[test]
    fn test_epsilon_extremes() {
        let env = Bandit {
            values: vec![0.0, 1.0],
        };
        let greedy = counts(Policy::EpsilonGreedy { epsilon: 0.0 }, &env, 200, 2);
        assert_eq!(greedy, [0, 200]);
        let random = counts(Policy::EpsilonGreedy { epsilon: 1.0 }, &env, 2_000, 3);
        assert!((800..=1_200).contains(&random[0]), "{random:?}");
    }

    #[test]
    fn test_decaying_epsilon() {
        assert_eq!(
            Policy::DecayingEpsilonGreedy.for_episode(4),
            Policy::EpsilonGreedy { epsilon: 0.25 }
        );
        assert_eq!(
            Policy::DecayingEpsilonGreedy.for_episode(0),
            Policy::EpsilonGreedy { epsilon: 1.0 }
        );
        assert_eq!(Policy::Softmax.for_episode(10), Policy::Softmax);
    }

    #[test]
    fn test_softmax_prefers_higher_values() {
        let env = Bandit {
            values: vec![0.0, 1.0],
        };
        // p(1) = e / (1 + e) ~ 0.731
        let counts = counts(Policy::Softmax, &env, 10_000, 4);
        assert!((6_900..=7_700).contains(&counts[1]), "{counts:?}");
    }

    #[test]
    fn test_softmax_is_shift_invariant() {
        let env = Bandit {
            values: vec![-100_000.0, -100_000.0 + 1.0],
        };
        let counts = counts(Policy::Softmax, &env, 10_000, 5);
        assert!((6_900..=7_700).contains(&counts[1]), "{counts:?}");
    }

    #[test]
    fn test_non_finite_values_are_reported() {
        let env = Bandit {
            values: vec![f64::NAN, 1.0],
        };
        let mut rng = Pcg32::seed_from_u64(6);
        let values = ActionValue::new(&env);
        for policy in [Policy::Greedy, Policy::Softmax] {
            assert_eq!(
                policy.select(values, 0, &[1.0], &mut rng),
                Err(EvaluationError::Policy(PolicyError::NonFiniteValues))
            );
        }
    }

    #[test]
    fn test_no_actions() {
        let env = Bandit { values: vec![] };
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(
            Policy::Random.select(ActionValue::new(&env), 0, &[1.0], &mut rng),
            Err(EvaluationError::Policy(PolicyError::NoActions))
        );
    }

    #[test]
    fn test_serde_tagged() {
        let json = serde_json::to_string(&Policy::EpsilonGreedy { epsilon: 0.5 }).unwrap();
        assert_eq!(json, r#"{"kind":"epsilon_greedy","epsilon":0.5}"#);
        let policy: Policy = serde_json::from_str(r#"{"kind":"softmax"}"#).unwrap();
        assert_eq!(policy, Policy::Softmax);
    }
}
