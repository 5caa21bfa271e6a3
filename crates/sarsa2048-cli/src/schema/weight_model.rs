use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sarsa2048_evaluator::{
    board_feature,
    environment::{ActionSpace, Game2048Env, RewardScheme},
    feature_extractor::FeatureExtractor,
};
use sarsa2048_training::sarsa::SarsaParams;

/// Trained weights together with everything needed to rebuild their environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeightModel {
    pub trained_at: DateTime<Utc>,
    pub episodes: usize,
    pub update_count: u64,
    pub converged: bool,
    pub params: SarsaParams,
    pub rewards: RewardScheme,
    pub action_space: ActionSpace,
    pub features: Vec<TrainedFeature>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainedFeature {
    pub id: String,
    pub name: String,
    pub weight: f64,
}

impl WeightModel {
    pub(crate) fn weights(&self) -> Vec<f64> {
        self.features.iter().map(|f| f.weight).collect()
    }

    pub(crate) fn to_env(&self) -> anyhow::Result<Game2048Env> {
        let features = board_feature::features_by_id(self.features.iter().map(|f| &f.id))?;
        Ok(Game2048Env::new(FeatureExtractor::new(features))
            .with_rewards(self.rewards)
            .with_action_space(self.action_space))
    }
}

#[cfg(test)]
mod tests {
    use sarsa2048_evaluator::environment::Environment as _;

    use super::*;

    fn model(ids: &[&str]) -> WeightModel {
        WeightModel {
            trained_at: Utc::now(),
            episodes: 3,
            update_count: 42,
            converged: true,
            params: SarsaParams::default(),
            rewards: RewardScheme::default(),
            action_space: ActionSpace::All,
            features: ids
                .iter()
                .enumerate()
                .map(|(i, id)| TrainedFeature {
                    id: (*id).to_owned(),
                    name: (*id).to_owned(),
                    weight: i as f64,
                })
                .collect(),
        }
    }

    #[test]
    fn test_rebuilds_environment() {
        let json = serde_json::to_string(&model(&["std", "mean"])).unwrap();
        let model: WeightModel = serde_json::from_str(&json).unwrap();
        let env = model.to_env().unwrap();
        assert_eq!(env.extractor().ids(), ["std", "mean"]);
        assert_eq!(env.feature_len(), 2);
        assert_eq!(env.action_space(), ActionSpace::All);
        assert_eq!(model.weights(), [0.0, 1.0]);
    }

    #[test]
    fn test_unknown_feature_id() {
        assert!(model(&["mean", "nope"]).to_env().is_err());
    }
}
