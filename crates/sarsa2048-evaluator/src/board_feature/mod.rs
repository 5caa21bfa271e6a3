//! Board features for estimating action values.
//!
//! Every feature maps a [`MoveAnalysis`] (the afterstate of a move plus what the move did) to a
//! single real number. Features are not normalized: the linear model learns one weight per
//! feature on the raw scale.
//!
//! # Available features ([`source`] module)
//!
//! **Move features** - what the action itself achieved:
//! - [`source::Points`] - Points earned by merges
//! - [`source::TileDelta`] - Tiles removed by merges
//!
//! **Structure features** - shape of the afterstate:
//! - [`source::Emptiness`] - Number of empty cells
//! - [`source::Roughness`] - Absolute neighbour differences
//! - [`source::Monotonicity`] - Signed monotonicity of rows and columns
//! - [`source::StdVerticalDiff`] / [`source::StdHorizontalDiff`] - Spread of neighbour differences
//!
//! **Distribution features** - where the value sits:
//! - [`source::Mean`] / [`source::Std`] - Moments of all 16 cells
//! - [`source::DistanceToCorner`] - Value-weighted distance from the top-left corner
//! - [`source::CenterSum`] / [`source::PerimeterSum`] - Inner vs. border value
//! - [`source::MaxTile`] - Largest tile
//!
//! # Feature sets
//!
//! A [`FeatureSet`] fixes which features, and in which order, make up the feature vector.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::move_analysis::MoveAnalysis;

pub use self::source::all_board_features;

pub mod source;

pub trait BoardFeature: fmt::Debug + Send + Sync {
    /// Stable identifier, used in saved models.
    #[must_use]
    fn id(&self) -> &str;
    #[must_use]
    fn name(&self) -> &str;
    #[must_use]
    fn clone_boxed(&self) -> BoxedBoardFeature;
    #[must_use]
    fn extract(&self, analysis: &MoveAnalysis) -> f64;
}

pub type BoxedBoardFeature = Box<dyn BoardFeature>;

impl Clone for BoxedBoardFeature {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

impl BoardFeature for BoxedBoardFeature {
    fn id(&self) -> &str {
        self.as_ref().id()
    }

    fn name(&self) -> &str {
        self.as_ref().name()
    }

    fn clone_boxed(&self) -> BoxedBoardFeature {
        self.as_ref().clone_boxed()
    }

    fn extract(&self, analysis: &MoveAnalysis) -> f64 {
        self.as_ref().extract(analysis)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown board feature {id:?}")]
pub struct UnknownFeatureError {
    #[error(not(source))]
    pub id: String,
}

/// Named selection of features.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSet {
    /// All 13 features.
    #[default]
    #[display("full")]
    Full,
    /// `mean` and `std` only.
    #[display("moments")]
    Moments,
}

impl FeatureSet {
    #[must_use]
    pub fn features(self) -> Vec<BoxedBoardFeature> {
        match self {
            Self::Full => all_board_features(),
            Self::Moments => vec![Box::new(source::Mean), Box::new(source::Std)],
        }
    }
}

/// Looks up features by id, preserving the given order.
pub fn features_by_id<I, S>(ids: I) -> Result<Vec<BoxedBoardFeature>, UnknownFeatureError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let all = all_board_features();
    ids.into_iter()
        .map(|id| {
            let id = id.as_ref();
            all.iter()
                .find(|f| f.id() == id)
                .cloned()
                .ok_or_else(|| UnknownFeatureError { id: id.to_owned() })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_full_set_has_thirteen_unique_ids() {
        let features = FeatureSet::Full.features();
        assert_eq!(features.len(), 13);
        let ids = features.iter().map(|f| f.id()).collect::<HashSet<_>>();
        assert_eq!(ids.len(), 13);
    }

    #[test]
    fn test_moments_set_order() {
        let ids = FeatureSet::Moments
            .features()
            .iter()
            .map(|f| f.id().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["mean", "std"]);
    }

    #[test]
    fn test_feature_set_parse() {
        assert_eq!("full".parse::<FeatureSet>().ok(), Some(FeatureSet::Full));
        assert_eq!("Moments".parse::<FeatureSet>().ok(), Some(FeatureSet::Moments));
        assert!("everything".parse::<FeatureSet>().is_err());
        assert_eq!(FeatureSet::Moments.to_string(), "moments");
    }

    #[test]
    fn test_features_by_id() {
        let features = features_by_id(["std", "points"]).unwrap();
        assert_eq!(features[0].id(), "std");
        assert_eq!(features[1].id(), "points");

        let err = features_by_id(["points", "holes"]).unwrap_err();
        assert_eq!(err.id, "holes");
    }
}
