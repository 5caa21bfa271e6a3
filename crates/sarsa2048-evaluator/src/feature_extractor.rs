//! Mapping of (board, action) pairs to feature vectors.
//!
//! ```
//! use sarsa2048_engine::{Board, Direction};
//! use sarsa2048_evaluator::{board_feature::FeatureSet, feature_extractor::FeatureExtractor};
//!
//! let extractor = FeatureExtractor::from_set(FeatureSet::Moments);
//! let board = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
//! let phi = extractor.extract(&board, Some(Direction::Left));
//! assert_eq!(phi.len(), 2);
//! assert_eq!(phi[0], 4.0 / 16.0);
//! ```

use sarsa2048_engine::{Board, Direction};

use crate::{
    board_feature::{BoardFeature as _, BoxedBoardFeature, FeatureSet},
    move_analysis::MoveAnalysis,
};

/// An ordered list of features with a fixed dimensionality.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    features: Vec<BoxedBoardFeature>,
}

impl FeatureExtractor {
    #[must_use]
    pub fn new(features: Vec<BoxedBoardFeature>) -> Self {
        Self { features }
    }

    #[must_use]
    pub fn from_set(set: FeatureSet) -> Self {
        Self::new(set.features())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    #[must_use]
    pub fn features(&self) -> &[BoxedBoardFeature] {
        &self.features
    }

    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.features.iter().map(|f| f.id().to_owned()).collect()
    }

    /// Computes the feature vector of `board` after `action`.
    ///
    /// Pure and deterministic: the afterstate carries no spawned tile.
    #[must_use]
    pub fn extract(&self, board: &Board, action: Option<Direction>) -> Vec<f64> {
        let analysis = MoveAnalysis::from_board(board, action);
        self.extract_from(&analysis)
    }

    #[must_use]
    pub fn extract_from(&self, analysis: &MoveAnalysis) -> Vec<f64> {
        self.features.iter().map(|f| f.extract(analysis)).collect()
    }
}
