//! Feature types extracting raw values from move analyses.

use crate::{
    board_feature::{BoardFeature, BoxedBoardFeature},
    move_analysis::MoveAnalysis,
};

/// Returns every feature in canonical order.
#[must_use]
pub fn all_board_features() -> Vec<BoxedBoardFeature> {
    vec![
        Box::new(Points),
        Box::new(Emptiness),
        Box::new(Roughness),
        Box::new(Monotonicity),
        Box::new(StdVerticalDiff),
        Box::new(StdHorizontalDiff),
        Box::new(TileDelta),
        Box::new(Mean),
        Box::new(Std),
        Box::new(DistanceToCorner),
        Box::new(CenterSum),
        Box::new(PerimeterSum),
        Box::new(MaxTile),
    ]
}

/// Points earned by the move.
///
/// Each merge contributes the value of the tile it creates; `0` without an action or for a
/// no-op move.
#[derive(Debug, Clone)]
pub struct Points;

impl BoardFeature for Points {
    fn id(&self) -> &'static str {
        "points"
    }
    fn name(&self) -> &'static str {
        "Points"
    }
    fn clone_boxed(&self) -> BoxedBoardFeature {
        Box::new(self.clone())
    }
    fn extract(&self, analysis: &MoveAnalysis) -> f64 {
        f64::from(analysis.points())
    }
}

/// Number of empty cells in the afterstate.
#[derive(Debug, Clone)]
pub struct Emptiness;

impl BoardFeature for Emptiness {
    fn id(&self) -> &'static str {
        "emptiness"
    }
    fn name(&self) -> &'static str {
        "Emptiness"
    }
    fn clone_boxed(&self) -> BoxedBoardFeature {
        Box::new(self.clone())
    }
    #[expect(clippy::cast_precision_loss)]
    fn extract(&self, analysis: &MoveAnalysis) -> f64 {
        analysis.board_analysis().emptiness() as f64
    }
}

/// Sum of absolute differences between horizontally and vertically adjacent cells.
///
/// A board whose neighbours hold similar values scores low; large jumps between neighbours
/// make merges unlikely and score high.
#[derive(Debug, Clone)]
pub struct Roughness;

impl BoardFeature for Roughness {
    fn id(&self) -> &'static str {
        "roughness"
    }
    fn name(&self) -> &'static str {
        "Roughness"
    }
    fn clone_boxed(&self) -> BoxedBoardFeature {
        Box::new(self.clone())
    }
    fn extract(&self, analysis: &MoveAnalysis) -> f64 {
        analysis.board_analysis().roughness()
    }
}

/// Signed monotonicity of all rows and columns.
///
/// # Raw measurement
///
/// For each of the 8 lines, sum the positive steps (`inc`) and the magnitudes of the negative
/// steps (`dec`) between consecutive cells, then add `max(inc, dec) - 2 * min(inc, dec)`.
/// Monotone lines contribute their full rise; zig-zag lines can contribute negatively.
#[derive(Debug, Clone)]
pub struct Monotonicity;

impl BoardFeature for Monotonicity {
    fn id(&self) -> &'static str {
        "monotonicity"
    }
    fn name(&self) -> &'static str {
        "Monotonicity"
    }
    fn clone_boxed(&self) -> BoxedBoardFeature {
        Box::new(self.clone())
    }
    fn extract(&self, analysis: &MoveAnalysis) -> f64 {
        analysis.board_analysis().monotonicity()
    }
}

/// Population standard deviation of the 12 vertical neighbour differences.
#[derive(Debug, Clone)]
pub struct StdVerticalDiff;

impl BoardFeature for StdVerticalDiff {
    fn id(&self) -> &'static str {
        "std_vertical_dif"
    }
    fn name(&self) -> &'static str {
        "Std of Vertical Differences"
    }
    fn clone_boxed(&self) -> BoxedBoardFeature {
        Box::new(self.clone())
    }
    fn extract(&self, analysis: &MoveAnalysis) -> f64 {
        analysis.board_analysis().std_vertical_diff()
    }
}

/// Population standard deviation of the 12 horizontal neighbour differences.
#[derive(Debug, Clone)]
pub struct StdHorizontalDiff;

impl BoardFeature for StdHorizontalDiff {
    fn id(&self) -> &'static str {
        "std_horizontal_dif"
    }
    fn name(&self) -> &'static str {
        "Std of Horizontal Differences"
    }
    fn clone_boxed(&self) -> BoxedBoardFeature {
        Box::new(self.clone())
    }
    fn extract(&self, analysis: &MoveAnalysis) -> f64 {
        analysis.board_analysis().std_horizontal_diff()
    }
}

/// Number of tiles removed by merges (occupied cells before minus after the move).
#[derive(Debug, Clone)]
pub struct TileDelta;

impl BoardFeature for TileDelta {
    fn id(&self) -> &'static str {
        "tile_delta"
    }
    fn name(&self) -> &'static str {
        "Tile Delta"
    }
    fn clone_boxed(&self) -> BoxedBoardFeature {
        Box::new(self.clone())
    }
    #[expect(clippy::cast_precision_loss)]
    fn extract(&self, analysis: &MoveAnalysis) -> f64 {
        analysis.merged_tiles() as f64
    }
}

/// Mean tile value over all 16 cells, empty cells counted as zero.
#[derive(Debug, Clone)]
pub struct Mean;

impl BoardFeature for Mean {
    fn id(&self) -> &'static str {
        "mean"
    }
    fn name(&self) -> &'static str {
        "Mean"
    }
    fn clone_boxed(&self) -> BoxedBoardFeature {
        Box::new(self.clone())
    }
    fn extract(&self, analysis: &MoveAnalysis) -> f64 {
        analysis.board_analysis().mean()
    }
}

/// Population standard deviation over all 16 cells, empty cells counted as zero.
#[derive(Debug, Clone)]
pub struct Std;

impl BoardFeature for Std {
    fn id(&self) -> &'static str {
        "std"
    }
    fn name(&self) -> &'static str {
        "Standard Deviation"
    }
    fn clone_boxed(&self) -> BoxedBoardFeature {
        Box::new(self.clone())
    }
    fn extract(&self, analysis: &MoveAnalysis) -> f64 {
        analysis.board_analysis().std()
    }
}

/// Value-weighted Manhattan distance from the top-left corner.
///
/// `raw = Σ value(r, c) × (r + c)`; low when large tiles gather in the corner.
#[derive(Debug, Clone)]
pub struct DistanceToCorner;

impl BoardFeature for DistanceToCorner {
    fn id(&self) -> &'static str {
        "distance_to_corner"
    }
    fn name(&self) -> &'static str {
        "Distance to Corner"
    }
    fn clone_boxed(&self) -> BoxedBoardFeature {
        Box::new(self.clone())
    }
    fn extract(&self, analysis: &MoveAnalysis) -> f64 {
        analysis.board_analysis().distance_to_corner()
    }
}

#[derive(Debug, Clone)]
pub struct CenterSum;

impl BoardFeature for CenterSum {
    fn id(&self) -> &'static str {
        "center_sum"
    }
    fn name(&self) -> &'static str {
        "Center Sum"
    }
    fn clone_boxed(&self) -> BoxedBoardFeature {
        Box::new(self.clone())
    }
    fn extract(&self, analysis: &MoveAnalysis) -> f64 {
        f64::from(analysis.board_analysis().center_sum())
    }
}

#[derive(Debug, Clone)]
pub struct PerimeterSum;

impl BoardFeature for PerimeterSum {
    fn id(&self) -> &'static str {
        "perimeter_sum"
    }
    fn name(&self) -> &'static str {
        "Perimeter Sum"
    }
    fn clone_boxed(&self) -> BoxedBoardFeature {
        Box::new(self.clone())
    }
    fn extract(&self, analysis: &MoveAnalysis) -> f64 {
        f64::from(analysis.board_analysis().perimeter_sum())
    }
}

#[derive(Debug, Clone)]
pub struct MaxTile;

impl BoardFeature for MaxTile {
    fn id(&self) -> &'static str {
        "max_tile"
    }
    fn name(&self) -> &'static str {
        "Max Tile"
    }
    fn clone_boxed(&self) -> BoxedBoardFeature {
        Box::new(self.clone())
    }
    fn extract(&self, analysis: &MoveAnalysis) -> f64 {
        f64::from(analysis.board_analysis().max_tile())
    }
}

#[cfg(test)]
mod tests {
    use sarsa2048_engine::{Board, Direction};

    use super::*;

    fn values_after(board: &Board, action: Option<Direction>) -> Vec<(String, f64)> {
        let analysis = MoveAnalysis::from_board(board, action);
        all_board_features()
            .iter()
            .map(|f| (f.id().to_owned(), f.extract(&analysis)))
            .collect()
    }

    fn value_of(values: &[(String, f64)], id: &str) -> f64 {
        values
            .iter()
            .find(|(fid, _)| fid == id)
            .map(|(_, v)| *v)
            .unwrap()
    }

    #[test]
    fn test_features_use_afterstate() {
        let board = Board::from_rows([[2, 2, 2, 0], [0; 4], [0; 4], [0; 4]]);
        let values = values_after(&board, Some(Direction::Left));
        assert_eq!(value_of(&values, "points"), 4.0);
        assert_eq!(value_of(&values, "tile_delta"), 1.0);
        assert_eq!(value_of(&values, "emptiness"), 14.0);
        assert_eq!(value_of(&values, "max_tile"), 4.0);
        assert_eq!(value_of(&values, "mean"), 6.0 / 16.0);
        assert_eq!(value_of(&values, "roughness"), 10.0);
        assert_eq!(value_of(&values, "monotonicity"), 10.0);
        assert_eq!(value_of(&values, "distance_to_corner"), 2.0);
        assert_eq!(value_of(&values, "center_sum"), 0.0);
        assert_eq!(value_of(&values, "perimeter_sum"), 6.0);
    }

    #[test]
    fn test_action_changes_features() {
        let board = Board::from_rows([[2, 2, 2, 0], [0; 4], [0; 4], [0; 4]]);
        let left = values_after(&board, Some(Direction::Left));
        let right = values_after(&board, Some(Direction::Right));
        assert_ne!(
            value_of(&left, "distance_to_corner"),
            value_of(&right, "distance_to_corner")
        );
    }

    #[test]
    fn test_no_action_has_no_move_features() {
        let board = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let values = values_after(&board, None);
        assert_eq!(value_of(&values, "points"), 0.0);
        assert_eq!(value_of(&values, "tile_delta"), 0.0);
        assert_eq!(value_of(&values, "emptiness"), 14.0);
    }
}
