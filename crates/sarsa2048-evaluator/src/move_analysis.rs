//! Analysis of the board left behind by a move.
//!
//! [`MoveAnalysis`] pairs what a move did (points earned, tiles merged away, whether anything
//! changed) with the lazily evaluated metrics of the resulting afterstate. The afterstate is
//! the board after sliding and merging but *before* the random tile spawns, so every feature
//! computed from it depends on the chosen action and never on spawn luck.
//!
//! ```
//! use sarsa2048_engine::{Board, Direction};
//! use sarsa2048_evaluator::move_analysis::MoveAnalysis;
//!
//! let board = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
//! let analysis = MoveAnalysis::from_board(&board, Some(Direction::Left));
//! assert_eq!(analysis.points(), 4);
//! assert_eq!(analysis.merged_tiles(), 1);
//! assert_eq!(analysis.board_analysis().max_tile(), 4);
//! ```

use sarsa2048_engine::{Board, Direction};

use crate::board_analysis::BoardAnalysis;

#[derive(Debug)]
pub struct MoveAnalysis {
    action: Option<Direction>,
    points: u32,
    merged_tiles: usize,
    changed: bool,
    board_analysis: BoardAnalysis,
}

impl MoveAnalysis {
    /// Analyzes `before` after applying `action`.
    ///
    /// With `None` the board is analyzed as-is (no move, no points).
    #[must_use]
    pub fn from_board(before: &Board, action: Option<Direction>) -> Self {
        let (after, points, changed) = match action {
            Some(dir) => {
                let outcome = before.apply_move(dir);
                (outcome.board, outcome.points, outcome.changed)
            }
            None => (*before, 0, false),
        };
        Self {
            action,
            points,
            merged_tiles: before.count_occupied() - after.count_occupied(),
            changed,
            board_analysis: BoardAnalysis::from_board(&after),
        }
    }

    #[must_use]
    pub fn action(&self) -> Option<Direction> {
        self.action
    }

    /// Points earned by merges during the move.
    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    /// Number of tiles that disappeared through merging.
    #[must_use]
    pub fn merged_tiles(&self) -> usize {
        self.merged_tiles
    }

    #[must_use]
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Metrics of the afterstate.
    #[must_use]
    pub fn board_analysis(&self) -> &BoardAnalysis {
        &self.board_analysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_accounting() {
        let board = Board::from_rows([[2, 2, 2, 2], [4, 4, 0, 0], [0; 4], [0; 4]]);
        let analysis = MoveAnalysis::from_board(&board, Some(Direction::Left));
        assert_eq!(analysis.points(), 4 + 4 + 8);
        assert_eq!(analysis.merged_tiles(), 3);
        assert!(analysis.changed());
        assert_eq!(analysis.board_analysis().board().rows()[0], [4, 4, 0, 0]);
    }

    #[test]
    fn test_noop_move() {
        let board = Board::from_rows([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let analysis = MoveAnalysis::from_board(&board, Some(Direction::Left));
        assert_eq!(analysis.points(), 0);
        assert_eq!(analysis.merged_tiles(), 0);
        assert!(!analysis.changed());
        assert_eq!(analysis.board_analysis().board(), &board);
    }

    #[test]
    fn test_without_action_analyzes_board_as_is() {
        let board = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let analysis = MoveAnalysis::from_board(&board, None);
        assert_eq!(analysis.action(), None);
        assert_eq!(analysis.board_analysis().board(), &board);
        assert_eq!(analysis.merged_tiles(), 0);
    }
}
