use serde::{Deserialize, Serialize};

use crate::core::board::Board;

/// Game statistics tracking score, move count, and highest tile.
///
/// - **Score**: Sum of the values of all tiles created by merges
/// - **Moves**: Number of board-changing moves played
/// - **Highest tile**: Largest tile seen on the board so far
///
/// # Example
///
/// ```
/// use sarsa2048_engine::{Board, GameStats};
///
/// let mut stats = GameStats::new();
/// let board = Board::from_rows([[8, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
/// stats.record_move(8, &board);
///
/// assert_eq!(stats.score(), 8);
/// assert_eq!(stats.moves(), 1);
/// assert_eq!(stats.highest_tile(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: u64,
    moves: usize,
    highest_tile: u32,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            moves: 0,
            highest_tile: 0,
        }
    }

    /// Creates a tracker whose highest tile reflects a starting board.
    #[must_use]
    pub fn from_initial_board(board: &Board) -> Self {
        Self {
            highest_tile: board.max_tile(),
            ..Self::new()
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn moves(&self) -> usize {
        self.moves
    }

    #[must_use]
    pub const fn highest_tile(&self) -> u32 {
        self.highest_tile
    }

    /// Updates statistics after a board-changing move (including the spawned tile).
    pub fn record_move(&mut self, points: u32, board: &Board) {
        self.moves += 1;
        self.score += u64::from(points);
        self.highest_tile = self.highest_tile.max(board.max_tile());
    }
}
