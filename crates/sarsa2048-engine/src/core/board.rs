use std::fmt;

use arrayvec::ArrayVec;
use rand::{Rng, seq::IndexedRandom as _};
use serde::{Deserialize, Serialize};

use crate::{ExhaustedBoardError, core::direction::Direction};

/// Number of rows and columns.
pub const BOARD_SIZE: usize = 4;
/// Number of cells on the board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;
/// Reaching this tile wins the game.
pub const WINNING_TILE: u32 = 2048;
/// Probability that a spawned tile is a 4 instead of a 2.
pub const FOUR_SPAWN_PROBABILITY: f64 = 0.1;

/// Classification of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    /// Returns `true` for [`GameStatus::Won`] and [`GameStatus::Lost`].
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Result of sliding a board in one direction, before any tile is spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Board after sliding and merging.
    pub board: Board,
    /// Sum of the values of all tiles created by merges.
    pub points: u32,
    /// `false` when the move left the board untouched.
    pub changed: bool,
}

/// A 4×4 grid of tiles.
///
/// Each cell is either `0` (empty) or a power of two `>= 2`. Rows are stored top to bottom,
/// cells within a row left to right.
///
/// # Move rules
///
/// Every line parallel to the move is processed independently:
///
/// 1. Non-zero tiles slide toward the moving edge
/// 2. Adjacent equal tiles merge pairwise, starting at the moving edge
/// 3. A tile created by a merge never merges again in the same move
///
/// ```
/// use sarsa2048_engine::{Board, Direction};
///
/// let board = Board::from_rows([
///     [2, 2, 2, 0],
///     [0, 0, 0, 0],
///     [0, 0, 0, 0],
///     [0, 0, 0, 0],
/// ]);
/// let outcome = board.apply_move(Direction::Left);
/// assert_eq!(outcome.board.rows()[0], [4, 2, 0, 0]);
/// assert_eq!(outcome.points, 4);
/// assert!(outcome.changed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    rows: [[u32; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub const EMPTY: Self = Self {
        rows: [[0; BOARD_SIZE]; BOARD_SIZE],
    };

    /// Creates a board from raw rows.
    ///
    /// Cell values are not validated here; [`encode`](crate::encode) rejects invalid tiles.
    #[must_use]
    pub const fn from_rows(rows: [[u32; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self { rows }
    }

    /// Starts a new game: an empty board with two spawned tiles.
    #[must_use]
    pub fn new_game<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut board = Self::EMPTY;
        for _ in 0..2 {
            board
                .spawn_tile(rng)
                .expect("a fresh board always has empty cells");
        }
        board
    }

    #[must_use]
    pub const fn rows(&self) -> &[[u32; BOARD_SIZE]; BOARD_SIZE] {
        &self.rows
    }

    #[must_use]
    pub const fn get(&self, row: usize, col: usize) -> u32 {
        self.rows[row][col]
    }

    /// Returns the transposed grid: `columns()[c][r] == get(r, c)`.
    #[must_use]
    pub fn columns(&self) -> [[u32; BOARD_SIZE]; BOARD_SIZE] {
        let mut columns = [[0; BOARD_SIZE]; BOARD_SIZE];
        for (r, row) in self.rows.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                columns[c][r] = value;
            }
        }
        columns
    }

    /// Iterates over all cell values in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = u32> + Clone + '_ {
        self.rows.iter().flatten().copied()
    }

    /// Iterates over the `(row, col)` positions of empty cells in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, value)| **value == 0)
                .map(move |(c, _)| (r, c))
        })
    }

    #[must_use]
    pub fn count_empty(&self) -> usize {
        self.cells().filter(|v| *v == 0).count()
    }

    #[must_use]
    pub fn count_occupied(&self) -> usize {
        CELL_COUNT - self.count_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells().all(|v| v != 0)
    }

    #[must_use]
    pub fn max_tile(&self) -> u32 {
        self.cells().max().unwrap_or(0)
    }

    #[must_use]
    pub fn tile_sum(&self) -> u32 {
        self.cells().sum()
    }

    #[must_use]
    pub fn has_winning_tile(&self) -> bool {
        self.cells().any(|v| v == WINNING_TILE)
    }

    /// Slides and merges all lines toward `direction`.
    ///
    /// No tile is spawned. When `changed` is `false` the returned board equals `self`.
    #[must_use]
    pub fn apply_move(&self, direction: Direction) -> MoveOutcome {
        let mut board = *self;
        let mut points = 0;
        for i in 0..BOARD_SIZE {
            let positions = line_positions(direction, i);
            let line = positions.map(|(r, c)| self.rows[r][c]);
            let (merged, gained) = slide_line(line);
            for ((r, c), value) in positions.into_iter().zip(merged) {
                board.rows[r][c] = value;
            }
            points += gained;
        }
        MoveOutcome {
            board,
            points,
            changed: board != *self,
        }
    }

    /// Returns `true` if moving in `direction` would change the board.
    #[must_use]
    pub fn can_move(&self, direction: Direction) -> bool {
        (0..BOARD_SIZE).any(|i| {
            let line = line_positions(direction, i).map(|(r, c)| self.rows[r][c]);
            slide_line(line).0 != line
        })
    }

    /// Returns the directions that change the board, in action-index order.
    #[must_use]
    pub fn valid_moves(&self) -> ArrayVec<Direction, { Direction::LEN }> {
        Direction::ALL
            .into_iter()
            .filter(|dir| self.can_move(*dir))
            .collect()
    }

    /// Places a 2 (or, with probability [`FOUR_SPAWN_PROBABILITY`], a 4) on a uniformly
    /// chosen empty cell and returns its position.
    pub fn spawn_tile<R>(&mut self, rng: &mut R) -> Result<(usize, usize), ExhaustedBoardError>
    where
        R: Rng + ?Sized,
    {
        let empty = self.empty_cells().collect::<ArrayVec<_, CELL_COUNT>>();
        let &(r, c) = empty.choose(rng).ok_or(ExhaustedBoardError)?;
        self.rows[r][c] = if rng.random_bool(FOUR_SPAWN_PROBABILITY) {
            4
        } else {
            2
        };
        Ok((r, c))
    }

    /// Classifies the board.
    ///
    /// - [`GameStatus::Won`] if any cell holds [`WINNING_TILE`]
    /// - [`GameStatus::Lost`] if the board is full and no direction changes it
    /// - [`GameStatus::Playing`] otherwise
    #[must_use]
    pub fn status(&self) -> GameStatus {
        if self.has_winning_tile() {
            return GameStatus::Won;
        }
        if self.is_full() && Direction::ALL.into_iter().all(|dir| !self.can_move(dir)) {
            return GameStatus::Lost;
        }
        GameStatus::Playing
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.rows.iter().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for (c, value) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, " ")?;
                }
                if *value == 0 {
                    write!(f, "{:>5}", ".")?;
                } else {
                    write!(f, "{value:>5}")?;
                }
            }
        }
        Ok(())
    }
}

/// Cell positions of the `i`-th line for `direction`, starting at the moving edge.
fn line_positions(direction: Direction, i: usize) -> [(usize, usize); BOARD_SIZE] {
    let last = BOARD_SIZE - 1;
    std::array::from_fn(|k| match direction {
        Direction::Left => (i, k),
        Direction::Right => (i, last - k),
        Direction::Up => (k, i),
        Direction::Down => (last - k, i),
    })
}

/// Compresses a line toward index 0, merging each pair of equal neighbours once.
fn slide_line(line: [u32; BOARD_SIZE]) -> ([u32; BOARD_SIZE], u32) {
    let mut out = [0; BOARD_SIZE];
    let mut len = 0;
    let mut points = 0;
    let mut pending = None;
    for value in line.into_iter().filter(|v| *v != 0) {
        match pending {
            Some(p) if p == value => {
                out[len] = p * 2;
                points += p * 2;
                len += 1;
                pending = None;
            }
            Some(p) => {
                out[len] = p;
                len += 1;
                pending = Some(value);
            }
            None => pending = Some(value),
        }
    }
    if let Some(p) = pending {
        out[len] = p;
    }
    (out, points)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn single_row(row: [u32; 4]) -> Board {
        Board::from_rows([row, [0; 4], [0; 4], [0; 4]])
    }

    #[test]
    fn test_slide_line_single_merge_per_tile() {
        assert_eq!(slide_line([2, 2, 2, 0]), ([4, 2, 0, 0], 4));
        assert_eq!(slide_line([2, 2, 2, 2]), ([4, 4, 0, 0], 8));
        assert_eq!(slide_line([4, 4, 8, 0]), ([8, 8, 0, 0], 8));
        assert_eq!(slide_line([0, 2, 0, 2]), ([4, 0, 0, 0], 4));
        assert_eq!(slide_line([2, 4, 8, 16]), ([2, 4, 8, 16], 0));
    }

    #[test]
    fn test_move_left_merges_first_pair() {
        let outcome = single_row([2, 2, 2, 0]).apply_move(Direction::Left);
        assert_eq!(outcome.board.rows()[0], [4, 2, 0, 0]);
        assert_eq!(outcome.points, 4);
        assert!(outcome.changed);
    }

    #[test]
    fn test_move_right_merges_from_right_edge() {
        let outcome = single_row([2, 2, 2, 0]).apply_move(Direction::Right);
        assert_eq!(outcome.board.rows()[0], [0, 0, 2, 4]);
        assert_eq!(outcome.points, 4);
    }

    #[test]
    fn test_move_up_and_down_use_columns() {
        let board = Board::from_rows([[2, 0, 0, 0], [2, 0, 0, 0], [4, 0, 0, 0], [0, 0, 0, 0]]);

        let up = board.apply_move(Direction::Up);
        assert_eq!(up.board.columns()[0], [4, 4, 0, 0]);
        assert_eq!(up.points, 4);

        let down = board.apply_move(Direction::Down);
        assert_eq!(down.board.columns()[0], [0, 0, 4, 4]);
        assert_eq!(down.points, 4);
    }

    #[test]
    fn test_noop_move_returns_identical_board() {
        let board = Board::from_rows([[2, 4, 8, 16], [0; 4], [0; 4], [0; 4]]);
        let outcome = board.apply_move(Direction::Left);
        assert!(!outcome.changed);
        assert_eq!(outcome.board, board);
        assert_eq!(outcome.points, 0);
        assert!(!board.can_move(Direction::Left));
        assert!(!board.can_move(Direction::Up));
        assert!(board.can_move(Direction::Down));
    }

    #[test]
    fn test_valid_moves_agree_with_apply_move() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let board = Board::new_game(&mut rng);
            for dir in Direction::ALL {
                assert_eq!(
                    board.valid_moves().contains(&dir),
                    board.apply_move(dir).changed
                );
            }
        }
    }

    #[test]
    fn test_new_game_has_two_tiles() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..100 {
            let board = Board::new_game(&mut rng);
            assert_eq!(board.count_occupied(), 2);
            assert!(board.cells().all(|v| v == 0 || v == 2 || v == 4));
        }
    }

    #[test]
    fn test_spawn_on_full_board_fails() {
        let mut board = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        let mut rng = Pcg32::seed_from_u64(0);
        assert_eq!(board.spawn_tile(&mut rng), Err(ExhaustedBoardError));
    }

    #[test]
    fn test_spawn_fills_last_empty_cell() {
        let mut board = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 0, 4], [4, 2, 4, 2]]);
        let mut rng = Pcg32::seed_from_u64(3);
        assert_eq!(board.spawn_tile(&mut rng), Ok((2, 2)));
        assert!(board.is_full());
    }

    #[test]
    fn test_status() {
        let lost = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert_eq!(lost.status(), GameStatus::Lost);

        let full_but_mergeable =
            Board::from_rows([[2, 2, 4, 8], [4, 8, 16, 32], [8, 16, 32, 64], [16, 32, 64, 128]]);
        assert_eq!(full_but_mergeable.status(), GameStatus::Playing);

        let won = Board::from_rows([[2048, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(won.status(), GameStatus::Won);
        assert!(won.status().is_terminal());

        assert_eq!(Board::EMPTY.status(), GameStatus::Playing);
    }

    #[test]
    fn test_only_exact_winning_tile_wins() {
        let won = Board::from_rows([[2048, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert!(won.has_winning_tile());
        let oversized = Board::from_rows([[4096, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert!(!oversized.has_winning_tile());
    }

    #[test]
    fn test_cells_can_be_traversed_twice() {
        let board = Board::from_rows([[2, 4, 0, 0], [0; 4], [0; 4], [0, 0, 0, 8]]);
        let cells = board.cells();
        let count = cells.clone().filter(|v| *v != 0).count();
        assert_eq!((count, cells.sum::<u32>()), (3, 14));
    }

    #[test]
    fn test_display() {
        let board = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 1024]]);
        let text = board.to_string();
        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().next().unwrap().trim_start().starts_with('2'));
        assert!(text.lines().last().unwrap().ends_with("1024"));
    }
}
