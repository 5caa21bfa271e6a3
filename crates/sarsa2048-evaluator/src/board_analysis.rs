//! Lazily evaluated board statistics.
//!
//! [`BoardAnalysis`] wraps a board and computes each statistic on first access, so a feature
//! set that only needs `mean` and `std` never pays for neighbour differences or positional
//! sums. All statistics are computed in tile-value space (an empty cell counts as `0`).

use std::cell::OnceCell;

use sarsa2048_engine::{BOARD_SIZE, Board};

/// Number of neighbour pairs along one axis (4 lines × 3 pairs).
pub const NEIGHBOR_PAIRS: usize = BOARD_SIZE * (BOARD_SIZE - 1);

#[derive(Debug)]
pub struct BoardAnalysis {
    board: Board,
    horizontal_diffs: OnceCell<[f64; NEIGHBOR_PAIRS]>,
    vertical_diffs: OnceCell<[f64; NEIGHBOR_PAIRS]>,
    roughness: OnceCell<f64>,
    monotonicity: OnceCell<f64>,
    mean: OnceCell<f64>,
    std: OnceCell<f64>,
    distance_to_corner: OnceCell<f64>,
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        Self {
            board: *board,
            horizontal_diffs: OnceCell::new(),
            vertical_diffs: OnceCell::new(),
            roughness: OnceCell::new(),
            monotonicity: OnceCell::new(),
            mean: OnceCell::new(),
            std: OnceCell::new(),
            distance_to_corner: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// `b[r][c+1] - b[r][c]`, grouped by row (three consecutive entries per row).
    #[must_use]
    pub fn horizontal_diffs(&self) -> &[f64; NEIGHBOR_PAIRS] {
        self.horizontal_diffs
            .get_or_init(|| line_diffs(self.board.rows()))
    }

    /// `b[r+1][c] - b[r][c]`, grouped by column (three consecutive entries per column).
    #[must_use]
    pub fn vertical_diffs(&self) -> &[f64; NEIGHBOR_PAIRS] {
        self.vertical_diffs
            .get_or_init(|| line_diffs(&self.board.columns()))
    }

    #[must_use]
    pub fn emptiness(&self) -> usize {
        self.board.count_empty()
    }

    /// Sum of absolute differences over all horizontally and vertically adjacent pairs.
    #[must_use]
    pub fn roughness(&self) -> f64 {
        *self.roughness.get_or_init(|| {
            self.horizontal_diffs()
                .iter()
                .chain(self.vertical_diffs())
                .map(|d| d.abs())
                .sum()
        })
    }

    /// Signed monotonicity over all rows and columns.
    ///
    /// For each line, `inc` and `dec` sum the rising and falling steps between neighbours.
    /// The line contributes `max(inc, dec) - 2 * min(inc, dec)`: the full rise of a monotone
    /// line, reduced twice as fast by steps going the other way.
    #[must_use]
    pub fn monotonicity(&self) -> f64 {
        *self.monotonicity.get_or_init(|| {
            self.horizontal_diffs()
                .chunks(BOARD_SIZE - 1)
                .chain(self.vertical_diffs().chunks(BOARD_SIZE - 1))
                .map(|line| {
                    let inc = line.iter().filter(|d| **d > 0.0).sum::<f64>();
                    let dec = -line.iter().filter(|d| **d < 0.0).sum::<f64>();
                    f64::max(inc, dec) - 2.0 * f64::min(inc, dec)
                })
                .sum()
        })
    }

    /// Mean of all 16 cells, empty cells included.
    #[must_use]
    pub fn mean(&self) -> f64 {
        *self
            .mean
            .get_or_init(|| population_mean(self.board.cells().map(f64::from)))
    }

    /// Population standard deviation of all 16 cells, empty cells included.
    #[must_use]
    pub fn std(&self) -> f64 {
        *self
            .std
            .get_or_init(|| population_std(self.board.cells().map(f64::from)))
    }

    #[must_use]
    pub fn std_horizontal_diff(&self) -> f64 {
        population_std(self.horizontal_diffs().iter().copied())
    }

    #[must_use]
    pub fn std_vertical_diff(&self) -> f64 {
        population_std(self.vertical_diffs().iter().copied())
    }

    /// Sum of tile values weighted by their Manhattan distance from the top-left corner.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn distance_to_corner(&self) -> f64 {
        *self.distance_to_corner.get_or_init(|| {
            let mut sum = 0;
            for (r, row) in self.board.rows().iter().enumerate() {
                for (c, &value) in row.iter().enumerate() {
                    sum += u64::from(value) * (r + c) as u64;
                }
            }
            sum as f64
        })
    }

    /// Sum of the four centre cells.
    #[must_use]
    pub fn center_sum(&self) -> u32 {
        let inner = 1..BOARD_SIZE - 1;
        self.board.rows()[inner.clone()]
            .iter()
            .map(|row| row[inner.clone()].iter().sum::<u32>())
            .sum()
    }

    /// Sum of the twelve border cells.
    #[must_use]
    pub fn perimeter_sum(&self) -> u32 {
        self.board.tile_sum() - self.center_sum()
    }

    #[must_use]
    pub fn max_tile(&self) -> u32 {
        self.board.max_tile()
    }
}

fn line_diffs(lines: &[[u32; BOARD_SIZE]; BOARD_SIZE]) -> [f64; NEIGHBOR_PAIRS] {
    let mut diffs = [0.0; NEIGHBOR_PAIRS];
    let pairs = lines
        .iter()
        .flat_map(|line| line.windows(2).map(|w| f64::from(w[1]) - f64::from(w[0])));
    for (slot, diff) in diffs.iter_mut().zip(pairs) {
        *slot = diff;
    }
    diffs
}

#[expect(clippy::cast_precision_loss)]
fn population_mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

fn population_std<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
    I::IntoIter: Clone,
{
    let values = values.into_iter();
    let mean = population_mean(values.clone());
    population_mean(values.map(|v| (v - mean).powi(2))).sqrt()
}
