//! Base-11 encoding of boards into integer state identifiers.
//!
//! Each cell maps to one base-11 digit:
//!
//! - digit `0` - empty cell
//! - digit `d` in `1..=10` - tile `2^d` (2 through 1024)
//!
//! The 16 digits are read row-major with the top-left cell as the most significant digit.
//! Every board whose largest tile is below [`WINNING_TILE`] maps to a unique identifier in
//! `[0, 11^16)`. Boards holding the winning tile all collapse onto [`StateId::WIN`], which
//! cannot be decoded back.
//!
//! Digits are derived from the bit position of the single set bit of each tile, so the
//! round trip is exact.

use serde::{Deserialize, Serialize};

use crate::{
    DecodeError, EncodeError,
    core::board::{BOARD_SIZE, Board, CELL_COUNT, WINNING_TILE},
};

/// Number of distinct digit values per cell.
pub const CODEC_BASE: u64 = 11;

/// Integer identifier of a board.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct StateId(u64);

impl StateId {
    /// The absorbing identifier shared by every board holding the winning tile.
    pub const WIN: Self = Self(CODEC_BASE.pow(16));

    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn is_win(self) -> bool {
        self.0 == Self::WIN.0
    }
}

fn tile_digit(value: u32) -> Option<u64> {
    match value {
        0 => Some(0),
        v if v.is_power_of_two() && (2..WINNING_TILE).contains(&v) => {
            Some(u64::from(v.trailing_zeros()))
        }
        _ => None,
    }
}

/// Encodes a board into its state identifier.
///
/// A board holding [`WINNING_TILE`] encodes to [`StateId::WIN`] regardless of its other
/// cells, which are then not validated.
pub fn encode(board: &Board) -> Result<StateId, EncodeError> {
    if board.has_winning_tile() {
        return Ok(StateId::WIN);
    }
    let mut id = 0;
    for (row, cells) in board.rows().iter().enumerate() {
        for (col, &value) in cells.iter().enumerate() {
            let digit = tile_digit(value).ok_or(EncodeError { row, col, value })?;
            id = id * CODEC_BASE + digit;
        }
    }
    Ok(StateId(id))
}

/// Decodes a state identifier back into its board.
pub fn decode(id: StateId) -> Result<Board, DecodeError> {
    if id == StateId::WIN {
        return Err(DecodeError::Terminal);
    }
    if id > StateId::WIN {
        return Err(DecodeError::OutOfRange { id: id.0 });
    }
    let mut rest = id.0;
    let mut rows = [[0; BOARD_SIZE]; BOARD_SIZE];
    for cell in (0..CELL_COUNT).rev() {
        let digit = rest % CODEC_BASE;
        rest /= CODEC_BASE;
        rows[cell / BOARD_SIZE][cell % BOARD_SIZE] = if digit == 0 { 0 } else { 1 << digit };
    }
    Ok(Board::from_rows(rows))
}

impl Board {
    /// Shorthand for [`encode`].
    pub fn to_state_id(&self) -> Result<StateId, EncodeError> {
        encode(self)
    }
}

impl TryFrom<StateId> for Board {
    type Error = DecodeError;

    fn try_from(id: StateId) -> Result<Self, Self::Error> {
        decode(id)
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_win_identifier_value() {
        assert_eq!(StateId::WIN.get(), 45_949_729_863_572_161);
    }

    #[test]
    fn test_empty_board_is_zero() {
        assert_eq!(encode(&Board::EMPTY), Ok(StateId::new(0)));
        assert_eq!(decode(StateId::new(0)), Ok(Board::EMPTY));
    }

    #[test]
    fn test_last_cell_is_least_significant_digit() {
        let board = Board::from_rows([[0; 4], [0; 4], [0; 4], [0, 0, 0, 2]]);
        assert_eq!(encode(&board), Ok(StateId::new(1)));

        let board = Board::from_rows([[0; 4], [0; 4], [0; 4], [0, 0, 2, 4]]);
        assert_eq!(encode(&board), Ok(StateId::new(CODEC_BASE + 2)));
    }

    #[test]
    fn test_largest_representable_board() {
        let board = Board::from_rows([[1024; 4]; 4]);
        let id = encode(&board).unwrap();
        assert_eq!(id.get(), StateId::WIN.get() - 1);
        assert_eq!(decode(id), Ok(board));
    }

    #[test]
    fn test_roundtrip_random_boards() {
        let mut rng = Pcg32::seed_from_u64(2048);
        for _ in 0..1000 {
            let rows = std::array::from_fn(|_| {
                std::array::from_fn(|_| {
                    let exp = rng.random_range(0..=10);
                    if exp == 0 { 0 } else { 1 << exp }
                })
            });
            let board = Board::from_rows(rows);
            let id = encode(&board).unwrap();
            assert!(id < StateId::WIN);
            assert_eq!(decode(id), Ok(board));
        }
    }

    #[test]
    fn test_winning_tile_is_absorbing() {
        let a = Board::from_rows([[2048, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let b = Board::from_rows([[2, 4, 8, 16], [32, 64, 128, 256], [512, 1024, 0, 0], [0, 0, 0, 2048]]);
        assert_eq!(encode(&a), Ok(StateId::WIN));
        assert_eq!(encode(&b), Ok(StateId::WIN));
        assert!(StateId::WIN.is_win());
    }

    #[test]
    fn test_winning_tile_ignores_other_cells() {
        let board = Board::from_rows([[2048, 3, 0, 0], [0; 4], [0; 4], [0, 0, 0, 4096]]);
        assert_eq!(encode(&board), Ok(StateId::WIN));
    }

    #[test]
    fn test_encode_rejects_invalid_tiles() {
        let board = Board::from_rows([[0; 4], [0, 3, 0, 0], [0; 4], [0; 4]]);
        assert_eq!(
            encode(&board),
            Err(EncodeError {
                row: 1,
                col: 1,
                value: 3
            })
        );

        let board = Board::from_rows([[1, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert!(encode(&board).is_err());

        let board = Board::from_rows([[0; 4], [0; 4], [0; 4], [0, 0, 0, 4096]]);
        assert!(encode(&board).is_err());
    }

    #[test]
    fn test_decode_rejects_terminal_and_out_of_range() {
        assert_eq!(decode(StateId::WIN), Err(DecodeError::Terminal));
        let above = StateId::new(StateId::WIN.get() + 1);
        assert_eq!(
            decode(above),
            Err(DecodeError::OutOfRange { id: above.get() })
        );
    }

    #[test]
    fn test_serialized_as_plain_integer() {
        let json = serde_json::to_string(&StateId::new(12345)).unwrap();
        assert_eq!(json, "12345");
    }
}
