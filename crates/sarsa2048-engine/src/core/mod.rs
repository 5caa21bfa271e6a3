//! Core data structures: the 4×4 board, move directions, and the state codec.
//!
//! - [`Board`] - Tile grid with slide/merge/spawn rules and terminal classification
//! - [`Direction`] - The four cardinal moves
//! - [`StateId`] - Base-11 integer identifier of a board (see [`encode`] / [`decode`])

pub use self::{board::*, codec::*, direction::*};

pub(crate) mod board;
pub(crate) mod codec;
pub(crate) mod direction;
