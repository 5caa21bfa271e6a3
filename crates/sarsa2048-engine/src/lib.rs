//! Rules engine for the 2048 sliding-tile puzzle.
//!
//! - [`core`] - Board representation, move/merge rules, and the base-11 state codec
//! - [`engine`] - Seeded game sessions and per-game statistics

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// A cell value that is neither empty nor a power of two in `2..=2048`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid tile value {value} at ({row}, {col})")]
pub struct EncodeError {
    pub row: usize,
    pub col: usize,
    pub value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DecodeError {
    #[display("the terminal state identifier does not correspond to a single board")]
    Terminal,
    #[display("state identifier {id} is out of range")]
    OutOfRange { id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("no empty cell left to spawn a tile")]
pub struct ExhaustedBoardError;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid direction {input:?}: expected one of up, down, left, right")]
pub struct InvalidDirectionError {
    #[error(not(source))]
    pub input: String,
}
