use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::InvalidDirectionError;

/// A move direction.
///
/// Tiles slide toward the edge named by the direction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[display("right")]
    Right,
    #[display("up")]
    Up,
    #[display("left")]
    Left,
    #[display("down")]
    Down,
}

impl Direction {
    pub const LEN: usize = 4;

    /// All directions in action-index order (right, up, left, down).
    pub const ALL: [Self; Self::LEN] = [Self::Right, Self::Up, Self::Left, Self::Down];

    /// Returns the action index of this direction.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Right => 0,
            Self::Up => 1,
            Self::Left => 2,
            Self::Down => 3,
        }
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Right),
            1 => Some(Self::Up),
            2 => Some(Self::Left),
            3 => Some(Self::Down),
            _ => None,
        }
    }
}

impl FromStr for Direction {
    type Err = InvalidDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dir = match s.trim().to_ascii_lowercase().as_str() {
            "right" | "r" => Self::Right,
            "up" | "u" => Self::Up,
            "left" | "l" => Self::Left,
            "down" | "d" => Self::Down,
            _ => {
                return Err(InvalidDirectionError {
                    input: s.to_owned(),
                });
            }
        };
        Ok(dir)
    }
}
