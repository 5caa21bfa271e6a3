//! Game flow on top of the core rules.
//!
//! - [`GameSession`] - A seeded game: board, statistics, status, and random stream
//! - [`GameStats`] - Score, move count, and highest tile
//! - [`GameSeed`] - Seed for deterministic random streams
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] from a seed (two tiles are spawned)
//! 2. Play a [`Direction`](crate::Direction); no-op moves are ignored
//! 3. After each valid move one tile is spawned and the status is re-classified
//! 4. Repeat until [`GameStatus::Won`](crate::GameStatus::Won) or
//!    [`GameStatus::Lost`](crate::GameStatus::Lost)
//!
//! # Example
//!
//! ```
//! use sarsa2048_engine::{Direction, GameSeed, GameSession};
//!
//! let mut session = GameSession::new(GameSeed::from(42));
//! for dir in Direction::ALL.into_iter().cycle().take(100) {
//!     if session.status().is_terminal() {
//!         break;
//!     }
//!     session.play_move(dir).unwrap();
//! }
//! println!("score: {}", session.stats().score());
//! ```

pub use self::{game_seed::*, game_session::*, game_stats::*};

mod game_seed;
mod game_session;
mod game_stats;
