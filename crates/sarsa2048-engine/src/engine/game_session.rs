use rand_pcg::Pcg32;

use crate::{
    ExhaustedBoardError,
    core::{
        board::{Board, GameStatus},
        direction::Direction,
    },
};

use super::{GameStats, game_seed::GameSeed};

/// A single game played from a seed until it ends.
///
/// The session owns the board, its statistics, and the random stream used for tile
/// spawning. Callers choosing moves stochastically may borrow the same stream through
/// [`GameSession::rng_mut`] so one seed reproduces the whole game.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    stats: GameStats,
    status: GameStatus,
    rng: Pcg32,
}

impl GameSession {
    /// Starts a new game with two seeded tiles.
    #[must_use]
    pub fn new(seed: GameSeed) -> Self {
        let mut rng = seed.rng();
        let board = Board::new_game(&mut rng);
        Self::from_parts(board, rng)
    }

    /// Continues a game from an arbitrary board.
    #[must_use]
    pub fn with_board(board: Board, seed: GameSeed) -> Self {
        Self::from_parts(board, seed.rng())
    }

    fn from_parts(board: Board, rng: Pcg32) -> Self {
        Self {
            board,
            stats: GameStats::from_initial_board(&board),
            status: board.status(),
            rng,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Plays one move.
    ///
    /// A move that does not change the board is ignored and returns `Ok(false)`; no tile
    /// is spawned and no statistics change. Moves after the game has ended are ignored too.
    pub fn play_move(&mut self, direction: Direction) -> Result<bool, ExhaustedBoardError> {
        if self.status.is_terminal() {
            return Ok(false);
        }
        let outcome = self.board.apply_move(direction);
        if !outcome.changed {
            return Ok(false);
        }
        let mut board = outcome.board;
        board.spawn_tile(&mut self.rng)?;
        self.board = board;
        self.stats.record_move(outcome.points, &self.board);
        self.status = self.board.status();
        Ok(true)
    }
}
