//! The boundary between a learning agent and the game it plays.
//!
//! The [`Environment`] trait exposes exactly what episodic Sarsa needs: an initial state, the
//! actions available in a state, a stochastic transition, a reward, a terminal test and a
//! feature vector per (state, action). [`Game2048Env`] implements it over [`StateId`]s.
//!
//! # Rewards
//!
//! [`RewardScheme`] assigns one of three tiers to every transition `S -> S'`:
//!
//! 1. `S'` is the winning state: `win` (+100)
//! 2. `S'` is lost, or the action did not change the board (`S == S'`): `penalty` (-100000)
//! 3. anything else: `step` (-1)

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use sarsa2048_engine::{
    Board, DecodeError, Direction, EncodeError, ExhaustedBoardError, StateId, WINNING_TILE,
};

use crate::feature_extractor::FeatureExtractor;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum EnvironmentError {
    #[display("cannot encode board: {_0}")]
    Encode(EncodeError),
    #[display("cannot decode state: {_0}")]
    Decode(DecodeError),
    #[display("cannot spawn tile: {_0}")]
    ExhaustedBoard(ExhaustedBoardError),
}

pub trait Environment {
    type State: Copy + Eq + fmt::Debug;
    type Action: Copy + Eq + fmt::Debug;

    /// Length of every vector returned by [`feature_vector`](Self::feature_vector).
    fn feature_len(&self) -> usize;

    fn initial_state<R>(&self, rng: &mut R) -> Result<Self::State, EnvironmentError>
    where
        R: Rng + ?Sized;

    /// Actions a policy may choose from in `state`. Empty only for terminal states.
    fn valid_actions(&self, state: Self::State) -> Result<Vec<Self::Action>, EnvironmentError>;

    fn transition<R>(
        &self,
        state: Self::State,
        action: Self::Action,
        rng: &mut R,
    ) -> Result<Self::State, EnvironmentError>
    where
        R: Rng + ?Sized;

    fn reward(
        &self,
        state: Self::State,
        action: Self::Action,
        next_state: Self::State,
    ) -> Result<f64, EnvironmentError>;

    fn is_terminal(&self, state: Self::State) -> Result<bool, EnvironmentError>;

    fn feature_vector(
        &self,
        state: Self::State,
        action: Self::Action,
    ) -> Result<Vec<f64>, EnvironmentError>;

    /// Largest tile reached in `state`, for episode statistics.
    fn highest_tile(&self, state: Self::State) -> Result<u32, EnvironmentError>;

    /// Human-readable rendering of `state` for progress reports.
    fn render_state(&self, state: Self::State) -> String {
        format!("{state:?}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardScheme {
    pub win: f64,
    pub penalty: f64,
    pub step: f64,
}

impl Default for RewardScheme {
    fn default() -> Self {
        Self {
            win: 100.0,
            penalty: -100_000.0,
            step: -1.0,
        }
    }
}

/// Which actions policies may choose from.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum ActionSpace {
    /// Only directions that change the board; all four when none does.
    #[default]
    #[display("valid_only")]
    ValidOnly,
    /// All four directions, no-op moves included.
    #[display("all")]
    All,
}

#[derive(Debug, Clone)]
pub struct Game2048Env {
    extractor: FeatureExtractor,
    rewards: RewardScheme,
    action_space: ActionSpace,
}

impl Game2048Env {
    #[must_use]
    pub fn new(extractor: FeatureExtractor) -> Self {
        Self {
            extractor,
            rewards: RewardScheme::default(),
            action_space: ActionSpace::default(),
        }
    }

    #[must_use]
    pub fn with_rewards(mut self, rewards: RewardScheme) -> Self {
        self.rewards = rewards;
        self
    }

    #[must_use]
    pub fn with_action_space(mut self, action_space: ActionSpace) -> Self {
        self.action_space = action_space;
        self
    }

    #[must_use]
    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    #[must_use]
    pub fn rewards(&self) -> &RewardScheme {
        &self.rewards
    }

    #[must_use]
    pub fn action_space(&self) -> ActionSpace {
        self.action_space
    }
}

impl Environment for Game2048Env {
    type State = StateId;
    type Action = Direction;

    fn feature_len(&self) -> usize {
        self.extractor.len()
    }

    fn initial_state<R>(&self, rng: &mut R) -> Result<StateId, EnvironmentError>
    where
        R: Rng + ?Sized,
    {
        Ok(Board::new_game(rng).to_state_id()?)
    }

    fn valid_actions(&self, state: StateId) -> Result<Vec<Direction>, EnvironmentError> {
        if state.is_win() {
            return Ok(vec![]);
        }
        let board = Board::try_from(state)?;
        if board.status().is_terminal() {
            return Ok(vec![]);
        }
        let actions = match self.action_space {
            ActionSpace::ValidOnly => board.valid_moves().to_vec(),
            ActionSpace::All => Direction::ALL.to_vec(),
        };
        if actions.is_empty() {
            return Ok(Direction::ALL.to_vec());
        }
        Ok(actions)
    }

    /// Applies `action` and spawns one tile if the board changed.
    ///
    /// A no-op move returns `state` unchanged.
    fn transition<R>(
        &self,
        state: StateId,
        action: Direction,
        rng: &mut R,
    ) -> Result<StateId, EnvironmentError>
    where
        R: Rng + ?Sized,
    {
        let board = Board::try_from(state)?;
        let outcome = board.apply_move(action);
        if !outcome.changed {
            return Ok(state);
        }
        let mut next = outcome.board;
        if next.has_winning_tile() {
            return Ok(StateId::WIN);
        }
        next.spawn_tile(rng)?;
        Ok(next.to_state_id()?)
    }

    fn reward(
        &self,
        state: StateId,
        _action: Direction,
        next_state: StateId,
    ) -> Result<f64, EnvironmentError> {
        if next_state.is_win() {
            return Ok(self.rewards.win);
        }
        if state == next_state || Board::try_from(next_state)?.status().is_lost() {
            return Ok(self.rewards.penalty);
        }
        Ok(self.rewards.step)
    }

    fn is_terminal(&self, state: StateId) -> Result<bool, EnvironmentError> {
        if state.is_win() {
            return Ok(true);
        }
        Ok(Board::try_from(state)?.status().is_terminal())
    }

    fn feature_vector(
        &self,
        state: StateId,
        action: Direction,
    ) -> Result<Vec<f64>, EnvironmentError> {
        let board = Board::try_from(state)?;
        Ok(self.extractor.extract(&board, Some(action)))
    }

    fn highest_tile(&self, state: StateId) -> Result<u32, EnvironmentError> {
        if state.is_win() {
            return Ok(WINNING_TILE);
        }
        Ok(Board::try_from(state)?.max_tile())
    }

    fn render_state(&self, state: StateId) -> String {
        match Board::try_from(state) {
            Ok(board) => board.to_string(),
            Err(DecodeError::Terminal) => format!("reached {WINNING_TILE}"),
            Err(err) => err.to_string(),
        }
    }
}
