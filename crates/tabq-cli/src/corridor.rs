//! One-dimensional corridor environment
//!
//! Positions run from `0` to `length - 1`. The agent starts at `0` and the
//! episode ends when it reaches the far end. Every move costs
//! [`STEP_REWARD`]; arriving at the goal pays [`GOAL_REWARD`] instead.

use serde::{Deserialize, Serialize};
use tabq_rl::{ActionSource, Reward};

pub const STEP_REWARD: Reward = -1.0;
pub const GOAL_REWARD: Reward = 10.0;

/// Snapshot label holding the corridor length a table was trained on
pub const LENGTH_LABEL: &str = "corridor_length";

/// Shortest corridor with a distinct start and goal
const MIN_LENGTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Left,
    Right,
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Left => write!(f, "left"),
            Move::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corridor {
    length: usize,
}

impl Corridor {
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(MIN_LENGTH),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn start(&self) -> usize {
        0
    }

    pub fn goal(&self) -> usize {
        self.length - 1
    }

    pub fn is_terminal(&self, position: usize) -> bool {
        position >= self.goal()
    }

    /// Every position, start first
    pub fn states(&self) -> Vec<usize> {
        (0..self.length).collect()
    }

    /// Apply a move; walls keep the agent in place
    pub fn step(&self, position: usize, action: Move) -> (Reward, usize) {
        let next = match action {
            Move::Left => position.saturating_sub(1),
            Move::Right => (position + 1).min(self.goal()),
        };
        let reward = if self.is_terminal(next) {
            GOAL_REWARD
        } else {
            STEP_REWARD
        };
        (reward, next)
    }
}

impl ActionSource<usize, Move> for Corridor {
    fn legal_actions(&self, state: &usize) -> Vec<Move> {
        if self.is_terminal(*state) {
            Vec::new()
        } else {
            vec![Move::Left, Move::Right]
        }
    }
}
