//! Shared value types exchanged between the trainer and its policies.

use serde::{Deserialize, Serialize};

use crate::tictactoe::BoardState;

/// One observed step from the learning agent's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: BoardState,
    pub action: usize,
    pub reward: f64,
    pub next_state: BoardState,
    pub next_legal_actions: Vec<usize>,
    pub done: bool,
}

impl Transition {
    /// Attribute a loss to this transition: reward -1.0, terminal.
    pub fn mark_as_loss(&mut self) {
        self.reward = -1.0;
        self.done = true;
    }
}
