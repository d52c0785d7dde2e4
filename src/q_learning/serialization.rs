//! Snapshot format for the Q-learning agent.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result, q_learning::config::validate_hyperparameters, q_learning::q_table::QTable,
    tictactoe::Player,
};

/// Everything needed to rebuild a [`QLearningAgent`](super::QLearningAgent):
/// the value table (which carries α and γ), the exploration schedule, the
/// assigned player and the number of completed training episodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub version: u32,
    pub q_table: QTable,
    pub epsilon: f64,
    pub epsilon_min: f64,
    pub epsilon_decay: f64,
    pub player: Player,
    pub training_episodes: u64,
}

impl AgentSnapshot {
    pub const VERSION: u32 = 1;

    pub fn learning_rate(&self) -> f64 {
        self.q_table.learning_rate()
    }

    pub fn discount_factor(&self) -> f64 {
        self.q_table.discount_factor()
    }

    /// Reject snapshots from another format version or with out-of-range
    /// hyperparameters.
    pub fn validate(&self) -> Result<()> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedSnapshotVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        validate_hyperparameters(
            self.learning_rate(),
            self.discount_factor(),
            self.epsilon,
            self.epsilon_min,
            self.epsilon_decay,
        )
    }
}
