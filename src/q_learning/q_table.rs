//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{tictactoe::BoardState, types::Transition};

/// Value reported for a (state, action) pair that has never been updated
pub const UNVISITED_VALUE: f64 = 0.0;

/// Q-table mapping (state, action) pairs to Q-values
///
/// Keys are exact board states (cells plus player to move) and cell indices.
/// Entries are only ever inserted or overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    /// Q-values: (state, action_position) -> Q-value
    q_values: HashMap<(BoardState, usize), f64>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create a new Q-table
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            q_values: HashMap::new(),
            learning_rate,
            discount_factor,
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Get Q-value for a state-action pair, falling back to [`UNVISITED_VALUE`]
    pub fn get(&self, state: &BoardState, action: usize) -> f64 {
        self.q_values
            .get(&(*state, action))
            .copied()
            .unwrap_or(UNVISITED_VALUE)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: BoardState, action: usize, value: f64) {
        self.q_values.insert((state, action), value);
    }

    /// Get maximum Q-value over legal actions in a state (0.0 when there are none)
    pub fn max_q(&self, state: &BoardState, legal_actions: &[usize]) -> f64 {
        if legal_actions.is_empty() {
            return UNVISITED_VALUE;
        }
        legal_actions
            .iter()
            .map(|&action| self.get(state, action))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// All legal actions whose value equals the maximum
    pub fn greedy_actions(&self, state: &BoardState, legal_actions: &[usize]) -> Vec<usize> {
        let best = self.max_q(state, legal_actions);
        legal_actions
            .iter()
            .copied()
            .filter(|&action| self.get(state, action) == best)
            .collect()
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)], with the bootstrap
    /// term dropped on terminal transitions.
    pub fn q_learning_update(&mut self, transition: &Transition) -> f64 {
        let current_q = self.get(&transition.state, transition.action);
        let td_target = if transition.done {
            transition.reward
        } else {
            transition.reward
                + self.discount_factor
                    * self.max_q(&transition.next_state, &transition.next_legal_actions)
        };
        let new_q = current_q + self.learning_rate * (td_target - current_q);
        self.set(transition.state, transition.action, new_q);
        new_q
    }

    /// Get total number of Q-values stored
    pub fn size(&self) -> usize {
        self.q_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q_values.is_empty()
    }

    /// Iterate over stored entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&(BoardState, usize), &f64)> {
        self.q_values.iter()
    }
}
