//! Configuration types for agent creation.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, tictactoe::Player};

/// Hyperparameters of a [`QLearningAgent`](super::QLearningAgent).
///
/// # Examples
///
/// ```
/// use morpion::q_learning::AgentConfig;
/// use morpion::tictactoe::Player;
///
/// let config = AgentConfig::default()
///     .with_learning_rate(0.2)
///     .with_discount_factor(0.95)
///     .with_exploration(1.0, 0.05, 0.99995)
///     .with_player(Player::O)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Learning rate α, in (0, 1]
    pub learning_rate: f64,
    /// Discount factor γ, in (0, 1]
    pub discount_factor: f64,
    /// Initial exploration probability ε, in [0, 1]
    pub epsilon: f64,
    /// Floor for ε
    pub epsilon_min: f64,
    /// Multiplicative per-episode decay of ε, in (0, 1]
    pub epsilon_decay: f64,
    /// Mark the agent plays
    pub player: Player,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.99,
            epsilon: 1.0,
            epsilon_min: 0.01,
            epsilon_decay: 0.9995,
            player: Player::X,
            seed: None,
        }
    }
}

impl AgentConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    /// Set the initial ε, its floor and its per-episode decay.
    pub fn with_exploration(mut self, epsilon: f64, epsilon_min: f64, epsilon_decay: f64) -> Self {
        self.epsilon = epsilon;
        self.epsilon_min = epsilon_min;
        self.epsilon_decay = epsilon_decay;
        self
    }

    pub fn with_player(mut self, player: Player) -> Self {
        self.player = player;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every hyperparameter against its admissible range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first offending value.
    pub fn validate(&self) -> Result<()> {
        validate_hyperparameters(
            self.learning_rate,
            self.discount_factor,
            self.epsilon,
            self.epsilon_min,
            self.epsilon_decay,
        )
    }
}

pub(crate) fn validate_hyperparameters(
    learning_rate: f64,
    discount_factor: f64,
    epsilon: f64,
    epsilon_min: f64,
    epsilon_decay: f64,
) -> Result<()> {
    let in_half_open = |v: f64| v > 0.0 && v <= 1.0;
    let in_unit = |v: f64| (0.0..=1.0).contains(&v);

    let invalid = |message: String| Err(Error::InvalidConfiguration { message });

    if !in_half_open(learning_rate) {
        return invalid(format!("learning rate {learning_rate} must be in (0, 1]"));
    }
    if !in_half_open(discount_factor) {
        return invalid(format!("discount factor {discount_factor} must be in (0, 1]"));
    }
    if !in_unit(epsilon) {
        return invalid(format!("epsilon {epsilon} must be in [0, 1]"));
    }
    if !in_unit(epsilon_min) {
        return invalid(format!("epsilon_min {epsilon_min} must be in [0, 1]"));
    }
    if !in_half_open(epsilon_decay) {
        return invalid(format!("epsilon_decay {epsilon_decay} must be in (0, 1]"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(AgentConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(AgentConfig::default().with_learning_rate(0.0).validate().is_err());
        assert!(AgentConfig::default().with_discount_factor(1.5).validate().is_err());
        assert!(
            AgentConfig::default()
                .with_exploration(1.2, 0.0, 0.9)
                .validate()
                .is_err()
        );
        assert!(
            AgentConfig::default()
                .with_exploration(1.0, 0.0, 0.0)
                .validate()
                .is_err()
        );
        assert!(
            AgentConfig::default()
                .with_learning_rate(f64::NAN)
                .validate()
                .is_err()
        );
    }
}
