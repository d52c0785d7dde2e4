//! Q-learning agent
//!
//! Tabular, ε-greedy, off-policy TD control over exact board states.

use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    adapters::MsgPackRepository,
    ports::{Policy, SnapshotRepository},
    q_learning::{config::AgentConfig, q_table::QTable, serialization::AgentSnapshot},
    tictactoe::{BoardState, Player},
    types::Transition,
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Summary exposed to reports and the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentStats {
    pub q_table_size: usize,
    pub epsilon: f64,
    pub training_episodes: u64,
    pub player: Player,
}

/// Q-learning agent (off-policy TD control)
///
/// Learns Q* by always updating toward the maximum next-state value,
/// regardless of the action actually taken next.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    epsilon: f64,
    epsilon_min: f64,
    epsilon_decay: f64,
    player: Player,
    training_episodes: u64,
    rng: StdRng,
}

impl QLearningAgent {
    /// Create a new Q-learning agent from validated hyperparameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if any hyperparameter is out of range.
    pub fn new(config: AgentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            q_table: QTable::new(config.learning_rate, config.discount_factor),
            epsilon: config.epsilon,
            epsilon_min: config.epsilon_min,
            epsilon_decay: config.epsilon_decay,
            player: config.player,
            training_episodes: 0,
            rng: build_rng(config.seed),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Stored estimate for `(state, action)`, 0.0 when never updated
    pub fn get_value(&self, state: &BoardState, action: usize) -> f64 {
        self.q_table.get(state, action)
    }

    /// Highest estimate among `legal_actions`, 0.0 when there are none
    pub fn best_value(&self, state: &BoardState, legal_actions: &[usize]) -> f64 {
        self.q_table.max_q(state, legal_actions)
    }

    /// ε-greedy action selection with random tie-breaking among the best actions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoLegalActions`] when `legal_actions` is empty.
    pub fn choose_action(
        &mut self,
        state: &BoardState,
        legal_actions: &[usize],
        explore: bool,
    ) -> Result<usize> {
        if legal_actions.is_empty() {
            return Err(Error::NoLegalActions);
        }

        if explore && self.rng.random::<f64>() < self.epsilon {
            return legal_actions
                .choose(&mut self.rng)
                .copied()
                .ok_or(Error::NoLegalActions);
        }

        self.q_table
            .greedy_actions(state, legal_actions)
            .choose(&mut self.rng)
            .copied()
            .ok_or(Error::NoLegalActions)
    }

    /// One-step Q-learning update; returns the new estimate.
    pub fn update(&mut self, transition: &Transition) -> f64 {
        self.q_table.q_learning_update(transition)
    }

    /// Decay epsilon after a completed training episode
    pub fn decay_exploration(&mut self) {
        self.epsilon = (self.epsilon * self.epsilon_decay).max(self.epsilon_min);
        self.training_episodes += 1;
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn learning_rate(&self) -> f64 {
        self.q_table.learning_rate()
    }

    pub fn discount_factor(&self) -> f64 {
        self.q_table.discount_factor()
    }

    pub fn epsilon_min(&self) -> f64 {
        self.epsilon_min
    }

    pub fn epsilon_decay(&self) -> f64 {
        self.epsilon_decay
    }

    pub fn training_episodes(&self) -> u64 {
        self.training_episodes
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn stats(&self) -> AgentStats {
        AgentStats {
            q_table_size: self.q_table.size(),
            epsilon: self.epsilon,
            training_episodes: self.training_episodes,
            player: self.player,
        }
    }

    /// Capture the full learned state
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            version: AgentSnapshot::VERSION,
            q_table: self.q_table.clone(),
            epsilon: self.epsilon,
            epsilon_min: self.epsilon_min,
            epsilon_decay: self.epsilon_decay,
            player: self.player,
            training_episodes: self.training_episodes,
        }
    }

    /// Replace the entire learned state with `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot fails validation; the agent is then
    /// left untouched.
    pub fn restore(&mut self, snapshot: AgentSnapshot) -> Result<()> {
        snapshot.validate()?;
        self.q_table = snapshot.q_table;
        self.epsilon = snapshot.epsilon;
        self.epsilon_min = snapshot.epsilon_min;
        self.epsilon_decay = snapshot.epsilon_decay;
        self.player = snapshot.player;
        self.training_episodes = snapshot.training_episodes;
        Ok(())
    }

    /// Build an agent directly from a snapshot
    pub fn from_snapshot(snapshot: AgentSnapshot, seed: Option<u64>) -> Result<Self> {
        snapshot.validate()?;
        Ok(Self {
            q_table: snapshot.q_table,
            epsilon: snapshot.epsilon,
            epsilon_min: snapshot.epsilon_min,
            epsilon_decay: snapshot.epsilon_decay,
            player: snapshot.player,
            training_episodes: snapshot.training_episodes,
            rng: build_rng(seed),
        })
    }

    /// Save the agent as a MessagePack snapshot.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        MsgPackRepository::new().save(&self.snapshot(), path.as_ref())?;
        log::info!(
            "saved agent: {} Q-table entries, {} episodes -> {}",
            self.q_table.size(),
            self.training_episodes,
            path.as_ref().display()
        );
        Ok(())
    }

    /// Load a snapshot from disk into this agent.
    ///
    /// The agent is only modified if the file reads, decodes and validates.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let snapshot = MsgPackRepository::new().load(path.as_ref())?;
        self.restore(snapshot)?;
        log::info!(
            "loaded agent: {} Q-table entries, {} episodes <- {}",
            self.q_table.size(),
            self.training_episodes,
            path.as_ref().display()
        );
        Ok(())
    }
}

impl Policy for QLearningAgent {
    fn choose_action(
        &mut self,
        state: &BoardState,
        legal_actions: &[usize],
        explore: bool,
    ) -> Result<usize> {
        QLearningAgent::choose_action(self, state, legal_actions, explore)
    }

    fn learn(&mut self, transition: &Transition) {
        self.update(transition);
    }

    fn decay_exploration(&mut self) {
        QLearningAgent::decay_exploration(self)
    }

    fn exploration_rate(&self) -> f64 {
        self.epsilon
    }

    fn set_exploration_rate(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    fn value_count(&self) -> usize {
        self.q_table.size()
    }

    fn player(&self) -> Player {
        self.player
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::TicTacToeEnv;

    fn agent(epsilon: f64) -> QLearningAgent {
        QLearningAgent::new(
            AgentConfig::default()
                .with_learning_rate(0.5)
                .with_discount_factor(0.9)
                .with_exploration(epsilon, 0.1, 0.5)
                .with_seed(7),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = QLearningAgent::new(AgentConfig::default().with_learning_rate(2.0));
        assert!(matches!(result, Err(Error::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_choose_action_requires_legal_actions() {
        let mut agent = agent(0.0);
        let result = agent.choose_action(&BoardState::new(), &[], true);
        assert!(matches!(result, Err(Error::NoLegalActions)));
    }

    #[test]
    fn test_greedy_picks_best_action() {
        let mut agent = agent(0.0);
        let state = BoardState::new();
        agent.q_table.set(state, 6, 0.4);
        agent.q_table.set(state, 2, -0.3);

        for _ in 0..50 {
            assert_eq!(agent.choose_action(&state, &[0, 2, 6], true).unwrap(), 6);
        }
    }

    #[test]
    fn test_greedy_breaks_ties_randomly() {
        let mut agent = agent(0.0);
        let state = BoardState::new();
        agent.q_table.set(state, 1, 0.5);
        agent.q_table.set(state, 7, 0.5);

        let mut seen = [false; 9];
        for _ in 0..200 {
            seen[agent.choose_action(&state, &[1, 3, 7], false).unwrap()] = true;
        }
        assert!(seen[1] && seen[7]);
        assert!(!seen[3]);
    }

    #[test]
    fn test_full_exploration_ignores_values() {
        let mut agent = agent(1.0);
        let state = BoardState::new();
        agent.q_table.set(state, 0, 10.0);

        let picks: Vec<usize> = (0..200)
            .map(|_| agent.choose_action(&state, &[0, 1, 2], true).unwrap())
            .collect();
        assert!(picks.iter().any(|&a| a != 0));
    }

    #[test]
    fn test_exploration_disabled_without_flag() {
        let mut agent = agent(1.0);
        let state = BoardState::new();
        agent.q_table.set(state, 8, 1.0);

        for _ in 0..50 {
            assert_eq!(agent.choose_action(&state, &[0, 8], false).unwrap(), 8);
        }
    }

    #[test]
    fn test_update_matches_formula() {
        let mut agent = agent(0.0);
        let mut env = TicTacToeEnv::new();
        let state = env.state_key();
        let step = env.step(4).unwrap();
        let next_legal = env.legal_actions();
        agent.q_table.set(step.state, 0, 0.8);
        agent.q_table.set(state, 4, 0.2);

        let transition = Transition {
            state,
            action: 4,
            reward: 0.0,
            next_state: step.state,
            next_legal_actions: next_legal,
            done: false,
        };
        let new_value = agent.update(&transition);
        let expected = 0.2 + 0.5 * (0.0 + 0.9 * 0.8 - 0.2);
        assert!((new_value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_decay_clamps_at_floor() {
        let mut agent = agent(1.0);
        let mut previous = agent.epsilon();
        for _ in 0..10 {
            agent.decay_exploration();
            assert_eq!(agent.epsilon(), (previous * 0.5).max(0.1));
            assert!(agent.epsilon() <= previous);
            previous = agent.epsilon();
        }
        assert_eq!(agent.epsilon(), 0.1);
        assert_eq!(agent.training_episodes(), 10);
    }

    #[test]
    fn test_restore_replaces_state() {
        let mut source = agent(0.8);
        source.q_table.set(BoardState::new(), 4, 0.6);
        source.decay_exploration();
        let snapshot = source.snapshot();

        let mut target = QLearningAgent::new(AgentConfig::default().with_player(Player::O)).unwrap();
        target.restore(snapshot.clone()).unwrap();

        assert_eq!(target.snapshot(), snapshot);
        assert_eq!(target.stats().player, Player::X);
        assert_eq!(target.learning_rate(), 0.5);
    }

    #[test]
    fn test_failed_restore_keeps_state() {
        let mut target = agent(0.8);
        target.q_table.set(BoardState::new(), 2, 0.1);
        let before = target.snapshot();

        let mut bad = before.clone();
        bad.version = 0;
        bad.epsilon = 0.0;
        assert!(target.restore(bad).is_err());
        assert_eq!(target.snapshot(), before);
    }
}
