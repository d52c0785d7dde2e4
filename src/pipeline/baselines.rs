//! Baseline opponents

use rand::{Rng, SeedableRng, random, rngs::StdRng};

use crate::{
    Error, Result,
    ports::Policy,
    tictactoe::{BoardState, Player},
};

/// Random policy (uniform over legal moves)
///
/// Stateless apart from its RNG; learning and exploration hooks are no-ops.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    player: Player,
    rng: StdRng,
}

impl RandomAgent {
    /// Create a new random agent playing `player`
    pub fn new(player: Player) -> Self {
        Self {
            player,
            rng: StdRng::seed_from_u64(random()),
        }
    }

    /// Create a new random agent with a deterministic seed
    pub fn with_seed(player: Player, seed: u64) -> Self {
        Self {
            player,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomAgent {
    fn choose_action(
        &mut self,
        _state: &BoardState,
        legal_actions: &[usize],
        _explore: bool,
    ) -> Result<usize> {
        if legal_actions.is_empty() {
            return Err(Error::NoLegalActions);
        }
        let index = self.rng.random_range(0..legal_actions.len());
        Ok(legal_actions[index])
    }

    fn player(&self) -> Player {
        self.player
    }

    fn name(&self) -> &str {
        "Random"
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_agent_picks_legal_moves() {
        let mut agent = RandomAgent::with_seed(Player::O, 5);
        let state = BoardState::new();
        for _ in 0..100 {
            let action = agent.choose_action(&state, &[2, 5, 8], false).unwrap();
            assert!([2, 5, 8].contains(&action));
        }
    }

    #[test]
    fn test_random_agent_rejects_empty_set() {
        let mut agent = RandomAgent::new(Player::O);
        assert!(matches!(
            agent.choose_action(&BoardState::new(), &[], true),
            Err(Error::NoLegalActions)
        ));
    }

    #[test]
    fn test_random_agent_hooks_are_noops() {
        let mut agent = RandomAgent::new(Player::X);
        agent.decay_exploration();
        agent.set_exploration_rate(0.7);
        assert_eq!(agent.exploration_rate(), 0.0);
        assert_eq!(agent.value_count(), 0);
        assert_eq!(agent.player(), Player::X);
    }
}
