//! Game outcomes and their classification from one player's point of view

use serde::{Deserialize, Serialize};

use super::board::Player;

/// Outcome of a completed game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

impl GameOutcome {
    /// Classify the outcome for the player holding `role`
    pub fn result_for(self, role: Player) -> EpisodeResult {
        match self {
            GameOutcome::Win(winner) if winner == role => EpisodeResult::Win,
            GameOutcome::Win(_) => EpisodeResult::Loss,
            GameOutcome::Draw => EpisodeResult::Draw,
        }
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            GameOutcome::Win(player) => Some(player),
            GameOutcome::Draw => None,
        }
    }
}

/// Result of a game for a fixed role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpisodeResult {
    Win,
    Loss,
    Draw,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_for_role() {
        let outcome = GameOutcome::Win(Player::O);
        assert_eq!(outcome.result_for(Player::O), EpisodeResult::Win);
        assert_eq!(outcome.result_for(Player::X), EpisodeResult::Loss);
        assert_eq!(GameOutcome::Draw.result_for(Player::X), EpisodeResult::Draw);
        assert_eq!(GameOutcome::Draw.winner(), None);
    }
}
