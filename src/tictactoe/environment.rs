//! Stateful game environment driven by the trainer
//!
//! The environment owns a single [`BoardState`] and advances it one move at a
//! time. Rewards are reported from the perspective of the player who just
//! moved; the trainer recovers the other side's perspective itself.

use serde::{Deserialize, Serialize};

use super::{
    board::{BOARD_CELLS, BoardState, Cell, Player},
    game::GameOutcome,
    lines::LineAnalyzer,
};
use crate::error::{Error, IllegalMoveReason, Result};

/// Result of applying one action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// State after the move
    pub state: BoardState,
    /// Immediate reward for the mover: 1.0 on a win, 0.0 otherwise
    pub reward: f64,
    /// Whether the game has ended
    pub done: bool,
}

/// Tic-Tac-Toe environment
///
/// `Clone` produces an independent copy: the board is an owned array, so a
/// clone can be stepped without affecting the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicTacToeEnv {
    state: BoardState,
    done: bool,
    winner: Option<Player>,
}

impl TicTacToeEnv {
    /// Create an environment with an empty board and X to move
    pub fn new() -> Self {
        Self {
            state: BoardState::new(),
            done: false,
            winner: None,
        }
    }

    /// Start a new game
    pub fn reset(&mut self) -> BoardState {
        self.state = BoardState::new();
        self.done = false;
        self.winner = None;
        self.state
    }

    /// Current `(board, player to move)` pair
    pub fn state(&self) -> BoardState {
        self.state
    }

    /// Hashable key for the value table; identical to [`Self::state`]
    pub fn state_key(&self) -> BoardState {
        self.state
    }

    pub fn board(&self) -> &[Cell; BOARD_CELLS] {
        &self.state.cells
    }

    /// Player to move, or the player who made the final move once the game is over
    pub fn current_player(&self) -> Player {
        self.state.to_move
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Final outcome, `None` while the game is in progress
    pub fn outcome(&self) -> Option<GameOutcome> {
        if !self.done {
            return None;
        }
        Some(match self.winner {
            Some(player) => GameOutcome::Win(player),
            None => GameOutcome::Draw,
        })
    }

    /// Empty cells of the current board, in ascending order
    pub fn legal_actions(&self) -> Vec<usize> {
        self.state.empty_positions()
    }

    /// Empty cells of an arbitrary state, in ascending order
    pub fn legal_actions_for(state: &BoardState) -> Vec<usize> {
        state.empty_positions()
    }

    /// Place the current player's mark at `action`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalMove`] when the game is over, the index is
    /// outside 0-8, or the cell is occupied. The environment is left unchanged.
    pub fn step(&mut self, action: usize) -> Result<StepResult> {
        let reason = if self.done {
            Some(IllegalMoveReason::GameOver)
        } else if action >= BOARD_CELLS {
            Some(IllegalMoveReason::OutOfRange)
        } else if !self.state.is_empty(action) {
            Some(IllegalMoveReason::Occupied)
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(Error::IllegalMove {
                position: action,
                reason,
            });
        }

        let mover = self.state.to_move;
        self.state.cells[action] = mover.to_cell();

        // Only the mover can have just completed a line.
        let reward = if LineAnalyzer::has_won(&self.state.cells, mover) {
            self.done = true;
            self.winner = Some(mover);
            1.0
        } else if self.state.is_full() {
            self.done = true;
            0.0
        } else {
            self.state.to_move = mover.opponent();
            0.0
        };

        Ok(StepResult {
            state: self.state,
            reward,
            done: self.done,
        })
    }

    /// Final reward from `player`'s point of view.
    ///
    /// +1.0 for a win, -1.0 for a loss, 0.0 for a draw. A game still in
    /// progress also yields 0.0.
    pub fn reward_for(&self, player: Player) -> f64 {
        match self.outcome() {
            Some(GameOutcome::Win(winner)) if winner == player => 1.0,
            Some(GameOutcome::Win(_)) => -1.0,
            Some(GameOutcome::Draw) | None => 0.0,
        }
    }

    /// Completed line, if the game was won
    pub fn winning_line(&self) -> Option<[usize; 3]> {
        self.winner
            .and_then(|player| LineAnalyzer::winning_line(&self.state.cells, player))
    }

    /// Text rendering of the board
    pub fn render(&self) -> String {
        self.state
            .cells
            .chunks(3)
            .map(|row| {
                row.iter()
                    .map(|c| c.to_char().to_string())
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n---------\n")
    }
}

impl Default for TicTacToeEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_state() {
        let mut env = TicTacToeEnv::new();
        env.step(4).unwrap();
        let state = env.reset();
        assert_eq!(state, BoardState::new());
        assert!(!env.is_done());
        assert_eq!(env.legal_actions().len(), 9);
        assert_eq!(env.outcome(), None);
    }

    #[test]
    fn test_step_flips_player() {
        let mut env = TicTacToeEnv::new();
        let result = env.step(0).unwrap();
        assert_eq!(result.reward, 0.0);
        assert!(!result.done);
        assert_eq!(result.state.to_move, Player::O);
        assert_eq!(env.board()[0], Cell::X);
    }

    #[test]
    fn test_illegal_moves_leave_state_unchanged() {
        let mut env = TicTacToeEnv::new();
        env.step(4).unwrap();
        let before = env.clone();

        let err = env.step(4).unwrap_err();
        assert!(matches!(
            err,
            Error::IllegalMove {
                position: 4,
                reason: IllegalMoveReason::Occupied
            }
        ));
        let err = env.step(9).unwrap_err();
        assert!(matches!(
            err,
            Error::IllegalMove {
                reason: IllegalMoveReason::OutOfRange,
                ..
            }
        ));
        assert_eq!(env, before);
    }

    #[test]
    fn test_winner_keeps_turn() {
        let mut env = TicTacToeEnv::new();
        for action in [0, 3, 1, 4] {
            env.step(action).unwrap();
        }
        let result = env.step(2).unwrap();
        assert!(result.done);
        assert_eq!(result.reward, 1.0);
        assert_eq!(env.current_player(), Player::X);
        assert_eq!(env.winning_line(), Some([0, 1, 2]));
        assert_eq!(env.reward_for(Player::X), 1.0);
        assert_eq!(env.reward_for(Player::O), -1.0);
    }

    #[test]
    fn test_reward_for_in_progress_is_neutral() {
        let mut env = TicTacToeEnv::new();
        env.step(0).unwrap();
        assert_eq!(env.reward_for(Player::X), 0.0);
        assert_eq!(env.reward_for(Player::O), 0.0);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut env = TicTacToeEnv::new();
        env.step(4).unwrap();
        let mut copy = env.clone();
        copy.step(0).unwrap();

        assert_eq!(env.board()[0], Cell::Empty);
        assert_eq!(copy.board()[0], Cell::O);
        assert_eq!(env.current_player(), Player::O);
    }

    #[test]
    fn test_render() {
        let mut env = TicTacToeEnv::new();
        env.step(0).unwrap();
        env.step(4).unwrap();
        assert_eq!(env.render(), "X | . | .\n---------\n. | O | .\n---------\n. | . | .");
    }
}
