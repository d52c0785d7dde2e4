//! Tic-Tac-Toe game implementation

pub mod board;
pub mod environment;
pub mod game;
pub mod lines;

pub use board::{BOARD_CELLS, BoardState, Cell, Player};
pub use environment::{StepResult, TicTacToeEnv};
pub use game::{EpisodeResult, GameOutcome};
pub use lines::{LineAnalyzer, WINNING_LINES};
