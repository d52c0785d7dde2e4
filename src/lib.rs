//! Tabular Q-learning for Tic-Tac-Toe
//!
//! This crate provides:
//! - A Tic-Tac-Toe environment with reward signals for the mover
//! - A Q-learning agent with ε-greedy exploration and MessagePack snapshots
//! - A random baseline opponent
//! - A trainer with windowed win-rate tracking and greedy evaluation

pub mod adapters;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod tictactoe;
pub mod types;

pub use error::{Error, Result};
pub use pipeline::{EvaluationResult, RandomAgent, Trainer, TrainingConfig, TrainingResult};
pub use q_learning::{AgentConfig, QLearningAgent};
pub use tictactoe::{Player, TicTacToeEnv};
