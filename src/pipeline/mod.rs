//! Training and evaluation pipeline
//!
//! This module provides:
//! - The trainer that plays episodes between a learner and an opponent
//! - Greedy evaluation of a trained policy
//! - Baseline opponents
//! - Observers that report training progress

pub mod baselines;
pub mod evaluation;
pub mod observers;
pub mod training;

pub use baselines::RandomAgent;
pub use evaluation::{EvaluationResult, ExplorationGuard};
pub use observers::{LogObserver, ProgressObserver};
pub use training::{EpisodeSummary, Trainer, TrainingConfig, TrainingResult, WindowSample};

pub use crate::ports::{Observer, Policy};
