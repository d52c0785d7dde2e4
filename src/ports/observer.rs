//! Observer port - abstraction for training observation
//!
//! Observers receive training events without the trainer knowing how they
//! are reported (progress bar, log lines, nothing at all).

use crate::{
    Result,
    pipeline::{EpisodeSummary, TrainingResult, WindowSample},
};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once
/// 2. For each episode: `on_episode_end(episode, summary)`, followed by
///    `on_window(sample)` whenever a windowed win rate is sampled
/// 3. `on_training_end(result)` - once
///
/// # Examples
///
/// ```no_run
/// use morpion::{pipeline::EpisodeSummary, ports::Observer};
///
/// struct Counter(usize);
///
/// impl Observer for Counter {
///     fn on_episode_end(&mut self, _episode: usize, _summary: &EpisodeSummary) -> morpion::Result<()> {
///         self.0 += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer {
    /// Called once before the first episode.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each episode, once learning for it has been applied.
    ///
    /// `episode` is 1-based.
    fn on_episode_end(&mut self, _episode: usize, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called every `log_interval` episodes with the trailing-window win rate.
    fn on_window(&mut self, _sample: &WindowSample) -> Result<()> {
        Ok(())
    }

    /// Called once after the last episode.
    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        Ok(())
    }
}
