//! Training observers
//!
//! Observers report training progress without the trainer knowing the
//! output format.

use indicatif::{ProgressBar, ProgressStyle};

use super::training::{EpisodeSummary, TrainingResult, WindowSample};
use crate::{Result, ports::Observer, tictactoe::EpisodeResult};

/// Progress bar observer - shows training progress on the terminal
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: usize,
    draws: usize,
    losses: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            wins: 0,
            draws: 0,
            losses: 0,
        }
    }

    fn message(&self) -> String {
        format!("{} D:{} L:{}", self.wins, self.draws, self.losses)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (W:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        match summary.result {
            EpisodeResult::Win => self.wins += 1,
            EpisodeResult::Loss => self.losses += 1,
            EpisodeResult::Draw => self.draws += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Writes each windowed win-rate sample as a log line
#[derive(Debug, Default)]
pub struct LogObserver {
    total_episodes: usize,
}

impl LogObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Observer for LogObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.total_episodes = total_episodes;
        Ok(())
    }

    fn on_window(&mut self, sample: &WindowSample) -> Result<()> {
        log::info!(
            "episode {}/{}: win rate {:.1}% over last {}, epsilon {:.4}, {} Q-values, {:.1}s",
            sample.episode,
            self.total_episodes,
            sample.win_rate,
            sample.window,
            sample.epsilon,
            sample.q_table_size,
            sample.elapsed_secs
        );
        Ok(())
    }

    fn on_training_end(&mut self, result: &TrainingResult) -> Result<()> {
        log::debug!("win-rate curve: {:?}", result.win_rates);
        Ok(())
    }
}
