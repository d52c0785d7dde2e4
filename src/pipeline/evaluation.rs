//! Greedy evaluation of a trained agent

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use super::training::Trainer;
use crate::{
    Result,
    ports::Policy,
    tictactoe::{EpisodeResult, GameOutcome},
};

/// Outcome counts of an evaluation run, rates in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub win_rate: f64,
    pub loss_rate: f64,
    pub draw_rate: f64,
}

impl EvaluationResult {
    fn from_counts(wins: usize, losses: usize, draws: usize) -> Self {
        let games = wins + losses + draws;
        let percent = |count: usize| {
            if games == 0 {
                0.0
            } else {
                count as f64 / games as f64 * 100.0
            }
        };
        Self {
            games,
            wins,
            losses,
            draws,
            win_rate: percent(wins),
            loss_rate: percent(losses),
            draw_rate: percent(draws),
        }
    }
}

/// Forces a policy's exploration rate to zero and restores it on drop,
/// including when evaluation bails out with an error.
pub struct ExplorationGuard<'a, P: Policy + ?Sized> {
    policy: &'a mut P,
    saved_epsilon: f64,
}

impl<'a, P: Policy + ?Sized> ExplorationGuard<'a, P> {
    pub fn new(policy: &'a mut P) -> Self {
        let saved_epsilon = policy.exploration_rate();
        policy.set_exploration_rate(0.0);
        Self {
            policy,
            saved_epsilon,
        }
    }
}

impl<P: Policy + ?Sized> Deref for ExplorationGuard<'_, P> {
    type Target = P;

    fn deref(&self) -> &P {
        self.policy
    }
}

impl<P: Policy + ?Sized> DerefMut for ExplorationGuard<'_, P> {
    fn deref_mut(&mut self) -> &mut P {
        self.policy
    }
}

impl<P: Policy + ?Sized> Drop for ExplorationGuard<'_, P> {
    fn drop(&mut self) {
        self.policy.set_exploration_rate(self.saved_epsilon);
    }
}

impl<A: Policy> Trainer<A> {
    /// Play `num_games` without exploration or learning. The agent plays its
    /// own mark; the training counters are left alone.
    pub(super) fn play_evaluation(
        &mut self,
        num_games: usize,
        opponent: &mut dyn Policy,
    ) -> Result<EvaluationResult> {
        let role = self.agent.player();
        let (mut wins, mut losses, mut draws) = (0, 0, 0);

        let env = &mut self.env;
        let mut agent = ExplorationGuard::new(&mut self.agent);

        for _ in 0..num_games {
            env.reset();
            while !env.is_done() {
                let state = env.state_key();
                let legal_actions = env.legal_actions();
                let action = if env.current_player() == role {
                    agent.choose_action(&state, &legal_actions, false)?
                } else {
                    opponent.choose_action(&state, &legal_actions, false)?
                };
                env.step(action)?;
            }

            let outcome = env.outcome().unwrap_or(GameOutcome::Draw);
            match outcome.result_for(role) {
                EpisodeResult::Win => wins += 1,
                EpisodeResult::Loss => losses += 1,
                EpisodeResult::Draw => draws += 1,
            }
        }

        let result = EvaluationResult::from_counts(wins, losses, draws);
        log::info!(
            "evaluation over {} games as {}: {:.1}% wins, {:.1}% losses, {:.1}% draws",
            result.games,
            role,
            result.win_rate,
            result.loss_rate,
            result.draw_rate
        );
        Ok(result)
    }
}
