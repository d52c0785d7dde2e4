//! Policy port - the action-selection capability shared by every agent
//!
//! The trainer is written once against this trait. The learning agent and
//! the random baseline both implement it, so either can sit on either side
//! of a game.

use crate::{
    Result,
    tictactoe::{BoardState, Player},
    types::Transition,
};

/// Policy trait - unified interface for learning and fixed agents
///
/// # Examples
///
/// ```no_run
/// use morpion::{ports::Policy, tictactoe::TicTacToeEnv};
///
/// fn play_one<P: Policy>(policy: &mut P, env: &mut TicTacToeEnv) -> morpion::Result<()> {
///     let state = env.state_key();
///     let action = policy.choose_action(&state, &env.legal_actions(), false)?;
///     env.step(action)?;
///     Ok(())
/// }
/// ```
pub trait Policy {
    /// Pick one of `legal_actions` for `state`.
    ///
    /// `explore` enables the policy's exploration behaviour, if it has one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoLegalActions`] when `legal_actions` is empty.
    fn choose_action(
        &mut self,
        state: &BoardState,
        legal_actions: &[usize],
        explore: bool,
    ) -> Result<usize>;

    /// Apply one learning update. Fixed policies ignore it.
    fn learn(&mut self, _transition: &Transition) {}

    /// Advance the exploration schedule after a completed training episode.
    fn decay_exploration(&mut self) {}

    /// Current exploration probability (0.0 for policies that never explore)
    fn exploration_rate(&self) -> f64 {
        0.0
    }

    /// Override the exploration probability. Fixed policies ignore it.
    fn set_exploration_rate(&mut self, _epsilon: f64) {}

    /// Number of learned values held (0 for fixed policies)
    fn value_count(&self) -> usize {
        0
    }

    /// Mark this policy plays by default
    fn player(&self) -> Player;

    /// Name used in logs and reports
    fn name(&self) -> &str;

    /// Reseed the policy's random number generator.
    fn set_rng_seed(&mut self, _seed: u64) {}
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn choose_action(
        &mut self,
        state: &BoardState,
        legal_actions: &[usize],
        explore: bool,
    ) -> Result<usize> {
        (**self).choose_action(state, legal_actions, explore)
    }

    fn learn(&mut self, transition: &Transition) {
        (**self).learn(transition)
    }

    fn decay_exploration(&mut self) {
        (**self).decay_exploration()
    }

    fn exploration_rate(&self) -> f64 {
        (**self).exploration_rate()
    }

    fn set_exploration_rate(&mut self, epsilon: f64) {
        (**self).set_exploration_rate(epsilon)
    }

    fn value_count(&self) -> usize {
        (**self).value_count()
    }

    fn player(&self) -> Player {
        (**self).player()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn set_rng_seed(&mut self, seed: u64) {
        (**self).set_rng_seed(seed)
    }
}
