//! Training pipeline for the learning agent

use std::{collections::VecDeque, path::Path, time::Instant};

use serde::{Deserialize, Serialize};

use super::{baselines::RandomAgent, evaluation::EvaluationResult};
use crate::{
    Result,
    ports::{Observer, Policy},
    q_learning::QLearningAgent,
    tictactoe::{EpisodeResult, GameOutcome, Player, TicTacToeEnv},
    types::Transition,
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub num_episodes: usize,

    /// Size of the trailing window and sampling period of the windowed win rate
    pub log_interval: usize,

    /// Play X on odd episodes and O on even ones instead of the agent's own mark
    pub alternate_roles: bool,

    /// Random seed (agent gets `seed`, opponent `seed + 1`)
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            num_episodes: 10_000,
            log_interval: 1_000,
            alternate_roles: false,
            seed: None,
        }
    }
}

impl TrainingConfig {
    pub fn with_episodes(mut self, num_episodes: usize) -> Self {
        self.num_episodes = num_episodes;
        self
    }

    pub fn with_log_interval(mut self, log_interval: usize) -> Self {
        self.log_interval = log_interval;
        self
    }

    pub fn with_alternating_roles(mut self, alternate: bool) -> Self {
        self.alternate_roles = alternate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// What happened in one training episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Mark the learning agent played
    pub role: Player,
    pub outcome: GameOutcome,
    pub result: EpisodeResult,
    /// Final reward from the learning agent's perspective (+1, -1 or 0)
    pub reward: f64,
    /// Total moves played by both sides
    pub moves: usize,
    /// Updates applied to the learning agent
    pub transitions: usize,
}

/// Windowed win rate sampled every `log_interval` episodes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSample {
    /// 1-based episode index at which the sample was taken
    pub episode: usize,
    /// Number of episodes in the window
    pub window: usize,
    /// Win percentage over the window
    pub win_rate: f64,
    pub epsilon: f64,
    pub q_table_size: usize,
    pub elapsed_secs: f64,
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total episodes played
    pub episodes: usize,

    pub wins: usize,
    pub losses: usize,
    pub draws: usize,

    /// Fractions of `episodes`
    pub win_rate: f64,
    pub loss_rate: f64,
    pub draw_rate: f64,

    /// Exploration probability after the last episode
    pub final_epsilon: f64,

    /// Number of Q-values held after training
    pub q_table_size: usize,

    /// Wall-clock duration of the run
    pub training_time_secs: f64,

    /// Windowed win percentages, one per `log_interval` episodes
    pub win_rates: Vec<f64>,
}

impl TrainingResult {
    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

fn fraction(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Drives episodes between a learning policy and an opponent
///
/// The trainer owns one environment, the learning agent and the opponent,
/// and keeps aggregate win/loss/draw counters across calls to
/// [`Trainer::train_episode`].
pub struct Trainer<A: Policy = QLearningAgent> {
    pub(super) agent: A,
    opponent: Box<dyn Policy>,
    pub(super) env: TicTacToeEnv,
    wins: usize,
    losses: usize,
    draws: usize,
    win_rates: Vec<f64>,
    observers: Vec<Box<dyn Observer>>,
}

impl<A: Policy> Trainer<A> {
    /// Create a trainer against a random opponent playing the other mark
    pub fn new(agent: A) -> Self {
        let opponent = RandomAgent::new(agent.player().opponent());
        Self {
            agent,
            opponent: Box::new(opponent),
            env: TicTacToeEnv::new(),
            wins: 0,
            losses: 0,
            draws: 0,
            win_rates: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Replace the training opponent
    pub fn with_opponent(mut self, opponent: Box<dyn Policy>) -> Self {
        self.opponent = opponent;
        self
    }

    /// Add an observer to the trainer
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut A {
        &mut self.agent
    }

    pub fn into_agent(self) -> A {
        self.agent
    }

    pub fn environment(&self) -> &TicTacToeEnv {
        &self.env
    }

    /// Aggregate (wins, losses, draws) since the last reset
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.wins, self.losses, self.draws)
    }

    /// Windowed win percentages sampled by the last [`Trainer::train`] run
    pub fn win_rates(&self) -> &[f64] {
        &self.win_rates
    }

    /// Clear aggregate counters and the win-rate curve
    pub fn reset_stats(&mut self) {
        self.wins = 0;
        self.losses = 0;
        self.draws = 0;
        self.win_rates.clear();
    }

    /// Play one training episode with the learning agent holding `role`.
    ///
    /// The agent's transitions are buffered during play and applied in order
    /// once the game has ended. If the opponent's move wins the game, the
    /// agent's most recent transition is rewritten as a terminal -1.0: the
    /// environment only rewards the mover, so this is where the loss is
    /// credited to the agent's last decision. Exploration decays exactly once.
    ///
    /// # Errors
    ///
    /// Propagates policy or environment errors; neither occurs with
    /// well-behaved policies.
    pub fn train_episode(&mut self, role: Player) -> Result<EpisodeSummary> {
        self.env.reset();
        let mut transitions: Vec<Transition> = Vec::new();
        let mut moves = 0;

        while !self.env.is_done() {
            let state = self.env.state_key();
            let legal_actions = self.env.legal_actions();

            if self.env.current_player() == role {
                let action = self.agent.choose_action(&state, &legal_actions, true)?;
                let step = self.env.step(action)?;
                transitions.push(Transition {
                    state,
                    action,
                    reward: step.reward,
                    next_state: step.state,
                    next_legal_actions: self.env.legal_actions(),
                    done: step.done,
                });
            } else {
                let action = self.opponent.choose_action(&state, &legal_actions, true)?;
                let step = self.env.step(action)?;
                if step.done
                    && self.env.winner() == Some(role.opponent())
                    && let Some(last) = transitions.last_mut()
                {
                    last.mark_as_loss();
                }
            }
            moves += 1;
        }

        for transition in &transitions {
            self.agent.learn(transition);
        }
        self.agent.decay_exploration();

        let outcome = match self.env.winner() {
            Some(winner) => GameOutcome::Win(winner),
            None => GameOutcome::Draw,
        };
        let result = outcome.result_for(role);
        match result {
            EpisodeResult::Win => self.wins += 1,
            EpisodeResult::Loss => self.losses += 1,
            EpisodeResult::Draw => self.draws += 1,
        }

        Ok(EpisodeSummary {
            role,
            outcome,
            result,
            reward: self.env.reward_for(role),
            moves,
            transitions: transitions.len(),
        })
    }

    /// Run `config.num_episodes` training episodes.
    ///
    /// Counters are reset first. Every `log_interval` episodes the win rate
    /// over the trailing `log_interval` episodes is appended to the curve.
    pub fn train(&mut self, config: &TrainingConfig) -> Result<TrainingResult> {
        if let Some(seed) = config.seed {
            self.agent.set_rng_seed(seed);
            self.opponent.set_rng_seed(seed.wrapping_add(1));
        }
        self.reset_stats();

        let interval = config.log_interval.max(1);
        let mut window: VecDeque<bool> = VecDeque::with_capacity(interval);
        let start = Instant::now();

        log::info!(
            "training {} ({}) for {} episodes against {}, epsilon {:.4}",
            self.agent.name(),
            if config.alternate_roles {
                "alternating X/O".to_string()
            } else {
                format!("as {}", self.agent.player())
            },
            config.num_episodes,
            self.opponent.name(),
            self.agent.exploration_rate()
        );
        for observer in &mut self.observers {
            observer.on_training_start(config.num_episodes)?;
        }

        for episode in 1..=config.num_episodes {
            let role = if !config.alternate_roles {
                self.agent.player()
            } else if episode % 2 == 1 {
                Player::X
            } else {
                Player::O
            };

            let summary = self.train_episode(role)?;

            if window.len() == interval {
                window.pop_front();
            }
            window.push_back(summary.result == EpisodeResult::Win);

            for observer in &mut self.observers {
                observer.on_episode_end(episode, &summary)?;
            }

            if episode % interval == 0 {
                let wins_in_window = window.iter().filter(|&&won| won).count();
                let win_rate = fraction(wins_in_window, window.len()) * 100.0;
                self.win_rates.push(win_rate);

                let sample = WindowSample {
                    episode,
                    window: window.len(),
                    win_rate,
                    epsilon: self.agent.exploration_rate(),
                    q_table_size: self.agent.value_count(),
                    elapsed_secs: start.elapsed().as_secs_f64(),
                };
                for observer in &mut self.observers {
                    observer.on_window(&sample)?;
                }
            }
        }

        let episodes = config.num_episodes;
        let result = TrainingResult {
            episodes,
            wins: self.wins,
            losses: self.losses,
            draws: self.draws,
            win_rate: fraction(self.wins, episodes),
            loss_rate: fraction(self.losses, episodes),
            draw_rate: fraction(self.draws, episodes),
            final_epsilon: self.agent.exploration_rate(),
            q_table_size: self.agent.value_count(),
            training_time_secs: start.elapsed().as_secs_f64(),
            win_rates: self.win_rates.clone(),
        };

        log::info!(
            "training finished in {:.1}s: {} wins, {} losses, {} draws ({:.1}% wins)",
            result.training_time_secs,
            result.wins,
            result.losses,
            result.draws,
            result.win_rate * 100.0
        );
        for observer in &mut self.observers {
            observer.on_training_end(&result)?;
        }

        Ok(result)
    }

    /// Evaluate the agent greedily against `opponent` (a fresh random agent
    /// when `None`). See [`super::evaluation`].
    pub fn evaluate(
        &mut self,
        num_games: usize,
        opponent: Option<&mut dyn Policy>,
    ) -> Result<EvaluationResult> {
        match opponent {
            Some(opponent) => self.play_evaluation(num_games, opponent),
            None => {
                let mut fallback = RandomAgent::new(self.agent.player().opponent());
                self.play_evaluation(num_games, &mut fallback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::q_learning::AgentConfig;

    fn seeded_agent(player: Player) -> QLearningAgent {
        QLearningAgent::new(AgentConfig::default().with_player(player).with_seed(42)).unwrap()
    }

    /// Plays a fixed list of moves regardless of state
    struct Scripted {
        player: Player,
        moves: Vec<usize>,
    }

    impl Policy for Scripted {
        fn choose_action(
            &mut self,
            _state: &crate::tictactoe::BoardState,
            _legal_actions: &[usize],
            _explore: bool,
        ) -> Result<usize> {
            Ok(self.moves.remove(0))
        }

        fn player(&self) -> Player {
            self.player
        }

        fn name(&self) -> &str {
            "Scripted"
        }
    }

    #[test]
    fn test_episode_counts_and_decay() {
        let mut trainer = Trainer::new(seeded_agent(Player::X));
        let epsilon = trainer.agent().epsilon();

        let summary = trainer.train_episode(Player::X).unwrap();

        let (w, l, d) = trainer.counts();
        assert_eq!(w + l + d, 1);
        assert_eq!(trainer.agent().training_episodes(), 1);
        assert_eq!(trainer.agent().epsilon(), (epsilon * 0.9995).max(0.01));
        assert!(summary.moves >= 5);
        assert_eq!(summary.transitions, summary.moves.div_ceil(2));
    }

    #[test]
    fn test_opponent_win_is_credited_to_last_agent_move() {
        // X (agent) plays 0, 1, 8; O (scripted) plays 3, 4, 5 and wins.
        let agent = Scripted {
            player: Player::X,
            moves: vec![0, 1, 8],
        };
        let opponent = Scripted {
            player: Player::O,
            moves: vec![3, 4, 5],
        };
        let mut trainer = Trainer::new(agent).with_opponent(Box::new(opponent));

        let summary = trainer.train_episode(Player::X).unwrap();
        assert_eq!(summary.outcome, GameOutcome::Win(Player::O));
        assert_eq!(summary.result, EpisodeResult::Loss);
        assert_eq!(summary.reward, -1.0);
        assert_eq!(summary.transitions, 3);
        assert_eq!(trainer.counts(), (0, 1, 0));
    }

    #[test]
    fn test_loss_rewrites_last_transition_value() {
        // Same game as above with a greedy learner on the X side. Only the
        // move that let O complete its row is charged the loss.
        let mut agent = QLearningAgent::new(
            AgentConfig::default()
                .with_learning_rate(0.5)
                .with_exploration(0.0, 0.0, 1.0),
        )
        .unwrap();
        let opponent = Scripted {
            player: Player::O,
            moves: vec![3, 4, 5],
        };

        // Make the greedy choices deterministic: 0, then 1, then 8.
        let mut env = TicTacToeEnv::new();
        let s0 = env.state_key();
        env.step(0).unwrap();
        env.step(3).unwrap();
        let s1 = env.state_key();
        env.step(1).unwrap();
        env.step(4).unwrap();
        let s2 = env.state_key();
        let seed_transition = |state, action| Transition {
            state,
            action,
            reward: 0.2,
            next_state: state,
            next_legal_actions: Vec::new(),
            done: true,
        };
        agent.update(&seed_transition(s0, 0));
        agent.update(&seed_transition(s1, 1));
        agent.update(&seed_transition(s2, 8));

        let mut trainer = Trainer::new(agent).with_opponent(Box::new(opponent));
        let summary = trainer.train_episode(Player::X).unwrap();
        assert_eq!(summary.result, EpisodeResult::Loss);

        let agent = trainer.agent();
        // Terminal loss: 0.1 + 0.5 * (-1.0 - 0.1)
        assert!((agent.get_value(&s2, 8) - (-0.45)).abs() < 1e-12);
        // Non-terminal moves bootstrap from the opponent-to-move state, which is unvisited
        assert!((agent.get_value(&s0, 0) - 0.05).abs() < 1e-12);
        assert!((agent.get_value(&s1, 1) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_train_collects_window_samples() {
        let mut trainer = Trainer::new(seeded_agent(Player::X));
        let config = TrainingConfig::default()
            .with_episodes(50)
            .with_log_interval(10)
            .with_seed(9);

        let result = trainer.train(&config).unwrap();

        assert_eq!(result.episodes, 50);
        assert_eq!(result.wins + result.losses + result.draws, 50);
        assert_eq!(result.win_rates.len(), 5);
        assert!(result.win_rates.iter().all(|&r| (0.0..=100.0).contains(&r)));
        assert_eq!(trainer.agent().training_episodes(), 50);
        assert!(result.q_table_size > 0);
    }

    #[test]
    fn test_seeded_training_is_reproducible() {
        let config = TrainingConfig::default()
            .with_episodes(200)
            .with_log_interval(50)
            .with_seed(17);

        let mut first = Trainer::new(seeded_agent(Player::X)).with_opponent(Box::new(
            RandomAgent::with_seed(Player::O, 0),
        ));
        let mut second = Trainer::new(seeded_agent(Player::X)).with_opponent(Box::new(
            RandomAgent::with_seed(Player::O, 99),
        ));

        let a = first.train(&config).unwrap();
        let b = second.train(&config).unwrap();

        assert_eq!((a.wins, a.losses, a.draws), (b.wins, b.losses, b.draws));
        assert_eq!(first.agent().q_table(), second.agent().q_table());
    }

    #[test]
    fn test_result_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");

        let mut trainer = Trainer::new(seeded_agent(Player::O));
        let result = trainer
            .train(&TrainingConfig::default().with_episodes(10).with_log_interval(5))
            .unwrap();
        result.save(&path).unwrap();

        let loaded = TrainingResult::load(&path).unwrap();
        assert_eq!(loaded.episodes, 10);
        assert_eq!(
            (loaded.wins, loaded.losses, loaded.draws),
            (result.wins, result.losses, result.draws)
        );
        assert_eq!(loaded.win_rates.len(), 2);
        assert!((loaded.final_epsilon - result.final_epsilon).abs() < 1e-12);
    }

    #[test]
    fn test_alternating_roles_learns_both_marks() {
        let mut trainer = Trainer::new(seeded_agent(Player::X));
        let config = TrainingConfig::default()
            .with_episodes(20)
            .with_log_interval(10)
            .with_alternating_roles(true)
            .with_seed(3);
        trainer.train(&config).unwrap();

        let table = trainer.agent().q_table();
        assert!(table.iter().any(|((state, _), _)| state.to_move == Player::X));
        assert!(table.iter().any(|((state, _), _)| state.to_move == Player::O));
    }
}
