//! Train command - train a Q-learning agent against a random opponent

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    cli::output::{
        print_evaluation, print_kv, print_section, print_subsection, print_training_result,
        print_win_rates,
    },
    pipeline::{
        EvaluationResult, LogObserver, ProgressObserver, RandomAgent, Trainer, TrainingConfig,
        TrainingResult,
    },
    q_learning::{AgentConfig, QLearningAgent},
    tictactoe::Player,
};

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    agent_player: String,
    alternate_roles: bool,
    learning_rate: f64,
    discount_factor: f64,
    epsilon: f64,
    epsilon_min: f64,
    epsilon_decay: f64,
    log_interval: usize,
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: &'a TrainingResult,
    evaluation: Option<&'a EvaluationResult>,
    metadata: SummaryMetadata,
}

pub(crate) fn parse_player_token(value: &str, flag: &str) -> Result<Player> {
    match value.trim().to_ascii_lowercase().as_str() {
        "x" | "first" | "player1" | "p1" => Ok(Player::X),
        "o" | "second" | "player2" | "p2" => Ok(Player::O),
        other => Err(anyhow!(
            "Invalid value '{other}' for {flag} (expected 'x' or 'o')"
        )),
    }
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no file name: write a default file inside it.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a Q-learning agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 10_000)]
    pub episodes: usize,

    /// Episodes per win-rate sample (also the window size)
    #[arg(long, default_value_t = 1_000)]
    pub log_interval: usize,

    /// Learning rate
    #[arg(long, default_value_t = 0.1)]
    pub alpha: f64,

    /// Discount factor
    #[arg(long, default_value_t = 0.99)]
    pub gamma: f64,

    /// Initial exploration probability
    #[arg(long, default_value_t = 1.0)]
    pub epsilon: f64,

    /// Exploration floor
    #[arg(long, default_value_t = 0.01)]
    pub epsilon_min: f64,

    /// Multiplicative exploration decay per episode
    #[arg(long, default_value_t = 0.9995)]
    pub epsilon_decay: f64,

    /// Which token the agent controls (`x` or `o`)
    #[arg(long, default_value = "x")]
    pub agent_player: String,

    /// Alternate the agent between X (odd episodes) and O (even episodes)
    #[arg(long)]
    pub alternate: bool,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file for the trained agent snapshot
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Greedy evaluation games after training (0 to skip)
    #[arg(long, default_value_t = 200)]
    pub eval_games: usize,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let agent_player = parse_player_token(&args.agent_player, "--agent-player")?;

    let summary_target = args.summary.as_ref().map(|raw| {
        let sanitized = sanitize_summary_path(raw);
        let normalized = sanitized != *raw;
        (sanitized, normalized)
    });

    let mut agent_config = AgentConfig::default()
        .with_learning_rate(args.alpha)
        .with_discount_factor(args.gamma)
        .with_exploration(args.epsilon, args.epsilon_min, args.epsilon_decay)
        .with_player(agent_player);
    if let Some(seed) = args.seed {
        agent_config = agent_config.with_seed(seed);
    }
    let agent = QLearningAgent::new(agent_config).context("invalid agent configuration")?;

    let mut config = TrainingConfig::default()
        .with_episodes(args.episodes)
        .with_log_interval(args.log_interval)
        .with_alternating_roles(args.alternate);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut trainer = Trainer::new(agent).with_observer(Box::new(LogObserver::new()));
    if args.progress {
        trainer = trainer.with_observer(Box::new(ProgressObserver::new()));
    }

    print_section("Q-Learning Training");
    print_kv("Episodes", &config.num_episodes.to_string());
    print_kv(
        "Agent plays",
        &if config.alternate_roles {
            "X and O (alternating)".to_string()
        } else {
            agent_player.to_string()
        },
    );
    print_kv("Alpha / gamma", &format!("{} / {}", args.alpha, args.gamma));
    print_kv(
        "Epsilon",
        &format!(
            "{} -> {} (decay {})",
            args.epsilon, args.epsilon_min, args.epsilon_decay
        ),
    );

    let result = trainer.train(&config).context("training failed")?;

    print_subsection("Training Results");
    print_training_result(&result);
    if !result.win_rates.is_empty() {
        print_subsection("Win Rate Over Time");
        print_win_rates(&result.win_rates, config.log_interval.max(1));
    }

    let evaluation = if args.eval_games > 0 {
        let mut opponent = match args.seed {
            Some(seed) => RandomAgent::with_seed(agent_player.opponent(), seed.wrapping_add(2)),
            None => RandomAgent::new(agent_player.opponent()),
        };
        let evaluation = trainer
            .evaluate(args.eval_games, Some(&mut opponent))
            .context("evaluation failed")?;
        print_subsection(&format!("Evaluation vs Random (as {agent_player})"));
        print_evaluation(&evaluation);
        Some(evaluation)
    } else {
        None
    };

    if let Some(output_path) = &args.output {
        trainer
            .agent()
            .save(output_path)
            .with_context(|| format!("failed to save agent to {}", output_path.display()))?;
        println!("\n✓ Agent saved to: {}", output_path.display());
    }

    if let Some((summary_path, normalized)) = summary_target {
        if let Some(parent) = summary_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create summary directory {}", parent.display())
            })?;
        }

        let summary = TrainingSummaryFile {
            training: &result,
            evaluation: evaluation.as_ref(),
            metadata: SummaryMetadata {
                agent_player: agent_player.to_string(),
                alternate_roles: config.alternate_roles,
                learning_rate: args.alpha,
                discount_factor: args.gamma,
                epsilon: args.epsilon,
                epsilon_min: args.epsilon_min,
                epsilon_decay: args.epsilon_decay,
                log_interval: config.log_interval,
                seed: args.seed,
            },
        };
        let file = File::create(&summary_path)
            .with_context(|| format!("failed to create summary {}", summary_path.display()))?;
        to_writer_pretty(file, &summary).context("failed to write summary")?;

        if normalized {
            println!("Summary written to: {} (normalized)", summary_path.display());
        } else {
            println!("Summary written to: {}", summary_path.display());
        }
    }

    Ok(())
}
