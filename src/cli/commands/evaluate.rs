//! Evaluate command - evaluate a saved agent against a random opponent

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    adapters::MsgPackRepository,
    cli::output::{print_agent_stats, print_evaluation, print_section, print_subsection},
    pipeline::{RandomAgent, Trainer},
    ports::SnapshotRepository,
    q_learning::QLearningAgent,
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained agent")]
pub struct EvaluateArgs {
    /// Path to a saved agent snapshot
    pub agent: PathBuf,

    /// Number of evaluation games
    #[arg(long, short = 'g', default_value_t = 200)]
    pub games: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    println!("Loading trained agent from: {}", args.agent.display());

    let snapshot = MsgPackRepository::new()
        .load(&args.agent)
        .with_context(|| format!("failed to load agent from {}", args.agent.display()))?;
    let agent = QLearningAgent::from_snapshot(snapshot, args.seed)
        .context("snapshot holds invalid hyperparameters")?;

    print_section("Loaded Agent");
    print_agent_stats(&agent.stats());

    let player = agent.stats().player;
    let mut opponent = match args.seed {
        Some(seed) => RandomAgent::with_seed(player.opponent(), seed.wrapping_add(1)),
        None => RandomAgent::new(player.opponent()),
    };

    let mut trainer = Trainer::new(agent);
    let result = trainer
        .evaluate(args.games, Some(&mut opponent))
        .context("evaluation failed")?;

    print_subsection(&format!("Evaluation vs Random (as {player})"));
    print_evaluation(&result);

    Ok(())
}
