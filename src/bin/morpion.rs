//! Morpion CLI - train and evaluate Tic-Tac-Toe Q-learning agents
//!
//! Set `RUST_LOG=info` to see training milestones.

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "morpion")]
#[command(version, about = "Tabular Q-learning for Tic-Tac-Toe", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Q-learning agent against a random opponent
    Train(Box<morpion::cli::commands::train::TrainArgs>),

    /// Evaluate a saved agent against a random opponent
    Evaluate(morpion::cli::commands::evaluate::EvaluateArgs),
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => morpion::cli::commands::train::execute(*args),
        Commands::Evaluate(args) => morpion::cli::commands::evaluate::execute(args),
    }
}
