//! Report formatting for CLI commands

use crate::{
    pipeline::{EvaluationResult, TrainingResult},
    q_learning::AgentStats,
};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

pub fn print_agent_stats(stats: &AgentStats) {
    print_kv("Player", &stats.player.to_string());
    print_kv("Q-table entries", &format_number(stats.q_table_size));
    print_kv("Epsilon", &format!("{:.4}", stats.epsilon));
    print_kv(
        "Training episodes",
        &format_number(stats.training_episodes as usize),
    );
}

pub fn print_training_result(result: &TrainingResult) {
    print_kv("Episodes", &format_number(result.episodes));
    print_kv(
        "Wins",
        &format!("{} ({:.1}%)", result.wins, result.win_rate * 100.0),
    );
    print_kv(
        "Losses",
        &format!("{} ({:.1}%)", result.losses, result.loss_rate * 100.0),
    );
    print_kv(
        "Draws",
        &format!("{} ({:.1}%)", result.draws, result.draw_rate * 100.0),
    );
    print_kv("Final epsilon", &format!("{:.4}", result.final_epsilon));
    print_kv("Q-table entries", &format_number(result.q_table_size));
    print_kv("Time", &format!("{:.2}s", result.training_time_secs));
}

/// Print the win-rate curve, one line per sample
pub fn print_win_rates(win_rates: &[f64], log_interval: usize) {
    for (i, rate) in win_rates.iter().enumerate() {
        print_kv(
            &format!("Episode {}", format_number((i + 1) * log_interval)),
            &format!("{rate:.1}%"),
        );
    }
}

pub fn print_evaluation(result: &EvaluationResult) {
    print_kv("Games", &format_number(result.games));
    print_kv("Wins", &format!("{} ({:.1}%)", result.wins, result.win_rate));
    print_kv(
        "Losses",
        &format!("{} ({:.1}%)", result.losses, result.loss_rate),
    );
    print_kv("Draws", &format!("{} ({:.1}%)", result.draws, result.draw_rate));
}
