use clap::Parser;
use morpion::{
    cli::commands::{
        evaluate::{self, EvaluateArgs},
        train::{TrainArgs, execute},
    },
    q_learning::{AgentConfig, QLearningAgent},
    tictactoe::Player,
};
use tempfile::tempdir;

fn parse_args<I, T>(args: I) -> TrainArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    TrainArgs::parse_from(args)
}

#[test]
fn summary_without_extension_appends_json() {
    let tmp = tempdir().unwrap();
    let summary_stem = tmp.path().join("run_overview");

    let args = parse_args([
        "morpion-train",
        "--episodes",
        "20",
        "--log-interval",
        "5",
        "--seed",
        "7",
        "--summary",
        summary_stem.to_str().unwrap(),
        "--eval-games",
        "0",
    ]);

    execute(args).expect("training with summary should succeed");

    let expected_path = summary_stem.with_extension("json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["episodes"], 20);
    assert_eq!(parsed["training"]["win_rates"].as_array().unwrap().len(), 4);
    assert!(parsed["evaluation"].is_null());
    assert_eq!(parsed["metadata"]["seed"], 7);
    assert_eq!(parsed["metadata"]["agent_player"], "X");
}

#[test]
fn summary_directory_argument_creates_default_file() {
    let tmp = tempdir().unwrap();
    let summary_dir = tmp.path().join("summaries");
    let summary_arg = format!("{}/", summary_dir.display());

    let args = parse_args([
        "morpion-train",
        "--episodes",
        "10",
        "--eval-games",
        "10",
        "--agent-player",
        "o",
        "--summary",
        &summary_arg,
    ]);

    execute(args).expect("training with directory summary should succeed");

    let expected_path = summary_dir.join("training_summary.json");
    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["evaluation"]["games"], 10);
    assert_eq!(parsed["metadata"]["agent_player"], "O");
}

#[test]
fn trained_snapshot_can_be_evaluated() {
    let tmp = tempdir().unwrap();
    let snapshot = tmp.path().join("agent.msgpack");

    let args = parse_args([
        "morpion-train",
        "--episodes",
        "50",
        "--alternate",
        "--alpha",
        "0.2",
        "--seed",
        "3",
        "--eval-games",
        "0",
        "--output",
        snapshot.to_str().unwrap(),
    ]);
    execute(args).expect("training should succeed");

    let mut agent = QLearningAgent::new(AgentConfig::default().with_player(Player::O)).unwrap();
    agent.load(&snapshot).unwrap();
    assert_eq!(agent.training_episodes(), 50);
    assert_eq!(agent.learning_rate(), 0.2);
    assert_eq!(agent.stats().player, Player::X);

    let eval_args = EvaluateArgs::parse_from([
        "morpion-evaluate",
        snapshot.to_str().unwrap(),
        "--games",
        "20",
        "--seed",
        "1",
    ]);
    evaluate::execute(eval_args).expect("evaluation should succeed");
}

#[test]
fn evaluating_missing_snapshot_fails() {
    let tmp = tempdir().unwrap();
    let missing = tmp.path().join("nope.msgpack");
    let args = EvaluateArgs::parse_from(["morpion-evaluate", missing.to_str().unwrap()]);
    let err = evaluate::execute(args).unwrap_err();
    assert!(format!("{err:#}").contains("failed to load agent"));
}

#[test]
fn invalid_agent_player_is_rejected() {
    let args = parse_args(["morpion-train", "--agent-player", "z", "--episodes", "1"]);
    assert!(execute(args).is_err());
}
