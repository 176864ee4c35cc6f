use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "skyjo-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn run_json(extra: &[&str], label: &str) -> serde_json::Value {
    let exe = env!("CARGO_BIN_EXE_skyjo-sim");
    let output_path = temp_path(label);
    let status = Command::new(exe)
        .args(extra)
        .args(["--report", "json", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(&output_path).expect("read output");
    let _ = std::fs::remove_file(output_path);
    serde_json::from_str(&content).expect("json report")
}

#[test]
fn cli_list_strategies_writes_output() {
    let exe = env!("CARGO_BIN_EXE_skyjo-sim");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-strategies", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available strategies"));
    for key in ["random", "local", "column"] {
        assert!(content.contains(key), "missing {key}");
    }
}

#[test]
fn cli_json_report_covers_default_roster() {
    let report = run_json(&["--rounds", "5", "--seed", "11"], "default");
    let summary = &report["summary"];
    assert_eq!(summary["rounds"], 5);
    assert_eq!(summary["completed"], 5);
    let players = summary["players"].as_array().expect("players");
    let names: Vec<&str> = players
        .iter()
        .map(|p| p["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["player1", "player2", "player3"]);
    assert!(players.iter().all(|p| p["games"] == 5));
}

#[test]
fn cli_same_seed_same_summary() {
    let args = ["--rounds", "6", "--seed", "4242", "--players", "a=column,b=local"];
    let first = run_json(&args, "repeat-a");
    let mut parallel_args = args.to_vec();
    parallel_args.push("--parallel");
    let second = run_json(&parallel_args, "repeat-b");
    assert_eq!(first["summary"], second["summary"]);
}

#[test]
fn cli_config_file_with_flag_override() {
    let config_path = temp_path("config");
    std::fs::write(
        &config_path,
        r#"{ "rounds": 500, "players": [{ "name": "solo", "strategy": "random" }] }"#,
    )
    .expect("write config");

    let exe = env!("CARGO_BIN_EXE_skyjo-sim");
    let output_path = temp_path("markdown");
    let status = Command::new(exe)
        .arg("--config")
        .arg(&config_path)
        .args(["--rounds", "3", "--report", "markdown", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(&output_path).expect("read output");
    assert!(content.contains("# Skyjo Simulation Results"));
    assert!(content.contains("**Games completed**: 3/3"));
    assert!(content.contains("| solo | random |"));
    let _ = std::fs::remove_file(config_path);
    let _ = std::fs::remove_file(output_path);
}

#[test]
fn cli_rejects_unknown_strategy() {
    let exe = env!("CARGO_BIN_EXE_skyjo-sim");
    let output = Command::new(exe)
        .args(["--players", "a=manual", "--rounds", "1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown strategy"));
}

#[test]
fn cli_console_report_prints_timing_once() {
    let exe = env!("CARGO_BIN_EXE_skyjo-sim");
    let output = Command::new(exe)
        .args(["--rounds", "3", "--seed", "5"])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("Total time").count(), 1);
}
