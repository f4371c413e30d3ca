//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_pillbox-cli"))
        .env("PILLBOX_DATA_DIR", data_dir.path())
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(data_dir: &TempDir, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "CLI command failed: {:?}\n{}", args, stderr);
    stdout
}

/// Parse the JSON document that follows an optional one-line header.
fn parse_json(stdout: &str) -> serde_json::Value {
    let start = stdout.find(['{', '[']).expect("no JSON in output");
    serde_json::from_str(&stdout[start..]).expect("Failed to parse JSON output")
}

fn add_med(data_dir: &TempDir, name: &str, dose: &str, time: &str) -> u64 {
    let out = run_cli_success(data_dir, &["med", "add", name, "--dose", dose, "--time", time]);
    assert!(out.starts_with("Medication added: "));
    let event = parse_json(&out);
    assert_eq!(event["type"], "MedicationAdded");
    event["medication"]["id"].as_u64().expect("numeric id")
}

#[test]
fn test_med_add_and_list() {
    let dir = TempDir::new().unwrap();
    let id = add_med(&dir, "Lisinopril", "10mg", "08:00");

    let list = parse_json(&run_cli_success(&dir, &["med", "list"]));
    let meds = list.as_array().unwrap();
    assert_eq!(meds.len(), 1);
    assert_eq!(meds[0]["id"].as_u64(), Some(id));
    assert_eq!(meds[0]["frequency"], "Once daily");
    assert!(meds[0]["lastTaken"].is_null());
    assert!(meds[0]["createdAt"].is_string());
}

#[test]
fn test_med_add_rejects_bad_input() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["med", "add", "Aspirin", "--dose", " "]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));

    let (_, _, code) = run_cli(&dir, &["med", "add", "Aspirin", "--dose", "81mg", "--time", "7pm"]);
    assert_ne!(code, 0);

    let (_, _, code) = run_cli(
        &dir,
        &["med", "add", "Aspirin", "--dose", "81mg", "--frequency", "Weekly"],
    );
    assert_ne!(code, 0);

    let list = parse_json(&run_cli_success(&dir, &["med", "list"]));
    assert!(list.as_array().unwrap().is_empty());
}

#[test]
fn test_take_shows_in_today_and_history() {
    let dir = TempDir::new().unwrap();
    let id = add_med(&dir, "Lisinopril", "10mg", "08:00");

    let history = parse_json(&run_cli_success(&dir, &["history", "--json"]));
    assert!(history.as_array().unwrap().is_empty());

    let taken = parse_json(&run_cli_success(&dir, &["med", "take", &id.to_string()]));
    assert_eq!(taken["type"], "MedicationTaken");
    assert!(taken["medication"]["lastTaken"].is_string());

    let today = parse_json(&run_cli_success(&dir, &["today", "--json"]));
    assert_eq!(today[0]["status"], "taken");

    let history = parse_json(&run_cli_success(&dir, &["history", "--json"]));
    assert_eq!(history[0]["name"], "Lisinopril");
    assert!(history[0]["lastTaken"].as_str().unwrap().contains(" at "));
}

#[test]
fn test_today_text_when_empty() {
    let dir = TempDir::new().unwrap();
    let out = run_cli_success(&dir, &["today"]);
    assert!(out.contains("Pill Reminder"));
    assert!(out.contains("No medications added yet."));

    let out = run_cli_success(&dir, &["history"]);
    assert!(out.contains("No medication history yet."));
}

#[test]
fn test_delete_unknown_fails_and_keeps_collection() {
    let dir = TempDir::new().unwrap();
    add_med(&dir, "Lisinopril", "10mg", "08:00");
    let before = run_cli_success(&dir, &["med", "list"]);

    let (_, stderr, code) = run_cli(&dir, &["med", "delete", "1"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("not found"));

    assert_eq!(run_cli_success(&dir, &["med", "list"]), before);
}

#[test]
fn test_delete_and_update() {
    let dir = TempDir::new().unwrap();
    let a = add_med(&dir, "Lisinopril", "10mg", "08:00");
    let b = add_med(&dir, "Metformin", "500mg", "08:00,20:00");
    assert_ne!(a, b);

    let out = run_cli_success(&dir, &["med", "update", &b.to_string(), "--dose", "1000mg"]);
    assert_eq!(parse_json(&out)["dose"], "1000mg");

    run_cli_success(&dir, &["med", "delete", &a.to_string()]);
    let list = parse_json(&run_cli_success(&dir, &["med", "list"]));
    let meds = list.as_array().unwrap();
    assert_eq!(meds.len(), 1);
    assert_eq!(meds[0]["name"], "Metformin");

    let (_, _, code) = run_cli(&dir, &["med", "get", &a.to_string()]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_get_set_list() {
    let dir = TempDir::new().unwrap();
    assert_eq!(
        run_cli_success(&dir, &["config", "get", "clock.refresh_interval_secs"]).trim(),
        "60"
    );
    run_cli_success(&dir, &["config", "set", "clock.refresh_interval_secs", "30"]);
    assert_eq!(
        run_cli_success(&dir, &["config", "get", "clock.refresh_interval_secs"]).trim(),
        "30"
    );
    let (_, _, code) = run_cli(&dir, &["config", "set", "clock.nope", "1"]);
    assert_ne!(code, 0);

    let listed = run_cli_success(&dir, &["config", "list"]);
    assert!(listed.lines().any(|l| l == "storage.slot = medications"));
    assert!(listed.lines().any(|l| l == "clock.refresh_interval_secs = 30"));

    let listed = parse_json(&run_cli_success(&dir, &["config", "list", "--json"]));
    assert_eq!(listed["display"]["time_format"], "%H:%M");

    run_cli_success(&dir, &["config", "reset"]);
    assert_eq!(
        run_cli_success(&dir, &["config", "get", "clock.refresh_interval_secs"]).trim(),
        "60"
    );
}

#[test]
fn test_custom_date_format_reaches_history() {
    let dir = TempDir::new().unwrap();
    run_cli_success(&dir, &["config", "set", "display.date_format", "%Y-%m-%d"]);
    let id = add_med(&dir, "Aspirin", "81mg", "08:00");
    run_cli_success(&dir, &["med", "take", &id.to_string()]);

    let history = parse_json(&run_cli_success(&dir, &["history", "--json"]));
    let label = history[0]["lastTaken"].as_str().unwrap();
    let date = label.split(" at ").next().unwrap();
    assert_eq!(date.len(), 10);
    assert_eq!(&date[4..5], "-");
}
