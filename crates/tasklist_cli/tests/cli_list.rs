use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tasklist-{nanos}-{file_name}"))
}

fn tasklist(store_path: &PathBuf) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_tasklist"));
    command
        .env("TASKLIST_STORE_PATH", store_path)
        .env("TASKLIST_CONFIG_PATH", temp_path("no-config.json"))
        .env_remove("TASKLIST_DISABLE_PERSISTENCE");
    command
}

fn seed_two_tasks(store_path: &PathBuf) {
    let content = serde_json::json!([
        {
            "id": "a1",
            "title": "walk the dog",
            "description": "",
            "completed": false,
            "created_at": "2025-12-20T00:00:00Z"
        },
        {
            "id": "b2",
            "title": "water the plants",
            "description": "",
            "completed": true,
            "created_at": "2025-12-19T00:00:00Z"
        }
    ]);
    std::fs::write(store_path, serde_json::to_string(&content).unwrap()).unwrap();
}

#[test]
fn list_pending_filters_out_completed_tasks() {
    let store_path = temp_path("cli-list-pending.json");
    seed_two_tasks(&store_path);

    let output = tasklist(&store_path)
        .args(["list", "pending"])
        .output()
        .expect("failed to run list command");

    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("walk the dog"));
    assert!(!stdout.contains("water the plants"));
}

#[test]
fn list_unknown_filter_falls_back_to_all() {
    let store_path = temp_path("cli-list-unknown.json");
    seed_two_tasks(&store_path);

    let output = tasklist(&store_path)
        .args(["list", "archived"])
        .output()
        .expect("failed to run list command");

    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("walk the dog"));
    assert!(stdout.contains("water the plants"));
}

#[test]
fn list_json_outputs_filtered_array() {
    let store_path = temp_path("cli-list-json.json");
    seed_two_tasks(&store_path);

    let output = tasklist(&store_path)
        .args(["--json", "list", "completed"])
        .output()
        .expect("failed to run list command");

    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("json output");
    let tasks = parsed.as_array().expect("json array");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], "b2");
    assert_eq!(tasks[0]["completed"], true);
    assert_eq!(tasks[0]["created_at"], "2025-12-19T00:00:00Z");
}

#[test]
fn list_empty_store_prints_placeholder() {
    let store_path = temp_path("cli-list-empty.json");

    let output = tasklist(&store_path)
        .args(["list"])
        .output()
        .expect("failed to run list command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No tasks."));
}

#[test]
fn list_survives_a_corrupt_store_file() {
    let store_path = temp_path("cli-list-corrupt.json");
    std::fs::write(&store_path, "{ not json ]").unwrap();

    let output = tasklist(&store_path)
        .args(["list"])
        .output()
        .expect("failed to run list command");

    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("No tasks."));
    assert!(stderr.contains("load snapshot"));
}
