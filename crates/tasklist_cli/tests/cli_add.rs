use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

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

#[test]
fn add_writes_task_to_store() {
    let store_path = temp_path("cli-add.json");

    let output = tasklist(&store_path)
        .args(["add", "  Buy milk  ", "--description", " two liters "])
        .output()
        .expect("failed to run add command");

    let content = std::fs::read_to_string(&store_path).expect("store file written");
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Added task: Buy milk"));

    let tasks: serde_json::Value = serde_json::from_str(&content).expect("store is json");
    let tasks = tasks.as_array().expect("json array");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Buy milk");
    assert_eq!(tasks[0]["description"], "two liters");
    assert_eq!(tasks[0]["completed"], false);
}

#[test]
fn add_prepends_newest_task() {
    let store_path = temp_path("cli-add-order.json");

    for title in ["first", "second"] {
        let output = tasklist(&store_path)
            .args(["add", title])
            .output()
            .expect("failed to run add command");
        assert!(output.status.success());
    }

    let content = std::fs::read_to_string(&store_path).expect("store file written");
    std::fs::remove_file(&store_path).ok();

    let tasks: serde_json::Value = serde_json::from_str(&content).unwrap();
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["title"], "second");
    assert_eq!(tasks[1]["title"], "first");
}

#[test]
fn add_whitespace_title_fails_and_writes_nothing() {
    let store_path = temp_path("cli-add-blank.json");

    let output = tasklist(&store_path)
        .args(["add", "   "])
        .output()
        .expect("failed to run add command");

    let store_exists = store_path.exists();
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
    assert!(!store_exists);
}

#[test]
fn add_json_outputs_the_new_task() {
    let store_path = temp_path("cli-add-json.json");

    let output = tasklist(&store_path)
        .args(["--json", "add", "Read a book"])
        .output()
        .expect("failed to run add command");

    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let task: serde_json::Value = serde_json::from_str(&stdout).expect("json output");
    assert_eq!(task["title"], "Read a book");
    assert_eq!(task["completed"], false);
    assert!(!task["id"].as_str().unwrap_or("").is_empty());

    let created_at = task["created_at"].as_str().expect("created_at present");
    OffsetDateTime::parse(created_at, &Rfc3339).expect("created_at is RFC3339");
}
