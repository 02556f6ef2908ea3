#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn triad(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("triad").unwrap();
    cmd.current_dir(dir.path()).env("TRIAD_ROOT", dir.path());
    cmd
}

fn init_project(dir: &TempDir) {
    triad(dir).arg("init").assert().success();
}

fn agents_md(dir: &TempDir) -> String {
    std::fs::read_to_string(dir.path().join("AGENTS.md")).unwrap()
}

fn session(dir: &TempDir) -> Option<String> {
    std::fs::read_to_string(dir.path().join(".triad/.session")).ok()
}

// ---------------------------------------------------------------------------
// triad init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_directory_tree() {
    let dir = TempDir::new().unwrap();
    triad(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized triad"));

    assert!(dir.path().join(".triad/features").is_dir());
    assert!(dir.path().join(".triad/config.yaml").exists());
    assert!(agents_md(&dir).contains("No feature is active"));
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    triad(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already initialized"));

    assert_eq!(agents_md(&dir).matches("<!-- triad:start -->").count(), 1);
}

#[test]
fn init_keeps_existing_agents_md_content() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("AGENTS.md"), "# House rules\n\nUse tabs.\n").unwrap();
    init_project(&dir);

    let content = agents_md(&dir);
    assert!(content.starts_with("# House rules"));
    assert!(content.contains("<!-- triad:end -->"));
}

#[test]
fn init_clean_removes_features() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    triad(&dir).args(["feature", "create", "checkout"]).assert().success();

    triad(&dir).args(["init", "--clean"]).assert().success();

    assert!(!dir.path().join(".triad/features/checkout").exists());
    assert!(session(&dir).is_none());
    assert!(agents_md(&dir).contains("No feature is active"));
}

#[test]
fn init_clean_repairs_corrupt_config() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    std::fs::write(dir.path().join(".triad/config.yaml"), "project: [").unwrap();

    triad(&dir)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("corrupt record"));

    triad(&dir).args(["init", "--clean"]).assert().success();
    triad(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No active feature"));
}

// ---------------------------------------------------------------------------
// uninitialized projects
// ---------------------------------------------------------------------------

#[test]
fn commands_fail_before_init_and_leave_no_trace() {
    let dir = TempDir::new().unwrap();

    for args in [
        vec!["feature", "create", "checkout"],
        vec!["feature", "enter", "checkout"],
        vec!["feature", "exit"],
        vec!["feature", "list"],
        vec!["phase", "set", "design"],
        vec!["phase", "next"],
    ] {
        triad(&dir)
            .args(&args)
            .assert()
            .failure()
            .stderr(predicate::str::contains("not initialized"));
    }

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn status_before_init_reports_uninitialized() {
    let dir = TempDir::new().unwrap();
    triad(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not initialized"));
}

// ---------------------------------------------------------------------------
// feature lifecycle
// ---------------------------------------------------------------------------

#[test]
fn create_then_skip_to_deliver() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    triad(&dir)
        .args(["feature", "create", "checkout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("entered phase define"));

    triad(&dir)
        .args(["phase", "set", "deliver"])
        .assert()
        .success()
        .stdout(predicate::str::contains("moved from define to deliver"));

    assert_eq!(session(&dir).unwrap().trim(), "checkout");
    let manifest =
        std::fs::read_to_string(dir.path().join(".triad/features/checkout/manifest.yaml")).unwrap();
    assert!(manifest.contains("phase: deliver"));

    let agents = agents_md(&dir);
    assert!(agents.contains("Active feature: `checkout`"));
    assert!(agents.contains("Phase: **deliver**"));
}

#[test]
fn duplicate_feature_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    triad(&dir).args(["feature", "create", "auth"]).assert().success();
    triad(&dir)
        .args(["feature", "create", "auth"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn invalid_feature_name_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    triad(&dir)
        .args(["feature", "create", "Not A Slug"])
        .assert()
        .failure();
    assert_eq!(
        std::fs::read_dir(dir.path().join(".triad/features")).unwrap().count(),
        0
    );
}

#[test]
fn exit_and_enter_round_trip() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    triad(&dir).args(["feature", "create", "checkout"]).assert().success();
    triad(&dir).args(["phase", "next"]).assert().success();

    triad(&dir).args(["feature", "exit"]).assert().success();
    assert!(session(&dir).is_none());
    triad(&dir)
        .args(["feature", "exit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No active feature"));

    triad(&dir)
        .args(["feature", "enter", "checkout"])
        .assert()
        .success();
    triad(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("checkout"))
        .stdout(predicate::str::contains("design"));
}

#[test]
fn feature_list_marks_active() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    triad(&dir).args(["feature", "create", "alpha"]).assert().success();
    triad(&dir).args(["feature", "create", "beta"]).assert().success();

    triad(&dir)
        .args(["feature", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha"))
        .stdout(predicate::str::contains("*  beta"));
}

// ---------------------------------------------------------------------------
// phases
// ---------------------------------------------------------------------------

#[test]
fn phase_set_rejects_unknown_phase() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    triad(&dir).args(["feature", "create", "checkout"]).assert().success();

    triad(&dir)
        .args(["phase", "set", "shipping"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid phase"));
}

#[test]
fn phase_set_without_active_feature_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    triad(&dir)
        .args(["phase", "set", "design"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no active feature"));
}

#[test]
fn returning_to_earlier_phase_warns() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    triad(&dir).args(["feature", "create", "checkout"]).assert().success();
    triad(&dir).args(["phase", "set", "design"]).assert().success();

    triad(&dir)
        .args(["phase", "set", "define"])
        .assert()
        .success()
        .stdout(predicate::str::contains("warning: define work already exists"));
}

// ---------------------------------------------------------------------------
// JSON output
// ---------------------------------------------------------------------------

#[test]
fn json_outcome_and_status() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let output = triad(&dir)
        .args(["--json", "feature", "create", "checkout"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let outcome: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(outcome["guidance_changed"], true);

    let output = triad(&dir).args(["-j", "status"]).output().unwrap();
    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["initialized"], true);
    assert_eq!(status["feature"], "checkout");
    assert_eq!(status["phase"], "define");
}

// ---------------------------------------------------------------------------
// triad migrate
// ---------------------------------------------------------------------------

#[test]
fn migrate_converts_structured_session() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    triad(&dir).args(["feature", "create", "checkout"]).assert().success();

    let legacy = serde_yaml::to_string(&serde_json::json!({
        "version": 1,
        "feature": "checkout",
        "phase": "design",
        "last_modified": "2026-01-05T09:30:00Z",
    }))
    .unwrap();
    std::fs::write(dir.path().join(".triad/.session"), legacy).unwrap();

    triad(&dir)
        .args(["phase", "next"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("triad migrate"));

    triad(&dir)
        .arg("migrate")
        .assert()
        .success()
        .stdout(predicate::str::contains("converted"));
    assert_eq!(session(&dir).unwrap().trim(), "checkout");
    let agents = agents_md(&dir);
    assert!(agents.contains("Active feature: `checkout`"));
    assert!(agents.contains("Phase: **design**"));

    triad(&dir)
        .arg("migrate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to migrate"));

    triad(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("design"));
}

// ---------------------------------------------------------------------------
// triad mcp
// ---------------------------------------------------------------------------

#[test]
fn mcp_serves_tool_calls_over_stdio() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let input = [
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"triad_create_feature","arguments":{"name":"checkout"}}}"#,
    ]
    .join("\n");

    let output = triad(&dir).arg("mcp").write_stdin(input).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let replies: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["result"]["serverInfo"]["name"], "triad");
    assert_eq!(replies[1]["result"]["isError"], false);
    assert_eq!(session(&dir).unwrap().trim(), "checkout");
}
