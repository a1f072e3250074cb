use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tempfile::tempdir;

fn run_plangate(repo_root: &Path, args: &[&str]) -> Output {
    let binary = assert_cmd::cargo::cargo_bin!("plangate");
    let mut cmd = Command::new(binary);
    cmd.current_dir(repo_root);
    cmd.arg("--format").arg("json");
    cmd.args(args);
    cmd.output().expect("plangate command executes")
}

fn run_plangate_ok(repo_root: &Path, args: &[&str]) -> Output {
    let output = run_plangate(repo_root, args);
    assert!(
        output.status.success(),
        "plangate {:?} failed:\nstdout:\n{}\nstderr:\n{}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn run_plangate_json(repo_root: &Path, args: &[&str]) -> Value {
    let output = run_plangate_ok(repo_root, args);
    serde_json::from_slice(&output.stdout).expect("valid json stdout")
}

fn run_plangate_err_json(repo_root: &Path, args: &[&str]) -> Value {
    let output = run_plangate(repo_root, args);
    assert!(
        !output.status.success(),
        "expected plangate {:?} to fail, but it succeeded:\nstdout:\n{}\nstderr:\n{}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    let json_line = stderr
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("");
    serde_json::from_str(json_line).expect("valid json error line in stderr")
}

/// Run `plangate gate` with a hook payload on stdin; returns the exit status.
fn run_gate(repo_root: &Path, payload: &str) -> bool {
    let binary = assert_cmd::cargo::cargo_bin!("plangate");
    let mut child = Command::new(binary)
        .current_dir(repo_root)
        .arg("gate")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("plangate gate spawns");
    child
        .stdin
        .take()
        .expect("piped stdin")
        .write_all(payload.as_bytes())
        .expect("payload written");
    child.wait().expect("plangate gate exits").success()
}

fn setup_plan(repo_root: &Path) {
    run_plangate_ok(repo_root, &["init", "sprint-1", "--project", "Widgets"]);
    run_plangate_ok(
        repo_root,
        &[
            "add",
            "TASK-001",
            "--title",
            "Build the parser",
            "--estimate",
            "2",
            "--criterion",
            "parses valid input",
        ],
    );
    run_plangate_ok(repo_root, &["add", "TASK-002", "--title", "Write docs"]);
}

#[test]
fn start_complete_round_trip_over_the_cli() {
    let dir = tempdir().unwrap();
    setup_plan(dir.path());

    let started = run_plangate_json(dir.path(), &["start", "TASK-001"]);
    assert_eq!(started["event"], "started");
    assert_eq!(started["task"]["status"], "in_progress");
    assert_eq!(started["statistics"]["inProgress"], 1);

    // Switching reports the paused task.
    let switched = run_plangate_json(dir.path(), &["start", "TASK-002"]);
    assert_eq!(switched["paused"], "TASK-001");

    let completed = run_plangate_json(dir.path(), &["complete", "TASK-002"]);
    assert_eq!(completed["event"], "completed");
    assert_eq!(completed["statistics"]["completed"], 1);

    let status = run_plangate_json(dir.path(), &["status"]);
    assert_eq!(status["plan"], "sprint-1");
    assert_eq!(status["projectName"], "Widgets");
    assert!(status.get("activeTask").is_none());
}

#[test]
fn errors_are_structured_json_on_stderr() {
    let dir = tempdir().unwrap();
    setup_plan(dir.path());

    let err = run_plangate_err_json(dir.path(), &["start", "TASK-404"]);
    assert_eq!(err["error"], "task_not_found");

    let err = run_plangate_err_json(dir.path(), &["add", "TASK-001", "--title", "dupe"]);
    assert_eq!(err["error"], "task_exists");

    // No plan at all.
    let empty = tempdir().unwrap();
    let err = run_plangate_err_json(empty.path(), &["status"]);
    assert_eq!(err["error"], "no_active_plan");
}

#[test]
fn completing_a_completed_task_reports_and_exits_zero() {
    let dir = tempdir().unwrap();
    setup_plan(dir.path());
    run_plangate_ok(dir.path(), &["start", "TASK-001"]);
    run_plangate_ok(dir.path(), &["complete", "TASK-001"]);

    let repeat = run_plangate_json(dir.path(), &["complete", "TASK-001"]);
    assert_eq!(repeat["event"], "already_completed");
}

#[test]
fn list_filters_by_status() {
    let dir = tempdir().unwrap();
    setup_plan(dir.path());
    run_plangate_ok(dir.path(), &["start", "TASK-001"]);

    let all = run_plangate_json(dir.path(), &["list"]);
    assert_eq!(all.as_array().map(Vec::len), Some(2));

    let active = run_plangate_json(dir.path(), &["list", "--status", "in_progress"]);
    assert_eq!(active.as_array().map(Vec::len), Some(1));
    assert_eq!(active[0]["id"], "TASK-001");
}

#[test]
fn gate_blocks_edits_until_a_task_is_active() {
    let dir = tempdir().unwrap();
    setup_plan(dir.path());

    // Non-edit tools always pass; edits are blocked with nothing active.
    assert!(run_gate(dir.path(), r#"{"name": "Bash"}"#));
    assert!(!run_gate(dir.path(), r#"{"name": "Edit"}"#));
    assert!(!run_gate(dir.path(), ""));

    run_plangate_ok(dir.path(), &["start", "TASK-001"]);
    assert!(run_gate(dir.path(), r#"{"name": "Edit"}"#));
    assert!(run_gate(dir.path(), r#"{"name": "Write"}"#));

    run_plangate_ok(dir.path(), &["complete", "TASK-001"]);
    assert!(!run_gate(dir.path(), r#"{"name": "Write"}"#));

    // Garbage payloads never block.
    assert!(run_gate(dir.path(), "{not json"));
}

#[test]
fn sweep_without_ids_is_quiet_when_nothing_applies() {
    let dir = tempdir().unwrap();
    setup_plan(dir.path());

    // No github config, not a git repo: the hook mode stays silent and green.
    let swept = run_plangate_json(dir.path(), &["sweep"]);
    assert_eq!(swept["event"], "swept");
    assert_eq!(swept["closed"].as_array().map(Vec::len), Some(0));
}

#[test]
fn use_switches_between_plans() {
    let dir = tempdir().unwrap();
    setup_plan(dir.path());
    run_plangate_ok(dir.path(), &["init", "sprint-2"]);

    let status = run_plangate_json(dir.path(), &["status"]);
    assert_eq!(status["plan"], "sprint-2");
    assert_eq!(status["statistics"]["totalTasks"], 0);

    run_plangate_ok(dir.path(), &["use", "sprint-1"]);
    let status = run_plangate_json(dir.path(), &["status"]);
    assert_eq!(status["plan"], "sprint-1");
    assert_eq!(status["statistics"]["totalTasks"], 2);
}
