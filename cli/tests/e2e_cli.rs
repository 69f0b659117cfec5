//! E2E tests for the `elevator-sim` binary.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::time::Duration;

const RECORDED_TRACE: &str = include_str!("../../backend/tests/fixtures/recorded_trace.txt");
const RECORDED_TRACE_STATISTICS: &str =
    include_str!("../../backend/tests/fixtures/recorded_trace_statistics.txt");

/// Helper: build a Command for the `elevator-sim` binary with a default timeout.
fn sim_cmd() -> assert_cmd::Command {
    let mut cmd: assert_cmd::Command = cargo_bin_cmd!("elevator-sim");
    cmd.timeout(Duration::from_secs(30));
    cmd.env_remove("RUST_LOG");
    cmd
}

// ─── argument handling ───────────────────────────────────────────

#[test]
fn help_lists_switches() {
    sim_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--fixed-dataset").and(contains("--statistics")));
}

#[test]
fn non_numeric_deadline_is_rejected() {
    sim_cmd()
        .arg("soon")
        .assert()
        .failure()
        .code(2)
        .stderr(contains("DEADLINE"));
}

#[test]
fn negative_deadline_is_rejected() {
    sim_cmd().arg("--").arg("-5").assert().failure().code(2);
}

#[test]
fn zero_deadline_prints_nothing() {
    sim_cmd().arg("0").assert().success().stdout("");
}

// ─── trace output ────────────────────────────────────────────────

#[cfg(not(any(feature = "print-statistics", feature = "strict-direction")))]
#[test]
fn fixed_dataset_matches_recorded_trace() {
    sim_cmd()
        .args(["--fixed-dataset", "4845"])
        .assert()
        .success()
        .stdout(RECORDED_TRACE);
}

#[cfg(not(feature = "strict-direction"))]
#[test]
fn statistics_add_rider_reports() {
    sim_cmd()
        .args(["--fixed-dataset", "--statistics", "4845"])
        .assert()
        .success()
        .stdout(RECORDED_TRACE_STATISTICS)
        .stdout(contains("User 1 walked after 15.2s"));
}

#[test]
fn json_format_emits_tagged_objects() {
    let output = sim_cmd()
        .args(["--fixed-dataset", "--format", "json", "300"])
        .output()
        .expect("run elevator-sim");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    let first = stdout.lines().next().expect("at least one event");
    let value: serde_json::Value = serde_json::from_str(first).expect("valid json line");
    assert_eq!(value["type"], "step");
    assert_eq!(value["label"], "U1");
    assert!(stdout.lines().all(|line| line.starts_with('{')));
}

#[test]
fn same_seed_same_trace() {
    let run = |seed: &str| {
        sim_cmd()
            .args(["--seed", seed, "6000"])
            .output()
            .expect("run elevator-sim")
            .stdout
    };
    assert_eq!(run("77"), run("77"));
    assert_ne!(run("77"), run("78"));
}

#[test]
fn diagnostics_stay_on_stderr() {
    sim_cmd()
        .args(["--fixed-dataset", "-v", "200"])
        .assert()
        .success()
        .stdout(contains("0000 N 2 0 0 0 U1").and(contains("simulation finished").not()))
        .stderr(contains("simulation finished"));
}

#[test]
fn summary_reports_simulated_time() {
    // Last task before 200 fires at 180
    sim_cmd()
        .args(["--fixed-dataset", "-v", "200"])
        .assert()
        .success()
        .stderr(contains("events=11").and(contains("simulated_seconds=18")));
}
