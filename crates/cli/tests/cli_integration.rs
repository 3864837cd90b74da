//! CLI integration tests for the `lpread` binary.
//!
//! Uses `assert_cmd` to spawn the binary and verify exit codes, stdout
//! content, and stderr content. Input files are written to a tempdir.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn lpread() -> Command {
    cargo_bin_cmd!("lpread")
}

/// Write `contents` to `<tempdir>/model.lp` and return its path.
fn lp_file(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("model.lp");
    fs::write(&path, contents).expect("write lp file");
    path
}

const SAMPLE: &str = "\
min obj: 2 x1 + 3 x2
subject to
c1: x1 + x2 <= 10
bounds
x1 <= 4
general
x2
end
";

// ──────────────────────────────────────────────
// Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    lpread()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("LP-format optimization model reader"));
}

#[test]
fn version_exits_0() {
    lpread()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lpread"));
}

#[test]
fn parse_help_exits_0() {
    lpread()
        .args(["parse", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("file"));
}

// ──────────────────────────────────────────────
// Parse subcommand
// ──────────────────────────────────────────────

#[test]
fn parse_valid_file_prints_model_json() {
    let dir = TempDir::new().unwrap();
    let file = lp_file(&dir, SAMPLE);

    let output = lpread().arg("parse").arg(&file).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let model: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is JSON");
    assert_eq!(model["sense"], "minimize");
    assert_eq!(model["objective"]["name"], "obj");
    assert_eq!(model["variables"][0]["name"], "x1");
    assert_eq!(model["variables"][1]["kind"], "general");
    assert_eq!(model["constraints"][0]["upper"], 10.0);
}

#[test]
fn parse_missing_file_exits_1() {
    lpread()
        .args(["parse", "/nonexistent/missing.lp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.lp"));
}

#[test]
fn parse_malformed_file_reports_line() {
    let dir = TempDir::new().unwrap();
    let file = lp_file(&dir, "min x\nst x < 1\n");

    lpread()
        .arg("parse")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains(":2"));
}

#[test]
fn parse_error_in_json_mode_is_json() {
    lpread()
        .args(["parse", "/nonexistent/missing.lp", "--output", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("{\"error\":"));
}

#[test]
fn quiet_suppresses_error_output() {
    lpread()
        .args(["parse", "/nonexistent/missing.lp", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::is_empty());
}

// ──────────────────────────────────────────────
// Check subcommand
// ──────────────────────────────────────────────

#[test]
fn check_text_output_summarizes_the_model() {
    let dir = TempDir::new().unwrap();
    let file = lp_file(&dir, SAMPLE);

    lpread()
        .arg("check")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains(": ok"))
        .stdout(predicate::str::contains("minimize"))
        .stdout(predicate::str::contains("variables    2 (1 integer)"))
        .stdout(predicate::str::contains("constraints  1"));
}

#[test]
fn check_json_output_has_the_counts() {
    let dir = TempDir::new().unwrap();
    let file = lp_file(&dir, SAMPLE);

    let output = lpread()
        .arg("check")
        .arg(&file)
        .args(["--output", "json"])
        .assert()
        .success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let summary: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is JSON");
    assert_eq!(summary["sense"], "minimize");
    assert_eq!(summary["variables"], 2);
    assert_eq!(summary["integer_variables"], 1);
    assert_eq!(summary["constraints"], 1);
    assert_eq!(summary["sos_sets"], 0);
}

#[test]
fn check_duplicate_section_exits_1() {
    let dir = TempDir::new().unwrap();
    let file = lp_file(&dir, "min x\nbounds\nx <= 1\nbounds\nx >= 0\n");

    lpread()
        .arg("check")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bounds"));
}
