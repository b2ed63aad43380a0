//! Smoke tests for the compilercover CLI
//!
//! These run the real binary against small throwaway trees. A `sh` script
//! stands in for `go tool cover` so no Go toolchain is needed.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command for the compilercover binary
fn compilercover() -> Command {
    Command::cargo_bin("compilercover").expect("compilercover binary should exist")
}

/// Tree with two accepted files, one test file and one excluded package
fn sample_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let files = [
        ("cmd/compile/internal/gc/main.go", "package gc\n"),
        ("cmd/compile/internal/gc/main_test.go", "package gc\n"),
        ("cmd/compile/internal/ssa/value.go", "package ssa\n"),
        ("cmd/compile/internal/test/t.go", "package test\n"),
    ];
    for (path, body) in files {
        let full = dir.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, body).unwrap();
    }
    dir
}

fn write_config(dir: &Path, tool: &[&str]) -> std::path::PathBuf {
    let path = dir.join("cover.yaml");
    let list = tool
        .iter()
        .map(|arg| format!("'{}'", arg.replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(", ");
    fs::write(&path, format!("tool: [{list}]\noutput_path: /tmp/smoke.out\n")).unwrap();
    path
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    compilercover()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_help_flag() {
    compilercover()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("instrument"))
        .stdout(predicate::str::contains("plan"));
}

#[test]
fn test_no_args_fails() {
    compilercover().assert().failure();
}

#[test]
fn test_instrument_subcommand_help() {
    compilercover()
        .args(["instrument", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--mode"))
        .stdout(predicate::str::contains("--tool"));
}

#[test]
fn test_invalid_mode_rejected() {
    compilercover()
        .args(["instrument", "--mode", "sometimes"])
        .assert()
        .failure();
}

// ============================================================================
// Plan
// ============================================================================

#[test]
fn test_plan_lists_accepted_files() {
    let tree = sample_tree();
    compilercover()
        .args(["plan", "--color", "never", "--root"])
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "GoCover_0      cmd/compile/internal/gc/main.go",
        ))
        .stdout(predicate::str::contains(
            "GoCover_1      cmd/compile/internal/ssa/value.go",
        ))
        .stdout(predicate::str::contains("main_test.go").not())
        .stdout(predicate::str::contains("2 file(s) would be instrumented"));
}

#[test]
fn test_plan_rejected_json() {
    let tree = sample_tree();
    let output = compilercover()
        .args(["plan", "--rejected", "-f", "json", "--root"])
        .arg(tree.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("\"rejected\": \"test file\""));
    assert!(stdout.contains("\"rejected\": \"excluded package 'test'\""));
    assert!(stdout.contains("\"var\": \"GoCover_1\""));
}

#[test]
fn test_plan_does_not_modify_tree() {
    let tree = sample_tree();
    compilercover()
        .args(["plan", "--root"])
        .arg(tree.path())
        .assert()
        .success();
    let body = fs::read_to_string(tree.path().join("cmd/compile/internal/gc/main.go")).unwrap();
    assert_eq!(body, "package gc\n");
    assert!(!tree.path().join("cmd/compile/cover.go").exists());
}

#[test]
fn test_plan_missing_subtree_fails() {
    let dir = TempDir::new().unwrap();
    compilercover()
        .args(["plan", "--root"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

// ============================================================================
// Instrument
// ============================================================================

#[test]
fn test_instrument_rewrites_and_writes_driver() {
    let tree = sample_tree();
    let config = write_config(
        tree.path(),
        &["sh", "-c", "printf '// %s\\n' \"$3\"; cat \"$4\"", "cover"],
    );

    compilercover()
        .args(["instrument", "--color", "never", "--mode", "count", "--root"])
        .arg(tree.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Instrumented 2 file(s) in 2 package(s)"));

    let gc = fs::read_to_string(tree.path().join("cmd/compile/internal/gc/main.go")).unwrap();
    assert_eq!(gc, "// GoCover_0\npackage gc\n");
    let ssa = fs::read_to_string(tree.path().join("cmd/compile/internal/ssa/value.go")).unwrap();
    assert_eq!(ssa, "// GoCover_1\npackage ssa\n");
    let skipped =
        fs::read_to_string(tree.path().join("cmd/compile/internal/gc/main_test.go")).unwrap();
    assert_eq!(skipped, "package gc\n");

    let driver = fs::read_to_string(tree.path().join("cmd/compile/cover.go")).unwrap();
    assert!(driver.contains("\t\"cmd/compile/internal/gc\"\n"));
    assert!(driver.contains(
        "coverRegisterFile(\"cmd/compile/internal/ssa/value.go\", ssa.GoCover_1.Count[:]"
    ));
    assert!(driver.contains("Mode:            \"count\","));
    assert!(driver.contains("/tmp/smoke.out"));
}

#[test]
fn test_instrument_quiet_prints_nothing() {
    let tree = sample_tree();
    let config = write_config(tree.path(), &["sh", "-c", "cat \"$4\"", "cover"]);
    compilercover()
        .args(["-q", "instrument", "--root"])
        .arg(tree.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_instrument_tool_failure_aborts() {
    let tree = sample_tree();
    let config = write_config(tree.path(), &["sh", "-c", "echo boom >&2; exit 3", "cover"]);

    compilercover()
        .args(["instrument", "--root"])
        .arg(tree.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cmd/compile/internal/gc/main.go"))
        .stderr(predicate::str::contains("boom"));

    let body = fs::read_to_string(tree.path().join("cmd/compile/internal/gc/main.go")).unwrap();
    assert_eq!(body, "package gc\n");
    assert!(!tree.path().join("cmd/compile/cover.go").exists());
}

#[test]
fn test_instrument_blank_tool_rejected() {
    let tree = sample_tree();
    compilercover()
        .args(["instrument", "--tool", "   ", "--root"])
        .arg(tree.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));
}

#[test]
fn test_instrument_bad_config_file() {
    let tree = sample_tree();
    let config = tree.path().join("cover.yaml");
    fs::write(&config, "mode: [not, a, mode]\n").unwrap();
    compilercover()
        .args(["instrument", "--root"])
        .arg(tree.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
