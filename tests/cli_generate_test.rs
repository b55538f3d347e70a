//! Integration tests for graph generation and cache behavior via CLI.
//!
//! Runs with `--offline`, so no network access is needed: generation
//! serves the built-in starter graph and exercises the cache end to end.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the mg binary with an isolated data dir.
fn mg_in(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mg"));
    cmd.current_dir(dir.path());
    cmd.env("MG_DATA_DIR", dir.path().join("data"));
    cmd.env("MG_CONFIG", dir.path().join("missing-config.toml"));
    cmd
}

#[test]
fn test_generate_offline() {
    let temp = TempDir::new().unwrap();

    mg_in(&temp)
        .args(["generate", "Rust", "--offline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cached\":false"))
        .stdout(predicate::str::contains("\"label\":\"Rust\""));
}

#[test]
fn test_generate_second_run_hits_cache() {
    let temp = TempDir::new().unwrap();

    mg_in(&temp)
        .args(["generate", "Rust", "--offline"])
        .assert()
        .success();

    mg_in(&temp)
        .args(["generate", "Rust", "--offline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cached\":true"));
}

#[test]
fn test_generate_no_cache_bypasses() {
    let temp = TempDir::new().unwrap();

    mg_in(&temp)
        .args(["generate", "Rust", "--offline"])
        .assert()
        .success();

    mg_in(&temp)
        .args(["generate", "Rust", "--offline", "--no-cache"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cached\":false"));
}

#[test]
fn test_generate_human_readable() {
    let temp = TempDir::new().unwrap();

    mg_in(&temp)
        .args(["-H", "generate", "Compilers", "--offline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated graph for \"Compilers\""))
        .stdout(predicate::str::contains("4 nodes, 3 edges"));
}

#[test]
fn test_themes_and_layouts_listings() {
    let temp = TempDir::new().unwrap();

    mg_in(&temp)
        .args(["-H", "themes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rainbow"))
        .stdout(predicate::str::contains("midnight"));

    mg_in(&temp)
        .args(["-H", "layouts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("concentric"))
        .stdout(predicate::str::contains("hierarchical-lr"));
}

#[test]
fn test_cache_path_and_clear() {
    let temp = TempDir::new().unwrap();

    mg_in(&temp)
        .args(["generate", "Rust", "--offline"])
        .assert()
        .success();

    mg_in(&temp)
        .args(["-H", "cache", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("data"));

    mg_in(&temp)
        .args(["cache", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"removed\":1"));

    // Cleared: the next generate is a fresh one
    mg_in(&temp)
        .args(["generate", "Rust", "--offline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cached\":false"));
}
