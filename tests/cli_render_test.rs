//! Integration tests for the render pipeline via CLI.
//!
//! These tests verify that `mg render` works end to end:
//! - a graph file is styled, laid out, revealed, and written as SVG
//! - theme/layout flags are honored and unknown names fall back
//! - JSON and human-readable output formats are correct

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

/// Write a small graph file and return the temp dir.
fn graph_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    let graph = r#"{
        "nodes": [
            {"id": "a", "label": "Topic", "group": 1},
            {"id": "b", "label": "Branch", "group": 2},
            {"id": "c", "label": "Leaf", "group": 3}
        ],
        "edges": [
            {"from": "a", "to": "b", "label": "covers"},
            {"from": "a", "to": "c"}
        ]
    }"#;
    std::fs::write(temp.path().join("graph.json"), graph).unwrap();
    temp
}

#[test]
fn test_render_writes_svg() {
    let temp = graph_dir();

    mg_in(&temp)
        .args(["render", "graph.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"nodes\":3"))
        .stdout(predicate::str::contains("\"edges\":2"));

    let svg = std::fs::read_to_string(temp.path().join("graph.svg")).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(">Topic<"));
    assert!(svg.contains("covers"));
}

#[test]
fn test_render_honors_theme_and_layout() {
    let temp = graph_dir();

    mg_in(&temp)
        .args(["render", "graph.json", "--theme", "rainbow", "--layout", "grid"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"theme\":\"rainbow\""))
        .stdout(predicate::str::contains("\"layout\":\"grid\""));

    // Rainbow core renders as a hexagon polygon
    let svg = std::fs::read_to_string(temp.path().join("graph.svg")).unwrap();
    assert!(svg.contains("<polygon"));
}

#[test]
fn test_render_unknown_names_fall_back() {
    let temp = graph_dir();

    mg_in(&temp)
        .args([
            "render",
            "graph.json",
            "--theme",
            "sparkle",
            "--layout",
            "wiggle",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"theme\":\"default\""))
        .stdout(predicate::str::contains("\"layout\":\"force\""));
}

#[test]
fn test_render_human_readable() {
    let temp = graph_dir();

    mg_in(&temp)
        .args(["-H", "render", "graph.json", "--output", "out.svg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rendered 3 nodes / 2 edges"))
        .stdout(predicate::str::contains("out.svg"));

    assert!(temp.path().join("out.svg").exists());
}

#[test]
fn test_render_missing_input_fails() {
    let temp = TempDir::new().unwrap();

    mg_in(&temp)
        .args(["render", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_bundle_writes_archive() {
    let temp = graph_dir();

    mg_in(&temp)
        .args(["bundle", "graph.json", "--topic", "Testing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"topic\":\"Testing\""));

    assert!(temp.path().join("graph.tar.gz").exists());
}
