//! Integration tests for the connectome-scene binary.
//!
//! These tests run the compiled binary against small catalogue, state and
//! connection files and check the JSON it prints.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

const CATALOGUE: &str = r#"{
  "cells": [
    {"id": "ADA", "kind": "class", "cellType": "i", "nt": "l"},
    {"id": "ADAL", "class": "ADA", "cellType": "i", "nt": "l"},
    {"id": "ADAR", "class": "ADA", "cellType": "i", "nt": "l"},
    {"id": "AVM", "cellType": "s", "nt": "l"}
  ],
  "datasets": [{"id": "d1", "name": "Adult"}]
}"#;

const CONNECTIONS: &str = r#"[
  {"pre": "ADA", "post": "AVM", "type": "chemical", "synapses": {"d1": 8}},
  {"pre": "AVM", "post": "ADA", "type": "electrical", "synapses": {"d1": 4}}
]"#;

/// Path to the binary cargo built for this test run.
fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_connectome-scene"))
}

/// Write `contents` to a scratch file unique to this test and return its path.
fn scratch_file(test: &str, name: &str, contents: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("connectome-scene-{}-{}", std::process::id(), test));
    fs::create_dir_all(&dir).unwrap_or_else(|e| panic!("Cannot create {:?}: {}", dir, e));
    let path = dir.join(name);
    fs::write(&path, contents).unwrap_or_else(|e| panic!("Cannot write {:?}: {}", path, e));
    path
}

/// Run the binary with the given stdin input and CLI args.
fn run(input: &str, args: &[&str]) -> Output {
    let bin = binary_path();
    assert!(bin.exists(), "Binary not found at {:?}", bin);

    Command::new(&bin)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .and_then(|mut child| {
            use std::io::Write;
            if let Some(ref mut stdin) = child.stdin {
                stdin.write_all(input.as_bytes()).ok();
            }
            child.wait_with_output()
        })
        .expect("Failed to run binary")
}

/// Run the binary expecting success and parse its stdout as JSON.
fn run_json(input: &str, args: &[&str]) -> serde_json::Value {
    let output = run(input, args);
    assert!(
        output.status.success(),
        "Binary exited with {:?}:\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).expect("Non-UTF8 output");
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("Bad JSON ({}): {}", e, stdout))
}

fn node_ids(json: &serde_json::Value) -> Vec<String> {
    json["network"]["nodes"]
        .as_array()
        .expect("nodes array")
        .iter()
        .map(|n| n["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

// ─── Compile tests ──────────────────────────────────────────────────────────

#[test]
fn test_connections_from_stdin() {
    let catalogue = scratch_file("stdin", "catalogue.json", CATALOGUE);
    let state = scratch_file("stdin", "state.json", r#"{"input": ["ada"]}"#);
    let json = run_json(
        CONNECTIONS,
        &["-c", catalogue.to_str().unwrap(), "-s", state.to_str().unwrap()],
    );

    assert_eq!(node_ids(&json), ["ADA", "AVM"]);
    assert_eq!(json["network"]["edges"].as_array().unwrap().len(), 2);
    assert_eq!(json["network"]["runLayout"], true);
}

#[test]
fn test_connections_from_file_with_saved_positions() {
    let catalogue = scratch_file("file", "catalogue.json", CATALOGUE);
    let connections = scratch_file("file", "connections.json", CONNECTIONS);
    let state = scratch_file(
        "file",
        "state.json",
        r#"{"input": ["ADA"], "coordinates": {"positions": {"ADA": {"x": 10, "y": 20}}, "locked": ["ADA"]}}"#,
    );
    let json = run_json(
        "",
        &[
            connections.to_str().unwrap(),
            "--catalogue",
            catalogue.to_str().unwrap(),
            "--state",
            state.to_str().unwrap(),
        ],
    );

    let positions = &json["network"]["positions"];
    assert_eq!(positions["ADA"]["x"], 10.0);
    assert_eq!(positions["AVM"]["x"], 70.0);
    assert_eq!(positions["AVM"]["y"], 20.0);
    assert_eq!(json["network"]["runLayout"], false);
}

#[test]
fn test_split_state_shows_members() {
    let catalogue = scratch_file("split", "catalogue.json", CATALOGUE);
    let state = scratch_file("split", "state.json", r#"{"input": ["ADA"], "split": ["ADA"]}"#);
    let json = run_json(
        "[]",
        &["-c", catalogue.to_str().unwrap(), "-s", state.to_str().unwrap()],
    );
    assert_eq!(node_ids(&json), ["ADAL", "ADAR"]);
}

// ─── Flag tests ─────────────────────────────────────────────────────────────

#[test]
fn test_output_flag_writes_file() {
    let catalogue = scratch_file("output", "catalogue.json", CATALOGUE);
    let out = scratch_file("output", "out.json", "");
    let output = run(
        "[]",
        &[
            "-c",
            catalogue.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--pretty",
        ],
    );
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let written = fs::read_to_string(&out).expect("output file");
    assert!(written.contains("\n  \"network\""));
    let json: serde_json::Value = serde_json::from_str(&written).expect("valid JSON");
    assert!(json["network"]["nodes"].as_array().unwrap().is_empty());
}

#[test]
fn test_version_flag() {
    let output = run("", &["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("connectome-scene "));
}

// ─── Error tests ────────────────────────────────────────────────────────────

#[test]
fn test_missing_catalogue_file_fails() {
    let output = run("[]", &["-c", "/nonexistent/catalogue.json"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot read"));
}

#[test]
fn test_invalid_connections_fail() {
    let catalogue = scratch_file("invalid", "catalogue.json", CATALOGUE);
    let output = run("{not json", &["-c", catalogue.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("error:"));
}

#[test]
fn test_ambiguous_groups_in_state_fail() {
    let catalogue = scratch_file("groups", "catalogue.json", CATALOGUE);
    let state = scratch_file(
        "groups",
        "state.json",
        r#"{"groups": [
            {"id": "0", "name": "a", "open": false, "members": ["ADA"]},
            {"id": "1", "name": "b", "open": false, "members": ["ADA"]}
        ]}"#,
    );
    let output = run(
        "[]",
        &["-c", catalogue.to_str().unwrap(), "-s", state.to_str().unwrap()],
    );
    assert_eq!(output.status.code(), Some(1));
}
