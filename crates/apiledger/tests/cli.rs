//! End-to-end tests for the `apiledger` binary.

use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

const GRAPH: &str = r#"{
  "symbols": [
    {"name": "Lib", "kind": "namespace"},
    {
      "name": "C", "kind": "named_type", "accessibility": "public", "container": 0,
      "locations": [{"file": "C.cs", "lines": {"start": {"line": 2, "character": 13}, "end": {"line": 2, "character": 14}}}]
    },
    {
      "name": "M", "kind": "method", "return_type": {"special": "void"},
      "parameters": [{"name": "x", "ty": {"special": "int"}}],
      "accessibility": "public", "container": 1,
      "locations": [{"file": "C.cs", "lines": {"start": {"line": 4, "character": 20}, "end": {"line": 4, "character": 21}}}]
    },
    {"name": "Hidden", "kind": "method", "return_type": {"special": "void"}, "accessibility": "private", "container": 1}
  ]
}"#;

fn apiledger(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("apiledger").unwrap();
    cmd.current_dir(dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("xdg"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn list_prints_public_api() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "graph.json", GRAPH);

    let output = apiledger(&dir)
        .args(["list", "--symbols", "graph.json", "--compact"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Lib.C\nLib.C.M(int x) -> void\n");
}

#[test]
fn check_clean_baseline_exits_zero() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "graph.json", GRAPH);
    write(dir.path(), "PublicAPI.txt", "Lib.C\nLib.C.M(int x) -> void\n");

    let output = apiledger(&dir)
        .args(["check", "--symbols", "graph.json", "--compact"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("no drift"));
}

#[test]
fn check_drift_exits_one() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "graph.json", GRAPH);
    write(dir.path(), "PublicAPI.txt", "Lib.C\nLib.C.Old() -> void\n");

    let output = apiledger(&dir)
        .args(["check", "--symbols", "graph.json", "--compact"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("C.cs:5:21: error [new-api]: Symbol 'M' is not part of the declared API."));
    assert!(out.contains("PublicAPI.txt:2:1: error [deleted-api]"));
}

#[test]
fn check_json_output() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "graph.json", GRAPH);
    write(dir.path(), "api.txt", "");
    write(dir.path(), "PublicAPI.txt", "Lib.C\n");

    let output = apiledger(&dir)
        .args([
            "check",
            "--symbols",
            "graph.json",
            "--additional-file",
            "api.txt",
            "--additional-file",
            "PublicAPI.txt",
            "--json",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["declared"], 1);
    assert_eq!(report["diagnostics"][0]["rule"], "new-api");
    assert_eq!(report["diagnostics"][0]["signature"], "Lib.C.M(int x) -> void");
}

#[test]
fn config_downgrades_severity() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "graph.json", GRAPH);
    write(dir.path(), "PublicAPI.txt", "Lib.C\n");
    write(
        dir.path(),
        "apiledger.toml",
        "[rules.new-api]\nseverity = \"warning\"\n",
    );

    let output = apiledger(&dir)
        .args([
            "check",
            "--symbols",
            "graph.json",
            "--config",
            "apiledger.toml",
            "--compact",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("warning [new-api]"));
}

#[test]
fn check_without_baseline_is_skipped() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "graph.json", GRAPH);

    let output = apiledger(&dir)
        .args(["check", "--symbols", "graph.json", "--compact"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).starts_with("skipped:"));
}

#[test]
fn malformed_graph_exits_two() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "graph.json", r#"{"symbols": [{"name": "C", "kind": "named_type", "container": 9}]}"#);

    let output = apiledger(&dir)
        .args(["check", "--symbols", "graph.json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid symbol graph"));
}

#[test]
fn rules_lists_titles_and_configured_state() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "apiledger.toml", "[rules.deleted-api]\nenabled = false\n");

    let output = apiledger(&dir)
        .args(["rules", "--config", "apiledger.toml", "--compact", "--no-desc"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("new-api      error    Add public types and members to the declared API"));
    assert!(out.contains("deleted-api  disabled Remove deleted types and members from the declared API"));
    assert!(!out.contains("source control history"));
}
