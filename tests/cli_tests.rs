//! CLI integration tests
//!
//! These tests verify the CLI commands work correctly by running the binary.

#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::Command;

fn xsdbind_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_xsdbind"))
}

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

// ============================================================================
// Compile Command Tests
// ============================================================================

#[test]
fn test_cli_compile_basic() {
    let output = Command::new(xsdbind_bin())
        .args(["compile", "--prefix", "nxs", fixtures_dir().join("note.xsd").to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "compile should succeed");
    assert!(stdout.contains("xsdbind"), "should show version");
    assert!(stdout.contains("Schema: note"), "should name the schema after the file");
    assert!(stdout.contains("http://example.com/schemas/note"), "should show namespace");
    assert!(stdout.contains("title : title#anonymousType"), "should list fields");
    assert!(stdout.contains("stringList (list of string)"), "should list types");
}

#[test]
fn test_cli_compile_json_output() {
    let output = Command::new(xsdbind_bin())
        .args([
            "compile",
            "--json",
            "--name",
            "graph",
            fixtures_dir().join("graph.xsd").to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "compile --json should succeed");

    let json: serde_json::Value = serde_json::from_str(&stdout).expect("should be valid JSON");
    assert_eq!(json["name"], "graph");
    assert!(json["types"].as_array().unwrap().len() >= 7);
}

#[test]
fn test_cli_compile_reports_skipped_declarations() {
    let output = Command::new(xsdbind_bin())
        .args(["compile", fixtures_dir().join("partial.xsd").to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "partial schemas still compile");
    assert!(stderr.contains("Skipped declarations:"));
    assert!(stderr.contains("wrapper/ref"));
}

#[test]
fn test_cli_compile_missing_file() {
    let output = Command::new(xsdbind_bin())
        .args(["compile", "nonexistent.xsd"])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success(), "should fail for missing file");
    assert!(stderr.contains("Error"), "should show error message");
}

// ============================================================================
// Types Command Tests
// ============================================================================

#[test]
fn test_cli_types() {
    let output = Command::new(xsdbind_bin())
        .args(["types", fixtures_dir().join("library.xsd").to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "types should succeed");
    assert!(stdout.contains("http://example.com/schemas/library"));
    assert!(stdout.contains("http://example.com/schemas/address"));
    assert!(stdout.contains("book (complex)"));
    assert!(stdout.contains("isbn (simple)"));
}

#[test]
fn test_cli_help() {
    let output = Command::new(xsdbind_bin())
        .args(["--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("compile"));
    assert!(stdout.contains("types"));
}
