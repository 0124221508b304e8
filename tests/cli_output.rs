//! CLI Output Tests
//!
//! Runs the `minisql` binary against fixture files:
//! - Results go to stdout, one header line per block
//! - Statements run in order, blank statements skipped
//! - Errors print `CODE: message` to stderr and exit with status 1
//! - Configuration file and flag overrides

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_data_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();

    fs::write(
        dir.join("metadata.txt"),
        "<begin_table>\ntable1\nA\nB\n<end_table>\n\n<begin_table>\ntable2\nC\n<end_table>\n",
    )
    .unwrap();
    fs::write(dir.join("table1.csv"), "1,2\n3,4\n").unwrap();
    fs::write(dir.join("table2.csv"), "7\n").unwrap();

    tmp
}

fn minisql(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_minisql"))
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

// =============================================================================
// Success Tests
// =============================================================================

/// Default config reads metadata.txt and <table>.csv from the working directory.
#[test]
fn test_select_writes_header_and_rows() {
    let tmp = setup_data_dir();
    let output = minisql(tmp.path(), &["select * from table1"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "table1.A,table1.B\n1,2\n3,4\n");
    assert!(stderr(&output).is_empty());
}

/// Statements are executed in order; empty statements are skipped.
#[test]
fn test_multiple_statements() {
    let tmp = setup_data_dir();
    let output = minisql(
        tmp.path(),
        &["select sum(A) from table1;; select * from table1, table2;"],
    );

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "table1.A\n4\n\ntable1.A,table1.B,table2.C\n1,2,7\n3,4,7\n"
    );
}

/// --explain prints the plan and reads no table data.
#[test]
fn test_explain_flag() {
    let tmp = setup_data_dir();
    fs::remove_file(tmp.path().join("table2.csv")).unwrap();

    let output = minisql(tmp.path(), &["--explain", "select C from table2 where C > 1"]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.starts_with("=== EXPLAIN PLAN ==="));
    assert!(out.contains("Path: FILTERED_SCAN"));
    assert!(out.contains("table2.C"));
}

/// Flags override the configuration file.
#[test]
fn test_config_file_and_overrides() {
    let tmp = setup_data_dir();
    let data = tmp.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("table2.tsv"), "8\n9\n").unwrap();
    fs::write(
        tmp.path().join("minisql.json"),
        r#"{"table_extension": "tsv", "delimiter": "\t", "data_dir": "nowhere"}"#,
    )
    .unwrap();

    let output = minisql(
        tmp.path(),
        &["--config", "minisql.json", "--data-dir", "data", "select max(C) from table2"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "table2.C\n9\n");
}

/// Info-level logging goes to stderr as JSON lines, never to stdout.
#[test]
fn test_logging_stays_off_stdout() {
    let tmp = setup_data_dir();
    let output = minisql(tmp.path(), &["--log-level", "info", "select C from table2"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "table2.C\n7\n");

    let logs = stderr(&output);
    let events: Vec<serde_json::Value> = logs
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert!(events.iter().any(|e| e["event"] == "METADATA_LOADED"));
    assert!(events.iter().any(|e| e["event"] == "STATEMENT_COMPLETE"));
}

// =============================================================================
// Failure Tests
// =============================================================================

/// Errors print `CODE: message` to stderr and exit with status 1.
#[test]
fn test_error_exit_status() {
    let tmp = setup_data_dir();
    let output = minisql(tmp.path(), &["select Z from table1"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).starts_with("UNKNOWN_COLUMN: "));
}

/// The first failing statement stops the run.
#[test]
fn test_error_stops_later_statements() {
    let tmp = setup_data_dir();
    let output = minisql(
        tmp.path(),
        &["select A from table1; select A from nope; select C from table2"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "table1.A\n1\n3\n");
    assert!(stderr(&output).starts_with("UNKNOWN_TABLE: "));
}

/// A missing metadata file is fatal.
#[test]
fn test_missing_metadata() {
    let tmp = TempDir::new().unwrap();
    let output = minisql(tmp.path(), &["select * from table1"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("METADATA_NOT_FOUND: "));
}
