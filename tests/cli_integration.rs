//! CLI smoke tests for the `fq` binary.

#![cfg(feature = "cli")]

mod common;

use std::fs;

use serde_json::Value;

use common::{run_cli_case, write_file};

fn tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_file(&dir.path().join("tree/1.txt"), 1);
    write_file(&dir.path().join("tree/2.txt"), 0);
    write_file(&dir.path().join("tree/3.etc"), 0);
    write_file(&dir.path().join("tree/sub/4.TXT"), 4);
    dir
}

#[test]
fn help_command_prints_usage() {
    let home = tempfile::tempdir().unwrap();
    let result = run_cli_case("help_command_prints_usage", home.path(), &["--help"]);
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stdout.contains("Usage: fq [OPTIONS] <ROOT>..."),
        "missing help banner; log: {}",
        result.log_path.display()
    );
}

#[test]
fn version_command_prints_version() {
    let home = tempfile::tempdir().unwrap();
    let result = run_cli_case("version_command_prints_version", home.path(), &["--version"]);
    assert!(result.status.success());
    assert!(
        result.stdout.contains(env!("CARGO_PKG_VERSION")),
        "missing version; log: {}",
        result.log_path.display()
    );
}

#[test]
fn lists_matching_files_one_per_line() {
    let dir = tree();
    let root = dir.path().join("tree");
    let root_arg = root.to_string_lossy().into_owned();
    let result = run_cli_case(
        "lists_matching_files_one_per_line",
        dir.path(),
        &[&root_arg, "--ext", "txt"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());

    let expected: Vec<String> = ["1.txt", "2.txt", "sub/4.TXT"]
        .iter()
        .map(|rel| root.join(rel).display().to_string())
        .collect();
    assert_eq!(result.lines(), expected);
}

#[test]
fn negate_and_depth_flags_apply() {
    let dir = tree();
    let root = dir.path().join("tree");
    let root_arg = root.to_string_lossy().into_owned();
    let result = run_cli_case(
        "negate_and_depth_flags_apply",
        dir.path(),
        &[&root_arg, "--ext", "txt", "--negate", "-d", "0"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    assert_eq!(
        result.lines(),
        vec![root.join("3.etc").display().to_string()]
    );
}

#[test]
fn json_output_carries_paths_and_stats() {
    let dir = tree();
    let root_arg = dir.path().join("tree").to_string_lossy().into_owned();
    let result = run_cli_case(
        "json_output_carries_paths_and_stats",
        dir.path(),
        &[&root_arg, "--min-size", "1", "--json"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());

    let payload: Value = serde_json::from_str(&result.stdout).unwrap();
    assert_eq!(payload["paths"].as_array().unwrap().len(), 2);
    assert_eq!(payload["stats"]["files"], 4);
    assert_eq!(payload["stats"]["directories"], 2);
    assert_eq!(payload["stats"]["matches"], 2);
}

#[test]
fn missing_root_exits_nonzero_with_code() {
    let dir = tree();
    let root_arg = dir.path().join("tree").to_string_lossy().into_owned();
    let gone = dir.path().join("gone").to_string_lossy().into_owned();
    let result = run_cli_case(
        "missing_root_exits_nonzero_with_code",
        dir.path(),
        &[&root_arg, &gone],
    );
    assert!(!result.status.success());
    assert!(result.stdout.is_empty(), "partial output on failure");
    assert!(
        result.stderr.contains("FQ-2001"),
        "missing error code; log: {}",
        result.log_path.display()
    );
}

#[test]
fn bad_regex_is_rejected() {
    let dir = tree();
    let root_arg = dir.path().join("tree").to_string_lossy().into_owned();
    let result = run_cli_case("bad_regex_is_rejected", dir.path(), &[&root_arg, "--name", "(["]);
    assert!(!result.status.success());
    assert!(result.stderr.contains("FQ-1101"));
}

#[test]
fn activity_log_records_query() {
    let dir = tree();
    let root_arg = dir.path().join("tree").to_string_lossy().into_owned();
    let log = dir.path().join("logs/fq.jsonl");
    let log_arg = log.to_string_lossy().into_owned();
    let result = run_cli_case(
        "activity_log_records_query",
        dir.path(),
        &[&root_arg, "--ext", "etc", "--log", &log_arg],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());

    let raw = fs::read_to_string(&log).unwrap();
    let entries: Vec<Value> = raw
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["event"], "query_complete");
    assert_eq!(entries[0]["matches"], 1);
    assert_eq!(entries[0]["filters"], 1);
}

#[test]
fn config_file_supplies_default_extensions() {
    let dir = tree();
    let root = dir.path().join("tree");
    let root_arg = root.to_string_lossy().into_owned();
    let config = dir.path().join("fq.toml");
    fs::write(&config, "[query]\nextensions = [\"etc\"]\nmax_depth = 0\n").unwrap();
    let config_arg = config.to_string_lossy().into_owned();

    let result = run_cli_case(
        "config_file_supplies_default_extensions",
        dir.path(),
        &[&root_arg, "--config", &config_arg],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    assert_eq!(result.lines(), vec![root.join("3.etc").display().to_string()]);
}

#[test]
fn missing_explicit_config_is_error() {
    let dir = tree();
    let root_arg = dir.path().join("tree").to_string_lossy().into_owned();
    let result = run_cli_case(
        "missing_explicit_config_is_error",
        dir.path(),
        &[&root_arg, "--config", "/nonexistent/fq.toml"],
    );
    assert!(!result.status.success());
    assert!(result.stderr.contains("FQ-1002"));
}

#[test]
fn empty_extension_flag_is_rejected() {
    let dir = tree();
    let root_arg = dir.path().join("tree").to_string_lossy().into_owned();
    let result = run_cli_case(
        "empty_extension_flag_is_rejected",
        dir.path(),
        &[&root_arg, "--ext", ""],
    );
    assert!(!result.status.success(), "log: {}", result.log_path.display());
    assert!(result.stdout.is_empty());
    assert!(result.stderr.contains("--ext"));
}
