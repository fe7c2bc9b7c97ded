//! Integration tests for the rgimport binary
//!
//! These tests exercise argument handling end-to-end. None of them reach the
//! point where az or terraform would be spawned.

use std::process::Command;

/// Get the path to the rgimport binary
fn rgimport_binary() -> std::path::PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test executable name
    path.pop(); // Remove deps directory

    path.push("rgimport");

    if cfg!(windows) {
        path.set_extension("exe");
    }

    path
}

/// Run rgimport and return output
fn run_rgimport(args: &[&str]) -> std::process::Output {
    Command::new(rgimport_binary())
        .args(args)
        .env_remove("RGIMPORT_LOGFILE")
        .env_remove("RGIMPORT_TRACE")
        .output()
        .expect("Failed to execute rgimport")
}

#[test]
fn test_help() {
    let output = run_rgimport(&["--help"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("--mapping-file"));
    assert!(stdout.contains("--continue"));
}

#[test]
fn test_short_version_flag() {
    let output = run_rgimport(&["-v"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_resource_group() {
    let output = run_rgimport(&[]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_quiet_without_mapping_file() {
    let output = run_rgimport(&["-q", "demo"]);

    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("`-q` must be used together with `-m`"));
}

#[test]
fn test_continue_without_quiet() {
    let output = run_rgimport(&["-k", "-m", "mapping.json", "demo"]);

    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("`-k` must be used together with `-q`"));
}

#[test]
fn test_invalid_name_pattern() {
    let temp = tempfile::tempdir().unwrap();
    let out = temp.path().join("out");

    let output = run_rgimport(&[
        "-q",
        "-m",
        "mapping.json",
        "-o",
        out.to_str().unwrap(),
        "-p",
        "9-*",
        "demo",
    ]);

    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid name pattern"));
}

#[test]
fn test_missing_mapping_file_fails_initialization() {
    let temp = tempfile::tempdir().unwrap();
    let out = temp.path().join("out");
    let mapping = temp.path().join("missing.json");

    let output = run_rgimport(&[
        "-q",
        "-m",
        mapping.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
        "demo",
    ]);

    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("initializing import"));
    assert!(stderr.contains("reading mapping file"));
    assert!(!out.join("main.tf").exists());
}

#[test]
fn test_interactive_mode_unavailable() {
    let temp = tempfile::tempdir().unwrap();
    let out = temp.path().join("out");

    let output = run_rgimport(&["-o", out.to_str().unwrap(), "demo"]);

    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("interactive mode is not available"));
}
