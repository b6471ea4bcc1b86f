use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::{tempdir, TempDir};

fn fixture() -> TempDir {
    let dir = tempdir().unwrap();
    for sub in ["one", "two"] {
        let sub = dir.path().join(sub);
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("same.txt"), b"same bytes").unwrap();
    }
    fs::write(dir.path().join("other.txt"), b"something else").unwrap();
    dir
}

fn finddupes() -> Command {
    let mut cmd = Command::cargo_bin("finddupes").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_text_report() {
    let dir = fixture();
    let output = finddupes().arg("-q").arg(dir.path()).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("same.txt"));
    assert!(lines[1].ends_with("same.txt"));
    assert_eq!(lines[2], "");
}

#[test]
fn test_cli_json_report() {
    let dir = fixture();
    let output = finddupes()
        .args(["-q", "--json", "-j", "2"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let groups: Vec<Vec<String>> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
}

#[test]
fn test_cli_no_duplicates_is_success() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("lonely.txt"), b"alone").unwrap();

    finddupes()
        .arg("-q")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_cli_missing_directory_is_success() {
    finddupes()
        .args(["-q", "/nonexistent/path/12345"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_cli_invalid_glob_is_usage_error() {
    let dir = fixture();
    finddupes()
        .args(["-x", "["])
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("["));
}

#[test]
fn test_cli_bad_argument_is_usage_error() {
    finddupes().args(["--min-size", "lots", "."]).assert().code(2);
}

#[test]
fn test_cli_bad_env_is_usage_error() {
    let dir = fixture();
    finddupes()
        .env("FINDDUPES_WORKERS", "many")
        .arg(dir.path())
        .assert()
        .code(2);
}

#[test]
fn test_cli_env_configuration() {
    let dir = fixture();
    finddupes()
        .env("FINDDUPES_MIN_GROUP_SIZE", "3")
        .arg("-q")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_cli_flag_overrides_env() {
    let dir = fixture();
    finddupes()
        .env("FINDDUPES_MIN_GROUP_SIZE", "3")
        .args(["-q", "--min-group-size", "2"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("same.txt"));
}

#[test]
fn test_cli_summary_on_stderr() {
    let dir = fixture();
    finddupes()
        .args(["-q", "--summary"])
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("3 files scanned"));
}
