use std::fs;

use assert_cmd::Command;
use tempfile::tempdir;

#[test]
fn test_cli_writes_named_report() {
    // Arrange
    let dir = tempdir().expect("failed to create temp dir");
    fs::write(
        dir.path().join("info.json"),
        r#"{"target_path": "/cases/7", "mvt_version": "2.5.0"}"#,
    )
    .expect("failed to write fixture");

    // Act
    let output = Command::cargo_bin("mvt-report")
        .expect("failed to find binary")
        .arg(dir.path())
        .args(["--device-type", "ios", "--file-name", "case-7"])
        .output()
        .expect("failed to run binary");

    // Assert
    assert!(output.status.success());
    let report = dir.path().join("case-7.pdf");
    assert!(report.is_file());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("case-7.pdf"));
}

#[test]
fn test_cli_fails_without_scan_results() {
    // Arrange
    let dir = tempdir().expect("failed to create temp dir");

    // Act
    let output = Command::cargo_bin("mvt-report")
        .expect("failed to find binary")
        .env_remove("MVTTY_LOG")
        .arg(dir.path())
        .output()
        .expect("failed to run binary");

    // Assert
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no JSON scan results found"));
}

#[test]
fn test_cli_log_filter_silences_stderr() {
    // Arrange
    let dir = tempdir().expect("failed to create temp dir");

    // Act
    let output = Command::cargo_bin("mvt-report")
        .expect("failed to find binary")
        .env("MVTTY_LOG", "off")
        .arg(dir.path())
        .output()
        .expect("failed to run binary");

    // Assert
    assert!(!output.status.success());
    assert!(output.stderr.is_empty());
}

#[test]
fn test_cli_rejects_unknown_device_type() {
    // Arrange
    let dir = tempdir().expect("failed to create temp dir");

    // Act
    let output = Command::cargo_bin("mvt-report")
        .expect("failed to find binary")
        .arg(dir.path())
        .args(["--device-type", "windows"])
        .output()
        .expect("failed to run binary");

    // Assert
    assert!(!output.status.success());
}
