//! Integration tests for the CLI binary.
//!
//! Covers flag handling and the fatal configuration paths, none of which
//! reach the network.
//!
//! This test is registered as a [[test]] in the tomabox-cli crate so that
//! CARGO_BIN_EXE_tomabox is available.

use std::process::Command;

/// Get a Command pointing to the `tomabox` binary with a clean environment.
fn tomabox_binary() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tomabox"));
    cmd.env_remove("REFF_CODE")
        .env_remove("TOMABOX_DIR")
        .env_remove("TOMABOX_BASE_URL")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn cli_responds_to_help() {
    let output = tomabox_binary()
        .arg("--help")
        .output()
        .expect("failed to execute tomabox --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Usage") && stdout.contains("--referral-code"),
        "tomabox --help output should contain usage information, got: {stdout}"
    );
}

#[test]
fn cli_responds_to_version() {
    let output = tomabox_binary()
        .arg("--version")
        .output()
        .expect("failed to execute tomabox --version");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tomabox"), "got: {stdout}");
}

#[test]
fn cli_exits_with_error_on_unknown_flag() {
    let output = tomabox_binary()
        .arg("--nonexistent-flag")
        .output()
        .expect("failed to execute tomabox");

    assert!(!output.status.success());
}

#[test]
fn cli_requires_referral_code() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tomabox_binary()
        .args(["--mode", "existing", "--file", "1", "--dir"])
        .arg(tmp.path())
        .output()
        .expect("failed to execute tomabox");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Referral Code"), "got: {stdout}");
}

#[test]
fn cli_reports_missing_account_files() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tomabox_binary()
        .env("REFF_CODE", "0000abcd")
        .args(["--mode", "existing", "--file", "1", "--dir"])
        .arg(tmp.path())
        .output()
        .expect("failed to execute tomabox");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No 'accounts-*.json' Files Found"), "got: {stdout}");
}

#[test]
fn cli_rejects_zero_batch_size() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tomabox_binary()
        .env("REFF_CODE", "0000abcd")
        .args(["--mode", "generate", "--per-file", "0", "--dir"])
        .arg(tmp.path())
        .output()
        .expect("failed to execute tomabox");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Greater Than Zero"), "got: {stdout}");
}

#[test]
fn cli_reports_missing_query_file() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tomabox_binary()
        .env("REFF_CODE", "0000abcd")
        .args(["--mode", "generate", "--per-file", "5", "--dir"])
        .arg(tmp.path())
        .output()
        .expect("failed to execute tomabox");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("queries.txt"), "got: {stdout}");
}

#[test]
fn cli_rejects_out_of_range_file_choice() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("accounts-1.json"), r#"{"accounts": []}"#).unwrap();
    let output = tomabox_binary()
        .env("REFF_CODE", "0000abcd")
        .args(["--mode", "existing", "--file", "2", "--dir"])
        .arg(tmp.path())
        .output()
        .expect("failed to execute tomabox");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Invalid Choice"), "got: {stdout}");
}

#[test]
fn cli_reads_referral_code_from_dotenv() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join(".env"), "REFF_CODE=0000abcd\n").unwrap();

    let output = tomabox_binary()
        .current_dir(tmp.path())
        .args(["--mode", "existing", "--file", "1", "--dir", "."])
        .output()
        .expect("failed to execute tomabox");

    // The referral code was accepted, so the run gets as far as discovery.
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Referral Code"), "got: {stdout}");
    assert!(stdout.contains("No 'accounts-*.json' Files Found"), "got: {stdout}");
}
