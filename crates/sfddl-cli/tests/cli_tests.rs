//! End-to-end tests for the sfddl binary
//!
//! None of these reach Snowflake: they cover configuration failures,
//! `check`, `--dry-run`, empty record files and a missing driver library.

use std::path::Path;
use std::process::{Command, Output};

/// Path to the compiled sfddl binary (resolved at compile time)
fn sfddl_bin() -> String {
    env!("CARGO_BIN_EXE_sfddl").to_string()
}

/// sfddl command with no inherited `SFDDL_*` or `RUST_LOG` variables
fn sfddl_command() -> Command {
    let mut cmd = Command::new(sfddl_bin());
    for (key, _) in std::env::vars() {
        if key.starts_with("SFDDL_") || key == "RUST_LOG" {
            cmd.env_remove(key);
        }
    }
    cmd
}

/// Run an `sfddl` CLI command and return its output.
fn run_sfddl(args: &[&str]) -> Output {
    sfddl_command()
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute sfddl with args {:?}: {}", args, e))
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

const OKTA: &[&str] = &[
    "--auth-mode",
    "okta",
    "--okta-url",
    "https://org.okta.com",
    "--account",
    "acct1",
    "--warehouse",
    "wh1",
    "--database",
    "db1",
    "--schema",
    "sch1",
];

fn with_okta<'a>(command: &'a str, extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec![command];
    args.extend_from_slice(OKTA);
    args.extend_from_slice(extra);
    args
}

// ── configuration errors ────────────────────────────────────────────────

#[test]
fn test_missing_auth_mode_exits_with_config_code() {
    let output = run_sfddl(&["run", "--statement", "SHOW WAREHOUSES"]);

    assert_eq!(output.status.code(), Some(2), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("auth_mode"));
}

#[test]
fn test_empty_password_exits_with_config_code() {
    let output = run_sfddl(&[
        "check",
        "--auth-mode",
        "snowflake",
        "--username",
        "a",
        "--password",
        "",
        "--account",
        "acct1",
        "--warehouse",
        "wh1",
        "--database",
        "db1",
        "--schema",
        "sch1",
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("password"), "stderr: {}", stderr(&output));
}

#[test]
fn test_unknown_auth_mode_exits_with_config_code() {
    let output = run_sfddl(&[
        "check",
        "--auth-mode",
        "kerberos",
        "--statement",
        "SHOW WAREHOUSES",
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("kerberos"));
}

#[test]
fn test_config_file_password_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("sfddl.yml");
    std::fs::write(&config, "auth_mode: snowflake\npassword: hunter2\n").unwrap();

    let output = run_sfddl(&["check", "--config", config.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    assert!(!stderr(&output).contains("hunter2"));
}

// ── sfddl check ─────────────────────────────────────────────────────────

#[test]
fn test_check_prints_redacted_summary() {
    let output = run_sfddl(&[
        "check",
        "--auth-mode",
        "snowflake",
        "--username",
        "loader",
        "--password",
        "hunter2",
        "--account",
        "https://acct1",
        "--warehouse",
        "wh1",
        "--database",
        "db1",
        "--schema",
        "sch1",
        "--statement",
        "SHOW WAREHOUSES",
    ]);

    let out = stdout(&output);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.contains("********"));
    assert!(out.contains("\"account\": \"acct1\""));
    assert!(!out.contains("hunter2"));
}

#[test]
fn test_check_reads_config_file_and_env() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("sfddl.yml");
    std::fs::write(
        &config,
        "auth_mode: okta\nokta_url: https://org.okta.com\naccount: acct1\n\
         warehouse: wh1\ndatabase: db1\nschema: sch1\nstatements:\n  - SHOW WAREHOUSES\n",
    )
    .unwrap();

    let output = sfddl_command()
        .env("SFDDL_WAREHOUSE", "wh_env")
        .args(["check", "--config", config.to_str().unwrap()])
        .output()
        .unwrap();

    let out = stdout(&output);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.contains("\"warehouse\": \"wh_env\""), "stdout: {}", out);
    assert!(out.contains("\"auth_mode\": \"okta\""));
}

// ── sfddl run ───────────────────────────────────────────────────────────

#[test]
fn test_dry_run_lists_statements_and_suspend() {
    let output = run_sfddl(&with_okta(
        "run",
        &[
            "--statement",
            "CREATE TABLE t (id INT)",
            "--suspend-warehouse",
            "--dry-run",
        ],
    ));

    let out = stdout(&output);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.contains("USE WAREHOUSE wh1"));
    assert!(out.contains("USE SCHEMA db1.sch1"));
    let create = out.find("CREATE TABLE t (id INT)").unwrap();
    let suspend = out.find("ALTER WAREHOUSE wh1 SUSPEND").unwrap();
    assert!(create < suspend);
}

#[test]
fn test_no_records_to_process() {
    let dir = tempfile::tempdir().unwrap();
    let records = dir.path().join("records.json");
    std::fs::write(&records, "[]").unwrap();

    let mut args = with_okta("run", &["--field", "sql"]);
    args.push("--records");
    args.push(records.to_str().unwrap());
    let output = run_sfddl(&args);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("No records to process"));
}

#[test]
fn test_missing_driver_exits_with_connection_code_and_logs() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().to_str().unwrap();
    let output = run_sfddl(&with_okta(
        "run",
        &[
            "--statement",
            "SHOW WAREHOUSES",
            "--driver-library",
            "sfddl_no_such_driver",
            "--log-dir",
            log_dir,
        ],
    ));

    assert_eq!(output.status.code(), Some(4), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("[D001]"));

    let log = read_single_log(dir.path());
    assert!(log.contains(" - ERROR - "), "log: {}", log);
    assert!(log.contains("sfddl_no_such_driver"));
}

fn read_single_log(base: &Path) -> String {
    let run_dirs: Vec<_> = std::fs::read_dir(base)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(run_dirs.len(), 1, "expected one run directory: {:?}", run_dirs);
    std::fs::read_to_string(run_dirs[0].join("snowflake_connector.log")).unwrap()
}
