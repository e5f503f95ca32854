//! Binary tests for the `mc` command

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mc(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mc").expect("mc binary");
    // Keep logs and config lookups inside the temp dir
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("XDG_CONFIG_HOME", home.path().join("config"));
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    mc(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("console"))
        .stdout(predicate::str::contains("demo"))
        .stdout(predicate::str::contains("users"));
}

#[test]
fn test_users_lists_seeded_accounts() {
    let home = TempDir::new().unwrap();
    mc(&home)
        .arg("users")
        .assert()
        .success()
        .stdout(predicate::str::contains("student1"))
        .stdout(predicate::str::contains("Dr. Sarah Johnson"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("bad.yml");
    std::fs::write(&config, "replies:\n  min-delay-ms: 500\n  max-delay-ms: 100\n").unwrap();

    mc(&home)
        .arg("--config")
        .arg(&config)
        .arg("users")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_fast_demo_runs() {
    let home = TempDir::new().unwrap();
    mc(&home)
        .args(["demo", "--fast"])
        .assert()
        .success()
        .stdout(predicate::str::contains("session_ended"));
}
