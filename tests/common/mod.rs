#![allow(dead_code)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

pub const BIN: &str = "form_wizard_cli";

/// Commands that fill in and confirm every step of a valid application.
pub const COMPLETE_APPLICATION: &[&str] = &[
    "goto /step/1",
    "set fullName \"Ada Lovelace\"",
    "set email ada@example.com",
    "set role developer",
    "set subscribe yes",
    "next",
    "set preferredDate 2031-05-17",
    "set preferredTime \"10:30 AM\"",
    "set timezone UTC+01:00",
    "next",
    "add services \"UI Design\"",
    "add services \"Web Development\"",
    "next",
    "add skills Python",
    "set interestedTopics \"compilers, type systems\"",
    "next",
    "set workPreference remote",
    "set homeOfficeReady yes",
    "set termsAccepted yes",
    "next",
];

/// A data directory whose configuration submits instantly and prints plain text.
pub fn wizard_home() -> TempDir {
    let home = TempDir::new().expect("create temp dir");
    let config_dir = home.path().join("config");
    fs::create_dir_all(&config_dir).expect("create config dir");
    fs::write(
        config_dir.join("config.json"),
        r#"{
  "submission": { "delay_ms": 0, "max_attempts": 1, "retry_backoff_ms": 0 },
  "ui_color_enabled": false,
  "accessibility": { "plain_output": true }
}"#,
    )
    .expect("write config");
    home
}

/// The CLI in script mode against `home`.
pub fn script_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin(BIN).expect("binary builds");
    cmd.env("FORM_WIZARD_CLI_SCRIPT", "1")
        .env("FORM_WIZARD_HOME", home)
        .env_remove("RUST_LOG");
    cmd
}

pub fn script(lines: &[&str]) -> String {
    let mut input = lines.join("\n");
    input.push('\n');
    input
}
