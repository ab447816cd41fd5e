mod common;

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

use common::{script, script_cmd, wizard_home, BIN, COMPLETE_APPLICATION};

#[test]
fn script_mode_submits_a_complete_application() {
    let home = wizard_home();
    let mut lines = COMPLETE_APPLICATION.to_vec();
    lines.extend(["show", "submit", "exit"]);

    script_cmd(home.path())
        .write_stdin(script(&lines))
        .assert()
        .success()
        .stdout(contains("Saved Basic Info."))
        .stdout(contains("Now at /review (Step 6 of 6: Review)"))
        .stdout(contains("Preferred Date: 17-05-2031"))
        .stdout(contains("Design: UI Design"))
        .stdout(contains("Home Office Ready: Yes"))
        .stdout(contains("Application submitted at"));

    let state = fs::read_to_string(home.path().join("form-wizard-storage.json"))
        .expect("state file written");
    let json: serde_json::Value = serde_json::from_str(&state).expect("valid json");
    assert_eq!(json["version"], 0);
    assert_eq!(json["state"]["formData"]["fullName"], "Ada Lovelace");
    assert_eq!(
        json["state"]["completedSteps"],
        serde_json::json!([1, 2, 3, 4, 5])
    );

    let log = fs::read_to_string(home.path().join("submissions.jsonl")).expect("log written");
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains("ada@example.com"));
}

#[test]
fn confirmed_steps_survive_a_restart() {
    let home = wizard_home();
    script_cmd(home.path())
        .write_stdin(script(&COMPLETE_APPLICATION[..6]))
        .assert()
        .success();

    script_cmd(home.path())
        .write_stdin(script(&["status", "goto /step/1", "show"]))
        .assert()
        .success()
        .stdout(contains("Completed    : 1 (Basic Info)"))
        .stdout(contains("Ada Lovelace"));
}

#[test]
fn rejected_step_reports_each_problem() {
    let home = wizard_home();
    script_cmd(home.path())
        .write_stdin(script(&[
            "goto /step/1",
            "set fullName Al",
            "set email not-an-email",
            "next",
            "status",
        ]))
        .assert()
        .success()
        .stdout(contains("Basic Information has 3 problem(s):"))
        .stdout(contains("Name must be at least 3 characters"))
        .stdout(contains("Please enter a valid email address"))
        .stdout(contains("Please select a role"))
        .stdout(contains("Completed    : none"));
}

#[test]
fn unreadable_saved_state_falls_back_to_an_empty_form() {
    let home = wizard_home();
    fs::write(home.path().join("form-wizard-storage.json"), "{ not json").expect("seed file");

    script_cmd(home.path())
        .write_stdin(script(&["status"]))
        .assert()
        .success()
        .stdout(contains("Saved progress could not be restored"))
        .stdout(contains("Completed    : none"));
}

#[test]
fn unknown_commands_get_a_hint_and_the_script_continues() {
    let home = wizard_home();
    script_cmd(home.path())
        .write_stdin(script(&["# walk to the review", "reveiw", "goto /review"]))
        .assert()
        .success()
        .stdout(contains("Unknown command `reveiw`"))
        .stdout(contains("Now at /review"));
}

#[test]
fn out_of_range_step_redirects_to_step_one() {
    let home = wizard_home();
    script_cmd(home.path())
        .write_stdin(script(&["goto /step/7"]))
        .assert()
        .success()
        .stdout(contains("Now at /step/1 (Step 1 of 6: Basic Info)"));
}

#[test]
fn ephemeral_sessions_leave_no_files_behind() {
    let home = wizard_home();
    let mut cmd = script_cmd(home.path());
    cmd.arg("--ephemeral")
        .write_stdin(script(&COMPLETE_APPLICATION[..6]))
        .assert()
        .success()
        .stdout(contains("Saved Basic Info."));

    assert!(!home.path().join("form-wizard-storage.json").exists());
    assert!(!home.path().join("submissions.jsonl").exists());
}

#[test]
fn version_flag_prints_build_metadata() {
    Command::cargo_bin(BIN)
        .expect("binary builds")
        .arg("--version")
        .assert()
        .success()
        .stdout(contains("form_wizard").and(contains("rustc:")));
}

#[test]
fn unknown_flags_are_rejected() {
    Command::cargo_bin(BIN)
        .expect("binary builds")
        .arg("--frobnicate")
        .assert()
        .failure()
        .stderr(contains("unknown argument `--frobnicate`"));
}

#[test]
fn first_run_writes_the_default_config() {
    let home = tempfile::TempDir::new().expect("create temp dir");
    let config = home.path().join("config").join("config.json");
    assert!(!config.exists());

    script_cmd(home.path())
        .write_stdin(script(&["status"]))
        .assert()
        .success();

    let written = fs::read_to_string(&config).expect("config written");
    let json: serde_json::Value = serde_json::from_str(&written).expect("valid json");
    assert!(json.get("submission").is_some());
}
