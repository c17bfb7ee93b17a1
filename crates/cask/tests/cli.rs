//! End-to-end tests driving the `cask` binary over stdin.

use assert_cmd::Command;
use predicates::prelude::*;

fn cask() -> Command {
    let mut cmd = Command::cargo_bin("cask").unwrap();
    cmd.env_remove("CASK_CAPACITY")
        .env_remove("CASK_WORKLOAD")
        .env_remove("CASK_REAP_STOPPED");
    cmd
}

#[test]
fn create_list_exit() {
    cask()
        .write_stdin("create web 2 512\nlist\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome to cask"))
        .stdout(predicate::str::contains("Container 'web' (ID: 1, PID: "))
        .stdout(predicate::str::contains("MEMORY"))
        .stdout(predicate::str::contains("Running"))
        .stdout(predicate::str::contains("Exiting."));
}

#[test]
fn empty_list_and_unknown_command() {
    cask()
        .write_stdin("list\nhello\ndelete x\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No containers."))
        .stdout(predicate::str::contains("Unknown command.").count(2));
}

#[test]
fn end_of_input_exits_cleanly() {
    cask()
        .write_stdin("create a 1 1\nstop 1\nstart 1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Container ID 1 stopped"))
        .stdout(predicate::str::contains("Container ID 1 started"))
        .stdout(predicate::str::contains("Exiting."));
}

#[test]
fn capacity_flag_limits_creation() {
    cask()
        .args(["--capacity", "1"])
        .write_stdin("create a 1 1\ncreate b 1 1\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("capacity 1 reached"));
}

#[test]
fn stopped_containers_are_reaped_on_request() {
    cask()
        .arg("--reap-stopped")
        .write_stdin("create a 1 1\nstop 1\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Container ID 1 stopped"));
}

#[test]
fn spawn_failure_is_reported() {
    cask()
        .args(["--workload", "/nonexistent/cask-workload"])
        .write_stdin("create a 1 1\nlist\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed to create container"))
        .stdout(predicate::str::contains("No containers."));
}
