//! Integration tests for the placekeep binary

use super::common::TestEnv;
use assert_cmd::Command;
use placekeep::AppStateStore;
use predicates::prelude::*;

fn placekeep(env: &TestEnv) -> Command {
    let mut cmd = Command::cargo_bin("placekeep").expect("binary should build");
    cmd.arg("--data-dir").arg(env.dir.path());
    cmd.env_remove("RUST_LOG");
    cmd
}

/// A tap in one process is restored by the next
#[test]
fn test_tap_then_restore() {
    let env = TestEnv::new();

    placekeep(&env)
        .args(["tap", "--hit", "1,2,-3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("placed marker at (1, 2, -3)"));

    placekeep(&env)
        .arg("restore")
        .assert()
        .success()
        .stdout(predicate::str::contains("restored 1 markers"))
        .stdout(predicate::str::contains(
            "markers: 1, anchors: 1, viewpoints: 0, device: 1",
        ));
}

/// Viewpoints recorded on separate devices are listed with their ordinals
#[test]
fn test_record_viewpoints_per_device() {
    let env = TestEnv::new();

    placekeep(&env)
        .args(["record-viewpoint", "--camera", "0,1.5,0"])
        .assert()
        .success();
    placekeep(&env)
        .args(["record-viewpoint", "--camera", "2,1.5,0", "--new-device"])
        .assert()
        .success()
        .stdout(predicate::str::contains("recorded viewpoint for device 2"));

    placekeep(&env)
        .arg("viewpoints")
        .assert()
        .success()
        .stdout(predicate::str::contains("device 1: (0, 1.5, 0)"))
        .stdout(predicate::str::contains("device 2: (2, 1.5, 0)"));
}

/// The shell reads actions from stdin and reports failures inline
#[test]
fn test_shell_script() {
    let env = TestEnv::new();

    placekeep(&env)
        .arg("shell")
        .write_stdin("record\ncamera 0,0,0\ntap 0,0,-2\ndistances\nreset\nstatus\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("error: No active session"))
        .stdout(predicate::str::contains("marker 0: 2.000"))
        .stdout(predicate::str::contains(
            "markers: 0, anchors: 0, viewpoints: 0, device: 1",
        ));
}

/// A collection that fell back to empty is announced before the action runs
#[test]
fn test_one_shot_commands_report_corrupt_state() {
    let env = TestEnv::new();
    {
        let db = env.open();
        AppStateStore::new(db.connection())
            .set("markers", "not json")
            .unwrap();
    }

    placekeep(&env)
        .args(["tap", "--hit", "0,0,0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("warning: Corrupt state in `markers`"))
        .stdout(predicate::str::contains("placed marker at (0, 0, 0)"));
}

#[test]
fn test_rejects_malformed_transform() {
    let env = TestEnv::new();

    placekeep(&env)
        .args(["tap", "--hit", "1,2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected 3 or 16 components"));
}
