//! Binary-level tests of the CLI surface.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_prints_usage_and_exits_zero() {
    Command::cargo_bin("aab2apk")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("interactive"));
}

#[test]
fn bare_bundle_argument_is_used_as_the_bundle_path() {
    // No `build` subcommand: the first argument falls through to the
    // interactive flow as the bundle path, and a missing file is fatal.
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("aab2apk")
        .unwrap()
        .current_dir(dir.path())
        .arg("myapp.aab")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("bundle not found"))
        .stderr(predicate::str::contains("myapp.aab"));
}

#[test]
fn build_with_missing_bundle_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("aab2apk")
        .unwrap()
        .arg("build")
        .arg(dir.path().join("no-such.aab"))
        .arg("--work-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("bundle not found"));
}
