//! CLI surface smoke tests. Nothing here talks to a browser; runs that need
//! a WebDriver endpoint are exercised manually.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_recognized_options() {
    Command::cargo_bin("chatarc")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--webdriver-url"))
        .stdout(predicate::str::contains("--fresh-profile"))
        .stdout(predicate::str::contains("--profile-name"))
        .stdout(predicate::str::contains("--page-size"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("chatarc")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("chatarc"));
}

#[test]
fn test_invalid_base_url_fails_before_touching_a_browser() {
    Command::cargo_bin("chatarc")
        .unwrap()
        .args(["--base-url", "::not a url::"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid base URL"));
}
