//! End-to-end tests for the `distro-build completions` command.
//!
//! These tests verify the CLI behavior of the `completions` command by invoking
//! the binary directly and checking its output.

use predicates::prelude::*;

mod common;
use common::TestFixture;

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_completions_help() {
    TestFixture::new()
        .command()
        .arg("completions")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generate shell completion scripts"))
        .stdout(predicate::str::contains("bash"))
        .stdout(predicate::str::contains("zsh"))
        .stdout(predicate::str::contains("fish"))
        .stdout(predicate::str::contains("powershell"))
        .stdout(predicate::str::contains("elvish"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_completions_bash() {
    TestFixture::new()
        .command()
        .arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("_distro-build()"))
        .stdout(predicate::str::contains("sequence"))
        .stdout(predicate::str::contains("classpath"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_completions_zsh() {
    TestFixture::new()
        .command()
        .arg("completions")
        .arg("zsh")
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef distro-build"))
        .stdout(predicate::str::contains("select"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_completions_fish() {
    TestFixture::new()
        .command()
        .arg("completions")
        .arg("fish")
        .assert()
        .success()
        .stdout(predicate::str::contains("distro-build"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_completions_powershell() {
    TestFixture::new()
        .command()
        .arg("completions")
        .arg("powershell")
        .assert()
        .success()
        .stdout(predicate::str::contains("distro-build"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_completions_elvish() {
    TestFixture::new()
        .command()
        .arg("completions")
        .arg("elvish")
        .assert()
        .success()
        .stdout(predicate::str::contains("distro-build"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_completions_rejects_unknown_shell() {
    TestFixture::new()
        .command()
        .arg("completions")
        .arg("tcsh")
        .assert()
        .failure()
        .code(2);
}
