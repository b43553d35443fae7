//! End-to-end tests for the `distro-build run` command.
//!
//! The launcher itself is exercised with stand-in executables instead of a
//! real JVM, so these tests stay fast and hermetic.

use predicates::prelude::*;

mod common;
use common::TestFixture;

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_run_help() {
    TestFixture::new()
        .command()
        .arg("run")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("runtime classpath"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_run_unknown_project_suggests_a_name() {
    let fixture = TestFixture::new().with_sample_catalog();

    fixture
        .source_command()
        .arg("run")
        .arg("--project")
        .arg("myx/ap")
        .arg("--main")
        .arg("org.example.Main")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Did you mean 'myx/app'?"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_run_reports_a_launch_failure() {
    let fixture = TestFixture::new().with_sample_catalog();

    fixture
        .source_command()
        .arg("run")
        .arg("--project")
        .arg("myx/app")
        .arg("--main")
        .arg("org.example.Main")
        .arg("--java")
        .arg("/nonexistent/jvm/bin/java")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to launch"));
}

#[cfg(unix)]
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_run_propagates_a_zero_exit() {
    let fixture = TestFixture::new().with_sample_catalog();

    fixture
        .source_command()
        .arg("run")
        .arg("--project")
        .arg("myx/app")
        .arg("--main")
        .arg("org.example.Main")
        .arg("--java")
        .arg("/bin/true")
        .assert()
        .success();
}

#[cfg(unix)]
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_run_propagates_a_nonzero_exit() {
    let fixture = TestFixture::new().with_sample_catalog();

    fixture
        .source_command()
        .arg("run")
        .arg("--project")
        .arg("myx/app")
        .arg("--main")
        .arg("org.example.Main")
        .arg("--java")
        .arg("/bin/false")
        .assert()
        .failure()
        .code(1);
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_run_strict_unknown_requirement_blocks_the_launch() {
    let fixture = TestFixture::new()
        .with_repository("myx")
        .with_project("myx", "app", "Requires=missing.capability\n")
        .with_file("myx/app/java.jar", "jar bytes");

    fixture
        .source_command()
        .arg("run")
        .arg("--project")
        .arg("myx/app")
        .arg("--main")
        .arg("org.example.Main")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.capability"));
}
