//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures and helper functions to reduce
//! duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::TestFixture;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_sample_catalog();
//!     fixture.source_command().arg("projects").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// A test fixture that provides a temporary directory holding a catalog.
///
/// This struct simplifies the common pattern of creating a temp directory
/// and populating it with `repository.inf` and `project.inf` manifests.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_repository("myx")
///     .with_project("myx", "base", "")
///     .with_project("myx", "app", "Requires=myx/base\n");
///
/// fixture
///     .source_command()
///     .arg("sequence")
///     .assert()
///     .success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a repository folder with a `repository.inf` manifest.
    pub fn with_repository(self, name: &str) -> Self {
        self.with_file(
            &format!("{}/repository.inf", name),
            &format!("Name={}\n", name),
        )
    }

    /// Add a repository folder whose manifest carries a fetch locator.
    pub fn with_repository_fetch(self, name: &str, fetch: &str) -> Self {
        self.with_file(
            &format!("{}/repository.inf", name),
            &format!("Name={}\nFetch={}\n", name, fetch),
        )
    }

    /// Add a project folder with a `project.inf` manifest.
    ///
    /// `manifest` holds extra manifest lines appended after the `Name` key,
    /// e.g. `"Requires=myx/base\n"`.
    pub fn with_project(self, repository: &str, name: &str, manifest: &str) -> Self {
        self.with_file(
            &format!("{}/{}/project.inf", repository, name),
            &format!("Name={}/{}\n{}", repository, name, manifest),
        )
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add a two-project catalog: `myx/base` (a jar library) and `myx/app`
    /// (requires `myx/base`).
    pub fn with_sample_catalog(self) -> Self {
        self.with_repository("myx")
            .with_project("myx", "base", "Provides=util.db\n")
            .with_file("myx/base/jars/db.jar", "jar bytes")
            .with_project("myx", "app", "Requires=myx/base\n")
            .with_file("myx/app/java.jar", "jar bytes")
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get access to the underlying TempDir for advanced usage.
    pub fn temp_dir(&self) -> &assert_fs::TempDir {
        &self.temp_dir
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command for the distro-build binary with a clean environment.
    ///
    /// The catalog environment variables are removed so that only the
    /// explicitly passed flags decide where the catalog comes from.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("distro-build").unwrap();
        cmd.env_remove("DISTRO_BUILD_SOURCE")
            .env_remove("DISTRO_BUILD_INDEX")
            .env_remove("DISTRO_BUILD_CACHE");
        cmd
    }

    /// Create a command with `--source-root` pointing at this fixture.
    pub fn source_command(&self) -> assert_cmd::Command {
        let mut cmd = self.command();
        cmd.arg("--source-root").arg(self.path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_sample_catalog() {
        let fixture = TestFixture::new().with_sample_catalog();
        assert!(fixture.path().join("myx/repository.inf").exists());
        assert!(fixture.path().join("myx/base/project.inf").exists());
        assert!(fixture.path().join("myx/app/project.inf").exists());
    }
}
