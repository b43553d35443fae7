//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `distro-build` command-line tool. Each subcommand is defined in its own
//! file to keep the logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic.
//!
//! The `execute` function is the main entry point for the command and is
//! responsible for orchestrating the necessary operations, calling into the
//! `distro_build` library to perform the core logic.
//!
//! Commands that read the project catalog receive the shared
//! [`CatalogOptions`] alongside their own arguments; the options are global
//! flags, parsed once at the top level and passed down by the dispatcher.

pub mod classpath;
pub mod completions;
pub mod index;
pub mod projects;
pub mod repos;
pub mod run;
pub mod select;
pub mod sequence;
pub mod sync;
pub mod tree;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, ValueEnum};
use indicatif::ProgressBar;

use distro_build::loader;
use distro_build::project::ProjectId;
use distro_build::registry::Registry;
use distro_build::report::Reporter;
use distro_build::suggestions;

/// Catalog loading options shared by the data-driven subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct CatalogOptions {
    /// Load the catalog by scanning a source tree.
    ///
    /// Can also be set with the `DISTRO_BUILD_SOURCE` environment variable.
    #[arg(long, global = true, value_name = "DIR", env = "DISTRO_BUILD_SOURCE")]
    pub source_root: Option<PathBuf>,

    /// Load the catalog by importing a prebuilt index.
    ///
    /// Can also be set with the `DISTRO_BUILD_INDEX` environment variable.
    #[arg(long, global = true, value_name = "DIR", env = "DISTRO_BUILD_INDEX")]
    pub index_root: Option<PathBuf>,

    /// The cached distribution tree used by `index`, `sync` and `run`.
    ///
    /// Defaults to the system cache directory (`~/.cache/distro-build` on
    /// Linux, `~/Library/Caches/distro-build` on macOS).
    /// Can also be set with the `DISTRO_BUILD_CACHE` environment variable.
    #[arg(long, global = true, value_name = "DIR", env = "DISTRO_BUILD_CACHE")]
    pub cached_root: Option<PathBuf>,

    /// Keep going when a required capability has no provider.
    ///
    /// Unresolved requirements are collected and summarized at the end of the
    /// run instead of aborting it.
    #[arg(long, global = true)]
    pub no_fail: bool,

    /// Exit nonzero when recoverable errors were collected.
    ///
    /// Useful together with --no-fail to surface problems in scripts without
    /// stopping at the first one.
    #[arg(long, global = true)]
    pub fail_if_errors: bool,
}

impl CatalogOptions {
    /// Load the project catalog from whichever root was requested.
    ///
    /// Exactly one loading mode must be selected; the returned reporter
    /// carries the failure policy for the rest of the command.
    pub fn load(&self) -> Result<(Registry, Reporter)> {
        let mut registry = Registry::new();
        let mut reporter = Reporter::new(self.no_fail);
        let progress = ProgressBar::new_spinner();
        progress.enable_steady_tick(Duration::from_millis(100));

        let loaded = match (&self.source_root, &self.index_root) {
            (Some(_), Some(_)) => Err(suggestions::both_catalog_roots()),
            (None, None) => Err(suggestions::no_catalog()),
            (Some(source), None) => {
                progress.set_message(format!("scanning {}", source.display()));
                loader::load_source_tree(&mut registry, source, &mut reporter, &progress)
                    .map_err(anyhow::Error::from)
            }
            (None, Some(index)) => {
                progress.set_message(format!("importing {}", index.display()));
                loader::import_index(&mut registry, index, &mut reporter, &progress)
                    .map_err(anyhow::Error::from)
            }
        };
        progress.finish_and_clear();
        loaded?;

        Ok((registry, reporter))
    }
}

/// Output format options for listing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text, one entry per line
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

/// Apply the end-of-run error policy shared by the catalog commands.
///
/// Collected problems are summarized on stderr; with --fail-if-errors a
/// nonempty collection fails the command.
pub fn finish(reporter: &mut Reporter, options: &CatalogOptions) -> Result<()> {
    let problems = reporter.drain();
    if problems.is_empty() {
        return Ok(());
    }

    eprintln!("⚠️  {} problem(s) collected:", problems.len());
    for problem in &problems {
        eprintln!("   {}", problem);
    }
    if options.fail_if_errors {
        anyhow::bail!("failing due to {} collected problem(s)", problems.len());
    }
    Ok(())
}

/// Resolve a project argument by full or short name, or fail with a
/// did-you-mean hint.
pub fn resolve_project(registry: &Registry, name: &str) -> Result<ProjectId> {
    registry.find_project(name).ok_or_else(|| {
        let known: Vec<String> = registry
            .projects()
            .map(|(_, project)| project.full_name().to_string())
            .collect();
        suggestions::unknown_project(name, &known)
    })
}
