//! # Index Command Implementation
//!
//! This module implements the `index` subcommand, which computes the full
//! build sequence and writes the prebuilt index of the catalog: the
//! distribution-level manifests plus, unless `--quick`, one folder per
//! sequenced project.
//!
//! The written tree is what `--index-root` imports and what `sync` deploys.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use indicatif::ProgressBar;

use distro_build::defaults;
use distro_build::index;
use distro_build::output::OutputConfig;
use distro_build::sequence;

use crate::commands::{finish, CatalogOptions};

/// Write a prebuilt index of the catalog
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Directory to write the index into.
    ///
    /// Defaults to the cached root (--cached-root or the system cache
    /// directory).
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Write only the distribution-level files, skipping the per-repository
    /// and per-project folders.
    #[arg(long)]
    pub quick: bool,
}

/// Execute the `index` command.
pub fn execute(args: IndexArgs, options: &CatalogOptions, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_flag(color_flag);

    let (mut registry, mut reporter) = options.load()?;
    sequence::compute_sequence(&mut registry, None, &mut reporter)?;

    let output = match args.output {
        Some(output) => output,
        None => options
            .cached_root
            .clone()
            .unwrap_or_else(defaults::default_cached_root),
    };

    println!(
        "{} Writing index: {}",
        out.marker("📦", "[INDEX]"),
        output.display()
    );

    let progress = ProgressBar::new(registry.sequence().len() as u64);
    let written = index::write_index(&registry, &output, args.quick, &mut reporter, &progress);
    progress.finish_and_clear();
    written?;

    println!(
        "{} Indexed {} project(s) across {} repositories",
        out.marker("✅", "[OK]"),
        registry.sequence().len(),
        registry.repository_count()
    );

    finish(&mut reporter, options)
}
