//! # Classpath Command Implementation
//!
//! This module implements the `classpath` subcommand, which assembles the
//! runtime classpath of one project and prints it, one entry per line.
//!
//! Entries are relative to the distribution root (`<repo>/<project>/...`);
//! the `run` subcommand resolves them against the cached root and launches
//! a JVM with the result.

use anyhow::Result;
use clap::Args;

use distro_build::classpath;

use crate::commands::{finish, resolve_project, CatalogOptions};

/// Print the runtime classpath of one project
#[derive(Args, Debug)]
pub struct ClasspathArgs {
    /// Project to assemble the classpath for (full or short name).
    #[arg(value_name = "PROJECT")]
    pub project: String,
}

/// Execute the `classpath` command.
pub fn execute(args: ClasspathArgs, options: &CatalogOptions) -> Result<()> {
    let (registry, mut reporter) = options.load()?;
    let id = resolve_project(&registry, &args.project)?;

    let builder = classpath::project_classpath(&registry, id, &mut reporter)?;
    for entry in builder.entries() {
        println!("{}", entry);
    }

    finish(&mut reporter, options)
}
