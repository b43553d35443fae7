//! Binary entry point for the `distro-build` command-line tool.
//!
//! All catalog, sequencing and deployment logic lives in the library crate;
//! this shim only parses the command line and dispatches. Errors bubble up
//! as `anyhow::Error` and are rendered by the default hook.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
