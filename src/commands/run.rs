//! # Run Command Implementation
//!
//! This module implements the `run` subcommand, which assembles the runtime
//! classpath of one project, resolves every entry against the cached
//! distribution tree, and launches a JVM with it.
//!
//! Stdio is inherited, so the launched program owns the terminal; its exit
//! code becomes the exit code of `distro-build run`.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Result;
use clap::Args;

use distro_build::classpath;
use distro_build::defaults;

use crate::commands::{finish, resolve_project, CatalogOptions};

/// Launch a JVM with the runtime classpath of one project
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Project whose runtime classpath to use (full or short name).
    #[arg(long, value_name = "PROJECT")]
    pub project: String,

    /// Main class to launch.
    #[arg(long, value_name = "CLASS")]
    pub main: String,

    /// Java executable to launch with (defaults to `java` on PATH).
    #[arg(long, value_name = "PATH")]
    pub java: Option<PathBuf>,

    /// Arguments passed through to the launched program.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

/// Execute the `run` command.
pub fn execute(args: RunArgs, options: &CatalogOptions) -> Result<()> {
    let (registry, mut reporter) = options.load()?;
    let id = resolve_project(&registry, &args.project)?;

    let builder = classpath::project_classpath(&registry, id, &mut reporter)?;
    let cached = options
        .cached_root
        .clone()
        .unwrap_or_else(defaults::default_cached_root);
    let class_path = assemble_class_path(builder.entries(), &cached);

    finish(&mut reporter, options)?;

    let java = args
        .java
        .unwrap_or_else(|| PathBuf::from("java"));
    let status = Command::new(&java)
        .arg("-cp")
        .arg(&class_path)
        .arg(&args.main)
        .args(&args.args)
        .status()
        .map_err(|e| anyhow::anyhow!("failed to launch {}: {}", java.display(), e))?;

    if !status.success() {
        match status.code() {
            Some(code) => std::process::exit(code),
            None => anyhow::bail!("{} terminated by a signal", java.display()),
        }
    }
    Ok(())
}

/// Resolve the classpath entries against the cached root and join them with
/// the platform path separator.
fn assemble_class_path(entries: &[String], cached_root: &Path) -> String {
    let separator = if cfg!(windows) { ";" } else { ":" };
    entries
        .iter()
        .map(|entry| cached_root.join(entry).display().to_string())
        .collect::<Vec<String>>()
        .join(separator)
}
