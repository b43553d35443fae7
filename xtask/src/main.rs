//! Development automation tasks for distro-build.
//!
//! # Usage
//!
//! ```bash
//! cargo xtask coverage                  # Test coverage via cargo-tarpaulin
//! cargo xtask e2e                       # CLI end-to-end tests (feature-gated)
//! cargo xtask fixture --output DIR      # Write a sample source catalog
//! cargo xtask release-prep              # Bump the version and refresh the lockfile
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development automation tasks for distro-build")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run test coverage with cargo-tarpaulin
    Coverage {
        /// Output format (html, json, xml, or lcov)
        #[arg(long, short, default_value = "html")]
        format: String,
        /// Minimum coverage threshold (0-100)
        #[arg(long)]
        fail_under: Option<u8>,
    },
    /// Run the CLI end-to-end tests (enables the integration-tests feature)
    E2e {
        /// Only run tests whose name contains this filter
        filter: Option<String>,
    },
    /// Write a small sample source catalog for hand-testing the CLI
    Fixture {
        /// Directory to create the catalog in
        #[arg(long, short, value_name = "DIR")]
        output: PathBuf,
    },
    /// Bump the package version and refresh Cargo.lock
    ReleasePrep {
        /// The version to release (e.g., 1.2.3); defaults to the next patch
        #[arg(long, short)]
        version: Option<String>,
        /// Show the planned changes without applying them
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let root = workspace_root()?;
    env::set_current_dir(&root)
        .with_context(|| format!("Failed to change to workspace root: {}", root.display()))?;

    match cli.command {
        Commands::Coverage { format, fail_under } => run_coverage(&format, fail_under),
        Commands::E2e { filter } => run_e2e(filter.as_deref()),
        Commands::Fixture { output } => write_fixture(&output),
        Commands::ReleasePrep { version, dry_run } => {
            run_release_prep(version.as_deref(), dry_run)
        }
    }
}

fn workspace_root() -> Result<PathBuf> {
    let output = Command::new("cargo")
        .args(["locate-project", "--workspace", "--message-format=plain"])
        .output()
        .context("Failed to run 'cargo locate-project'")?;
    if !output.status.success() {
        bail!("Failed to locate workspace root");
    }
    let manifest = String::from_utf8(output.stdout).context("Invalid UTF-8 in cargo output")?;
    PathBuf::from(manifest.trim())
        .parent()
        .map(Path::to_path_buf)
        .context("Cargo.toml has no parent directory")
}

fn run_coverage(format: &str, fail_under: Option<u8>) -> Result<()> {
    if !is_command_available("cargo-tarpaulin") {
        println!("cargo-tarpaulin is not installed.");
        println!("Install with: cargo install cargo-tarpaulin");
        bail!("cargo-tarpaulin not found");
    }

    let (out_flag, report) = match format.to_lowercase().as_str() {
        "html" => ("Html", "target/tarpaulin/tarpaulin-report.html"),
        "json" => ("Json", "target/tarpaulin/tarpaulin-report.json"),
        "xml" => ("Xml", "target/tarpaulin/cobertura.xml"),
        "lcov" => ("Lcov", "target/tarpaulin/lcov.info"),
        other => bail!("Unknown format '{}'. Use: html, json, xml, or lcov", other),
    };

    let mut args: Vec<String> = vec!["tarpaulin".into(), "--out".into(), out_flag.into()];
    if let Some(threshold) = fail_under {
        args.push("--fail-under".into());
        args.push(threshold.to_string());
    }

    println!("Running coverage...");
    let status = run_cargo(&args)?;
    if !status.success() {
        if fail_under.is_some() {
            bail!("Coverage is below the required threshold");
        }
        bail!("Coverage failed");
    }
    println!("Coverage report: {}", report);
    Ok(())
}

fn run_e2e(filter: Option<&str>) -> Result<()> {
    let mut args: Vec<String> = vec![
        "test".into(),
        "--features".into(),
        "integration-tests".into(),
        "--test".into(),
        "cli_e2e_*".into(),
    ];
    if let Some(filter) = filter {
        args.push(filter.into());
    }

    println!("Running CLI end-to-end tests...");
    let status = run_cargo(&args)?;
    if !status.success() {
        bail!("End-to-end tests failed");
    }
    Ok(())
}

/// A two-repository catalog with one cross-repository requirement, enough to
/// exercise every subcommand by hand.
fn write_fixture(output: &Path) -> Result<()> {
    let entries: &[(&str, &str)] = &[
        ("myx/repository.inf", "Name=myx\nFetch=git://example.org/myx\n"),
        (
            "myx/base/project.inf",
            "Name=myx/base\nProvides=util.db\n",
        ),
        ("myx/base/jars/db.jar", "sample jar bytes\n"),
        (
            "myx/app/project.inf",
            "Name=myx/app\nRequires=util.db contrib/extras\n",
        ),
        ("contrib/repository.inf", "Name=contrib\n"),
        (
            "contrib/extras/project.inf",
            "Name=contrib/extras\nKeywords=optional\n",
        ),
    ];
    for (relative, content) in entries {
        let path = output.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    }
    fs::create_dir_all(output.join("myx/app/java"))?;

    println!("Sample catalog written to {}", output.display());
    println!("Try: cargo run -- sequence --source-root {}", output.display());
    Ok(())
}

fn run_release_prep(version: Option<&str>, dry_run: bool) -> Result<()> {
    let manifest = fs::read_to_string("Cargo.toml").context("Failed to read Cargo.toml")?;
    let current = manifest
        .lines()
        .find_map(|line| line.strip_prefix("version = "))
        .and_then(|rest| rest.split('"').nth(1))
        .context("Failed to find version in Cargo.toml")?;
    println!("Current version: {}", current);

    let next = match version {
        Some(version) => version.to_string(),
        None => bump_patch(current)?,
    };
    println!("New version: {}", next);

    if dry_run {
        println!();
        println!("Dry run - would update Cargo.toml to {} and refresh Cargo.lock", next);
        return Ok(());
    }

    let updated = manifest.replacen(
        &format!("version = \"{}\"", current),
        &format!("version = \"{}\"", next),
        1,
    );
    fs::write("Cargo.toml", updated).context("Failed to write Cargo.toml")?;

    println!("Refreshing Cargo.lock...");
    let status = run_cargo(&["check".to_string()])?;
    if !status.success() {
        bail!("cargo check failed after version update");
    }

    println!();
    println!("Release preparation complete. Next steps:");
    println!("  git commit -am \"chore: release {}\"", next);
    println!("  git tag v{} && git push && git push --tags", next);
    Ok(())
}

fn bump_patch(current: &str) -> Result<String> {
    let parts: Vec<&str> = current.split('.').collect();
    if parts.len() != 3 {
        bail!("Invalid version format in Cargo.toml: {}", current);
    }
    let patch: u32 = parts[2].parse().context("Invalid patch version")?;
    Ok(format!("{}.{}.{}", parts[0], parts[1], patch + 1))
}

fn is_command_available(cmd: &str) -> bool {
    Command::new(cmd)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn run_cargo(args: &[String]) -> Result<ExitStatus> {
    Command::new("cargo")
        .args(args)
        .status()
        .with_context(|| format!("Failed to run cargo {}", args.join(" ")))
}
