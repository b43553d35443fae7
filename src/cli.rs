//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{self, CatalogOptions};

/// Distro Build - catalog, sequence and deploy a software distribution
#[derive(Parser, Debug)]
#[command(name = "distro-build")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Catalog loading flags shared by the data-driven subcommands
    #[command(flatten)]
    catalog: CatalogOptions,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the repositories of the catalog
    Repos(commands::repos::ReposArgs),

    /// List the projects of the catalog
    Projects(commands::projects::ProjectsArgs),

    /// Compute and print the build sequence
    Sequence(commands::sequence::SequenceArgs),

    /// Build a selection of projects and print it
    Select(commands::select::SelectArgs),

    /// Print the runtime classpath of one project
    Classpath(commands::classpath::ClasspathArgs),

    /// Write a prebuilt index of the catalog
    Index(commands::index::IndexArgs),

    /// Synchronize a cached distribution tree into a deployment root
    Sync(commands::sync::SyncArgs),

    /// Launch a JVM with the runtime classpath of one project
    Run(commands::run::RunArgs),

    /// Print the requirement tree of one project
    Tree(commands::tree::TreeArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.as_str()),
        )
        .init();

        match self.command {
            Commands::Repos(args) => commands::repos::execute(args, &self.catalog),
            Commands::Projects(args) => commands::projects::execute(args, &self.catalog),
            Commands::Sequence(args) => commands::sequence::execute(args, &self.catalog),
            Commands::Select(args) => commands::select::execute(args, &self.catalog),
            Commands::Classpath(args) => commands::classpath::execute(args, &self.catalog),
            Commands::Index(args) => commands::index::execute(args, &self.catalog, &self.color),
            Commands::Sync(args) => commands::sync::execute(args, &self.catalog, &self.color),
            Commands::Run(args) => commands::run::execute(args, &self.catalog),
            Commands::Tree(args) => commands::tree::execute(args, &self.catalog),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_parse_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "distro-build",
            "sequence",
            "--source-root",
            "/tmp/sources",
            "--no-fail",
        ])
        .unwrap();
        assert_eq!(
            cli.catalog.source_root.as_deref(),
            Some(std::path::Path::new("/tmp/sources"))
        );
        assert!(cli.catalog.no_fail);
        assert!(matches!(cli.command, Commands::Sequence(_)));
    }
}
