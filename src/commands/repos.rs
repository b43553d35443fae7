//! # Repos Command Implementation
//!
//! This module implements the `repos` subcommand, which lists the
//! repositories of the loaded catalog.
//!
//! ## Functionality
//!
//! - **Repository Listing**: Shows every repository with its fetch locator
//! - **Provider Index**: `--providers NAME` prints one repository's provide
//!   index instead, one capability per line with all of its providers
//! - **Machine Output**: `--format json` emits a serializable view
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use distro_build::registry::Registry;
use distro_build::suggestions;

use crate::commands::{finish, CatalogOptions, OutputFormat};

/// List the repositories of the catalog
#[derive(Args, Debug)]
pub struct ReposArgs {
    /// Print the provide index of this repository instead of the summary.
    ///
    /// Each line is `<capability>=<provider>:<provider>:` with the providers
    /// in registration order.
    #[arg(long, value_name = "REPOSITORY")]
    pub providers: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Serializable repository view for `--format json`.
#[derive(Serialize)]
struct RepositoryView<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fetch: Option<&'a str>,
    projects: usize,
}

/// Execute the `repos` command.
pub fn execute(args: ReposArgs, options: &CatalogOptions) -> Result<()> {
    let (registry, mut reporter) = options.load()?;

    if let Some(name) = &args.providers {
        print_providers(&registry, name)?;
        return finish(&mut reporter, options);
    }

    match args.format {
        OutputFormat::Text => {
            for (_, repository) in registry.repositories() {
                match repository.fetch() {
                    Some(fetch) => println!("{} {}", repository.name(), fetch),
                    None => println!("{}", repository.name()),
                }
            }
        }
        OutputFormat::Json => {
            let view: Vec<RepositoryView<'_>> = registry
                .repositories()
                .map(|(_, repository)| RepositoryView {
                    name: repository.name(),
                    fetch: repository.fetch(),
                    projects: repository.project_ids().len(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }

    finish(&mut reporter, options)
}

/// Print one repository's provide index, capability per line.
fn print_providers(registry: &Registry, name: &str) -> Result<()> {
    let repo = registry.repository_by_name(name).ok_or_else(|| {
        let known: Vec<String> = registry
            .repositories()
            .map(|(_, repository)| repository.name().to_string())
            .collect();
        suggestions::unknown_repository(name, &known)
    })?;

    let repository = registry.repository(repo);
    for (capability, providers) in repository.provides_index().iter() {
        let mut line = format!("{}=", capability);
        for id in providers {
            line.push_str(registry.project(*id).full_name());
            line.push(':');
        }
        println!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::TempDir;

    use super::*;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn sample_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        write(
            &temp.path().join("myx/repository.inf"),
            "Name=myx\nFetch=git://example.org/myx\n",
        );
        write(
            &temp.path().join("myx/base/project.inf"),
            "Name=myx/base\nProvides=util.db\n",
        );
        write(&temp.path().join("contrib/repository.inf"), "Name=contrib\n");
        temp
    }

    fn catalog(temp: &TempDir) -> CatalogOptions {
        CatalogOptions {
            source_root: Some(temp.path().to_path_buf()),
            ..CatalogOptions::default()
        }
    }

    #[test]
    fn test_execute_lists_repositories() {
        let temp = sample_tree();
        let args = ReposArgs {
            providers: None,
            format: OutputFormat::Text,
        };
        assert!(execute(args, &catalog(&temp)).is_ok());
    }

    #[test]
    fn test_execute_json_format() {
        let temp = sample_tree();
        let args = ReposArgs {
            providers: None,
            format: OutputFormat::Json,
        };
        assert!(execute(args, &catalog(&temp)).is_ok());
    }

    #[test]
    fn test_execute_providers_of_unknown_repository() {
        let temp = sample_tree();
        let args = ReposArgs {
            providers: Some("myxx".to_string()),
            format: OutputFormat::Text,
        };
        let err = execute(args, &catalog(&temp)).unwrap_err().to_string();
        assert!(err.contains("Unknown repository: myxx"));
        assert!(err.contains("Did you mean 'myx'?"));
    }

    #[test]
    fn test_execute_providers_of_known_repository() {
        let temp = sample_tree();
        let args = ReposArgs {
            providers: Some("myx".to_string()),
            format: OutputFormat::Text,
        };
        assert!(execute(args, &catalog(&temp)).is_ok());
    }

    #[test]
    fn test_execute_without_catalog_fails_with_hint() {
        let args = ReposArgs {
            providers: None,
            format: OutputFormat::Text,
        };
        let err = execute(args, &CatalogOptions::default())
            .unwrap_err()
            .to_string();
        assert!(err.contains("--source-root"));
    }
}
