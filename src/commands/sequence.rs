//! # Sequence Command Implementation
//!
//! This module implements the `sequence` subcommand, which computes the
//! dependency-ordered build sequence and prints it, one full project name
//! per line.
//!
//! Without selection flags the sequence covers the whole catalog; with them
//! it covers only the selected queue and its dependencies.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use distro_build::selection::BuildQueue;
use distro_build::sequence;

use crate::commands::select::SelectionArgs;
use crate::commands::{finish, CatalogOptions, OutputFormat};

/// Compute and print the build sequence
#[derive(Args, Debug)]
pub struct SequenceArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Serializable sequence entry for `--format json`.
#[derive(Serialize)]
struct SequencedProject<'a> {
    position: usize,
    name: &'a str,
}

/// Execute the `sequence` command.
pub fn execute(args: SequenceArgs, options: &CatalogOptions) -> Result<()> {
    let (mut registry, mut reporter) = options.load()?;
    sequence::compute_sequence(&mut registry, None, &mut reporter)?;

    if !args.selection.is_empty() {
        let mut queue = BuildQueue::new();
        args.selection.apply(&registry, &mut queue, &mut reporter)?;
        sequence::compute_sequence(&mut registry, Some(queue.projects()), &mut reporter)?;
    }

    match args.format {
        OutputFormat::Text => {
            for id in registry.sequence() {
                println!("{}", registry.project(*id).full_name());
            }
        }
        OutputFormat::Json => {
            let view: Vec<SequencedProject<'_>> = registry
                .sequence()
                .iter()
                .enumerate()
                .map(|(index, id)| SequencedProject {
                    position: index + 1,
                    name: registry.project(*id).full_name(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }

    finish(&mut reporter, options)
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
        write(&temp.path().join("myx/repository.inf"), "Name=myx\n");
        write(
            &temp.path().join("myx/base/project.inf"),
            "Name=myx/base\nProvides=util.db\n",
        );
        write(
            &temp.path().join("myx/app/project.inf"),
            "Name=myx/app\nRequires=util.db\n",
        );
        temp
    }

    fn catalog(temp: &TempDir) -> CatalogOptions {
        CatalogOptions {
            source_root: Some(temp.path().to_path_buf()),
            ..CatalogOptions::default()
        }
    }

    #[test]
    fn test_execute_full_sequence() {
        let temp = sample_tree();
        let args = SequenceArgs {
            selection: SelectionArgs::default(),
            format: OutputFormat::Text,
        };
        assert!(execute(args, &catalog(&temp)).is_ok());
    }

    #[test]
    fn test_execute_selected_sequence() {
        let temp = sample_tree();
        let args = SequenceArgs {
            selection: SelectionArgs {
                project: vec!["myx/app".to_string()],
                ..SelectionArgs::default()
            },
            format: OutputFormat::Text,
        };
        assert!(execute(args, &catalog(&temp)).is_ok());
    }

    #[test]
    fn test_execute_json_format() {
        let temp = sample_tree();
        let args = SequenceArgs {
            selection: SelectionArgs::default(),
            format: OutputFormat::Json,
        };
        assert!(execute(args, &catalog(&temp)).is_ok());
    }

    #[test]
    fn test_execute_strict_mode_fails_on_unknown_requirement() {
        let temp = TempDir::new().unwrap();
        write(&temp.path().join("myx/repository.inf"), "Name=myx\n");
        write(
            &temp.path().join("myx/app/project.inf"),
            "Name=myx/app\nRequires=missing.capability\n",
        );

        let args = SequenceArgs {
            selection: SelectionArgs::default(),
            format: OutputFormat::Text,
        };
        let err = execute(args, &catalog(&temp)).unwrap_err().to_string();
        assert!(err.contains("missing.capability"));

        let args = SequenceArgs {
            selection: SelectionArgs::default(),
            format: OutputFormat::Text,
        };
        let lenient = CatalogOptions {
            no_fail: true,
            ..catalog(&temp)
        };
        assert!(execute(args, &lenient).is_ok());
    }
}
