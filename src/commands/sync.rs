//! # Sync Command Implementation
//!
//! This module implements the `sync` subcommand, which synchronizes a cached
//! distribution tree (the output of `index`) into a deployment root.
//!
//! ## Functionality
//!
//! - **Catalog Driven**: the cached root's own index decides what is synced;
//!   nothing outside the cataloged repositories and projects is touched
//! - **Timestamp Based**: files are copied only when missing or strictly
//!   older in the target, repeated runs of an unchanged tree copy nothing
//! - **Pruning**: target files whose source disappeared are removed, CVS
//!   folders and dotfiles are never taken along
//!
//! Per project the manifests, the `data.tbz`/`docs.tbz`/`java.jar` artifacts
//! and the `jars`, `host` and `image-process` folders are synchronized from
//! `<cached-root>/<repo>/<project>` into `<output-root>/distro/<repo>/<project>`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use indicatif::ProgressBar;

use distro_build::defaults;
use distro_build::fsync::{self, SyncOptions};
use distro_build::loader;
use distro_build::output::OutputConfig;
use distro_build::registry::Registry;
use distro_build::report::Reporter;

use crate::commands::{finish, CatalogOptions};

/// Manifest and artifact files synchronized per project.
const PROJECT_FILES: [&str; 5] = [
    loader::PROJECT_INF,
    loader::PROJECT_INDEX_INF,
    "data.tbz",
    "docs.tbz",
    "java.jar",
];

/// Artifact folders synchronized per project.
const PROJECT_FOLDERS: [&str; 3] = ["jars", "host", "image-process"];

/// Synchronize a cached distribution tree into a deployment root
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Deployment root to synchronize into (must exist).
    ///
    /// The distribution lands in `<DIR>/distro`.
    #[arg(long, value_name = "DIR")]
    pub output_root: PathBuf,
}

/// Execute the `sync` command.
pub fn execute(args: SyncArgs, options: &CatalogOptions, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_flag(color_flag);

    let cached = options
        .cached_root
        .clone()
        .unwrap_or_else(defaults::default_cached_root);
    if !args.output_root.is_dir() {
        anyhow::bail!(
            "output root does not exist or is not a directory: {}",
            args.output_root.display()
        );
    }

    let mut registry = Registry::new();
    let mut reporter = Reporter::new(options.no_fail);
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("importing {}", cached.display()));
    let imported = loader::import_index(&mut registry, &cached, &mut reporter, &spinner);
    spinner.finish_and_clear();
    imported?;

    println!(
        "{} Synchronizing {} project(s) into {}",
        out.marker("🔄", "[SYNC]"),
        registry.project_count(),
        args.output_root.display()
    );

    let file_options = SyncOptions {
        delete_missing: true,
        keep_times: true,
        ..SyncOptions::new()
    };
    let folder_options = SyncOptions {
        delete_missing: true,
        keep_times: true,
        ignore_hidden: true,
        excludes: vec!["CVS".to_string()],
    };

    let distro = args.output_root.join("distro");
    let progress = ProgressBar::new(registry.project_count() as u64);
    let mut changed = 0usize;

    for (_, repository) in registry.repositories() {
        let source_repo = cached.join(repository.name());
        let target_repo = distro.join(repository.name());
        for file in [loader::REPOSITORY_INF, loader::REPOSITORY_INDEX_INF] {
            if fsync::sync_file(&source_repo.join(file), &target_repo.join(file), &file_options)? {
                changed += 1;
            }
        }

        for id in repository.project_ids() {
            let project = registry.project(*id);
            progress.set_message(project.full_name().to_string());
            let source = source_repo.join(project.name());
            let target = target_repo.join(project.name());

            for file in PROJECT_FILES {
                if fsync::sync_file(&source.join(file), &target.join(file), &file_options)? {
                    changed += 1;
                }
            }
            for folder in PROJECT_FOLDERS {
                changed +=
                    fsync::sync_dir(&[source.join(folder)], &target.join(folder), &folder_options)?;
            }
            progress.inc(1);
        }
    }
    progress.finish_and_clear();

    println!(
        "{} Synchronized, {} file(s) written or removed",
        out.marker("✅", "[OK]"),
        changed
    );

    finish(&mut reporter, options)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::TempDir;

    use super::*;
    use crate::commands::index::IndexArgs;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Build a source tree, index it into a cache dir, and copy the source
    /// artifacts in, mirroring what a build would leave behind.
    fn cached_distribution() -> (TempDir, TempDir) {
        let sources = TempDir::new().unwrap();
        write(&sources.path().join("myx/repository.inf"), "Name=myx\n");
        write(
            &sources.path().join("myx/base/project.inf"),
            "Name=myx/base\nProvides=util.db\n",
        );
        write(&sources.path().join("myx/base/jars/db.jar"), "jar bytes");

        let cache = TempDir::new().unwrap();
        let options = CatalogOptions {
            source_root: Some(sources.path().to_path_buf()),
            ..CatalogOptions::default()
        };
        crate::commands::index::execute(
            IndexArgs {
                output: Some(cache.path().to_path_buf()),
                quick: false,
            },
            &options,
            "never",
        )
        .unwrap();
        write(&cache.path().join("myx/base/jars/db.jar"), "jar bytes");
        write(&cache.path().join("myx/base/jars/CVS/Entries"), "meta");
        (sources, cache)
    }

    fn sync_options(cache: &TempDir) -> CatalogOptions {
        CatalogOptions {
            cached_root: Some(cache.path().to_path_buf()),
            ..CatalogOptions::default()
        }
    }

    #[test]
    fn test_execute_deploys_the_cached_tree() {
        let (_sources, cache) = cached_distribution();
        let output = TempDir::new().unwrap();

        let args = SyncArgs {
            output_root: output.path().to_path_buf(),
        };
        execute(args, &sync_options(&cache), "never").unwrap();

        let deployed = output.path().join("distro/myx/base");
        assert!(deployed.join("project.inf").is_file());
        assert!(deployed.join("project-index.env.inf").is_file());
        assert!(deployed.join("jars/db.jar").is_file());
        assert!(!deployed.join("jars/CVS").exists());
        assert!(output
            .path()
            .join("distro/myx/repository.inf")
            .is_file());
    }

    #[test]
    fn test_execute_second_run_copies_nothing_and_prunes_stale() {
        let (_sources, cache) = cached_distribution();
        let output = TempDir::new().unwrap();

        let args = SyncArgs {
            output_root: output.path().to_path_buf(),
        };
        execute(args, &sync_options(&cache), "never").unwrap();

        // a jar that vanished from the cache is pruned on the next run
        let stale = output.path().join("distro/myx/base/jars/stale.jar");
        write(&stale, "stale");
        let args = SyncArgs {
            output_root: output.path().to_path_buf(),
        };
        execute(args, &sync_options(&cache), "never").unwrap();
        assert!(!stale.exists());
    }

    #[test]
    fn test_execute_requires_existing_output_root() {
        let (_sources, cache) = cached_distribution();
        let args = SyncArgs {
            output_root: PathBuf::from("/nonexistent/deploy"),
        };
        let err = execute(args, &sync_options(&cache), "never")
            .unwrap_err()
            .to_string();
        assert!(err.contains("output root does not exist"));
    }

    #[test]
    fn test_execute_requires_a_cached_index() {
        let empty = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let args = SyncArgs {
            output_root: output.path().to_path_buf(),
        };
        let err = execute(args, &sync_options(&empty), "never").unwrap_err();
        assert!(err.to_string().contains("distro-namespaces.txt"));
    }
}
