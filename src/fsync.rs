//! # Timestamp Sync
//!
//! Copy-if-newer file and directory synchronization for distribution trees.
//! A target is rewritten only when it is missing or strictly older than its
//! source, so repeated syncs of an unchanged tree touch nothing.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::Result;

/// Behavior switches shared by [`sync_file`] and [`sync_dir`].
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Remove target entries whose source no longer exists.
    pub delete_missing: bool,
    /// Give copies the modification time of their source.
    pub keep_times: bool,
    /// Skip dotfiles and dot-directories.
    pub ignore_hidden: bool,
    /// Entry names skipped entirely, wherever they appear (e.g. `CVS`).
    pub excludes: Vec<String>,
}

impl SyncOptions {
    pub fn new() -> SyncOptions {
        SyncOptions::default()
    }
}

/// Synchronize a single file.
///
/// Copies when the source exists and the target is missing or strictly
/// older. A missing source removes the target under `delete_missing`.
/// Returns whether the target was written or removed.
pub fn sync_file(source: &Path, target: &Path, options: &SyncOptions) -> Result<bool> {
    if !source.is_file() {
        if options.delete_missing && target.is_file() {
            debug!("sync remove: {}", target.display());
            fs::remove_file(target)?;
            return Ok(true);
        }
        return Ok(false);
    }

    let modified = fs::metadata(source)?.modified()?;
    if !is_stale(target, modified)? {
        return Ok(false);
    }
    debug!("sync copy: {} -> {}", source.display(), target.display());
    copy_entry(source, target, modified, options)?;
    Ok(true)
}

/// Synchronize the merged content of `sources` into `target`.
///
/// Sources are walked in order and merged by relative path; when several
/// sources carry the same path the newest modification time wins (ties keep
/// the earlier source). `delete_missing` prunes target files absent from
/// every source, then removes directories left empty. Returns the number of
/// files written or removed.
pub fn sync_dir(sources: &[PathBuf], target: &Path, options: &SyncOptions) -> Result<usize> {
    let mut merged: BTreeMap<PathBuf, (PathBuf, SystemTime)> = BTreeMap::new();
    let mut source_dirs: BTreeSet<PathBuf> = BTreeSet::new();

    for root in sources {
        if !root.is_dir() {
            continue;
        }
        for entry in WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| keep_entry(e, options))
            .filter_map(|e| e.ok())
        {
            if entry.depth() == 0 {
                continue;
            }
            let relative = match entry.path().strip_prefix(root) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => continue,
            };
            if entry.file_type().is_dir() {
                source_dirs.insert(relative);
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }
            let modified = fs::metadata(entry.path())?.modified()?;
            match merged.get(&relative) {
                Some((_, best)) if *best >= modified => {}
                _ => {
                    merged.insert(relative, (entry.path().to_path_buf(), modified));
                }
            }
        }
    }

    let mut changed = 0;
    for (relative, (source, modified)) in &merged {
        let destination = target.join(relative);
        if is_stale(&destination, *modified)? {
            debug!("sync copy: {} -> {}", source.display(), destination.display());
            copy_entry(source, &destination, *modified, options)?;
            changed += 1;
        }
    }

    if options.delete_missing && target.is_dir() {
        changed += prune_target(target, &merged, &source_dirs, options)?;
    }
    Ok(changed)
}

/// Whether the target is missing or strictly older than `modified`.
fn is_stale(target: &Path, modified: SystemTime) -> Result<bool> {
    match fs::metadata(target) {
        Ok(meta) => Ok(meta.modified()? < modified),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(true),
        Err(err) => Err(err.into()),
    }
}

fn copy_entry(
    source: &Path,
    target: &Path,
    modified: SystemTime,
    options: &SyncOptions,
) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, target)?;
    if options.keep_times {
        let file = fs::File::options().write(true).open(target)?;
        file.set_modified(modified)?;
    }
    Ok(())
}

/// Remove target files absent from the merged source view, then directories
/// absent from every source and empty after the file pass.
fn prune_target(
    target: &Path,
    merged: &BTreeMap<PathBuf, (PathBuf, SystemTime)>,
    source_dirs: &BTreeSet<PathBuf>,
    options: &SyncOptions,
) -> Result<usize> {
    let mut stale_files: Vec<PathBuf> = Vec::new();
    let mut seen_dirs: Vec<PathBuf> = Vec::new();

    for entry in WalkDir::new(target)
        .into_iter()
        .filter_entry(|e| keep_entry(e, options))
        .filter_map(|e| e.ok())
    {
        if entry.depth() == 0 {
            continue;
        }
        let relative = match entry.path().strip_prefix(target) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => continue,
        };
        if entry.file_type().is_dir() {
            if !source_dirs.contains(&relative) {
                seen_dirs.push(relative);
            }
        } else if !merged.contains_key(&relative) {
            stale_files.push(relative);
        }
    }

    let mut removed = 0;
    for relative in &stale_files {
        let path = target.join(relative);
        debug!("sync remove: {}", path.display());
        fs::remove_file(&path)?;
        removed += 1;
    }

    // deepest first, so emptied parents qualify in the same pass
    seen_dirs.sort_by_key(|dir| std::cmp::Reverse(dir.components().count()));
    for relative in &seen_dirs {
        let path = target.join(relative);
        if fs::read_dir(&path)?.next().is_none() {
            debug!("sync remove dir: {}", path.display());
            fs::remove_dir(&path)?;
        }
    }
    Ok(removed)
}

fn keep_entry(entry: &DirEntry, options: &SyncOptions) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    if options.excludes.iter().any(|skip| skip == name.as_ref()) {
        return false;
    }
    if options.ignore_hidden && name.starts_with('.') {
        return false;
    }
    true
}
