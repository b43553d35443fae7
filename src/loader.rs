//! # Storage Loading
//!
//! Populates a [`Registry`] from one of the two on-disk layouts: an
//! authoritative source tree (`<root>/<repo>/<project>/project.inf`) or a
//! prebuilt index written by [`crate::index`]. Source-loaded projects carry
//! a `source_root`; index-loaded projects never do.
//!
//! Directory entries are visited in name order so registration order, and
//! with it short-name resolution and index iteration, is reproducible.

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use log::{debug, warn};

use crate::capability::{CapabilityKind, CapabilitySpec};
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::project::Project;
use crate::registry::Registry;
use crate::report::Reporter;
use crate::repository::{RepoId, Repository};

/// Name of the repository manifest file.
pub const REPOSITORY_INF: &str = "repository.inf";
/// Name of the project manifest file.
pub const PROJECT_INF: &str = "project.inf";
/// Per-repository index manifest.
pub const REPOSITORY_INDEX_INF: &str = "repository-index.env.inf";
/// Per-project index manifest; its presence marks an index project folder.
pub const PROJECT_INDEX_INF: &str = "project-index.env.inf";
/// Repository list of a prebuilt index, one name per line.
pub const NAMESPACES_TXT: &str = "distro-namespaces.txt";

/// A folder participates in scanning when its name is at least two
/// characters and not hidden.
fn is_candidate_folder(name: &str) -> bool {
    name.len() >= 2 && !name.starts_with('.')
}

/// Subdirectories of `root`, sorted by name.
fn sorted_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Scan a source tree and register every repository folder (a candidate
/// folder containing `repository.inf`) with all of its projects.
pub fn load_source_tree(
    registry: &mut Registry,
    source_root: &Path,
    reporter: &mut Reporter,
    progress: &ProgressBar,
) -> Result<()> {
    debug!("adding all source repositories, source root: {}", source_root.display());

    if !source_root.is_dir() {
        return Err(Error::StorageRoot {
            path: source_root.display().to_string(),
            message: "source root does not exist or is not a directory".to_string(),
        });
    }

    for dir in sorted_dirs(source_root)? {
        let name = folder_name(&dir);
        if !is_candidate_folder(&name) {
            continue;
        }
        if !dir.join(REPOSITORY_INF).is_file() {
            continue;
        }
        load_source_repository(registry, &dir, reporter, progress)?;
    }
    Ok(())
}

/// Load one repository folder from sources.
pub fn load_source_repository(
    registry: &mut Registry,
    repo_root: &Path,
    reporter: &mut Reporter,
    progress: &ProgressBar,
) -> Result<()> {
    let folder = folder_name(repo_root);
    let manifest = Manifest::load(&repo_root.join(REPOSITORY_INF))?;

    let name = match manifest.get("Name") {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            warn!(
                "repository.inf without 'Name', using folder name: {}",
                repo_root.display()
            );
            folder.clone()
        }
    };
    progress.set_message(format!("repository {}", name));

    let repo = registry.add_repository(Repository::new(&name, manifest.get("Fetch")));
    let repo_name = registry.repository(repo).name().to_string();

    for dir in sorted_dirs(repo_root)? {
        let project_folder = folder_name(&dir);
        if !is_candidate_folder(&project_folder) {
            continue;
        }
        if !dir.join(PROJECT_INF).is_file() {
            continue;
        }
        load_source_project(registry, repo, &repo_name, &dir, reporter)?;
        progress.inc(1);
    }
    Ok(())
}

/// Load one project folder from sources: manifest lists, then the artifact
/// scan, then registration (so artifact provides reach the indices).
fn load_source_project(
    registry: &mut Registry,
    repo: RepoId,
    repo_name: &str,
    project_root: &Path,
    reporter: &mut Reporter,
) -> Result<()> {
    let folder = folder_name(project_root);
    let manifest = Manifest::load(&project_root.join(PROJECT_INF))?;

    let name = manifest.get("Name").unwrap_or("").trim();
    if name.is_empty() {
        warn!(
            "project skipped, no 'Name' in project.inf: {}",
            project_root.display()
        );
        return Ok(());
    }

    // The manifest may spell the name as the folder, the full repo/folder
    // path, or a trailing segment of it; anything else is a mismatch.
    let full_path = format!("{}/{}", repo_name, folder);
    if name != full_path && !full_path.ends_with(&format!("/{}", name)) {
        reporter.record(format!(
            "project name mismatch: {} != {} in {}",
            full_path,
            name,
            project_root.display()
        ));
        return Ok(());
    }

    let mut project = registry.new_project(repo, &folder);
    for kind in [
        CapabilityKind::Declares,
        CapabilityKind::Keywords,
        CapabilityKind::Provides,
        CapabilityKind::Requires,
        CapabilityKind::Augments,
    ] {
        project.extend_list(kind, manifest.get(kind.manifest_key()).unwrap_or(""));
    }

    scan_artifacts(&mut project, project_root)?;
    project.set_source_root(project_root.to_path_buf());
    registry.register_project(project);
    Ok(())
}

/// Derive provides/contains entries from the artifact folders a source
/// project ships.
fn scan_artifacts(project: &mut Project, project_root: &Path) -> Result<()> {
    let jars = project_root.join("jars");
    if jars.is_dir() {
        let mut names: Vec<String> = Vec::new();
        for entry in fs::read_dir(&jars)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(".jar") || name.ends_with(".zip") {
                names.push(name);
            }
        }
        names.sort();
        for name in names {
            let artifact = format!("jars/{}", name);
            project.add(
                CapabilityKind::Provides,
                CapabilitySpec::new("classpath.jars", &[artifact.as_str()]),
            );
            project.add_contains(&artifact);
        }
    }

    if project_root.join("data").is_dir() {
        project.add(
            CapabilityKind::Provides,
            CapabilitySpec::new("project-data", &["data.tbz"]),
        );
        project.add_contains("data.tbz");
    }
    if project_root.join("docs").is_dir() {
        project.add(
            CapabilityKind::Provides,
            CapabilitySpec::new("project-docs", &["docs.tbz"]),
        );
        project.add_contains("docs.tbz");
    }
    if project_root.join("java").is_dir() {
        project.add(
            CapabilityKind::Provides,
            CapabilitySpec::new("classpath.jars", &["java.jar"]),
        );
        project.add_contains("java.jar");
    }
    Ok(())
}

/// Import a prebuilt index tree: repositories in `distro-namespaces.txt`
/// order, projects from the folders carrying a `project-index.env.inf`.
pub fn import_index(
    registry: &mut Registry,
    index_root: &Path,
    reporter: &mut Reporter,
    progress: &ProgressBar,
) -> Result<()> {
    debug!("importing repositories from index: {}", index_root.display());

    if !index_root.is_dir() {
        return Err(Error::StorageRoot {
            path: index_root.display().to_string(),
            message: "index root does not exist or is not a directory".to_string(),
        });
    }

    let namespaces_path = index_root.join(NAMESPACES_TXT);
    let namespaces = fs::read_to_string(&namespaces_path).map_err(|_| Error::IndexFormat {
        path: namespaces_path.display().to_string(),
        message: "repository list is missing or unreadable".to_string(),
        hint: Some("regenerate the index with 'distro-build index'".to_string()),
    })?;

    for repo_name in namespaces.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let repo_root = index_root.join(repo_name);
        if !repo_root.join(REPOSITORY_INF).is_file() {
            debug!("index repository without manifest, skipped: {}", repo_name);
            continue;
        }
        import_index_repository(registry, repo_name, &repo_root, reporter, progress)?;
    }
    Ok(())
}

fn import_index_repository(
    registry: &mut Registry,
    repo_name: &str,
    repo_root: &Path,
    reporter: &mut Reporter,
    progress: &ProgressBar,
) -> Result<()> {
    let manifest = Manifest::load(&repo_root.join(REPOSITORY_INF))?;
    let name = match manifest.get("Name") {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => repo_name.to_string(),
    };
    progress.set_message(format!("repository {}", name));

    let repo = registry.add_repository(Repository::new(&name, manifest.get("Fetch")));
    let registered = registry.repository(repo).name().to_string();

    for dir in sorted_dirs(repo_root)? {
        let index_path = dir.join(PROJECT_INDEX_INF);
        if !index_path.is_file() {
            continue;
        }
        import_index_project(registry, repo, &registered, &dir, &index_path, reporter)?;
        progress.inc(1);
    }
    Ok(())
}

fn import_index_project(
    registry: &mut Registry,
    repo: RepoId,
    repo_name: &str,
    project_root: &Path,
    index_path: &Path,
    reporter: &mut Reporter,
) -> Result<()> {
    let folder = folder_name(project_root);
    let manifest = Manifest::load(index_path)?;

    let full_name = format!("{}/{}", repo_name, folder);
    match manifest.get("PROJ") {
        Some(proj) if proj == full_name => {}
        other => {
            reporter.record(format!(
                "project index mismatch: PROJ is {:?}, expected {} in {}",
                other.unwrap_or("missing"),
                full_name,
                index_path.display()
            ));
            return Ok(());
        }
    }

    let mut project = registry.new_project(repo, &folder);
    for kind in [
        CapabilityKind::Declares,
        CapabilityKind::Keywords,
        CapabilityKind::Provides,
        CapabilityKind::Requires,
        CapabilityKind::Augments,
    ] {
        let key = format!("{}{}", kind.env_prefix(), full_name);
        project.extend_list(kind, manifest.get(&key).unwrap_or(""));
    }
    let contains_key = format!("PRJ-GET-{}", full_name);
    for item in manifest.get(&contains_key).unwrap_or("").split_whitespace() {
        project.add_contains(item);
    }

    registry.register_project(project);
    Ok(())
}
