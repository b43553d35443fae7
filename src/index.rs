//! # Index Writer
//!
//! Serializes a populated [`Registry`] into the prebuilt index tree that
//! [`crate::loader::import_index`] reads back. The distro-level files
//! (`distro-index.inf` and friends) are always written; per-repository and
//! per-project files are skipped in quick mode.
//!
//! List-valued keys keep the order held in the data model, so an index
//! written from an imported registry reproduces the original byte for byte.

use std::fs;
use std::path::Path;

use indicatif::ProgressBar;
use log::debug;

use crate::capability::{CapabilityKind, CapabilityList};
use crate::classpath::{self, ClasspathBuilder};
use crate::error::{Error, Result};
use crate::loader::{NAMESPACES_TXT, PROJECT_INDEX_INF, PROJECT_INF, REPOSITORY_INDEX_INF, REPOSITORY_INF};
use crate::manifest::Manifest;
use crate::project::{Project, ProjectId};
use crate::registry::Registry;
use crate::report::Reporter;
use crate::sequence;

/// Distribution-wide index manifest.
pub const INDEX_INF: &str = "distro-index.inf";
/// Full build sequence, one full name per line.
pub const SEQUENCE_TXT: &str = "distro-sequence.txt";
/// Distribution-wide runtime classpath, one entry per line.
pub const CLASSPATH_TXT: &str = "distro-classpath.txt";

/// The five capability keys of an index entry, in file order.
const LIST_KINDS: [CapabilityKind; 5] = [
    CapabilityKind::Declares,
    CapabilityKind::Keywords,
    CapabilityKind::Augments,
    CapabilityKind::Requires,
    CapabilityKind::Provides,
];

/// Write the prebuilt index for `registry` under `output`.
///
/// The build sequence must have been computed beforehand; the sequence
/// decides which projects get index entries and per-project folders. With
/// `quick` only the distro-level files are written.
pub fn write_index(
    registry: &Registry,
    output: &Path,
    quick: bool,
    reporter: &mut Reporter,
    progress: &ProgressBar,
) -> Result<()> {
    if registry.sequence().is_empty() && registry.project_count() > 0 {
        return Err(Error::State {
            message: "build sequence has not been computed".to_string(),
        });
    }
    debug!("writing index: {}", output.display());
    fs::create_dir_all(output)?;

    let namespaces: Vec<String> = registry
        .repositories()
        .map(|(_, repository)| repository.name().to_string())
        .collect();
    write_lines(&output.join(NAMESPACES_TXT), &namespaces)?;

    write_distro_index(registry, output, reporter)?;

    let sequence_lines: Vec<String> = registry
        .sequence()
        .iter()
        .map(|&id| registry.project(id).full_name().to_string())
        .collect();
    write_lines(&output.join(SEQUENCE_TXT), &sequence_lines)?;

    let mut distro_classpath = ClasspathBuilder::new();
    for &id in registry.sequence() {
        classpath::fill_runtime_classpath(registry, id, &mut distro_classpath, reporter)?;
    }
    write_lines(&output.join(CLASSPATH_TXT), distro_classpath.entries())?;

    if quick {
        return Ok(());
    }

    for (_, repository) in registry.repositories() {
        let repo_root = output.join(repository.name());

        let mut inf = Manifest::new();
        inf.set("Name", repository.name());
        if let Some(fetch) = repository.fetch() {
            inf.set("Fetch", fetch);
        }
        inf.save(&repo_root.join(REPOSITORY_INF))?;

        let shorts: Vec<String> = repository
            .project_ids()
            .iter()
            .map(|&id| registry.project(id).name().to_string())
            .collect();
        let mut env = Manifest::new();
        env.set("REPO", repository.name());
        env.set("PRJS", &shorts.join(" "));
        env.save(&repo_root.join(REPOSITORY_INDEX_INF))?;
    }

    for &id in registry.sequence() {
        let project = registry.project(id);
        progress.set_message(format!("project {}", project.full_name()));
        let dir = output
            .join(registry.repository(project.repository()).name())
            .join(project.name());
        write_project_files(registry, id, &dir, reporter)?;
        progress.inc(1);
    }
    Ok(())
}

/// `distro-index.inf`: repositories, the sequenced project list, and one
/// block of `PRJ-*` keys per sequenced project.
fn write_distro_index(registry: &Registry, output: &Path, reporter: &mut Reporter) -> Result<()> {
    let mut inf = Manifest::new();

    let names: Vec<String> = registry
        .repositories()
        .map(|(_, repository)| repository.name().to_string())
        .collect();
    inf.set("REPS", &names.join(" "));
    for (_, repository) in registry.repositories() {
        inf.set(
            &format!("REP-{}", repository.name()),
            repository.fetch().unwrap_or(""),
        );
    }

    let fulls: Vec<String> = registry
        .sequence()
        .iter()
        .map(|&id| registry.project(id).full_name().to_string())
        .collect();
    inf.set("PRJS", &fulls.join(" "));

    for &id in registry.sequence() {
        fill_project_info(registry, id, &mut inf, reporter)?;
    }
    inf.save(&output.join(INDEX_INF))
}

/// Append one project's `PRJ-*-<full>` keys to `target` (shared between
/// `distro-index.inf` and the per-project `project-index.env.inf`).
fn fill_project_info(
    registry: &Registry,
    id: ProjectId,
    target: &mut Manifest,
    reporter: &mut Reporter,
) -> Result<()> {
    let project = registry.project(id);
    let full = project.full_name();

    for kind in LIST_KINDS {
        target.set(
            &format!("{}{}", kind.env_prefix(), full),
            &project.list(kind).to_string(),
        );
    }

    let own_sequence = sequence::project_sequence(registry, id, reporter)?;
    let fulls: Vec<String> = own_sequence
        .iter()
        .map(|&sid| registry.project(sid).full_name().to_string())
        .collect();
    target.set(&format!("PRJ-SEQ-{}", full), &fulls.join(" "));
    target.set(&format!("PRJ-GET-{}", full), &project.contains().join(" "));
    Ok(())
}

fn write_project_files(
    registry: &Registry,
    id: ProjectId,
    dir: &Path,
    reporter: &mut Reporter,
) -> Result<()> {
    let project = registry.project(id);

    let mut inf = Manifest::new();
    inf.set("Name", project.full_name());
    for kind in [
        CapabilityKind::Declares,
        CapabilityKind::Keywords,
        CapabilityKind::Provides,
        CapabilityKind::Requires,
        CapabilityKind::Augments,
    ] {
        inf.set(kind.manifest_key(), &project.list(kind).to_string());
    }
    inf.save(&dir.join(PROJECT_INF))?;

    let mut env = Manifest::new();
    env.set("PROJ", project.full_name());
    env.set("PRJS", project.full_name());
    fill_project_info(registry, id, &mut env, reporter)?;
    env.save(&dir.join(PROJECT_INDEX_INF))?;

    let runtime = classpath::project_classpath(registry, id, reporter)?;
    write_lines(&dir.join("project-classpath.txt"), runtime.entries())?;

    write_listing(&dir.join("project-provides.txt"), project, project.provides())?;
    write_listing(&dir.join("project-declares.txt"), project, project.declares())?;
    write_listing(&dir.join("project-keywords.txt"), project, project.keywords())?;

    let own_sequence = sequence::project_sequence(registry, id, reporter)?;
    let lines: Vec<String> = own_sequence
        .iter()
        .map(|&sid| registry.project(sid).full_name().to_string())
        .collect();
    write_lines(&dir.join("project-sequence.txt"), &lines)?;
    Ok(())
}

/// Capability listing file: the short name first, then one
/// `<full> <name>:<tag>` line per expansion.
fn write_listing(path: &Path, project: &Project, list: &CapabilityList) -> Result<()> {
    let mut lines = vec![project.name().to_string()];
    list.fill_list(Some(&format!("{} ", project.full_name())), &mut lines);
    write_lines(path, &lines)
}

fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut body = lines
        .iter()
        .map(|line| line.as_ref())
        .collect::<Vec<_>>()
        .join("\n");
    if !body.is_empty() {
        body.push('\n');
    }
    fs::write(path, body)?;
    Ok(())
}
