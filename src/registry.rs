//! # Registry
//!
//! The global catalog of one distribution: every repository, a flat
//! project-by-full-name map, the four global reverse capability indices, and
//! the last computed build sequence. One `Registry` value is constructed per
//! run and passed explicitly to every algorithm; there is no global state.
//!
//! ## Resolution rules
//!
//! Capability resolution is name-only with one exception handled elsewhere
//! (the affected-by closure matches full specs). A spec whose name equals a
//! registered project's *full* name resolves to exactly that project,
//! bypassing the indices entirely; otherwise the requested index decides.
//! `None` means unknown, an empty provider set cannot occur.
//!
//! Projects and repositories live in arenas addressed by [`ProjectId`] /
//! [`RepoId`]; both iterate in registration order, which makes sequence
//! computation and provider ordering reproducible.

use std::collections::HashMap;

use log::warn;

use crate::capability::{CapabilityKind, CapabilitySpec};
use crate::project::{Project, ProjectId};
use crate::repository::{CapabilityIndex, RepoId, Repository};

/// Global catalog: repositories, projects, reverse indices, build sequence.
#[derive(Debug, Default)]
pub struct Registry {
    repositories: Vec<Repository>,
    repositories_by_name: HashMap<String, RepoId>,
    projects: Vec<Project>,
    projects_by_full_name: HashMap<String, ProjectId>,
    declares: CapabilityIndex,
    keywords: CapabilityIndex,
    provides: CapabilityIndex,
    augments: CapabilityIndex,
    sequence: Vec<ProjectId>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Add a repository. Adding a name twice keeps the first registration
    /// and returns its id.
    pub fn add_repository(&mut self, repository: Repository) -> RepoId {
        if let Some(existing) = self.repositories_by_name.get(repository.name()) {
            warn!(
                "repository already registered, keeping first: {}",
                repository.name()
            );
            return *existing;
        }
        let id = RepoId(self.repositories.len());
        self.repositories_by_name
            .insert(repository.name().to_string(), id);
        self.repositories.push(repository);
        id
    }

    pub fn repository(&self, id: RepoId) -> &Repository {
        &self.repositories[id.0]
    }

    /// Repositories in registration order.
    pub fn repositories(&self) -> impl Iterator<Item = (RepoId, &Repository)> {
        self.repositories
            .iter()
            .enumerate()
            .map(|(index, repository)| (RepoId(index), repository))
    }

    pub fn repository_by_name(&self, name: &str) -> Option<RepoId> {
        self.repositories_by_name.get(name.trim()).copied()
    }

    pub fn repository_count(&self) -> usize {
        self.repositories.len()
    }

    /// Start a project for the given repository, seeded per the capability
    /// rules (see [`Project::new`]). The caller finishes the lists and hands
    /// it back to [`Registry::register_project`].
    pub fn new_project(&self, repository: RepoId, name: &str) -> Project {
        Project::new(repository, self.repositories[repository.0].name(), name)
    }

    /// Register a fully assembled project: attach it to its repository and
    /// feed all four reverse indices (repository-scoped and global) from its
    /// capability lists. A full name registered twice keeps the first
    /// project and returns its id.
    pub fn register_project(&mut self, project: Project) -> ProjectId {
        if let Some(existing) = self.projects_by_full_name.get(project.full_name()) {
            warn!(
                "project already registered, keeping first: {}",
                project.full_name()
            );
            return *existing;
        }
        let id = ProjectId(self.projects.len());
        let repository = project.repository();
        for kind in CapabilityKind::INDEXED {
            for spec in project.list(kind) {
                self.repositories[repository.0].index_capability(kind, spec.name(), id);
                self.index_mut(kind).insert(spec.name(), id);
            }
        }
        self.repositories[repository.0].attach_project(project.name(), id);
        self.projects_by_full_name
            .insert(project.full_name().to_string(), id);
        self.projects.push(project);
        id
    }

    pub fn project(&self, id: ProjectId) -> &Project {
        &self.projects[id.0]
    }

    /// Projects in registration order.
    pub fn projects(&self) -> impl Iterator<Item = (ProjectId, &Project)> {
        self.projects
            .iter()
            .enumerate()
            .map(|(index, project)| (ProjectId(index), project))
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    pub fn project_by_full_name(&self, full_name: &str) -> Option<ProjectId> {
        self.projects_by_full_name.get(full_name.trim()).copied()
    }

    /// Resolve a full or short project name. Short names scan repositories
    /// in registration order and take the first match.
    pub fn find_project(&self, name: &str) -> Option<ProjectId> {
        let name = name.trim();
        if name.contains('/') {
            return self.projects_by_full_name.get(name).copied();
        }
        for repository in &self.repositories {
            if let Some(id) = repository.project_by_name(name) {
                return Some(id);
            }
        }
        None
    }

    pub fn resolve_declares(&self, spec: &CapabilitySpec) -> Option<Vec<ProjectId>> {
        self.resolve(&self.declares, spec)
    }

    pub fn resolve_keywords(&self, spec: &CapabilitySpec) -> Option<Vec<ProjectId>> {
        self.resolve(&self.keywords, spec)
    }

    pub fn resolve_provides(&self, spec: &CapabilitySpec) -> Option<Vec<ProjectId>> {
        self.resolve(&self.provides, spec)
    }

    pub fn resolve_augments(&self, spec: &CapabilitySpec) -> Option<Vec<ProjectId>> {
        self.resolve(&self.augments, spec)
    }

    /// Exact-full-name shortcut first, then the index; both by name only,
    /// tags never participate.
    fn resolve(&self, index: &CapabilityIndex, spec: &CapabilitySpec) -> Option<Vec<ProjectId>> {
        if let Some(id) = self.projects_by_full_name.get(spec.name()) {
            return Some(vec![*id]);
        }
        index.get(spec.name()).map(|ids| ids.to_vec())
    }

    /// The global reverse index of an indexed kind; `None` for `Requires`.
    pub fn index(&self, kind: CapabilityKind) -> Option<&CapabilityIndex> {
        match kind {
            CapabilityKind::Declares => Some(&self.declares),
            CapabilityKind::Keywords => Some(&self.keywords),
            CapabilityKind::Provides => Some(&self.provides),
            CapabilityKind::Augments => Some(&self.augments),
            CapabilityKind::Requires => None,
        }
    }

    fn index_mut(&mut self, kind: CapabilityKind) -> &mut CapabilityIndex {
        match kind {
            CapabilityKind::Declares => &mut self.declares,
            CapabilityKind::Keywords => &mut self.keywords,
            CapabilityKind::Provides => &mut self.provides,
            CapabilityKind::Augments => &mut self.augments,
            CapabilityKind::Requires => unreachable!("requires is never indexed"),
        }
    }

    /// The last computed build sequence; empty before the first computation.
    pub fn sequence(&self) -> &[ProjectId] {
        &self.sequence
    }

    /// Replace the stored build sequence (each computation overwrites, never
    /// accumulates).
    pub fn set_sequence(&mut self, sequence: Vec<ProjectId>) {
        self.sequence = sequence;
    }
}
