//! # Repository Model
//!
//! A repository is a named group of projects with an opaque fetch locator
//! (URL or path spec, never interpreted here). Each repository keeps its own
//! reverse capability indices alongside the registry-global ones, so
//! repository-scoped queries ("what does repository X provide") never touch
//! other repositories.

use std::collections::HashMap;

use crate::capability::CapabilityKind;
use crate::project::ProjectId;

/// Arena handle of a repository inside a [`crate::registry::Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepoId(pub(crate) usize);

/// Reverse index: capability name to the projects registered under it.
///
/// Keys iterate sorted; the projects under one key keep registration order,
/// each listed once.
#[derive(Debug, Default, Clone)]
pub struct CapabilityIndex {
    entries: std::collections::BTreeMap<String, Vec<ProjectId>>,
}

impl CapabilityIndex {
    pub fn insert(&mut self, name: &str, id: ProjectId) {
        let set = self.entries.entry(name.to_string()).or_default();
        if !set.contains(&id) {
            set.push(id);
        }
    }

    pub fn get(&self, name: &str) -> Option<&[ProjectId]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ProjectId])> {
        self.entries
            .iter()
            .map(|(name, ids)| (name.as_str(), ids.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A named group of projects with repository-scoped reverse indices.
#[derive(Debug)]
pub struct Repository {
    name: String,
    fetch: Option<String>,
    projects: Vec<ProjectId>,
    projects_by_name: HashMap<String, ProjectId>,
    declares: CapabilityIndex,
    keywords: CapabilityIndex,
    provides: CapabilityIndex,
    augments: CapabilityIndex,
}

impl Repository {
    pub fn new(name: &str, fetch: Option<&str>) -> Repository {
        Repository {
            name: name.trim().to_string(),
            fetch: fetch.map(|f| f.trim().to_string()).filter(|f| !f.is_empty()),
            projects: Vec::new(),
            projects_by_name: HashMap::new(),
            declares: CapabilityIndex::default(),
            keywords: CapabilityIndex::default(),
            provides: CapabilityIndex::default(),
            augments: CapabilityIndex::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opaque fetch locator from `repository.inf`, if any.
    pub fn fetch(&self) -> Option<&str> {
        self.fetch.as_deref()
    }

    /// Projects of this repository in registration order.
    pub fn project_ids(&self) -> &[ProjectId] {
        &self.projects
    }

    /// Look a project up by its short name.
    pub fn project_by_name(&self, name: &str) -> Option<ProjectId> {
        self.projects_by_name.get(name).copied()
    }

    pub fn index(&self, kind: CapabilityKind) -> Option<&CapabilityIndex> {
        match kind {
            CapabilityKind::Declares => Some(&self.declares),
            CapabilityKind::Keywords => Some(&self.keywords),
            CapabilityKind::Provides => Some(&self.provides),
            CapabilityKind::Augments => Some(&self.augments),
            CapabilityKind::Requires => None,
        }
    }

    pub fn provides_index(&self) -> &CapabilityIndex {
        &self.provides
    }

    pub(crate) fn attach_project(&mut self, short_name: &str, id: ProjectId) {
        self.projects.push(id);
        self.projects_by_name.insert(short_name.to_string(), id);
    }

    pub(crate) fn index_capability(&mut self, kind: CapabilityKind, name: &str, id: ProjectId) {
        match kind {
            CapabilityKind::Declares => self.declares.insert(name, id),
            CapabilityKind::Keywords => self.keywords.insert(name, id),
            CapabilityKind::Provides => self.provides.insert(name, id),
            CapabilityKind::Augments => self.augments.insert(name, id),
            CapabilityKind::Requires => {}
        }
    }
}
