//! # Project Model
//!
//! A project is one buildable unit of the distribution, identified by its
//! repository and short name (`fullName = repository/name`). It carries five
//! capability lists, the artifact `contains` list, and the source-root
//! marker distinguishing projects loaded from authoritative local sources
//! from projects imported out of a prebuilt index. That marker changes how
//! the project contributes to runtime classpaths: a source-loaded project
//! exposes its loose `java/` output directory where an index-loaded one
//! exposes the packaged `java.jar`.
//!
//! A project is assembled by a loader (seed lists, manifest lists, artifact
//! scan) and then registered with the [`crate::registry::Registry`]; the
//! registry only hands out shared references afterwards, so registered
//! projects never change.

use std::path::{Path, PathBuf};

use crate::capability::{CapabilityKind, CapabilityList, CapabilitySpec};
use crate::classpath::ClasspathBuilder;
use crate::repository::RepoId;

/// Arena handle of a project inside a [`crate::registry::Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectId(pub(crate) usize);

/// One buildable unit: identity, capability lists, artifacts.
#[derive(Debug, Clone)]
pub struct Project {
    name: String,
    full_name: String,
    repository: RepoId,
    declares: CapabilityList,
    keywords: CapabilityList,
    provides: CapabilityList,
    requires: CapabilityList,
    augments: CapabilityList,
    contains: Vec<String>,
    source_root: Option<PathBuf>,
}

impl Project {
    /// Create a project with its seed capabilities: `declares` and
    /// `augments` get the full name, `keywords` the short name, `provides`
    /// both.
    pub fn new(repository: RepoId, repository_name: &str, name: &str) -> Project {
        let name = name.trim().to_string();
        let full_name = format!("{}/{}", repository_name, name);
        let mut project = Project {
            repository,
            declares: CapabilityList::new(),
            keywords: CapabilityList::new(),
            provides: CapabilityList::new(),
            requires: CapabilityList::new(),
            augments: CapabilityList::new(),
            contains: Vec::new(),
            source_root: None,
            name,
            full_name,
        };
        project.declares.add(CapabilitySpec::parse(&project.full_name));
        project.keywords.add(CapabilitySpec::parse(&project.name));
        project.provides.add(CapabilitySpec::parse(&project.name));
        project.provides.add(CapabilitySpec::parse(&project.full_name));
        project.augments.add(CapabilitySpec::parse(&project.full_name));
        project
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn repository(&self) -> RepoId {
        self.repository
    }

    pub fn declares(&self) -> &CapabilityList {
        &self.declares
    }

    pub fn keywords(&self) -> &CapabilityList {
        &self.keywords
    }

    pub fn provides(&self) -> &CapabilityList {
        &self.provides
    }

    pub fn requires(&self) -> &CapabilityList {
        &self.requires
    }

    pub fn augments(&self) -> &CapabilityList {
        &self.augments
    }

    pub fn list(&self, kind: CapabilityKind) -> &CapabilityList {
        match kind {
            CapabilityKind::Declares => &self.declares,
            CapabilityKind::Keywords => &self.keywords,
            CapabilityKind::Provides => &self.provides,
            CapabilityKind::Requires => &self.requires,
            CapabilityKind::Augments => &self.augments,
        }
    }

    /// Add one spec to the list of the given kind, merging tags on a name
    /// collision. Returns whether the list changed.
    pub fn add(&mut self, kind: CapabilityKind, spec: CapabilitySpec) -> bool {
        self.list_mut(kind).add(spec)
    }

    /// Parse and add every whitespace-separated spec in `source` (the value
    /// shape of manifest and index keys).
    pub fn extend_list(&mut self, kind: CapabilityKind, source: &str) {
        self.list_mut(kind).extend_parsed(source);
    }

    fn list_mut(&mut self, kind: CapabilityKind) -> &mut CapabilityList {
        match kind {
            CapabilityKind::Declares => &mut self.declares,
            CapabilityKind::Keywords => &mut self.keywords,
            CapabilityKind::Provides => &mut self.provides,
            CapabilityKind::Requires => &mut self.requires,
            CapabilityKind::Augments => &mut self.augments,
        }
    }

    /// Artifact identifiers in discovery order (`jars/<file>`, `java.jar`,
    /// `data.tbz`, `docs.tbz`).
    pub fn contains(&self) -> &[String] {
        &self.contains
    }

    pub fn add_contains(&mut self, item: &str) {
        let item = item.trim();
        if !item.is_empty() {
            self.contains.push(item.to_string());
        }
    }

    /// Set only by the source loader; never set for index-loaded projects.
    pub fn set_source_root(&mut self, path: PathBuf) {
        self.source_root = Some(path);
    }

    pub fn source_root(&self) -> Option<&Path> {
        self.source_root.as_deref()
    }

    /// Append this project's own runtime-classpath entries. `jars/` artifacts
    /// are contributed as-is under the project path; `java.jar` becomes the
    /// packaged jar for index-loaded projects and the loose `java/` output
    /// directory for source-loaded ones.
    pub fn fill_classpath(&self, classpath: &mut ClasspathBuilder) {
        for item in &self.contains {
            if item.starts_with("jars/") {
                classpath.add(format!("{}/{}", self.full_name, item));
                continue;
            }
            if item == "java.jar" {
                if self.source_root.is_none() {
                    classpath.add(format!("{}/{}", self.full_name, item));
                } else {
                    classpath.add(format!("{}/java/", self.full_name));
                }
            }
        }
    }
}
