//! # Selection Engine
//!
//! Maintains the build queue: the ordered set of projects a command run is
//! going to act on. Plain selections append, closure selections replace the
//! whole queue. Every operation mutates the queue in place and keeps it
//! duplicate-free.

use std::collections::HashSet;

use log::debug;

use crate::capability::CapabilitySpec;
use crate::error::{Error, Result};
use crate::project::ProjectId;
use crate::registry::Registry;
use crate::report::Reporter;
use crate::sequence;

/// Ordered, duplicate-rejecting queue of projects selected for a build run.
#[derive(Debug, Default)]
pub struct BuildQueue {
    items: Vec<ProjectId>,
}

impl BuildQueue {
    pub fn new() -> BuildQueue {
        BuildQueue::default()
    }

    /// Append a project unless it is already queued. Returns whether the
    /// queue changed.
    pub fn append(&mut self, id: ProjectId) -> bool {
        if self.items.contains(&id) {
            return false;
        }
        self.items.push(id);
        true
    }

    /// Remove a project if present. Returns whether the queue changed.
    pub fn remove(&mut self, id: ProjectId) -> bool {
        match self.items.iter().position(|item| *item == id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: ProjectId) -> bool {
        self.items.contains(&id)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn projects(&self) -> &[ProjectId] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = ProjectId> + '_ {
        self.items.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Append every project of the registry's current sequence not already
/// queued, in sequence order. The sequence must have been computed first.
pub fn select_all(registry: &Registry, queue: &mut BuildQueue) -> Result<()> {
    debug!("select all projects");

    if registry.sequence().is_empty() && registry.project_count() > 0 {
        return Err(Error::State {
            message: "build sequence has not been computed".to_string(),
        });
    }
    for id in registry.sequence() {
        queue.append(*id);
    }
    Ok(())
}

/// Append one project resolved by full or short name.
pub fn select_project(registry: &Registry, queue: &mut BuildQueue, name: &str) -> Result<()> {
    debug!("select project: {}", name);

    let id = registry
        .find_project(name)
        .ok_or_else(|| Error::UnknownProject {
            name: name.to_string(),
            hint: None,
        })?;
    queue.append(id);
    Ok(())
}

/// Append every project of the named repository that is buildable from
/// source (has a local source root), skipping those already queued.
pub fn select_repository(registry: &Registry, queue: &mut BuildQueue, name: &str) -> Result<()> {
    debug!("select repository: {}", name);

    let repo = registry
        .repository_by_name(name)
        .ok_or_else(|| Error::UnknownRepository {
            name: name.to_string(),
        })?;
    for id in registry.repository(repo).project_ids() {
        if registry.project(*id).source_root().is_some() {
            queue.append(*id);
        }
    }
    Ok(())
}

/// Append every provider of `spec` not already present in the queue
/// snapshot taken before any append, deduplicated by full name.
pub fn select_providers(
    registry: &Registry,
    queue: &mut BuildQueue,
    spec: &CapabilitySpec,
    reporter: &mut Reporter,
) -> Result<()> {
    debug!("select providers: {}", spec);

    let providers = match registry.resolve_provides(spec) {
        Some(providers) => providers,
        None => return reporter.unknown_capability(spec, "selection"),
    };

    let mut known: HashSet<String> = queue
        .iter()
        .map(|id| registry.project(id).full_name().to_string())
        .collect();
    for id in providers {
        let full_name = registry.project(id).full_name();
        if known.insert(full_name.to_string()) {
            queue.append(id);
        }
    }
    Ok(())
}

/// Remove one project resolved by full or short name; already-absent
/// projects are not an error.
pub fn unselect_project(registry: &Registry, queue: &mut BuildQueue, name: &str) -> Result<()> {
    debug!("unselect project: {}", name);

    let id = registry
        .find_project(name)
        .ok_or_else(|| Error::UnknownProject {
            name: name.to_string(),
            hint: None,
        })?;
    if queue.remove(id) {
        debug!("project removed from the build queue: {}", name);
    }
    Ok(())
}

/// Remove every provider of `spec` from the queue; already-absent providers
/// are not an error.
pub fn unselect_providers(
    registry: &Registry,
    queue: &mut BuildQueue,
    spec: &CapabilitySpec,
    reporter: &mut Reporter,
) -> Result<()> {
    debug!("unselect providers: {}", spec);

    let providers = match registry.resolve_provides(spec) {
        Some(providers) => providers,
        None => return reporter.unknown_capability(spec, "selection"),
    };
    for id in providers {
        if queue.remove(id) {
            debug!(
                "project removed from the build queue: {}",
                registry.project(id).full_name()
            );
        }
    }
    Ok(())
}

/// Replace the queue with the transitive dependency closure of its current
/// contents, in dependency order. On a strict-mode failure the queue is
/// left untouched.
pub fn select_required(
    registry: &Registry,
    queue: &mut BuildQueue,
    reporter: &mut Reporter,
) -> Result<()> {
    debug!("select required, queue length: {}", queue.len());

    if queue.is_empty() {
        return Err(Error::EmptyQueue {
            operation: "select-required".to_string(),
        });
    }

    let roots: Vec<ProjectId> = queue.projects().to_vec();
    let mut seen: HashSet<String> = HashSet::new();
    let mut finalized: HashSet<String> = HashSet::new();
    let mut closure: Vec<ProjectId> = Vec::new();
    for root in roots {
        sequence::traverse(
            registry,
            root,
            &mut seen,
            &mut finalized,
            &mut closure,
            reporter,
        )?;
    }

    queue.clear();
    for id in closure {
        queue.append(id);
    }
    Ok(())
}

/// Replace the queue with the forward closure of "projects requiring
/// something the queue provides", transitively. Matching is exact spec
/// equality (name plus tag set), ordering is breadth-first by discovery.
pub fn select_affected(registry: &Registry, queue: &mut BuildQueue) -> Result<()> {
    debug!("select affected, queue length: {}", queue.len());

    if queue.is_empty() {
        return Err(Error::EmptyQueue {
            operation: "select-affected".to_string(),
        });
    }

    let mut work: std::collections::VecDeque<ProjectId> = queue.iter().collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut finalized: HashSet<String> = HashSet::new();

    queue.clear();

    while let Some(current) = work.pop_front() {
        let project = registry.project(current);
        if finalized.contains(project.full_name()) {
            continue;
        }

        let provides = project.provides();
        for (candidate_id, candidate) in registry.projects() {
            if finalized.contains(candidate.full_name()) || seen.contains(candidate.full_name()) {
                continue;
            }
            let affected = candidate
                .requires()
                .iter()
                .any(|requires| provides.iter().any(|provide| provide == requires));
            if affected {
                seen.insert(candidate.full_name().to_string());
                work.push_back(candidate_id);
            }
        }

        finalized.insert(project.full_name().to_string());
        queue.append(current);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilityKind;
    use crate::repository::Repository;
    use crate::sequence::compute_sequence;

    fn registry_with(projects: &[(&str, &str, &str)]) -> Registry {
        // (name, provides, requires)
        let mut registry = Registry::new();
        let repo = registry.add_repository(Repository::new("r", None));
        for (name, provides, requires) in projects {
            let mut project = registry.new_project(repo, name);
            project.extend_list(CapabilityKind::Provides, provides);
            project.extend_list(CapabilityKind::Requires, requires);
            registry.register_project(project);
        }
        registry
    }

    fn queued_names(registry: &Registry, queue: &BuildQueue) -> Vec<String> {
        queue
            .iter()
            .map(|id| registry.project(id).full_name().to_string())
            .collect()
    }

    #[test]
    fn test_queue_rejects_duplicates_and_keeps_order() {
        let registry = registry_with(&[("a", "", ""), ("b", "", "")]);
        let a = registry.find_project("a").unwrap();
        let b = registry.find_project("b").unwrap();

        let mut queue = BuildQueue::new();
        assert!(queue.append(b));
        assert!(queue.append(a));
        assert!(!queue.append(b));
        assert_eq!(queue.projects(), &[b, a]);

        assert!(queue.remove(b));
        assert!(!queue.remove(b));
        assert_eq!(queue.projects(), &[a]);
    }

    #[test]
    fn test_select_all_follows_sequence_order() {
        let mut registry = registry_with(&[("a", "", "b"), ("b", "", "")]);
        let mut reporter = Reporter::new(false);
        compute_sequence(&mut registry, None, &mut reporter).unwrap();

        let mut queue = BuildQueue::new();
        select_all(&registry, &mut queue).unwrap();
        assert_eq!(queued_names(&registry, &queue), &["r/b", "r/a"]);

        // Idempotent: nothing is queued twice.
        select_all(&registry, &mut queue).unwrap();
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_select_all_without_sequence_is_a_state_error() {
        let registry = registry_with(&[("a", "", "")]);
        let mut queue = BuildQueue::new();

        let result = select_all(&registry, &mut queue);
        assert!(matches!(result, Err(Error::State { .. })));
    }

    #[test]
    fn test_select_all_on_empty_registry_is_fine() {
        let registry = Registry::new();
        let mut queue = BuildQueue::new();

        select_all(&registry, &mut queue).unwrap();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_select_project_by_short_and_full_name() {
        let registry = registry_with(&[("a", "", "")]);
        let mut queue = BuildQueue::new();

        select_project(&registry, &mut queue, "a").unwrap();
        select_project(&registry, &mut queue, "r/a").unwrap();
        assert_eq!(queue.len(), 1);

        let result = select_project(&registry, &mut queue, "nope");
        assert!(matches!(result, Err(Error::UnknownProject { .. })));
    }

    #[test]
    fn test_select_repository_takes_source_projects_only() {
        let mut registry = Registry::new();
        let repo = registry.add_repository(Repository::new("r", None));
        let mut a = registry.new_project(repo, "a");
        a.set_source_root(std::path::PathBuf::from("/tmp/src/r/a"));
        registry.register_project(a);
        let b = registry.new_project(repo, "b");
        registry.register_project(b);

        let mut queue = BuildQueue::new();
        select_repository(&registry, &mut queue, "r").unwrap();
        assert_eq!(queued_names(&registry, &queue), &["r/a"]);

        let result = select_repository(&registry, &mut queue, "missing");
        assert!(matches!(result, Err(Error::UnknownRepository { .. })));
    }

    #[test]
    fn test_select_providers_skips_already_queued() {
        let registry = registry_with(&[("a", "svc", ""), ("b", "svc", "")]);
        let a = registry.find_project("a").unwrap();
        let b = registry.find_project("b").unwrap();

        let mut queue = BuildQueue::new();
        queue.append(a);
        let mut reporter = Reporter::new(false);
        select_providers(&registry, &mut queue, &CapabilitySpec::parse("svc"), &mut reporter)
            .unwrap();
        assert_eq!(queue.projects(), &[a, b]);
    }

    #[test]
    fn test_select_providers_unknown_strict_and_lenient() {
        let registry = registry_with(&[("a", "", "")]);
        let mut queue = BuildQueue::new();
        let spec = CapabilitySpec::parse("missing");

        let mut strict = Reporter::new(false);
        let result = select_providers(&registry, &mut queue, &spec, &mut strict);
        assert!(matches!(result, Err(Error::UnknownCapability { .. })));

        let mut lenient = Reporter::new(true);
        select_providers(&registry, &mut queue, &spec, &mut lenient).unwrap();
        assert!(queue.is_empty());
        assert!(lenient.has_errors());
    }

    #[test]
    fn test_unselect_project_is_noop_when_absent() {
        let registry = registry_with(&[("a", "", ""), ("b", "", "")]);
        let a = registry.find_project("a").unwrap();

        let mut queue = BuildQueue::new();
        queue.append(a);
        unselect_project(&registry, &mut queue, "b").unwrap();
        assert_eq!(queue.projects(), &[a]);

        unselect_project(&registry, &mut queue, "a").unwrap();
        assert!(queue.is_empty());

        let result = unselect_project(&registry, &mut queue, "nope");
        assert!(matches!(result, Err(Error::UnknownProject { .. })));
    }

    #[test]
    fn test_unselect_providers_removes_matches_only() {
        let registry = registry_with(&[("a", "svc", ""), ("b", "svc", ""), ("c", "other", "")]);
        let a = registry.find_project("a").unwrap();
        let b = registry.find_project("b").unwrap();
        let c = registry.find_project("c").unwrap();

        let mut queue = BuildQueue::new();
        queue.append(a);
        queue.append(b);
        queue.append(c);
        let mut reporter = Reporter::new(false);
        unselect_providers(&registry, &mut queue, &CapabilitySpec::parse("svc"), &mut reporter)
            .unwrap();
        assert_eq!(queue.projects(), &[c]);
    }

    #[test]
    fn test_select_required_replaces_with_dependency_closure() {
        let registry = registry_with(&[("app", "", "lib"), ("lib", "lib", "base"), ("base", "base", "")]);
        let app = registry.find_project("app").unwrap();

        let mut queue = BuildQueue::new();
        queue.append(app);
        let mut reporter = Reporter::new(false);
        select_required(&registry, &mut queue, &mut reporter).unwrap();
        assert_eq!(queued_names(&registry, &queue), &["r/base", "r/lib", "r/app"]);
    }

    #[test]
    fn test_select_required_is_idempotent() {
        let registry = registry_with(&[("app", "", "lib"), ("lib", "lib", "")]);
        let app = registry.find_project("app").unwrap();

        let mut queue = BuildQueue::new();
        queue.append(app);
        let mut reporter = Reporter::new(false);
        select_required(&registry, &mut queue, &mut reporter).unwrap();
        let first = queued_names(&registry, &queue);
        select_required(&registry, &mut queue, &mut reporter).unwrap();
        assert_eq!(queued_names(&registry, &queue), first);
    }

    #[test]
    fn test_select_required_empty_queue_fails() {
        let registry = registry_with(&[("a", "", "")]);
        let mut queue = BuildQueue::new();
        let mut reporter = Reporter::new(false);

        let result = select_required(&registry, &mut queue, &mut reporter);
        assert!(matches!(result, Err(Error::EmptyQueue { .. })));
    }

    #[test]
    fn test_select_affected_follows_forward_closure() {
        // consumer requires what root provides, indirect requires what
        // consumer provides; unrelated stays out.
        let registry = registry_with(&[
            ("root", "core", ""),
            ("consumer", "middle", "core"),
            ("indirect", "", "middle"),
            ("unrelated", "", "elsewhere"),
            ("elsewhere", "elsewhere", ""),
        ]);
        let root = registry.find_project("root").unwrap();

        let mut queue = BuildQueue::new();
        queue.append(root);
        select_affected(&registry, &mut queue).unwrap();
        assert_eq!(
            queued_names(&registry, &queue),
            &["r/root", "r/consumer", "r/indirect"]
        );
    }

    #[test]
    fn test_select_affected_matches_exact_specs_only() {
        // "b:variant" requires tagged core, root provides untagged core.
        let registry = registry_with(&[
            ("root", "core", ""),
            ("plain", "", "core"),
            ("tagged", "", "core:variant"),
        ]);
        let root = registry.find_project("root").unwrap();

        let mut queue = BuildQueue::new();
        queue.append(root);
        select_affected(&registry, &mut queue).unwrap();
        assert_eq!(queued_names(&registry, &queue), &["r/root", "r/plain"]);
    }

    #[test]
    fn test_select_affected_empty_queue_fails() {
        let registry = registry_with(&[("a", "", "")]);
        let mut queue = BuildQueue::new();

        let result = select_affected(&registry, &mut queue);
        assert!(matches!(result, Err(Error::EmptyQueue { .. })));
    }

    #[test]
    fn test_select_affected_keeps_queued_members_first() {
        let registry = registry_with(&[
            ("x", "x.api", ""),
            ("y", "y.api", ""),
            ("uses.x", "", "x.api"),
            ("uses.y", "", "y.api"),
        ]);
        let x = registry.find_project("x").unwrap();
        let y = registry.find_project("y").unwrap();

        let mut queue = BuildQueue::new();
        queue.append(x);
        queue.append(y);
        select_affected(&registry, &mut queue).unwrap();
        assert_eq!(
            queued_names(&registry, &queue),
            &["r/x", "r/y", "r/uses.x", "r/uses.y"]
        );
    }
}
