//! # Classpath Assembly
//!
//! Builds the runtime classpath of one project by walking its transitive
//! requirement graph. Providers get pushed to the *front* of the work list,
//! so a dependency's artifacts are visited immediately after the consumer
//! that pulled it in; the builder itself rejects duplicate entries, keeping
//! the first occurrence.

use std::collections::{HashSet, VecDeque};

use log::debug;

use crate::error::Result;
use crate::project::ProjectId;
use crate::registry::Registry;
use crate::report::Reporter;

/// Ordered, duplicate-rejecting collection of classpath entries.
#[derive(Debug, Default)]
pub struct ClasspathBuilder {
    entries: Vec<String>,
    known: HashSet<String>,
}

impl ClasspathBuilder {
    pub fn new() -> ClasspathBuilder {
        ClasspathBuilder::default()
    }

    /// Append an entry unless an identical string is already present.
    /// Returns whether the entry was added.
    pub fn add(&mut self, entry: String) -> bool {
        if self.known.contains(&entry) {
            return false;
        }
        self.known.insert(entry.clone());
        self.entries.push(entry);
        true
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Assemble the runtime classpath of `root`.
///
/// Unresolvable requirements follow the reporter's policy: strict mode fails
/// the whole call, lenient mode records the error and leaves a partial
/// classpath.
pub fn project_classpath(
    registry: &Registry,
    root: ProjectId,
    reporter: &mut Reporter,
) -> Result<ClasspathBuilder> {
    let mut classpath = ClasspathBuilder::new();
    fill_runtime_classpath(registry, root, &mut classpath, reporter)?;
    Ok(classpath)
}

/// Same traversal as [`project_classpath`], appending into a caller-provided
/// builder (the index writer accumulates all projects into one).
pub fn fill_runtime_classpath(
    registry: &Registry,
    root: ProjectId,
    classpath: &mut ClasspathBuilder,
    reporter: &mut Reporter,
) -> Result<()> {
    let mut known: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<ProjectId> = VecDeque::new();
    queue.push_back(root);

    while let Some(id) = queue.pop_front() {
        let current = registry.project(id);
        debug!("classpath next: {}", current.full_name());

        known.insert(current.name().to_string());
        current.fill_classpath(classpath);

        for requires in current.requires() {
            let providers = match registry.resolve_provides(requires) {
                Some(providers) => providers,
                None => {
                    reporter.unknown_capability(requires, current.full_name())?;
                    continue;
                }
            };
            for provider_id in providers {
                let provider = registry.project(provider_id);
                debug!("classpath provider: {}", provider.full_name());
                if known.insert(provider.full_name().to_string()) {
                    queue.push_front(provider_id);
                }
            }
        }
    }
    Ok(())
}
