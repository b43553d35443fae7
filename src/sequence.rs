//! # Build-Sequence Computation
//!
//! Orders projects dependency-first: a project enters the sequence only
//! after every provider of its requirements has entered it. The traversal
//! is a worklist that pushes newly discovered providers to the *front* and
//! restarts, so each provider is fully sequenced before the consumer that
//! pulled it in.
//!
//! Requirement cycles are tolerated, not detected: a cycle member gets
//! sequenced before its partner once that partner is already on the
//! worklist. The traversal terminates because a project is enqueued at
//! most once.

use std::collections::{HashSet, VecDeque};

use log::debug;

use crate::error::Result;
use crate::project::ProjectId;
use crate::registry::Registry;
use crate::report::Reporter;

/// Compute the build sequence rooted at `roots` (every registered project,
/// in registration order, when `None`) and store it as the registry's
/// current sequence, replacing any prior result.
///
/// One `seen` set and one `finalized` set are shared across all roots, so
/// a project reached from several roots is sequenced exactly once.
pub fn compute_sequence(
    registry: &mut Registry,
    roots: Option<&[ProjectId]>,
    reporter: &mut Reporter,
) -> Result<()> {
    let roots: Vec<ProjectId> = match roots {
        Some(roots) => roots.to_vec(),
        None => registry.projects().map(|(id, _)| id).collect(),
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut finalized: HashSet<String> = HashSet::new();
    let mut sequence: Vec<ProjectId> = Vec::new();

    for root in roots {
        traverse(
            registry,
            root,
            &mut seen,
            &mut finalized,
            &mut sequence,
            reporter,
        )?;
    }

    registry.set_sequence(sequence);
    Ok(())
}

/// The dependency-first sequence of a single project, computed with fresh
/// traversal state and without touching the registry's stored sequence.
/// The index writer emits one of these per project.
pub fn project_sequence(
    registry: &Registry,
    root: ProjectId,
    reporter: &mut Reporter,
) -> Result<Vec<ProjectId>> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut finalized: HashSet<String> = HashSet::new();
    let mut sequence: Vec<ProjectId> = Vec::new();
    traverse(
        registry,
        root,
        &mut seen,
        &mut finalized,
        &mut sequence,
        reporter,
    )?;
    Ok(sequence)
}

/// One root's worth of the worklist traversal. The selection engine reuses
/// this for dependency-closure queue replacement, with its own maps.
pub(crate) fn traverse(
    registry: &Registry,
    root: ProjectId,
    seen: &mut HashSet<String>,
    finalized: &mut HashSet<String>,
    sequence: &mut Vec<ProjectId>,
    reporter: &mut Reporter,
) -> Result<()> {
    // A root that an earlier traversal already discovered is done.
    if !seen.insert(registry.project(root).full_name().to_string()) {
        return Ok(());
    }

    let mut queue: VecDeque<ProjectId> = VecDeque::new();
    queue.push_back(root);

    'queue: loop {
        let Some(&current) = queue.front() else {
            return Ok(());
        };
        let project = registry.project(current);

        if finalized.contains(project.full_name()) {
            queue.pop_front();
            continue 'queue;
        }

        // A provider that is seen but not finalized when we fall through is
        // still on the worklist behind us: a requirement cycle.
        let mut cycle_partner: Option<String> = None;

        for requires in project.requires() {
            let providers = match registry.resolve_provides(requires) {
                Some(providers) => providers,
                None => {
                    reporter.unknown_capability(requires, project.full_name())?;
                    continue;
                }
            };
            for provider_id in providers {
                let provider = registry.project(provider_id).full_name();
                if !seen.contains(provider) {
                    seen.insert(provider.to_string());
                    queue.push_front(provider_id);
                    continue 'queue;
                }
                if provider_id != current
                    && !finalized.contains(provider)
                    && cycle_partner.is_none()
                {
                    cycle_partner = Some(provider.to_string());
                }
            }
        }

        queue.pop_front();
        if finalized.insert(project.full_name().to_string()) {
            if let Some(partner) = cycle_partner {
                debug!(
                    "requirement cycle tolerated: {} sequenced before its provider {}",
                    project.full_name(),
                    partner
                );
            }
            sequence.push(current);
        }
    }
}
