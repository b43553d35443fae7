//! # Select Command Implementation
//!
//! This module implements the `select` subcommand, which builds a queue of
//! projects through ordered selection phases and prints the result.
//!
//! ## Functionality
//!
//! - **Selection Phases**: `--all`, `--repository`, `--project` and
//!   `--providers` append to the queue; the `--unselect-*` flags drop from
//!   it; `--required`/`--affected` replace it with a closure. Phases run in
//!   that fixed order regardless of flag position.
//! - **Capability Views**: `--requires`/`--provides` print the queue's
//!   merged requirement/provider lists instead of project names.
//!
//! The same selection flags are embedded by the `sequence` subcommand to
//! restrict the computed build sequence.

use anyhow::Result;
use clap::Args;

use distro_build::capability::{CapabilityList, CapabilitySpec};
use distro_build::error::Error;
use distro_build::registry::Registry;
use distro_build::report::Reporter;
use distro_build::selection::{self, BuildQueue};
use distro_build::sequence;
use distro_build::suggestions;

use crate::commands::{finish, CatalogOptions};

/// Selection phases, applied in a fixed order regardless of flag position.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Select every project of the catalog, in build order.
    #[arg(long)]
    pub all: bool,

    /// Select the source-buildable projects of a repository. Repeatable.
    #[arg(long, value_name = "REPOSITORY")]
    pub repository: Vec<String>,

    /// Select one project by full or short name. Repeatable.
    #[arg(long, value_name = "PROJECT")]
    pub project: Vec<String>,

    /// Select every provider of a capability. Repeatable.
    #[arg(long, value_name = "CAPABILITY")]
    pub providers: Vec<String>,

    /// Drop one project from the selection. Repeatable.
    #[arg(long, value_name = "PROJECT")]
    pub unselect_project: Vec<String>,

    /// Drop every provider of a capability from the selection. Repeatable.
    #[arg(long, value_name = "CAPABILITY")]
    pub unselect_providers: Vec<String>,

    /// Replace the selection with its dependency closure, in build order.
    #[arg(long, conflicts_with = "affected")]
    pub required: bool,

    /// Replace the selection with everything affected by it.
    #[arg(long)]
    pub affected: bool,
}

impl SelectionArgs {
    /// True when no selection phase was requested.
    pub fn is_empty(&self) -> bool {
        !self.all
            && self.repository.is_empty()
            && self.project.is_empty()
            && self.providers.is_empty()
            && self.unselect_project.is_empty()
            && self.unselect_providers.is_empty()
            && !self.required
            && !self.affected
    }

    /// Run the selection phases against the registry, in their fixed order.
    ///
    /// The registry's build sequence must already be computed when `--all`
    /// is used.
    pub fn apply(
        &self,
        registry: &Registry,
        queue: &mut BuildQueue,
        reporter: &mut Reporter,
    ) -> Result<()> {
        if self.all {
            selection::select_all(registry, queue)?;
        }
        for name in &self.repository {
            with_name_hints(registry, selection::select_repository(registry, queue, name))?;
        }
        for name in &self.project {
            with_name_hints(registry, selection::select_project(registry, queue, name))?;
        }
        for spec in &self.providers {
            selection::select_providers(registry, queue, &CapabilitySpec::parse(spec), reporter)?;
        }
        for name in &self.unselect_project {
            with_name_hints(registry, selection::unselect_project(registry, queue, name))?;
        }
        for spec in &self.unselect_providers {
            selection::unselect_providers(registry, queue, &CapabilitySpec::parse(spec), reporter)?;
        }
        if self.required {
            selection::select_required(registry, queue, reporter)?;
        }
        if self.affected {
            selection::select_affected(registry, queue)?;
        }
        Ok(())
    }
}

/// Attach did-you-mean hints to unknown-name failures of a selection phase.
fn with_name_hints(registry: &Registry, result: distro_build::error::Result<()>) -> Result<()> {
    result.map_err(|err| match err {
        Error::UnknownProject { name, .. } => {
            let known: Vec<String> = registry
                .projects()
                .map(|(_, project)| project.full_name().to_string())
                .collect();
            suggestions::unknown_project(&name, &known)
        }
        Error::UnknownRepository { name } => {
            let known: Vec<String> = registry
                .repositories()
                .map(|(_, repository)| repository.name().to_string())
                .collect();
            suggestions::unknown_repository(&name, &known)
        }
        other => other.into(),
    })
}

/// Build a selection of projects and print it
#[derive(Args, Debug)]
pub struct SelectArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Print the merged required capabilities of the selection.
    #[arg(long)]
    pub requires: bool,

    /// Print the merged provided capabilities of the selection.
    #[arg(long)]
    pub provides: bool,
}

/// Execute the `select` command.
pub fn execute(args: SelectArgs, options: &CatalogOptions) -> Result<()> {
    let (mut registry, mut reporter) = options.load()?;
    sequence::compute_sequence(&mut registry, None, &mut reporter)?;

    let mut queue = BuildQueue::new();
    args.selection.apply(&registry, &mut queue, &mut reporter)?;

    if args.requires {
        print_merged(&registry, &queue, |project| project.requires());
    }
    if args.provides {
        print_merged(&registry, &queue, |project| project.provides());
    }
    if !args.requires && !args.provides {
        for id in queue.iter() {
            println!("{}", registry.project(id).full_name());
        }
    }

    finish(&mut reporter, options)
}

/// Merge one capability list across the queue and print it expanded.
fn print_merged<'a, F>(registry: &'a Registry, queue: &BuildQueue, list: F)
where
    F: Fn(&'a distro_build::project::Project) -> &'a CapabilityList,
{
    let mut merged = CapabilityList::new();
    for id in queue.iter() {
        for spec in list(registry.project(id)).iter() {
            merged.add(spec.clone());
        }
    }
    let mut lines: Vec<String> = Vec::new();
    merged.fill_list(None, &mut lines);
    for line in lines {
        println!("{}", line);
    }
}
