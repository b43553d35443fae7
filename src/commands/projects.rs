//! # Projects Command Implementation
//!
//! This module implements the `projects` subcommand, which lists the projects
//! of the loaded catalog in registration order.
//!
//! ## Functionality
//!
//! - **Project Listing**: Shows every project by its full name
//! - **Pattern Filtering**: `--filter` takes a glob pattern over full names
//! - **Capability Lists**: `--declares/--keywords/--provides/--requires`
//!   print the matching capability list under each project
//! - **Expanded Output**: `--separate-lines` prints one `<project> <spec>`
//!   pair per line, the shape consumed by shell scripts
//! - **Machine Output**: `--format json` emits serializable views
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use distro_build::capability::CapabilityKind;
use distro_build::project::Project;
use distro_build::suggestions;

use crate::commands::{finish, CatalogOptions, OutputFormat};

/// List the projects of the catalog
#[derive(Args, Debug)]
pub struct ProjectsArgs {
    /// Filter projects by glob pattern on the full name (e.g. "myx/*").
    #[arg(short, long, value_name = "PATTERN")]
    pub filter: Option<String>,

    /// Show the declared capabilities of each project.
    #[arg(long)]
    pub declares: bool,

    /// Show the keyword capabilities of each project.
    #[arg(long)]
    pub keywords: bool,

    /// Show the provided capabilities of each project.
    #[arg(long)]
    pub provides: bool,

    /// Show the required capabilities of each project.
    #[arg(long)]
    pub requires: bool,

    /// Print one `<project> <capability>` pair per line.
    ///
    /// Implies --provides when no list switch is given.
    #[arg(long)]
    pub separate_lines: bool,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ProjectsArgs {
    /// The capability lists enabled by the switches, in manifest order.
    fn kinds(&self) -> Vec<CapabilityKind> {
        let mut kinds = Vec::new();
        if self.declares {
            kinds.push(CapabilityKind::Declares);
        }
        if self.keywords {
            kinds.push(CapabilityKind::Keywords);
        }
        if self.provides {
            kinds.push(CapabilityKind::Provides);
        }
        if self.requires {
            kinds.push(CapabilityKind::Requires);
        }
        if kinds.is_empty() && self.separate_lines {
            kinds.push(CapabilityKind::Provides);
        }
        kinds
    }
}

/// Serializable project view for `--format json`.
#[derive(Serialize)]
struct ProjectView<'a> {
    name: &'a str,
    repository: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    declares: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    provides: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    requires: Option<Vec<String>>,
}

/// Execute the `projects` command.
pub fn execute(args: ProjectsArgs, options: &CatalogOptions) -> Result<()> {
    let (registry, mut reporter) = options.load()?;

    let pattern = match &args.filter {
        Some(filter) => Some(
            glob::Pattern::new(filter).map_err(|e| suggestions::invalid_glob(filter, &e))?,
        ),
        None => None,
    };

    let projects: Vec<&Project> = registry
        .projects()
        .map(|(_, project)| project)
        .filter(|project| match &pattern {
            Some(pattern) => pattern.matches(project.full_name()),
            None => true,
        })
        .collect();
    let kinds = args.kinds();

    match args.format {
        OutputFormat::Text => {
            for project in &projects {
                if args.separate_lines {
                    print_separate_lines(project, &kinds);
                } else {
                    print_project(project, &kinds);
                }
            }
        }
        OutputFormat::Json => {
            let view: Vec<ProjectView<'_>> = projects
                .iter()
                .map(|project| ProjectView {
                    name: project.full_name(),
                    repository: registry.repository(project.repository()).name(),
                    declares: listed(project, &kinds, CapabilityKind::Declares),
                    keywords: listed(project, &kinds, CapabilityKind::Keywords),
                    provides: listed(project, &kinds, CapabilityKind::Provides),
                    requires: listed(project, &kinds, CapabilityKind::Requires),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }

    finish(&mut reporter, options)
}

/// One project, full name first, enabled lists indented under it.
fn print_project(project: &Project, kinds: &[CapabilityKind]) {
    println!("{}", project.full_name());
    for kind in kinds {
        let list = project.list(*kind);
        if !list.is_empty() {
            println!("\t{}: {}", kind.manifest_key(), list);
        }
    }
}

/// One `<project> <spec>` pair per line, tags expanded.
fn print_separate_lines(project: &Project, kinds: &[CapabilityKind]) {
    let prefix = format!("{} ", project.full_name());
    let mut lines: Vec<String> = Vec::new();
    for kind in kinds {
        project.list(*kind).fill_list(Some(&prefix), &mut lines);
    }
    for line in lines {
        println!("{}", line);
    }
}

/// The capability list as strings when `kind` is enabled, `None` otherwise.
fn listed(project: &Project, kinds: &[CapabilityKind], kind: CapabilityKind) -> Option<Vec<String>> {
    if !kinds.contains(&kind) {
        return None;
    }
    Some(project.list(kind).iter().map(|spec| spec.to_string()).collect())
}
