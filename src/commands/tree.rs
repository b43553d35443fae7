//! # Tree Command Implementation
//!
//! This module implements the `tree` subcommand, which displays the
//! requirement tree of one project in a hierarchical format.
//!
//! ## Functionality
//!
//! - **Requirement Tree Visualization**: Displays the providers of every
//!   requirement, recursively
//! - **Depth Control**: Supports `--depth` flag to limit tree depth
//! - **Cycle Safety**: A project already expanded elsewhere in the tree is
//!   shown as a `(*)` leaf instead of being expanded again
//!
//! This command is a safe, read-only operation that does not modify any files.

use std::collections::HashSet;

use anyhow::Result;
use clap::Args;
use ptree::{print_tree, TreeItem};

use distro_build::project::ProjectId;
use distro_build::registry::Registry;
use distro_build::report::Reporter;

use crate::commands::{finish, resolve_project, CatalogOptions};

/// Display the requirement tree of a project
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Project whose requirement tree to display (full or short name).
    pub project: String,

    /// Maximum depth to display in the tree.
    ///
    /// If not specified, displays the full tree.
    /// Use 0 to show only the project itself, 1 to show its direct
    /// requirements, etc.
    #[arg(long, value_name = "NUM")]
    pub depth: Option<usize>,
}

/// Execute the `tree` command.
///
/// This function handles the logic for the `tree` subcommand. It loads the
/// catalog, resolves the named project, and displays the providers of its
/// requirements in a hierarchical format.
pub fn execute(args: TreeArgs, options: &CatalogOptions) -> Result<()> {
    let (registry, mut reporter) = options.load()?;
    let id = resolve_project(&registry, &args.project)?;

    println!("🌳 Requirement tree for: {}", args.project);

    let tree_root = build_tree(
        &registry,
        id,
        args.depth.unwrap_or(usize::MAX),
        &mut reporter,
    )?;
    print_tree(&tree_root).map_err(|e| anyhow::anyhow!("Failed to display tree: {}", e))?;

    finish(&mut reporter, options)
}

/// Build the requirement tree rooted at `id`.
fn build_tree(
    registry: &Registry,
    id: ProjectId,
    max_depth: usize,
    reporter: &mut Reporter,
) -> Result<TreeNode> {
    let mut expanded = HashSet::new();
    build_node(registry, id, max_depth, 0, &mut expanded, reporter)
}

/// Build one tree node: the project itself, with one child per provider of
/// each of its requirements.
fn build_node(
    registry: &Registry,
    id: ProjectId,
    max_depth: usize,
    current_depth: usize,
    expanded: &mut HashSet<ProjectId>,
    reporter: &mut Reporter,
) -> Result<TreeNode> {
    let project = registry.project(id);
    let label = project.full_name().to_string();

    if current_depth >= max_depth {
        return Ok(TreeNode {
            label,
            children: vec![],
        });
    }
    expanded.insert(id);

    let mut children = Vec::new();
    for spec in project.requires().iter() {
        match registry.resolve_provides(spec) {
            Some(providers) => {
                for provider in providers {
                    if expanded.contains(&provider) {
                        children.push(TreeNode {
                            label: format!("{} (*)", registry.project(provider).full_name()),
                            children: vec![],
                        });
                    } else {
                        children.push(build_node(
                            registry,
                            provider,
                            max_depth,
                            current_depth + 1,
                            expanded,
                            reporter,
                        )?);
                    }
                }
            }
            None => {
                reporter.unknown_capability(spec, project.full_name())?;
                children.push(TreeNode {
                    label: format!("{} (unknown)", spec),
                    children: vec![],
                });
            }
        }
    }
    Ok(TreeNode { label, children })
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: std::io::Write>(
        &self,
        f: &mut W,
        _style: &ptree::Style,
    ) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> std::borrow::Cow<'_, [Self::Child]> {
        std::borrow::Cow::Borrowed(&self.children)
    }
}
