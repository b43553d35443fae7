//! # Distro Build Library
//!
//! This library provides the core functionality for cataloging a distribution
//! of projects and orchestrating their builds. It is designed to be used by
//! the `distro-build` command-line tool but can also be integrated into other
//! applications that need to reason about project capabilities and build
//! order.
//!
//! ## Quick Example
//!
//! ```
//! use distro_build::capability::CapabilityKind;
//! use distro_build::registry::Registry;
//! use distro_build::report::Reporter;
//! use distro_build::repository::Repository;
//! use distro_build::sequence;
//!
//! let mut registry = Registry::new();
//! let repo = registry.add_repository(Repository::new("myx", None));
//!
//! let base = registry.new_project(repo, "base");
//! registry.register_project(base);
//!
//! let mut app = registry.new_project(repo, "app");
//! app.extend_list(CapabilityKind::Requires, "myx/base");
//! registry.register_project(app);
//!
//! // Order the whole catalog so that providers build before consumers.
//! let mut reporter = Reporter::new(false);
//! sequence::compute_sequence(&mut registry, None, &mut reporter).unwrap();
//!
//! let names: Vec<&str> = registry
//!     .sequence()
//!     .iter()
//!     .map(|id| registry.project(*id).full_name())
//!     .collect();
//! assert_eq!(names, ["myx/base", "myx/app"]);
//! ```
//!
//! ## Core Concepts
//!
//! The library is built around a few key concepts:
//!
//! - **Capabilities (`capability`)**: Named, optionally tagged markers that
//!   projects declare, provide, require, and augment. All relationships
//!   between projects are expressed through them.
//! - **Registry (`registry`, `repository`, `project`)**: The in-memory
//!   catalog of repositories and projects, with reverse indices that resolve
//!   a capability to its providers.
//! - **Manifests (`manifest`, `loader`)**: The `.inf` key/value dialect and
//!   the loaders that populate a registry from a source tree or from a
//!   previously written index.
//! - **Sequencing (`sequence`, `selection`, `classpath`)**: Dependency
//!   ordering over the whole catalog or a selected subset, and classpath
//!   assembly along the requirement closure.
//! - **Distribution (`index`, `fsync`)**: Writing the compact index of a
//!   catalog and synchronizing built artifacts into a distribution tree.
//!
//! ## Execution Flow
//!
//! The command-line tool drives the library in a fixed order:
//!
//! 1.  **Loading**: Populate a [`registry::Registry`] from a source tree or
//!     an index (`loader`).
//! 2.  **Sequencing**: Compute the build sequence for the catalog
//!     (`sequence`), optionally narrowed to a selection (`selection`).
//! 3.  **Assembly**: Derive per-project classpaths (`classpath`) and write
//!     the distribution index (`index`).
//! 4.  **Synchronization**: Mirror built artifacts into the distribution
//!     tree (`fsync`).
//!
//! Problems found along the way are collected by a [`report::Reporter`],
//! which either fails fast or records and continues, depending on the
//! configured policy.

pub mod capability;
pub mod classpath;
pub mod defaults;
pub mod error;
pub mod fsync;
pub mod index;
pub mod loader;
pub mod manifest;
pub mod output;
pub mod project;
pub mod registry;
pub mod report;
pub mod repository;
pub mod selection;
pub mod sequence;
pub mod suggestions;

#[cfg(test)]
mod capability_proptest;
