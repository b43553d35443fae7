//! Example demonstrating how a catalog is assembled and queried in memory
//!
//! Run with: cargo run --example catalog_usage

use distro_build::capability::CapabilityKind;
use distro_build::classpath;
use distro_build::registry::Registry;
use distro_build::report::Reporter;
use distro_build::repository::Repository;
use distro_build::sequence;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // In the real application the loader fills the registry from disk
    let mut registry = Registry::new();
    let repo = registry.add_repository(Repository::new("myx", Some("git://example.org/myx")));

    let mut base = registry.new_project(repo, "base");
    base.extend_list(CapabilityKind::Provides, "util.db");
    base.add_contains("jars/db.jar");
    registry.register_project(base);

    let mut app = registry.new_project(repo, "app");
    app.extend_list(CapabilityKind::Requires, "util.db");
    app.add_contains("java.jar");
    let app = registry.register_project(app);

    // Example 1: order the catalog dependency-first
    let mut reporter = Reporter::new(false);
    sequence::compute_sequence(&mut registry, None, &mut reporter)?;
    println!("Build sequence:");
    for &id in registry.sequence() {
        println!("  - {}", registry.project(id).full_name());
    }

    // Example 2: resolve a capability to its providers
    let spec = distro_build::capability::CapabilitySpec::parse("util.db");
    if let Some(providers) = registry.resolve_provides(&spec) {
        println!("\nProviders of {}:", spec);
        for id in providers {
            println!("  - {}", registry.project(id).full_name());
        }
    }

    // Example 3: assemble a runtime classpath
    let classpath = classpath::project_classpath(&registry, app, &mut reporter)?;
    println!("\nClasspath of myx/app:");
    for entry in classpath.entries() {
        println!("  - {}", entry);
    }

    Ok(())
}
