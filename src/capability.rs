//! # Capability Model
//!
//! A capability is a named, optionally tagged property a project can declare,
//! provide, require, or be keyworded with. The text form is owned by this
//! module and round-trips through every manifest and index file:
//!
//! ```text
//! ae3.base
//! ae3.base:recommended
//! build.java-jar:minimal|full
//! ```
//!
//! ## Key Components
//!
//! - **`CapabilitySpec`**: one parsed capability: a trimmed name plus an
//!   ordered, de-duplicated tag set. Equality compares the name and the full
//!   tag set (tag order does not matter); display order elsewhere in the
//!   application is by name only.
//! - **`CapabilityList`**: an ordered collection unique by name. Adding a
//!   spec whose name is already present merges the new tags into the existing
//!   entry instead of inserting a duplicate.

use std::fmt;

use serde::{Serialize, Serializer};

/// The five capability lists a project carries. The first four feed reverse
/// indices; `Requires` is only ever walked, never indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    Declares,
    Keywords,
    Provides,
    Requires,
    Augments,
}

impl CapabilityKind {
    /// The kinds that populate reverse indices, in registration order.
    pub const INDEXED: [CapabilityKind; 4] = [
        CapabilityKind::Declares,
        CapabilityKind::Keywords,
        CapabilityKind::Provides,
        CapabilityKind::Augments,
    ];

    /// Key under which the list appears in `project.inf`.
    pub fn manifest_key(self) -> &'static str {
        match self {
            CapabilityKind::Declares => "Declares",
            CapabilityKind::Keywords => "Keywords",
            CapabilityKind::Provides => "Provides",
            CapabilityKind::Requires => "Requires",
            CapabilityKind::Augments => "Augments",
        }
    }

    /// Key prefix under which the list appears in `*.env.inf` index files,
    /// completed with the project full name.
    pub fn env_prefix(self) -> &'static str {
        match self {
            CapabilityKind::Declares => "PRJ-DCL-",
            CapabilityKind::Keywords => "PRJ-KWD-",
            CapabilityKind::Provides => "PRJ-PRV-",
            CapabilityKind::Requires => "PRJ-REQ-",
            CapabilityKind::Augments => "PRJ-AUG-",
        }
    }
}

/// A single named capability with an optional set of tags.
///
/// Parsed from `name` or `name:tag1|tag2`; the split happens at the first
/// `:`. Tags are trimmed, empty segments are dropped, and duplicates keep
/// their first-seen position.
#[derive(Debug, Clone)]
pub struct CapabilitySpec {
    name: String,
    tags: Vec<String>,
}

impl CapabilitySpec {
    /// Parse a spec from its text form. Never fails; an input without `:`
    /// yields an empty tag set.
    pub fn parse(spec: &str) -> CapabilitySpec {
        match spec.find(':') {
            None => CapabilitySpec {
                name: spec.trim().to_string(),
                tags: Vec::new(),
            },
            Some(pos) => {
                let mut item = CapabilitySpec {
                    name: spec[..pos].trim().to_string(),
                    tags: Vec::new(),
                };
                for tag in spec[pos + 1..].split('|') {
                    item.add_tag(tag);
                }
                item
            }
        }
    }

    /// Build a spec from parts, applying the same trim/de-dup rules as
    /// [`CapabilitySpec::parse`].
    pub fn new(name: &str, tags: &[&str]) -> CapabilitySpec {
        let mut item = CapabilitySpec {
            name: name.trim().to_string(),
            tags: Vec::new(),
        };
        for tag in tags {
            item.add_tag(tag);
        }
        item
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.has_tag(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Append one line per tag (`prefix` + `name:tag`), or a single
    /// `prefix` + `name` line when the capability has no tags. This is the
    /// expansion used by capability listings and the index writer.
    pub fn fill_list(&self, prefix: Option<&str>, target: &mut Vec<String>) {
        let prefix = prefix.unwrap_or("");
        if self.tags.is_empty() {
            target.push(format!("{}{}", prefix, self.name));
            return;
        }
        for tag in &self.tags {
            target.push(format!("{}{}:{}", prefix, self.name, tag));
        }
    }
}

impl fmt::Display for CapabilitySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tags.is_empty() {
            return write!(f, "{}", self.name);
        }
        write!(f, "{}:{}", self.name, self.tags.join("|"))
    }
}

impl PartialEq for CapabilitySpec {
    /// Name plus full tag set; tag order is irrelevant. Both sides are
    /// de-duplicated, so equal lengths plus containment is set equality.
    fn eq(&self, other: &CapabilitySpec) -> bool {
        self.name == other.name
            && self.tags.len() == other.tags.len()
            && self.tags.iter().all(|t| other.has_tag(t))
    }
}

impl Eq for CapabilitySpec {}

impl Serialize for CapabilitySpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An ordered sequence of [`CapabilitySpec`]s unique by name.
///
/// Insertion order is preserved for first-seen names; re-adding a name merges
/// tags into the existing entry.
#[derive(Debug, Clone, Default)]
pub struct CapabilityList {
    items: Vec<CapabilitySpec>,
}

impl CapabilityList {
    pub fn new() -> CapabilityList {
        CapabilityList { items: Vec::new() }
    }

    /// Add a spec, merging tags when the name is already present. Returns
    /// whether the list changed (a new entry or at least one new tag).
    pub fn add(&mut self, spec: CapabilitySpec) -> bool {
        for existing in &mut self.items {
            if existing.name == spec.name {
                let mut changed = false;
                for tag in &spec.tags {
                    changed |= existing.add_tag(tag);
                }
                return changed;
            }
        }
        self.items.push(spec);
        true
    }

    /// Parse and add every whitespace-separated spec in `source`; empty
    /// tokens are skipped. This is the form capability lists take in
    /// manifest and index values.
    pub fn extend_parsed(&mut self, source: &str) {
        for token in source.split_whitespace() {
            let token = token.trim();
            if !token.is_empty() {
                self.add(CapabilitySpec::parse(token));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&CapabilitySpec> {
        self.items.iter().find(|item| item.name() == name)
    }

    /// Exact-spec membership (name plus full tag set), the matching rule of
    /// the affected-by closure.
    pub fn contains(&self, spec: &CapabilitySpec) -> bool {
        self.items.iter().any(|item| item == spec)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CapabilitySpec> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Expansion over all entries, one line per name/tag pair; see
    /// [`CapabilitySpec::fill_list`].
    pub fn fill_list(&self, prefix: Option<&str>, target: &mut Vec<String>) {
        for item in &self.items {
            item.fill_list(prefix, target);
        }
    }
}

impl fmt::Display for CapabilityList {
    /// Space-separated expansion (`name:tag` per tag). Re-parsing the result
    /// merges the per-tag entries back into the original list.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::new();
        self.fill_list(None, &mut lines);
        write!(f, "{}", lines.join(" "))
    }
}

impl<'a> IntoIterator for &'a CapabilityList {
    type Item = &'a CapabilitySpec;
    type IntoIter = std::slice::Iter<'a, CapabilitySpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
