//! # Manifest Files
//!
//! The line-based `Key=value` dialect used by `repository.inf`,
//! `project.inf` and the prebuilt index files. `Key: value` is accepted on
//! input, `#` and `!` start comment lines, keys and values are trimmed, a
//! later duplicate key overwrites the earlier value. There are no escapes
//! and no continuation lines. Writers always emit `Key=value` and keep the
//! insertion order of keys.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// An ordered key/value manifest.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<(String, String)>,
}

impl Manifest {
    pub fn new() -> Manifest {
        Manifest::default()
    }

    /// Parse manifest text. `path` is only used in error messages.
    pub fn parse(source: &str, path: &str) -> Result<Manifest> {
        let mut manifest = Manifest::new();
        for (index, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let separator = line
                .find(['=', ':'])
                .ok_or_else(|| Error::Manifest {
                    path: path.to_string(),
                    line: index + 1,
                    message: format!("expected 'Key=value', got: {}", line),
                })?;
            let key = line[..separator].trim();
            let value = line[separator + 1..].trim();
            if key.is_empty() {
                return Err(Error::Manifest {
                    path: path.to_string(),
                    line: index + 1,
                    message: "empty key".to_string(),
                });
            }
            manifest.set(key, value);
        }
        Ok(manifest)
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Manifest> {
        let source = fs::read_to_string(path)?;
        Manifest::parse(&source, &path.display().to_string())
    }

    /// Serialize and write, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_string())?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// Insert or overwrite. An overwritten key keeps its original position.
    pub fn set(&mut self, key: &str, value: &str) {
        let key = key.trim();
        let value = value.trim();
        for entry in &mut self.entries {
            if entry.0 == key {
                entry.1 = value.to_string();
                return;
            }
        }
        self.entries.push((key.to_string(), value.to_string()));
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == key)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            writeln!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}
