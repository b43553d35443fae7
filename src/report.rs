//! # Error Sink
//!
//! Engine operations run in one of two failure modes: strict (an unknown
//! required capability aborts the operation) or lenient (the requirement is
//! skipped and the message is collected). [`Reporter`] carries that policy
//! plus the collected error list, which is ordered, duplicate-free, and
//! drained explicitly by the command layer, never auto-cleared.

use log::error;

use crate::capability::CapabilitySpec;
use crate::error::{Error, Result};

/// Failure policy plus the collected recoverable-error list for one run.
#[derive(Debug, Default)]
pub struct Reporter {
    lenient: bool,
    errors: Vec<String>,
}

impl Reporter {
    /// Strict mode when `lenient` is false: unknown capabilities become hard
    /// errors instead of collected messages.
    pub fn new(lenient: bool) -> Reporter {
        Reporter {
            lenient,
            errors: Vec::new(),
        }
    }

    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    /// Record a recoverable error. Duplicate messages are kept once, in
    /// first-recorded order; every message is also logged immediately.
    pub fn record(&mut self, message: String) {
        if self.errors.contains(&message) {
            return;
        }
        error!("{}", message);
        self.errors.push(message);
    }

    /// Apply the failure policy to an unresolved requirement: lenient mode
    /// records and returns `Ok` so the caller can skip the requirement;
    /// strict mode returns the error for propagation.
    pub fn unknown_capability(&mut self, spec: &CapabilitySpec, project: &str) -> Result<()> {
        let err = Error::UnknownCapability {
            spec: spec.to_string(),
            project: project.to_string(),
        };
        if self.lenient {
            self.record(err.to_string());
            return Ok(());
        }
        Err(err)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Empty the collected list and hand it to the caller.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.errors)
    }
}
