//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `distro-build` application. It uses the `thiserror` library to create an
//! `Error` enum covering all anticipated failure modes, providing clear and
//! descriptive error messages.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors that can
//!   occur within the application. Each variant corresponds to a specific
//!   type of error and includes contextual information to aid in debugging.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the application to simplify function signatures.
//!
//! The resolution/selection variants (`UnknownCapability`, `UnknownProject`,
//! `UnknownRepository`, `EmptyQueue`, `State`) carry the engine's failure
//! semantics: `UnknownCapability` is recoverable under lenient mode (recorded
//! and skipped, see [`crate::report`]), the others are always hard failures.

use thiserror::Error;

/// Main error type for distro-build operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required capability matched no provider and no project full name.
    ///
    /// Recoverable under lenient mode: the requirement is skipped and the
    /// message is recorded into the caller's error sink instead.
    #[error("required item is unknown, name: {spec} for {project}")]
    UnknownCapability { spec: String, project: String },

    /// A project name (full or short) did not resolve to any registered
    /// project.
    #[error("Unknown project, name: {name}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    UnknownProject {
        name: String,
        /// Optional hint for how to find a valid name
        hint: Option<String>,
    },

    /// A repository name did not resolve to any registered repository.
    #[error("Unknown repository, name: {name}")]
    UnknownRepository { name: String },

    /// A closure operation was attempted on an empty build queue.
    #[error("Build queue is empty, operation: {operation}")]
    EmptyQueue { operation: String },

    /// An operation-ordering precondition was violated (caller misuse, not a
    /// data problem).
    #[error("Invalid operation state: {message}")]
    State { message: String },

    /// A `.inf` manifest could not be parsed.
    #[error("Manifest error in {path} (line {line}): {message}")]
    Manifest {
        path: String,
        line: usize,
        message: String,
    },

    /// A prebuilt index tree is structurally broken (missing or inconsistent
    /// entries).
    #[error("Index format error in {path}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    IndexFormat {
        path: String,
        message: String,
        /// Optional hint for how to repair or regenerate the index
        hint: Option<String>,
    },

    /// A storage root required by the command does not exist or is not a
    /// directory.
    #[error("Storage root error: {path}: {message}")]
    StorageRoot { path: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
