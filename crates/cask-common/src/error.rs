//! Common error types for cask.

use miette::Diagnostic;
use thiserror::Error;

use crate::id::ContainerId;

/// Result type alias using [`CaskError`].
pub type CaskResult<T> = Result<T, CaskError>;

/// Errors surfaced by the supervisor.
///
/// None of these are fatal: the command loop reports them and keeps going.
#[derive(Error, Diagnostic, Debug)]
pub enum CaskError {
    /// The registry already holds its maximum number of containers.
    #[error("Container capacity exceeded ({capacity} containers)")]
    #[diagnostic(
        code(cask::container::capacity_exceeded),
        help("Delete an existing container before creating a new one")
    )]
    CapacityExceeded {
        /// The configured capacity.
        capacity: usize,
    },

    /// The backing process could not be created.
    #[error("Failed to spawn backing process `{program}`: {source}")]
    #[diagnostic(code(cask::process::spawn_failed))]
    SpawnFailed {
        /// The workload program that failed to start.
        program: String,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// No container with the given ID is registered.
    #[error("Container not found: {id}")]
    #[diagnostic(code(cask::container::not_found), help("Use `list` to see current IDs"))]
    NotFound {
        /// The ID that was not found.
        id: ContainerId,
    },

    /// The OS refused to deliver a signal to a backing process.
    #[error("Failed to send {signal} to process {pid}: {source}")]
    #[diagnostic(code(cask::process::signal))]
    Signal {
        /// Target process.
        pid: u32,
        /// Signal name.
        signal: &'static str,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid container ID format.
    #[error("Invalid container ID: {value}")]
    #[diagnostic(
        code(cask::container::invalid_id),
        help("Container IDs are positive integers")
    )]
    InvalidContainerId {
        /// The rejected input.
        value: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    #[diagnostic(code(cask::io))]
    Io(#[from] std::io::Error),

    /// Internal error (should not happen).
    #[error("Internal error: {message}")]
    #[diagnostic(code(cask::internal), help("This is a bug, please report it"))]
    Internal {
        /// The error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CaskError::NotFound {
            id: ContainerId::new(7),
        };
        assert_eq!(err.to_string(), "Container not found: 7");

        let err = CaskError::CapacityExceeded { capacity: 5 };
        assert_eq!(err.to_string(), "Container capacity exceeded (5 containers)");
    }

    #[test]
    fn spawn_failure_keeps_source() {
        let err = CaskError::SpawnFailed {
            program: "/nonexistent".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("/nonexistent"));
    }

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CaskError = io_err.into();
        assert!(matches!(err, CaskError::Io(_)));
    }
}
