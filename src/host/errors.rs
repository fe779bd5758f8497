//! Host error types.
//!
//! Every variant names the operation that failed so the message reaching the
//! UI identifies both the operation and the underlying cause.

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::channel::Operation;

/// Errors raised while fulfilling a bridge request.
#[derive(Debug, Error)]
pub enum HostError {
    /// The native file dialog could not be shown.
    #[error("{operation} failed: {reason}")]
    Dialog {
        operation: Operation,
        reason: String,
    },

    /// A filesystem read, write, copy or mkdir failed.
    #[error("{operation} failed for '{path}': {reason}")]
    Io {
        operation: Operation,
        path: String,
        kind: io::ErrorKind,
        reason: String,
    },

    /// The request arguments were rejected before touching the disk.
    #[error("{operation} rejected: {reason}")]
    InvalidArgument {
        operation: Operation,
        reason: String,
    },
}

impl HostError {
    pub fn io(operation: Operation, path: &Path, err: io::Error) -> Self {
        HostError::Io {
            operation,
            path: path.display().to_string(),
            kind: err.kind(),
            reason: err.to_string(),
        }
    }

    pub fn invalid(operation: Operation, reason: impl Into<String>) -> Self {
        HostError::InvalidArgument {
            operation,
            reason: reason.into(),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            HostError::Dialog { operation, .. }
            | HostError::Io { operation, .. }
            | HostError::InvalidArgument { operation, .. } => *operation,
        }
    }

    /// Stable category name sent to the UI.
    pub fn kind(&self) -> &'static str {
        match self {
            HostError::Dialog { .. } => "dialog",
            HostError::Io { .. } => "io",
            HostError::InvalidArgument { .. } => "invalidArgument",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_message_names_operation_and_cause() {
        let err = HostError::io(
            Operation::SaveJsonFile,
            Path::new("/data/jsonFiles/inventory.json"),
            io::Error::new(io::ErrorKind::PermissionDenied, "access denied"),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("saveJsonFile failed"));
        assert!(msg.contains("/data/jsonFiles/inventory.json"));
        assert!(msg.contains("access denied"));
        assert_eq!(err.kind(), "io");
        assert_eq!(err.operation(), Operation::SaveJsonFile);
    }

    #[test]
    fn test_invalid_argument_message() {
        let err = HostError::invalid(Operation::LoadJsonFile, "filename is empty");
        assert_eq!(err.to_string(), "loadJsonFile rejected: filename is empty");
        assert_eq!(err.kind(), "invalidArgument");
    }
}
