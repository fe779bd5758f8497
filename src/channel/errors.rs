//! Bridge error types.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

use super::types::Operation;
use crate::host::HostError;

/// Errors returned to a bridge caller.
///
/// `Transport` means the channel itself broke and says nothing about the
/// data on disk. `Host` carries the host's own failure for the operation.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The command channel failed (host gone, reply dropped, wrong reply shape).
    #[error("{operation} failed: command channel error: {reason}")]
    Transport {
        operation: Operation,
        reason: String,
    },

    /// The host ran the operation and it failed.
    #[error(transparent)]
    Host(#[from] HostError),
}

impl BridgeError {
    pub fn transport(operation: Operation, reason: impl Into<String>) -> Self {
        BridgeError::Transport {
            operation,
            reason: reason.into(),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            BridgeError::Transport { operation, .. } => *operation,
            BridgeError::Host(e) => e.operation(),
        }
    }

    /// `transport`, or the host error's category.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::Transport { .. } => "transport",
            BridgeError::Host(e) => e.kind(),
        }
    }
}

/// Sent to the webview as `{ kind, operation, message }`.
impl Serialize for BridgeError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BridgeError", 3)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("operation", &self.operation())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}
