//! Wire vocabulary of the command channel.
//!
//! A `Request` names one privileged operation and carries its arguments. The
//! host answers with a `Reply` of the matching shape, or a `HostError`. Each
//! request travels inside an `Envelope` together with a oneshot sender for
//! its answer, so a request/response pair is strictly ordered while distinct
//! requests complete independently.

use std::fmt;

use serde::Serialize;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::host::dialog::{
    OpenDialogOptions, OpenDialogOutcome, SaveDialogOptions, SaveDialogOutcome,
};
use crate::host::HostError;

// ─── Operations ─────────────────────────────────────────────────────────────

/// The fixed set of operations reachable through the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operation {
    #[serde(rename = "dialog:showOpenDialog")]
    ShowOpenDialog,
    #[serde(rename = "dialog:showSaveDialog")]
    ShowSaveDialog,
    #[serde(rename = "readFile")]
    ReadFile,
    #[serde(rename = "copyFile")]
    CopyFile,
    #[serde(rename = "saveJsonFile")]
    SaveJsonFile,
    #[serde(rename = "loadJsonFile")]
    LoadJsonFile,
    #[serde(rename = "writeFile")]
    WriteFile,
}

impl Operation {
    /// Every operation, in allowlist order.
    pub const ALL: [Operation; 7] = [
        Operation::ShowOpenDialog,
        Operation::ShowSaveDialog,
        Operation::ReadFile,
        Operation::CopyFile,
        Operation::SaveJsonFile,
        Operation::LoadJsonFile,
        Operation::WriteFile,
    ];

    /// Channel name used in logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::ShowOpenDialog => "dialog:showOpenDialog",
            Operation::ShowSaveDialog => "dialog:showSaveDialog",
            Operation::ReadFile => "readFile",
            Operation::CopyFile => "copyFile",
            Operation::SaveJsonFile => "saveJsonFile",
            Operation::LoadJsonFile => "loadJsonFile",
            Operation::WriteFile => "writeFile",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Requests / Replies ─────────────────────────────────────────────────────

/// A named request with its arguments.
#[derive(Debug, Clone)]
pub enum Request {
    ShowOpenDialog(OpenDialogOptions),
    ShowSaveDialog(SaveDialogOptions),
    ReadFile { path: String },
    CopyFile { source: String },
    SaveJsonFile { data: String, filename: String },
    LoadJsonFile { filename: String },
    WriteFile { path: String, data: Vec<u8> },
}

impl Request {
    pub fn operation(&self) -> Operation {
        match self {
            Request::ShowOpenDialog(_) => Operation::ShowOpenDialog,
            Request::ShowSaveDialog(_) => Operation::ShowSaveDialog,
            Request::ReadFile { .. } => Operation::ReadFile,
            Request::CopyFile { .. } => Operation::CopyFile,
            Request::SaveJsonFile { .. } => Operation::SaveJsonFile,
            Request::LoadJsonFile { .. } => Operation::LoadJsonFile,
            Request::WriteFile { .. } => Operation::WriteFile,
        }
    }
}

/// The host's answer to a successful request.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    OpenDialog(OpenDialogOutcome),
    SaveDialog(SaveDialogOutcome),
    /// File contents for `readFile`.
    Bytes(Vec<u8>),
    /// Destination base filename for `copyFile`.
    FileName(String),
    /// Absolute path written by `saveJsonFile`.
    SavedPath(String),
    /// Document text for `loadJsonFile`; `None` when nothing was saved yet.
    Document(Option<String>),
    /// Success indicator for `writeFile`.
    Written(bool),
}

impl Reply {
    /// Short shape name, used when a reply does not match its request.
    pub fn kind(&self) -> &'static str {
        match self {
            Reply::OpenDialog(_) => "open-dialog",
            Reply::SaveDialog(_) => "save-dialog",
            Reply::Bytes(_) => "bytes",
            Reply::FileName(_) => "file-name",
            Reply::SavedPath(_) => "saved-path",
            Reply::Document(_) => "document",
            Reply::Written(_) => "written",
        }
    }
}

// ─── Envelope ───────────────────────────────────────────────────────────────

/// A request in flight, paired with the channel its answer goes back on.
#[derive(Debug)]
pub struct Envelope {
    pub id: Uuid,
    pub request: Request,
    pub reply: oneshot::Sender<Result<Reply, HostError>>,
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names_match_channel_names() {
        let names: Vec<&str> = Operation::ALL.iter().map(|op| op.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "dialog:showOpenDialog",
                "dialog:showSaveDialog",
                "readFile",
                "copyFile",
                "saveJsonFile",
                "loadJsonFile",
                "writeFile",
            ]
        );
    }

    #[test]
    fn test_operation_serializes_as_channel_name() {
        let json = serde_json::to_string(&Operation::SaveJsonFile).unwrap();
        assert_eq!(json, "\"saveJsonFile\"");
    }

    #[test]
    fn test_request_reports_its_operation() {
        let req = Request::LoadJsonFile {
            filename: "inventory.json".into(),
        };
        assert_eq!(req.operation(), Operation::LoadJsonFile);

        let req = Request::WriteFile {
            path: "/tmp/out.xlsx".into(),
            data: vec![1, 2, 3],
        };
        assert_eq!(req.operation(), Operation::WriteFile);
    }
}
