//! Bridge — the caller side of the command channel.
//!
//! Each method forwards its arguments to the host as a named request and
//! awaits the matching reply. The bridge validates nothing and never touches
//! the filesystem itself.

use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use super::errors::BridgeError;
use super::types::{Envelope, Operation, Reply, Request};
use crate::host::dialog::{
    OpenDialogOptions, OpenDialogOutcome, SaveDialogOptions, SaveDialogOutcome,
};

/// Open a command channel. Hand the receiver to `Host::serve`.
pub fn channel(capacity: usize) -> (Bridge, mpsc::Receiver<Envelope>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (Bridge { tx }, rx)
}

/// Cloneable handle for issuing bridge calls.
#[derive(Debug, Clone)]
pub struct Bridge {
    tx: mpsc::Sender<Envelope>,
}

impl Bridge {
    /// Send one request and wait for its reply.
    pub async fn call(&self, request: Request) -> Result<Reply, BridgeError> {
        let operation = request.operation();
        let id = Uuid::new_v4();
        let (reply_tx, reply_rx) = oneshot::channel();

        tracing::debug!(request_id = %id, operation = %operation, "bridge request");

        self.tx
            .send(Envelope {
                id,
                request,
                reply: reply_tx,
            })
            .await
            .map_err(|_| BridgeError::transport(operation, "host channel closed"))?;

        let result = reply_rx
            .await
            .map_err(|_| BridgeError::transport(operation, "host dropped the request"))?;
        Ok(result?)
    }

    pub async fn show_open_dialog(
        &self,
        options: OpenDialogOptions,
    ) -> Result<OpenDialogOutcome, BridgeError> {
        match self.call(Request::ShowOpenDialog(options)).await? {
            Reply::OpenDialog(outcome) => Ok(outcome),
            other => Err(unexpected(Operation::ShowOpenDialog, &other)),
        }
    }

    pub async fn show_save_dialog(
        &self,
        options: SaveDialogOptions,
    ) -> Result<SaveDialogOutcome, BridgeError> {
        match self.call(Request::ShowSaveDialog(options)).await? {
            Reply::SaveDialog(outcome) => Ok(outcome),
            other => Err(unexpected(Operation::ShowSaveDialog, &other)),
        }
    }

    pub async fn read_file(&self, path: String) -> Result<Vec<u8>, BridgeError> {
        match self.call(Request::ReadFile { path }).await? {
            Reply::Bytes(bytes) => Ok(bytes),
            other => Err(unexpected(Operation::ReadFile, &other)),
        }
    }

    /// Import a workbook; returns the destination base filename.
    pub async fn copy_file(&self, source: String) -> Result<String, BridgeError> {
        match self.call(Request::CopyFile { source }).await? {
            Reply::FileName(name) => Ok(name),
            other => Err(unexpected(Operation::CopyFile, &other)),
        }
    }

    /// Save a named JSON document; returns the absolute path written to.
    pub async fn save_json_file(
        &self,
        data: String,
        filename: String,
    ) -> Result<String, BridgeError> {
        match self.call(Request::SaveJsonFile { data, filename }).await? {
            Reply::SavedPath(path) => Ok(path),
            other => Err(unexpected(Operation::SaveJsonFile, &other)),
        }
    }

    /// Load a named JSON document; `None` if it was never saved.
    pub async fn load_json_file(&self, filename: String) -> Result<Option<String>, BridgeError> {
        match self.call(Request::LoadJsonFile { filename }).await? {
            Reply::Document(doc) => Ok(doc),
            other => Err(unexpected(Operation::LoadJsonFile, &other)),
        }
    }

    pub async fn write_file(&self, path: String, data: Vec<u8>) -> Result<bool, BridgeError> {
        match self.call(Request::WriteFile { path, data }).await? {
            Reply::Written(ok) => Ok(ok),
            other => Err(unexpected(Operation::WriteFile, &other)),
        }
    }
}

fn unexpected(operation: Operation, reply: &Reply) -> BridgeError {
    BridgeError::transport(
        operation,
        format!("unexpected '{}' reply", reply.kind()),
    )
}

// ─── Tests ──────────────────────────────────────────────────────────────────
