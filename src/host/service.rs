//! The privileged host: dispatches bridge requests to storage and dialogs.
//!
//! `Host::serve` drains the command channel and runs each request on its own
//! task, so a slow dialog never holds up a save. Nothing is shared between
//! requests except the directory tree (guarded per path by the store).

use std::sync::Arc;

use tokio::sync::mpsc;

use super::dialog::NativeDialogs;
use super::errors::HostError;
use super::paths::DataDirs;
use super::store::DocumentStore;
use crate::channel::{Envelope, Operation, Reply, Request};

pub struct Host {
    store: DocumentStore,
    dialogs: Arc<dyn NativeDialogs>,
}

impl Host {
    /// Build a host over `dirs`. The data root is fixed for the host's lifetime.
    pub fn new(dirs: DataDirs, dialogs: Arc<dyn NativeDialogs>) -> Self {
        Self {
            store: DocumentStore::new(dirs),
            dialogs,
        }
    }

    pub fn dirs(&self) -> &DataDirs {
        self.store.dirs()
    }

    /// Fulfil one request.
    pub async fn handle(&self, request: Request) -> Result<Reply, HostError> {
        match request {
            Request::ShowOpenDialog(options) => {
                let dialogs = Arc::clone(&self.dialogs);
                let outcome = run_dialog(Operation::ShowOpenDialog, move || {
                    dialogs.show_open(&options)
                })
                .await?;
                Ok(Reply::OpenDialog(outcome))
            }
            Request::ShowSaveDialog(options) => {
                let dialogs = Arc::clone(&self.dialogs);
                let outcome = run_dialog(Operation::ShowSaveDialog, move || {
                    dialogs.show_save(&options)
                })
                .await?;
                Ok(Reply::SaveDialog(outcome))
            }
            Request::ReadFile { path } => self.store.read_file(&path).await.map(Reply::Bytes),
            Request::CopyFile { source } => self
                .store
                .import_workbook(&source)
                .await
                .map(Reply::FileName),
            Request::SaveJsonFile { data, filename } => {
                let path = self.store.save_json(&data, &filename).await?;
                Ok(Reply::SavedPath(path.to_string_lossy().into_owned()))
            }
            Request::LoadJsonFile { filename } => {
                self.store.load_json(&filename).await.map(Reply::Document)
            }
            Request::WriteFile { path, data } => {
                self.store.write_file(&path, &data).await?;
                Ok(Reply::Written(true))
            }
        }
    }

    /// Serve requests until every bridge handle has been dropped.
    pub async fn serve(self: Arc<Self>, mut rx: mpsc::Receiver<Envelope>) {
        tracing::info!(data_dir = %self.dirs().root().display(), "host serving bridge requests");

        while let Some(envelope) = rx.recv().await {
            let host = Arc::clone(&self);
            tokio::spawn(async move {
                let Envelope { id, request, reply } = envelope;
                let operation = request.operation();
                let result = host.handle(request).await;

                match &result {
                    Ok(_) => tracing::info!(request_id = %id, operation = %operation, "request completed"),
                    Err(e) => tracing::error!(
                        request_id = %id,
                        operation = %operation,
                        error = %e,
                        "request failed"
                    ),
                }

                if reply.send(result).is_err() {
                    tracing::debug!(request_id = %id, operation = %operation, "caller went away before reply");
                }
            });
        }

        tracing::info!("command channel closed, host stopping");
    }
}

/// Run a blocking dialog call off the async workers.
///
/// A panicking call becomes a `Dialog` error only where panics unwind; the
/// release profile aborts on panic.
async fn run_dialog<T, F>(operation: Operation, call: F) -> Result<T, HostError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, String> + Send + 'static,
{
    match tokio::task::spawn_blocking(call).await {
        Ok(Ok(outcome)) => Ok(outcome),
        Ok(Err(reason)) => Err(HostError::Dialog { operation, reason }),
        Err(e) => Err(HostError::Dialog {
            operation,
            reason: format!("dialog task aborted: {e}"),
        }),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
