//! Tauri IPC commands for the bridge allowlist.
//!
//! The webview reaches the host only through these seven commands; each one
//! forwards to the `Bridge` in managed state and returns its result or a
//! serialized `BridgeError`.

use tauri::State;

use crate::channel::{Bridge, BridgeError};
use crate::host::dialog::{
    OpenDialogOptions, OpenDialogOutcome, SaveDialogOptions, SaveDialogOutcome,
};

#[tauri::command]
pub async fn show_open_dialog(
    options: OpenDialogOptions,
    bridge: State<'_, Bridge>,
) -> Result<OpenDialogOutcome, BridgeError> {
    bridge.show_open_dialog(options).await
}

#[tauri::command]
pub async fn show_save_dialog(
    options: SaveDialogOptions,
    bridge: State<'_, Bridge>,
) -> Result<SaveDialogOutcome, BridgeError> {
    bridge.show_save_dialog(options).await
}

/// Read a user-chosen file's bytes.
#[tauri::command]
pub async fn read_file(
    file_path: String,
    bridge: State<'_, Bridge>,
) -> Result<Vec<u8>, BridgeError> {
    bridge.read_file(file_path).await
}

/// Import a workbook into `excelFiles/`; returns its base filename.
#[tauri::command]
pub async fn copy_file(
    original_file_path: String,
    bridge: State<'_, Bridge>,
) -> Result<String, BridgeError> {
    bridge.copy_file(original_file_path).await
}

#[tauri::command]
pub async fn save_json_file(
    data: String,
    filename: String,
    bridge: State<'_, Bridge>,
) -> Result<String, BridgeError> {
    bridge.save_json_file(data, filename).await
}

/// Resolves to `null` when the document has never been saved.
#[tauri::command]
pub async fn load_json_file(
    filename: String,
    bridge: State<'_, Bridge>,
) -> Result<Option<String>, BridgeError> {
    bridge.load_json_file(filename).await
}

#[tauri::command]
pub async fn write_file(
    file_path: String,
    data: Vec<u8>,
    bridge: State<'_, Bridge>,
) -> Result<bool, BridgeError> {
    bridge.write_file(file_path, data).await
}
