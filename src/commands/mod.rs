//! Tauri IPC commands exposed to the webview.
//!
//! Each command is callable via `invoke("command_name", { args })` from the
//! frontend. Only the bridge allowlist lives here; `build.rs` and
//! `capabilities/default.json` grant exactly these to the main window.

pub mod bridge;
