//! Native file dialogs.
//!
//! The option and outcome types keep the shape the frontend already speaks
//! (`filters`, `properties`, `canceled`, `filePaths`). A cancelled picker is a
//! normal outcome with `canceled: true`, distinct from an empty selection.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tauri::{AppHandle, Runtime};
use tauri_plugin_dialog::{DialogExt, FileDialogBuilder};

// ─── Options ────────────────────────────────────────────────────────────────

/// A named extension filter, e.g. `{ name: "Excel", extensions: ["xlsx"] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

/// Behaviour flags for the open dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OpenDialogProperty {
    OpenFile,
    OpenDirectory,
    MultiSelections,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenDialogOptions {
    #[serde(default)]
    pub title: Option<String>,
    /// Starting directory.
    #[serde(default)]
    pub default_path: Option<String>,
    #[serde(default)]
    pub filters: Vec<FileFilter>,
    #[serde(default)]
    pub properties: Vec<OpenDialogProperty>,
}

impl OpenDialogOptions {
    pub fn allows_multiple(&self) -> bool {
        self.properties.contains(&OpenDialogProperty::MultiSelections)
    }

    pub fn picks_directory(&self) -> bool {
        self.properties.contains(&OpenDialogProperty::OpenDirectory)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDialogOptions {
    #[serde(default)]
    pub title: Option<String>,
    /// Starting directory, or a full suggested path including file name.
    #[serde(default)]
    pub default_path: Option<String>,
    #[serde(default)]
    pub filters: Vec<FileFilter>,
}

// ─── Outcomes ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenDialogOutcome {
    pub canceled: bool,
    pub file_paths: Vec<String>,
}

impl OpenDialogOutcome {
    pub fn canceled() -> Self {
        Self {
            canceled: true,
            file_paths: Vec::new(),
        }
    }

    pub fn selected(file_paths: Vec<String>) -> Self {
        Self {
            canceled: false,
            file_paths,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDialogOutcome {
    pub canceled: bool,
    pub file_path: Option<String>,
}

impl SaveDialogOutcome {
    pub fn canceled() -> Self {
        Self {
            canceled: true,
            file_path: None,
        }
    }

    pub fn chosen(file_path: String) -> Self {
        Self {
            canceled: false,
            file_path: Some(file_path),
        }
    }
}

// ─── Dialog Provider ────────────────────────────────────────────────────────

/// Blocking access to the platform's file pickers.
///
/// Calls block until the user answers; the host runs them on the blocking
/// thread pool. An `Err` is a failure to show the dialog, never a cancel.
pub trait NativeDialogs: Send + Sync {
    fn show_open(&self, options: &OpenDialogOptions) -> Result<OpenDialogOutcome, String>;
    fn show_save(&self, options: &SaveDialogOptions) -> Result<SaveDialogOutcome, String>;
}

/// Dialogs backed by `tauri-plugin-dialog`.
pub struct TauriDialogs<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> TauriDialogs<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }

    fn builder(&self, title: Option<&str>, filters: &[FileFilter]) -> FileDialogBuilder<R> {
        let mut builder = self.app.dialog().file();
        if let Some(title) = title {
            builder = builder.set_title(title);
        }
        for filter in filters {
            let extensions: Vec<&str> = filter.extensions.iter().map(String::as_str).collect();
            builder = builder.add_filter(&filter.name, &extensions);
        }
        builder
    }
}

impl<R: Runtime> NativeDialogs for TauriDialogs<R> {
    fn show_open(&self, options: &OpenDialogOptions) -> Result<OpenDialogOutcome, String> {
        let mut builder = self.builder(options.title.as_deref(), &options.filters);
        if let Some(dir) = &options.default_path {
            builder = builder.set_directory(dir);
        }

        let picked = if options.picks_directory() {
            builder.blocking_pick_folder().map(|p| vec![p])
        } else if options.allows_multiple() {
            builder.blocking_pick_files()
        } else {
            builder.blocking_pick_file().map(|p| vec![p])
        };

        Ok(match picked {
            Some(paths) => {
                OpenDialogOutcome::selected(paths.into_iter().map(|p| p.to_string()).collect())
            }
            None => OpenDialogOutcome::canceled(),
        })
    }

    fn show_save(&self, options: &SaveDialogOptions) -> Result<SaveDialogOutcome, String> {
        let mut builder = self.builder(options.title.as_deref(), &options.filters);
        if let Some(default_path) = &options.default_path {
            let path = Path::new(default_path);
            if path.is_dir() {
                builder = builder.set_directory(path);
            } else {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    builder = builder.set_directory(parent);
                }
                if let Some(name) = path.file_name() {
                    builder = builder.set_file_name(name.to_string_lossy());
                }
            }
        }

        Ok(match builder.blocking_save_file() {
            Some(path) => SaveDialogOutcome::chosen(path.to_string()),
            None => SaveDialogOutcome::canceled(),
        })
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
