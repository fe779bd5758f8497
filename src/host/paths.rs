//! Data directory resolution and filename validation.
//!
//! The data root is resolved exactly once, from the run mode (or an explicit
//! override), and both `jsonFiles/` and `excelFiles/` hang off that root.
//! Save and load therefore can never disagree about where a document lives.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::HostError;
use crate::channel::Operation;

/// Application identifier, used as the per-user data folder name.
pub const APP_IDENTIFIER: &str = "com.dieor.inventoryapp";

/// Directory holding named JSON documents.
pub const JSON_DIR: &str = "jsonFiles";

/// Directory holding imported workbook copies.
pub const EXCEL_DIR: &str = "excelFiles";

/// Whether the app runs from an installed bundle or from a source checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Packaged,
    Development,
}

impl RunMode {
    /// Mode implied by the build profile.
    pub fn from_build() -> Self {
        if cfg!(debug_assertions) {
            RunMode::Development
        } else {
            RunMode::Packaged
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "packaged" | "production" => Some(RunMode::Packaged),
            "development" | "dev" => Some(RunMode::Development),
            _ => None,
        }
    }
}

/// The application-owned directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDirs {
    root: PathBuf,
}

impl DataDirs {
    /// Use `root` as the data root.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the data root for `mode`, unless `override_root` is given.
    ///
    /// - Packaged: `<os-data-dir>/com.dieor.inventoryapp/`, falling back to
    ///   `~/.dieor-inventory/`.
    /// - Development: the project directory.
    pub fn resolve(mode: RunMode, override_root: Option<&Path>) -> Self {
        if let Some(root) = override_root {
            return Self::at(root);
        }
        match mode {
            RunMode::Packaged => {
                if let Some(dir) = dirs::data_dir() {
                    return Self::at(dir.join(APP_IDENTIFIER));
                }
                Self::at(
                    dirs::home_dir()
                        .unwrap_or_else(|| PathBuf::from("."))
                        .join(".dieor-inventory"),
                )
            }
            RunMode::Development => Self::at(env!("CARGO_MANIFEST_DIR")),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn json_dir(&self) -> PathBuf {
        self.root.join(JSON_DIR)
    }

    pub fn excel_dir(&self) -> PathBuf {
        self.root.join(EXCEL_DIR)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Location of the named JSON document `filename`.
    pub fn json_path(&self, operation: Operation, filename: &str) -> Result<PathBuf, HostError> {
        let name = validate_filename(operation, filename)?;
        Ok(self.json_dir().join(name))
    }

    /// Location of the imported workbook named `filename`.
    pub fn workbook_path(
        &self,
        operation: Operation,
        filename: &str,
    ) -> Result<PathBuf, HostError> {
        let name = validate_filename(operation, filename)?;
        Ok(self.excel_dir().join(name))
    }
}

/// Accept `filename` only if it is a single, plain path component.
pub fn validate_filename(operation: Operation, filename: &str) -> Result<&str, HostError> {
    if filename.is_empty() {
        return Err(HostError::invalid(operation, "filename is empty"));
    }
    if filename == "." || filename == ".." {
        return Err(HostError::invalid(
            operation,
            format!("'{filename}' is not a file name"),
        ));
    }
    if filename.contains(['/', '\\', '\0']) {
        return Err(HostError::invalid(
            operation,
            format!("filename '{filename}' must not contain path separators"),
        ));
    }
    Ok(filename)
}

/// Require an absolute, caller-resolved path.
pub fn require_absolute(operation: Operation, path: &str) -> Result<PathBuf, HostError> {
    if path.is_empty() {
        return Err(HostError::invalid(operation, "path is empty"));
    }
    let path = PathBuf::from(path);
    if !path.is_absolute() {
        return Err(HostError::invalid(
            operation,
            format!("path '{}' is not absolute", path.display()),
        ));
    }
    Ok(path)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_and_excel_dirs_share_root() {
        let dirs = DataDirs::at("/srv/inventory");
        assert_eq!(dirs.json_dir(), PathBuf::from("/srv/inventory/jsonFiles"));
        assert_eq!(dirs.excel_dir(), PathBuf::from("/srv/inventory/excelFiles"));
    }

    #[test]
    fn test_override_wins_over_mode() {
        let custom = Path::new("/opt/custom-data");
        assert_eq!(
            DataDirs::resolve(RunMode::Packaged, Some(custom)).root(),
            custom
        );
        assert_eq!(
            DataDirs::resolve(RunMode::Development, Some(custom)).root(),
            custom
        );
    }

    #[test]
    fn test_development_root_is_project_dir() {
        let dirs = DataDirs::resolve(RunMode::Development, None);
        assert_eq!(dirs.root(), Path::new(env!("CARGO_MANIFEST_DIR")));
    }

    #[test]
    fn test_packaged_root_uses_app_identifier() {
        let resolved = DataDirs::resolve(RunMode::Packaged, None);
        if dirs::data_dir().is_some() {
            assert!(resolved.root().ends_with(APP_IDENTIFIER));
        }
    }

    #[test]
    fn test_validate_filename_accepts_plain_names() {
        for name in ["inventory.json", "Sheet 1.json", "données.json", ".hidden"] {
            assert_eq!(validate_filename(Operation::SaveJsonFile, name).unwrap(), name);
        }
    }

    #[test]
    fn test_validate_filename_rejects_traversal() {
        for name in ["", ".", "..", "../secrets", "a/b.json", "a\\b.json", "nul\0.json"] {
            let err = validate_filename(Operation::SaveJsonFile, name).unwrap_err();
            assert!(
                matches!(err, HostError::InvalidArgument { .. }),
                "expected rejection for {name:?}"
            );
        }
    }

    #[test]
    fn test_json_path_joins_validated_name() {
        let dirs = DataDirs::at("/data");
        let path = dirs
            .json_path(Operation::LoadJsonFile, "inventory.json")
            .unwrap();
        assert_eq!(path, PathBuf::from("/data/jsonFiles/inventory.json"));
        assert!(dirs.json_path(Operation::LoadJsonFile, "../x").is_err());
    }

    #[test]
    fn test_run_mode_parse() {
        assert_eq!(RunMode::parse("packaged"), Some(RunMode::Packaged));
        assert_eq!(RunMode::parse(" Development "), Some(RunMode::Development));
        assert_eq!(RunMode::parse("production"), Some(RunMode::Packaged));
        assert_eq!(RunMode::parse("staging"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_require_absolute() {
        assert!(require_absolute(Operation::WriteFile, "/tmp/out.xlsx").is_ok());
        assert!(require_absolute(Operation::WriteFile, "out.xlsx").is_err());
        assert!(require_absolute(Operation::WriteFile, "").is_err());
    }
}
