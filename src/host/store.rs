//! On-disk storage for named JSON documents and imported workbooks.
//!
//! Layout under the data root:
//! - `jsonFiles/<filename>`  — UTF-8 text, one file per document
//! - `excelFiles/<filename>` — byte-for-byte copies of imported workbooks
//!
//! Operations on the same target path are serialized through `PathLocks`;
//! operations on different paths run in parallel.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as TokioMutex, OwnedMutexGuard};

use super::errors::HostError;
use super::paths::{require_absolute, DataDirs};
use crate::channel::Operation;

// ─── Path Locks ─────────────────────────────────────────────────────────────

/// Per-path async mutexes, created on first use and pruned once idle.
#[derive(Debug, Default)]
pub struct PathLocks {
    inner: Mutex<HashMap<PathBuf, Arc<TokioMutex<()>>>>,
}

impl PathLocks {
    /// Wait for exclusive access to `path`.
    pub async fn acquire(&self, path: &Path) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            // Entries only referenced by the map have no holder or waiter.
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(map.entry(path.to_path_buf()).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of tracked paths.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─── Document Store ─────────────────────────────────────────────────────────

/// Filesystem side of the host. Owns the data directories.
#[derive(Debug)]
pub struct DocumentStore {
    dirs: DataDirs,
    locks: PathLocks,
}

impl DocumentStore {
    pub fn new(dirs: DataDirs) -> Self {
        Self {
            dirs,
            locks: PathLocks::default(),
        }
    }

    pub fn dirs(&self) -> &DataDirs {
        &self.dirs
    }

    /// Write `data` as the document `filename`, replacing any previous content.
    ///
    /// Returns the absolute path written to. The text lands in a temp file
    /// first and is renamed over the target, so readers never observe a
    /// partial document.
    pub async fn save_json(&self, data: &str, filename: &str) -> Result<PathBuf, HostError> {
        let op = Operation::SaveJsonFile;
        let path = self.dirs.json_path(op, filename)?;
        let dir = self.dirs.json_dir();

        let _guard = self.locks.acquire(&path).await;

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| HostError::io(op, &dir, e))?;

        let tmp_path = temp_path(&dir);
        if let Err(e) = tokio::fs::write(&tmp_path, data.as_bytes()).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(HostError::io(op, &path, e));
        }
        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(HostError::io(op, &path, e));
        }

        tracing::info!(path = %path.display(), bytes = data.len(), "file saved successfully");
        Ok(path)
    }

    /// Read the document `filename`.
    ///
    /// A document that was never saved is `Ok(None)`, not an error.
    pub async fn load_json(&self, filename: &str) -> Result<Option<String>, HostError> {
        let op = Operation::LoadJsonFile;
        let path = self.dirs.json_path(op, filename)?;

        tracing::debug!(path = %path.display(), "attempting to load JSON file");
        let _guard = self.locks.acquire(&path).await;

        match tokio::fs::read_to_string(&path).await {
            Ok(data) => {
                tracing::info!(path = %path.display(), bytes = data.len(), "JSON file loaded");
                Ok(Some(data))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no JSON file found");
                Ok(None)
            }
            Err(e) => Err(HostError::io(op, &path, e)),
        }
    }

    /// Copy the workbook at `source` into `excelFiles/`, keeping its base name.
    ///
    /// Returns the destination base name.
    pub async fn import_workbook(&self, source: &str) -> Result<String, HostError> {
        let op = Operation::CopyFile;
        let source_path = require_absolute(op, source)?;
        let file_name = source_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                HostError::invalid(op, format!("'{source}' has no usable file name"))
            })?
            .to_string();

        let dest = self.dirs.workbook_path(op, &file_name)?;
        let dir = self.dirs.excel_dir();

        let _guard = self.locks.acquire(&dest).await;

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| HostError::io(op, &dir, e))?;
        // Copy through a temp file: re-importing a file that already lives in
        // `excelFiles/` must not truncate it before it is read.
        let tmp_path = temp_path(&dir);
        let copied = match tokio::fs::copy(&source_path, &tmp_path).await {
            Ok(n) => n,
            Err(e) => {
                let _ = tokio::fs::remove_file(&tmp_path).await;
                // Distinguish an unreadable source from an unwritable destination.
                let blamed = if e.kind() == io::ErrorKind::NotFound {
                    &source_path
                } else {
                    &dest
                };
                return Err(HostError::io(op, blamed, e));
            }
        };
        if let Err(e) = tokio::fs::rename(&tmp_path, &dest).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(HostError::io(op, &dest, e));
        }

        tracing::info!(
            source = %source_path.display(),
            dest = %dest.display(),
            bytes = copied,
            "workbook imported"
        );
        Ok(file_name)
    }

    /// Read the raw bytes of an absolute path.
    pub async fn read_file(&self, path: &str) -> Result<Vec<u8>, HostError> {
        let op = Operation::ReadFile;
        let path = require_absolute(op, path)?;
        let _guard = self.locks.acquire(&path).await;
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| HostError::io(op, &path, e))?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "file read");
        Ok(bytes)
    }

    /// Write `data` to an absolute path. Parent directories are not created.
    pub async fn write_file(&self, path: &str, data: &[u8]) -> Result<(), HostError> {
        let op = Operation::WriteFile;
        let path = require_absolute(op, path)?;
        let _guard = self.locks.acquire(&path).await;
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| HostError::io(op, &path, e))?;
        tracing::info!(path = %path.display(), bytes = data.len(), "file written successfully");
        Ok(())
    }
}

/// Hidden, uniquely named scratch file inside `dir`.
///
/// The name does not include the target's name, so any target that is a
/// legal file name also has a legal temp name.
fn temp_path(dir: &Path) -> PathBuf {
    dir.join(format!(".{}.tmp", uuid::Uuid::new_v4()))
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, DocumentStore) {
        let tmp = TempDir::new().unwrap();
        let store = DocumentStore::new(DataDirs::at(tmp.path()));
        (tmp, store)
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let (_tmp, store) = store();
        for payload in ["", "{\"rows\":[1,2,3]}", "Größe: 42 — 在庫 ✓ 📦"] {
            store.save_json(payload, "inventory.json").await.unwrap();
            let loaded = store.load_json("inventory.json").await.unwrap();
            assert_eq!(loaded.as_deref(), Some(payload));
        }
    }

    #[tokio::test]
    async fn test_save_returns_absolute_path_in_json_dir() {
        let (tmp, store) = store();
        let path = store.save_json("{}", "a.json").await.unwrap();
        assert_eq!(path, tmp.path().join("jsonFiles").join("a.json"));
        assert!(path.is_absolute());
    }

    #[tokio::test]
    async fn test_load_missing_returns_none() {
        let (_tmp, store) = store();
        assert_eq!(store.load_json("never-saved.json").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let (_tmp, store) = store();
        store.save_json("{\"v\":1,\"extra\":true}", "doc.json").await.unwrap();
        store.save_json("{\"v\":2}", "doc.json").await.unwrap();
        assert_eq!(
            store.load_json("doc.json").await.unwrap().as_deref(),
            Some("{\"v\":2}")
        );
    }

    #[tokio::test]
    async fn test_save_leaves_no_temp_files() {
        let (tmp, store) = store();
        store.save_json("one", "doc.json").await.unwrap();
        store.save_json("two", "doc.json").await.unwrap();
        let names: Vec<String> = std::fs::read_dir(tmp.path().join("jsonFiles"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["doc.json".to_string()]);
    }

    #[tokio::test]
    async fn test_save_long_filename_near_limit() {
        let (_tmp, store) = store();
        // 240 bytes: a legal name on common filesystems (limit 255).
        let filename = format!("{}.json", "a".repeat(235));
        assert_eq!(filename.len(), 240);

        store.save_json("{\"ok\":true}", &filename).await.unwrap();
        assert_eq!(
            store.load_json(&filename).await.unwrap().as_deref(),
            Some("{\"ok\":true}")
        );
    }

    #[tokio::test]
    async fn test_save_rejects_path_separators() {
        let (tmp, store) = store();
        let err = store.save_json("x", "../escape.json").await.unwrap_err();
        assert!(matches!(err, HostError::InvalidArgument { .. }));
        assert!(!tmp.path().join("escape.json").exists());
    }

    #[tokio::test]
    async fn test_load_invalid_utf8_is_io_error() {
        let (tmp, store) = store();
        let dir = tmp.path().join("jsonFiles");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("bad.json"), [0xff, 0xfe, 0x00]).unwrap();
        let err = store.load_json("bad.json").await.unwrap_err();
        assert!(matches!(err, HostError::Io { .. }));
    }

    #[tokio::test]
    async fn test_import_workbook_copies_bytes() {
        let (tmp, store) = store();
        let source_dir = TempDir::new().unwrap();
        let source = source_dir.path().join("stock 2024.xlsx");
        let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        std::fs::write(&source, &bytes).unwrap();

        let name = store
            .import_workbook(source.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(name, "stock 2024.xlsx");

        let dest = tmp.path().join("excelFiles").join("stock 2024.xlsx");
        assert_eq!(std::fs::read(dest).unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_reimport_from_excel_dir_keeps_bytes() {
        let (tmp, store) = store();
        let source_dir = TempDir::new().unwrap();
        let source = source_dir.path().join("stock.xlsx");
        let bytes: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&source, &bytes).unwrap();
        store.import_workbook(source.to_str().unwrap()).await.unwrap();

        // User picks the already-imported copy and imports it again.
        let imported = tmp.path().join("excelFiles").join("stock.xlsx");
        let name = store
            .import_workbook(imported.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(name, "stock.xlsx");
        assert_eq!(std::fs::read(&imported).unwrap(), bytes);

        let entries = std::fs::read_dir(tmp.path().join("excelFiles")).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn test_import_missing_source_is_io_error() {
        let (tmp, store) = store();
        let missing = tmp.path().join("nope.xlsx");
        let err = store
            .import_workbook(missing.to_str().unwrap())
            .await
            .unwrap_err();
        match err {
            HostError::Io { operation, kind, path, .. } => {
                assert_eq!(operation, Operation::CopyFile);
                assert_eq!(kind, io::ErrorKind::NotFound);
                assert!(path.ends_with("nope.xlsx"));
            }
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_write_then_read_file() {
        let (tmp, store) = store();
        let target = tmp.path().join("export.xlsx");
        store
            .write_file(target.to_str().unwrap(), &[1, 2, 3, 4])
            .await
            .unwrap();
        let bytes = store.read_file(target.to_str().unwrap()).await.unwrap();
        assert_eq!(bytes, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_write_file_into_missing_dir_fails() {
        let (tmp, store) = store();
        let target = tmp.path().join("no-such-dir").join("out.bin");
        let err = store
            .write_file(target.to_str().unwrap(), b"x")
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::Io { operation: Operation::WriteFile, .. }));
    }

    #[tokio::test]
    async fn test_relative_paths_rejected() {
        let (_tmp, store) = store();
        assert!(matches!(
            store.read_file("relative.xlsx").await.unwrap_err(),
            HostError::InvalidArgument { .. }
        ));
        assert!(matches!(
            store.write_file("relative.xlsx", b"x").await.unwrap_err(),
            HostError::InvalidArgument { .. }
        ));
    }

    #[tokio::test]
    async fn test_concurrent_saves_to_different_files() {
        let (_tmp, store) = store();
        let store = Arc::new(store);
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let payload = format!("{{\"id\":{i},\"pad\":\"{}\"}}", "x".repeat(i * 512));
                store
                    .save_json(&payload, &format!("doc-{i}.json"))
                    .await
                    .unwrap();
                payload
            }));
        }
        for (i, handle) in handles.into_iter().enumerate() {
            let payload = handle.await.unwrap();
            let loaded = store.load_json(&format!("doc-{i}.json")).await.unwrap();
            assert_eq!(loaded, Some(payload));
        }
    }

    #[tokio::test]
    async fn test_concurrent_saves_to_same_file_keep_one_whole_payload() {
        let (_tmp, store) = store();
        let store = Arc::new(store);
        let payloads: Vec<String> = (0..8)
            .map(|i| format!("{{\"writer\":{i},\"body\":\"{}\"}}", i.to_string().repeat(4096)))
            .collect();
        let mut handles = Vec::new();
        for payload in payloads.clone() {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.save_json(&payload, "shared.json").await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        let loaded = store.load_json("shared.json").await.unwrap().unwrap();
        assert!(payloads.contains(&loaded));
    }

    #[tokio::test]
    async fn test_path_locks_prune_idle_entries() {
        let locks = PathLocks::default();
        {
            let _a = locks.acquire(Path::new("/a")).await;
            let _b = locks.acquire(Path::new("/b")).await;
            assert_eq!(locks.len(), 2);
        }
        let _c = locks.acquire(Path::new("/c")).await;
        assert_eq!(locks.len(), 1);
    }
}
