//! Storage backends for Stockpile
//!
//! Backends are trait objects so the session can run against a JSON
//! directory, a SQLite file, or memory without knowing which.

mod json_backend;
mod memory_backend;
mod migration;
mod sqlite_backend;
mod traits;

pub use json_backend::JsonDirBackend;
pub use memory_backend::MemoryBackend;
pub use migration::{copy_documents, migrate};
pub use sqlite_backend::SqliteBackend;
pub use traits::{BackendType, KeyValueBackend};

use anyhow::Result;
use std::path::Path;

/// Infers the backend from the path's extension
pub fn infer_backend_type(path: &Path) -> BackendType {
    match path.extension().and_then(|e| e.to_str()) {
        Some("db") | Some("sqlite") | Some("sqlite3") => BackendType::Sqlite,
        _ => BackendType::JsonDir,
    }
}

/// Creates a backend for `path`, inferring the type unless one is given
pub fn create_backend(
    path: &Path,
    backend_type: Option<BackendType>,
) -> Result<Box<dyn KeyValueBackend>> {
    match backend_type.unwrap_or_else(|| infer_backend_type(path)) {
        BackendType::JsonDir => Ok(Box::new(JsonDirBackend::new(path))),
        BackendType::Sqlite => Ok(Box::new(SqliteBackend::new(path)?)),
        BackendType::Memory => Ok(Box::new(MemoryBackend::new())),
    }
}

/// Copies the data at `path` into memory without touching the disk.
/// A missing location yields an empty snapshot.
pub fn snapshot_backend(path: &Path, backend_type: Option<BackendType>) -> Result<MemoryBackend> {
    if !path.exists() {
        return Ok(MemoryBackend::new());
    }
    match backend_type.unwrap_or_else(|| infer_backend_type(path)) {
        BackendType::JsonDir => MemoryBackend::snapshot_of(&JsonDirBackend::new(path)),
        BackendType::Sqlite => MemoryBackend::snapshot_of(&SqliteBackend::open_read_only(path)?),
        BackendType::Memory => Ok(MemoryBackend::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_infer_backend_type() {
        assert_eq!(infer_backend_type(Path::new("x/inventory.db")), BackendType::Sqlite);
        assert_eq!(infer_backend_type(Path::new("x/stock.sqlite3")), BackendType::Sqlite);
        assert_eq!(infer_backend_type(Path::new("x/stockpile")), BackendType::JsonDir);
    }

    #[test]
    fn test_snapshot_of_missing_sqlite_path_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/inv.db");

        let snapshot = snapshot_backend(&path, None).unwrap();
        assert!(snapshot.keys().unwrap().is_empty());
        assert!(!path.exists());
        assert!(!temp_dir.path().join("nested").exists());
    }

    #[test]
    fn test_snapshot_of_sqlite_leaves_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("inv.db");
        {
            let backend = SqliteBackend::new(&path).unwrap();
            backend.put("inventory", "[]").unwrap();
        }

        let snapshot = snapshot_backend(&path, None).unwrap();
        assert_eq!(snapshot.get("inventory").unwrap().as_deref(), Some("[]"));

        snapshot.put("inventory", "[1]").unwrap();
        let reopened = SqliteBackend::new(&path).unwrap();
        assert_eq!(reopened.get("inventory").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_snapshot_of_json_dir_writes_no_lock_file() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("data");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("inventory.json"), "[]").unwrap();

        let snapshot = snapshot_backend(&dir, None).unwrap();
        assert_eq!(snapshot.keys().unwrap(), vec!["inventory"]);
        assert!(!dir.join(".lock").exists());
    }
}
