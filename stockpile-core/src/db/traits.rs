//! Storage backend trait
//!
//! Backends are plain key-value stores holding one JSON document per key.
//! Every write replaces the whole document.

use anyhow::Result;
use std::path::Path;

/// Types of storage backends available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// Directory with one `<key>.json` file per key
    JsonDir,
    /// SQLite database with a single key-value table
    Sqlite,
    /// In-process map, nothing touches disk
    Memory,
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendType::JsonDir => write!(f, "JSON directory"),
            BackendType::Sqlite => write!(f, "SQLite"),
            BackendType::Memory => write!(f, "in-memory"),
        }
    }
}

impl BackendType {
    /// Parses a backend name as written in the config file
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" | "json-dir" | "dir" => Some(BackendType::JsonDir),
            "sqlite" | "db" => Some(BackendType::Sqlite),
            "memory" | "mem" => Some(BackendType::Memory),
            _ => None,
        }
    }
}

/// Core trait for storage backends
///
/// Values are serialized JSON documents. `put` is a full overwrite; there
/// are no partial updates.
pub trait KeyValueBackend: Send + Sync {
    /// Returns the backend type
    fn backend_type(&self) -> BackendType;

    /// Returns the file or directory the backend writes to
    fn location(&self) -> &Path;

    /// Reads the document stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the document stored under `key`
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Lists stored keys in sorted order
    fn keys(&self) -> Result<Vec<String>>;

    /// Returns true if a document exists under `key`
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}
