//! In-memory backend, for tests and `--dry-run`

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::traits::{BackendType, KeyValueBackend};

pub struct MemoryBackend {
    data: Mutex<BTreeMap<String, String>>,
    location: PathBuf,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(BTreeMap::new()),
            location: PathBuf::from(":memory:"),
        }
    }

    /// Starts from a copy of another backend's documents
    pub fn snapshot_of(source: &dyn KeyValueBackend) -> Result<Self> {
        let backend = Self::new();
        for key in source.keys()? {
            if let Some(value) = source.get(&key)? {
                backend.put(&key, &value)?;
            }
        }
        Ok(backend)
    }

    fn data(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.data
            .lock()
            .map_err(|_| anyhow::anyhow!("memory backend mutex poisoned"))
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Memory
    }

    fn location(&self) -> &Path {
        &self.location
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.data()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.data()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.data()?.keys().cloned().collect())
    }
}
