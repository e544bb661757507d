//! JSON directory backend
//!
//! Each key is stored as `<dir>/<key>.json`. Writes take an exclusive lock
//! on `<dir>/.lock` and reads a shared one, so concurrent `stock`
//! invocations never observe a half-written document.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::traits::{BackendType, KeyValueBackend};

const LOCK_TIMEOUT: Duration = Duration::from_secs(5);
const LOCK_RETRY: Duration = Duration::from_millis(100);

pub struct JsonDirBackend {
    dir: PathBuf,
    lock_file_path: PathBuf,
}

impl JsonDirBackend {
    /// Creates a backend rooted at `dir`. The directory is created on the
    /// first write.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let lock_file_path = dir.join(".lock");
        Self {
            dir,
            lock_file_path,
        }
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || key.starts_with('.')
            || key.contains(['/', '\\'])
        {
            anyhow::bail!("Invalid storage key: {:?}", key);
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    /// Acquire an exclusive lock for writing.
    /// The returned handle must be held for the duration of the write.
    fn acquire_write_lock(&self) -> Result<File> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data directory: {:?}", self.dir))?;

        let mut lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.lock_file_path)
            .with_context(|| format!("Failed to create lock file: {:?}", self.lock_file_path))?;

        self.wait_for(|| FileExt::try_lock_exclusive(&lock_file))?;

        let _ = writeln!(
            lock_file,
            "Locked by PID {} at {}",
            std::process::id(),
            chrono::Utc::now().to_rfc3339()
        );
        Ok(lock_file)
    }

    /// Acquire a shared lock for reading, if a lock file exists yet
    fn acquire_read_lock(&self) -> Result<Option<File>> {
        if !self.lock_file_path.exists() {
            return Ok(None);
        }

        let lock_file = OpenOptions::new()
            .read(true)
            .open(&self.lock_file_path)
            .with_context(|| format!("Failed to open lock file: {:?}", self.lock_file_path))?;

        self.wait_for(|| FileExt::try_lock_shared(&lock_file))?;
        Ok(Some(lock_file))
    }

    fn wait_for<F>(&self, mut try_lock: F) -> Result<()>
    where
        F: FnMut() -> std::io::Result<()>,
    {
        let start = Instant::now();
        loop {
            match try_lock() {
                Ok(()) => return Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    if start.elapsed() > LOCK_TIMEOUT {
                        anyhow::bail!(
                            "Timeout waiting for storage lock - another process may be writing: {:?}",
                            self.dir
                        );
                    }
                    std::thread::sleep(LOCK_RETRY);
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to acquire lock on {:?}", self.lock_file_path)
                    })
                }
            }
        }
    }
}

impl KeyValueBackend for JsonDirBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::JsonDir
    }

    fn location(&self) -> &Path {
        &self.dir
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        let _lock = self.acquire_read_lock()?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        Ok(Some(content))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        let _lock = self.acquire_write_lock()?;

        // Write beside the target, then rename over it
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value).with_context(|| format!("Failed to write {:?}", tmp_path))?;
        fs::rename(&tmp_path, &path)
            .with_context(|| format!("Failed to replace {:?}", path))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(());
        }
        let _lock = self.acquire_write_lock()?;
        fs::remove_file(&path).with_context(|| format!("Failed to remove {:?}", path))?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let _lock = self.acquire_read_lock()?;

        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list {:?}", self.dir))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}
