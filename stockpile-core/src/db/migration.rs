//! Moving stored documents between backends

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use super::traits::{BackendType, KeyValueBackend};
use super::{create_backend, infer_backend_type};

/// Copies every document from `source` into `target`, overwriting keys
/// that already exist there. Returns the number of documents copied.
pub fn copy_documents(source: &dyn KeyValueBackend, target: &dyn KeyValueBackend) -> Result<usize> {
    let mut copied = 0;
    for key in source.keys().context("Failed to list source keys")? {
        if let Some(value) = source.get(&key)? {
            target
                .put(&key, &value)
                .with_context(|| format!("Failed to write {:?} to target", key))?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Migrates the data at `from` into a new location `to`. Backend types are
/// inferred from the paths unless given.
pub fn migrate<P1: AsRef<Path>, P2: AsRef<Path>>(
    from: P1,
    to: P2,
    to_type: Option<BackendType>,
) -> Result<usize> {
    let from = from.as_ref();
    let to = to.as_ref();
    if !from.exists() {
        anyhow::bail!("Nothing to migrate: {:?} does not exist", from);
    }

    let source = create_backend(from, None)?;
    let target = create_backend(to, Some(to_type.unwrap_or_else(|| infer_backend_type(to))))?;
    let copied = copy_documents(source.as_ref(), target.as_ref())?;

    info!(
        from = %from.display(),
        to = %to.display(),
        copied,
        "migrated {} to {}",
        source.backend_type(),
        target.backend_type()
    );
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{JsonDirBackend, SqliteBackend};
    use tempfile::TempDir;

    #[test]
    fn test_json_to_sqlite_migration() {
        let temp_dir = TempDir::new().unwrap();
        let json_dir = temp_dir.path().join("data");
        let db_path = temp_dir.path().join("inventory.db");

        let json = JsonDirBackend::new(&json_dir);
        json.put("inventory", "[]").unwrap();
        json.put("masterItemList", "[\"Milk\"]").unwrap();

        assert_eq!(migrate(&json_dir, &db_path, None).unwrap(), 2);

        let sqlite = SqliteBackend::new(&db_path).unwrap();
        assert_eq!(sqlite.get("masterItemList").unwrap().as_deref(), Some("[\"Milk\"]"));
    }

    #[test]
    fn test_migrate_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let result = migrate(temp_dir.path().join("absent"), temp_dir.path().join("x.db"), None);
        assert!(result.is_err());
    }
}
