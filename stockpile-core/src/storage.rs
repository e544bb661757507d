use anyhow::{Context, Result};
use tracing::debug;

use crate::db::KeyValueBackend;
use crate::models::{Item, RawItem};

/// Key holding the ordered item array
pub const INVENTORY_KEY: &str = "inventory";

/// Key holding the sorted name list used for suggestions
pub const MASTER_LIST_KEY: &str = "masterItemList";

/// Typed access to the two stored documents
pub struct Storage {
    backend: Box<dyn KeyValueBackend>,
}

impl Storage {
    pub fn new(backend: Box<dyn KeyValueBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &dyn KeyValueBackend {
        self.backend.as_ref()
    }

    /// Reads the stored inventory records. `None` means storage has never
    /// held an inventory, as opposed to holding an empty one.
    pub fn load_inventory(&self) -> Result<Option<Vec<RawItem>>> {
        let Some(json) = self.backend.get(INVENTORY_KEY)? else {
            return Ok(None);
        };
        let records: Vec<RawItem> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse stored {:?}", INVENTORY_KEY))?;
        Ok(Some(records))
    }

    /// Overwrites the stored inventory with a full snapshot
    pub fn save_inventory(&self, items: &[Item]) -> Result<()> {
        let json = serde_json::to_string(items).context("Failed to serialize inventory")?;
        self.backend.put(INVENTORY_KEY, &json)?;
        debug!(items = items.len(), "inventory snapshot written");
        Ok(())
    }

    /// Reads the stored name list, empty if absent
    pub fn load_master_list(&self) -> Result<Vec<String>> {
        match self.backend.get(MASTER_LIST_KEY)? {
            Some(json) => serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse stored {:?}", MASTER_LIST_KEY)),
            None => Ok(Vec::new()),
        }
    }

    pub fn save_master_list(&self, names: &[String]) -> Result<()> {
        let json = serde_json::to_string(names).context("Failed to serialize name list")?;
        self.backend.put(MASTER_LIST_KEY, &json)?;
        debug!(names = names.len(), "name list written");
        Ok(())
    }

    /// Deletes both documents
    pub fn clear(&self) -> Result<()> {
        self.backend.remove(INVENTORY_KEY)?;
        self.backend.remove(MASTER_LIST_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryBackend;
    use crate::models::ItemColor;

    #[test]
    fn test_load_absent_vs_empty() {
        let storage = Storage::new(Box::new(MemoryBackend::new()));
        assert!(storage.load_inventory().unwrap().is_none());

        storage.save_inventory(&[]).unwrap();
        assert_eq!(storage.load_inventory().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_inventory_snapshot_round_trip() {
        let storage = Storage::new(Box::new(MemoryBackend::new()));
        let item = Item::new("Tape", 3, ItemColor::Purple);
        storage.save_inventory(std::slice::from_ref(&item)).unwrap();

        let records = storage.load_inventory().unwrap().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].normalize(ItemColor::Gray).unwrap(), item);
    }

    #[test]
    fn test_corrupt_inventory_is_an_error() {
        let backend = MemoryBackend::new();
        backend.put(INVENTORY_KEY, "{not json").unwrap();
        let storage = Storage::new(Box::new(backend));
        assert!(storage.load_inventory().is_err());
    }

    #[test]
    fn test_master_list() {
        let storage = Storage::new(Box::new(MemoryBackend::new()));
        assert!(storage.load_master_list().unwrap().is_empty());

        storage
            .save_master_list(&["Milk".to_string(), "Tea".to_string()])
            .unwrap();
        assert_eq!(storage.load_master_list().unwrap(), vec!["Milk", "Tea"]);

        storage.clear().unwrap();
        assert!(storage.load_master_list().unwrap().is_empty());
    }
}
