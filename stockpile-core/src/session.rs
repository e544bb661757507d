//! A running inventory session
//!
//! [`Tracker`] owns the inventory, the name index and the storage handle.
//! Every successful mutation goes through [`Tracker::commit`], which writes
//! the full inventory snapshot and, only when its content changed, the name
//! list. Storage failures never undo the in-memory change; they are logged
//! and reported on the returned [`Outcome`].

use std::collections::BTreeSet;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::db::{KeyValueBackend, MemoryBackend};
use crate::dialog::Dialog;
use crate::error::InventoryError;
use crate::inventory::{Inventory, InventoryStats};
use crate::models::{ItemColor, RawItem};
use crate::storage::Storage;
use crate::suggestions::{default_seed, sample_items, NameIndex};

/// Options controlling how a session starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub seed_sample_items: bool,
    pub default_color: ItemColor,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            seed_sample_items: true,
            default_color: ItemColor::default(),
        }
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            seed_sample_items: config.seed_sample_items,
            default_color: config.default_color,
        }
    }
}

/// What a successful operation reports back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub message: String,
    /// Set when the change is held in memory but could not be written
    pub storage_error: Option<String>,
}

impl Outcome {
    pub fn is_persisted(&self) -> bool {
        self.storage_error.is_none()
    }

    /// The message plus any storage warning, as shown to the user
    pub fn display_message(&self) -> String {
        match &self.storage_error {
            None => self.message.clone(),
            Some(err) => format!(
                "{} Warning: the change could not be saved ({}).",
                self.message, err
            ),
        }
    }
}

pub struct Tracker {
    inventory: Inventory,
    names: NameIndex,
    seed: BTreeSet<String>,
    storage: Storage,
    dialog: Dialog,
    names_dirty: bool,
}

impl Tracker {
    /// Loads the stored inventory and name list from `backend`.
    ///
    /// Never fails: unreadable data is logged, the session starts empty and
    /// a notice is posted.
    pub fn open(backend: Box<dyn KeyValueBackend>, options: SessionOptions) -> Self {
        let storage = Storage::new(backend);
        let mut dialog = Dialog::new();
        let mut needs_commit = false;

        let loaded = storage.load_inventory().and_then(|records| match records {
            Some(records) => Ok(Some(Inventory::from_raw(&records, options.default_color)?)),
            None => Ok(None),
        });
        let inventory = match loaded {
            Ok(Some(inventory)) => {
                info!(items = inventory.len(), "inventory loaded");
                inventory
            }
            Ok(None) if options.seed_sample_items => {
                let samples: Vec<RawItem> = sample_items().iter().map(RawItem::from).collect();
                needs_commit = true;
                info!(items = samples.len(), "no stored inventory, seeding sample items");
                Inventory::from_raw(&samples, options.default_color)
                    .unwrap_or_else(|_| Inventory::with_default_color(options.default_color))
            }
            Ok(None) => {
                info!("no stored inventory");
                Inventory::with_default_color(options.default_color)
            }
            Err(e) => {
                error!(error = %format!("{:#}", e), "failed to load inventory");
                dialog.notify("Failed to load inventory from storage.");
                Inventory::with_default_color(options.default_color)
            }
        };

        let stored_names = storage.load_master_list().unwrap_or_else(|e| {
            warn!(error = %format!("{:#}", e), "ignoring unreadable name list");
            Vec::new()
        });
        let mut seed = default_seed();
        seed.extend(stored_names.iter().cloned());

        let mut tracker = Self {
            inventory,
            names: NameIndex::from_stored(stored_names),
            seed,
            storage,
            dialog,
            names_dirty: false,
        };

        if needs_commit {
            if let Some(err) = tracker.commit() {
                tracker
                    .dialog
                    .notify(format!("Failed to save sample inventory ({}).", err));
            }
        } else if tracker.names.rebuild(&tracker.inventory, &tracker.seed) {
            tracker.save_names();
        }
        tracker
    }

    /// A session backed by memory only, starting empty
    pub fn in_memory() -> Self {
        Self::open(
            Box::new(MemoryBackend::new()),
            SessionOptions {
                seed_sample_items: false,
                ..SessionOptions::default()
            },
        )
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn names(&self) -> &NameIndex {
        &self.names
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn stats(&self) -> InventoryStats {
        self.inventory.stats()
    }

    /// Autocomplete suggestions for `query`
    pub fn suggest(&self, query: &str) -> Vec<&str> {
        self.names.suggest(query)
    }

    /// Writes the inventory snapshot, then the name list if it changed.
    /// Returns a description of any write failure.
    pub fn commit(&mut self) -> Option<String> {
        let mut failures = Vec::new();

        if let Err(e) = self.storage.save_inventory(self.inventory.items()) {
            error!(error = %format!("{:#}", e), "failed to save inventory");
            failures.push(format!("{:#}", e));
        }

        if self.names.rebuild(&self.inventory, &self.seed) || self.names_dirty {
            if let Some(err) = self.save_names() {
                failures.push(err);
            }
        }

        if failures.is_empty() {
            None
        } else {
            Some(failures.join("; "))
        }
    }

    fn save_names(&mut self) -> Option<String> {
        match self.storage.save_master_list(self.names.names()) {
            Ok(()) => {
                self.names_dirty = false;
                None
            }
            Err(e) => {
                error!(error = %format!("{:#}", e), "failed to save name list");
                self.names_dirty = true;
                Some(format!("{:#}", e))
            }
        }
    }

    /// Commits and posts the resulting message
    fn finish(&mut self, message: String) -> Outcome {
        let outcome = Outcome {
            message,
            storage_error: self.commit(),
        };
        self.dialog.notify(outcome.display_message());
        outcome
    }

    /// Posts the error's message; the dialog drops any pending delete
    fn reject(&mut self, err: InventoryError) -> InventoryError {
        warn!(error = %err, "operation rejected");
        self.dialog.notify(err.to_string());
        err
    }

    pub fn add(
        &mut self,
        name: &str,
        quantity: &str,
        color: Option<ItemColor>,
    ) -> Result<Outcome, InventoryError> {
        let added = self
            .inventory
            .add(name, quantity, color)
            .map_err(|e| self.reject(e))?;
        Ok(self.finish(added.message()))
    }

    pub fn adjust_quantity(&mut self, id: &str, delta: i64) -> Result<Outcome, InventoryError> {
        let quantity = self
            .inventory
            .adjust_quantity(id, delta)
            .map_err(|e| self.reject(e))?;
        let name = self.item_name(id);
        Ok(self.finish(format!("{} quantity is now {}.", name, quantity)))
    }

    pub fn edit(&mut self, id: &str, quantity: &str) -> Result<Outcome, InventoryError> {
        self.inventory
            .edit(id, quantity)
            .map_err(|e| self.reject(e))?;
        Ok(self.finish("Item updated successfully!".to_string()))
    }

    pub fn toggle_favorite(&mut self, id: &str) -> Result<Outcome, InventoryError> {
        let favorite = self
            .inventory
            .toggle_favorite(id)
            .map_err(|e| self.reject(e))?;
        let name = self.item_name(id);
        let message = if favorite {
            format!("{} added to favorites.", name)
        } else {
            format!("{} removed from favorites.", name)
        };
        Ok(self.finish(message))
    }

    pub fn reorder(&mut self, dragged_id: &str, target_id: &str) -> Result<Outcome, InventoryError> {
        self.inventory
            .reorder(dragged_id, target_id)
            .map_err(|e| self.reject(e))?;
        let dragged = self.item_name(dragged_id);
        let target = self.item_name(target_id);
        Ok(self.finish(format!("Moved {} before {}.", dragged, target)))
    }

    /// Imports JSON text. On any error the inventory is left untouched.
    pub fn import_json(&mut self, json: &str, clear_existing: bool) -> Result<Outcome, InventoryError> {
        let summary = self
            .inventory
            .import_json(json, clear_existing)
            .map_err(|e| self.reject(e))?;
        info!(
            added = summary.added,
            updated = summary.updated,
            clear_existing,
            "inventory imported"
        );
        Ok(self.finish(summary.message()))
    }

    /// Pretty-printed export of the current inventory
    pub fn export_json(&self) -> serde_json::Result<String> {
        self.inventory.export_json()
    }

    /// Merges uploaded names into the seed set and refreshes the index
    pub fn merge_master_list<I>(&mut self, names: I) -> Outcome
    where
        I: IntoIterator<Item = String>,
    {
        let before = self.seed.len();
        self.seed.extend(
            names
                .into_iter()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        );
        let added = self.seed.len() - before;
        info!(added, "master list merged");
        self.finish(format!("Added {} new names to the master list.", added))
    }

    /// Starts the delete confirmation for `id` and returns the prompt
    pub fn request_delete(&mut self, id: &str) -> Result<String, InventoryError> {
        if id.trim().is_empty() {
            return Err(self.reject(InventoryError::validation(
                "Cannot delete item: ID is missing.",
            )));
        }
        let name = self.inventory.get(id).map(|item| item.name.clone());
        self.dialog.request_delete(id, name.as_deref());
        Ok(self.dialog.message().unwrap_or_default().to_string())
    }

    /// Abandons a pending delete
    pub fn cancel_delete(&mut self) {
        self.dialog.cancel();
    }

    /// Applies the pending delete, if the dialog is asking for one. Returns
    /// `None` when nothing was pending.
    pub fn confirm_delete(&mut self) -> Option<Outcome> {
        let id = self.dialog.confirm()?;
        match self.inventory.delete(&id) {
            Some(item) => info!(id = %id, name = %item.name, "item deleted"),
            None => info!(id = %id, "delete of unknown id ignored"),
        }
        Some(self.finish("Item deleted successfully!".to_string()))
    }

    /// Hides the dialog
    pub fn dismiss(&mut self) {
        self.dialog.dismiss();
    }

    fn item_name(&self, id: &str) -> String {
        self.inventory
            .get(id)
            .map(|item| format!("\"{}\"", item.name))
            .unwrap_or_else(|| "Item".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::JsonDirBackend;
    use crate::inventory::is_favorites_first;
    use crate::storage::{INVENTORY_KEY, MASTER_LIST_KEY};
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Records each key written; optionally fails every write
    struct RecordingBackend {
        inner: MemoryBackend,
        writes: Arc<Mutex<Vec<String>>>,
        fail_writes: bool,
    }

    impl RecordingBackend {
        fn new(fail_writes: bool) -> (Self, Arc<Mutex<Vec<String>>>) {
            let writes = Arc::new(Mutex::new(Vec::new()));
            let backend = Self {
                inner: MemoryBackend::new(),
                writes: Arc::clone(&writes),
                fail_writes,
            };
            (backend, writes)
        }
    }

    impl KeyValueBackend for RecordingBackend {
        fn backend_type(&self) -> crate::db::BackendType {
            crate::db::BackendType::Memory
        }
        fn location(&self) -> &Path {
            self.inner.location()
        }
        fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
            self.inner.get(key)
        }
        fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
            self.writes.lock().unwrap().push(key.to_string());
            if self.fail_writes {
                anyhow::bail!("disk full");
            }
            self.inner.put(key, value)
        }
        fn remove(&self, key: &str) -> anyhow::Result<()> {
            self.inner.remove(key)
        }
        fn keys(&self) -> anyhow::Result<Vec<String>> {
            self.inner.keys()
        }
    }

    fn no_seed() -> SessionOptions {
        SessionOptions {
            seed_sample_items: false,
            ..SessionOptions::default()
        }
    }

    #[test]
    fn test_open_seeds_samples_once() {
        let temp_dir = TempDir::new().unwrap();
        let tracker = Tracker::open(
            Box::new(JsonDirBackend::new(temp_dir.path())),
            SessionOptions::default(),
        );
        assert_eq!(tracker.inventory().len(), sample_items().len());
        assert!(tracker.storage().load_inventory().unwrap().is_some());

        let mut tracker = tracker;
        let first = tracker.inventory().items()[0].id.clone();
        tracker.request_delete(&first).unwrap();
        tracker.confirm_delete().unwrap();

        let reopened = Tracker::open(
            Box::new(JsonDirBackend::new(temp_dir.path())),
            SessionOptions::default(),
        );
        assert_eq!(reopened.inventory().len(), sample_items().len() - 1);
    }

    #[test]
    fn test_open_without_seeding_writes_nothing_for_inventory() {
        let (backend, writes) = RecordingBackend::new(false);
        let tracker = Tracker::open(Box::new(backend), no_seed());
        assert!(tracker.inventory().is_empty());
        assert!(!writes.lock().unwrap().contains(&INVENTORY_KEY.to_string()));
    }

    #[test]
    fn test_add_scenario_and_persistence() {
        let mut tracker = Tracker::in_memory();
        tracker.add("Widget", "5", None).unwrap();
        let outcome = tracker.add("widget", "3", None).unwrap();

        assert!(outcome.is_persisted());
        assert!(outcome.message.contains("8"));
        let exported = tracker.inventory().export();
        assert_eq!(exported.len(), 1);
        assert_eq!(exported[0].name, "Widget");
        assert_eq!(exported[0].quantity, 8);

        let stored = tracker.storage().load_inventory().unwrap().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].quantity, Some(8));
    }

    #[test]
    fn test_name_list_written_only_on_change() {
        let (backend, writes) = RecordingBackend::new(false);
        let mut tracker = Tracker::open(Box::new(backend), no_seed());
        writes.lock().unwrap().clear();

        tracker.add("Zither Strings", "1", None).unwrap();
        let id = tracker.inventory().items()[0].id.clone();
        tracker.adjust_quantity(&id, 2).unwrap();
        tracker.toggle_favorite(&id).unwrap();

        let writes = writes.lock().unwrap();
        let name_writes = writes.iter().filter(|k| *k == MASTER_LIST_KEY).count();
        let inventory_writes = writes.iter().filter(|k| *k == INVENTORY_KEY).count();
        assert_eq!(name_writes, 1);
        assert_eq!(inventory_writes, 3);
        assert!(tracker.names().names().contains(&"Zither Strings".to_string()));
    }

    #[test]
    fn test_storage_failure_keeps_memory_change() {
        let (backend, _) = RecordingBackend::new(true);
        let mut tracker = Tracker::open(Box::new(backend), no_seed());

        let outcome = tracker.add("Glue", "2", None).unwrap();
        assert!(!outcome.is_persisted());
        assert!(outcome.display_message().contains("could not be saved"));
        assert_eq!(tracker.inventory().len(), 1);
        assert!(tracker.dialog().message().unwrap().contains("disk full"));
    }

    #[test]
    fn test_corrupt_storage_starts_empty_with_notice() {
        let backend = MemoryBackend::new();
        backend.put(INVENTORY_KEY, "{oops").unwrap();
        let tracker = Tracker::open(Box::new(backend), SessionOptions::default());

        assert!(tracker.inventory().is_empty());
        assert_eq!(
            tracker.dialog().message(),
            Some("Failed to load inventory from storage.")
        );
    }

    #[test]
    fn test_rejected_adjust_changes_nothing() {
        let (backend, writes) = RecordingBackend::new(false);
        let mut tracker = Tracker::open(Box::new(backend), no_seed());
        tracker.add("Pens", "2", None).unwrap();
        let id = tracker.inventory().items()[0].id.clone();
        let before = writes.lock().unwrap().len();

        let err = tracker.adjust_quantity(&id, -3).unwrap_err();
        assert_eq!(err, InventoryError::validation("Quantity cannot be negative."));
        assert_eq!(tracker.inventory().items()[0].quantity, 2);
        assert_eq!(writes.lock().unwrap().len(), before);
        assert_eq!(tracker.dialog().message(), Some("Quantity cannot be negative."));
    }

    #[test]
    fn test_request_delete_then_cancel() {
        let mut tracker = Tracker::in_memory();
        tracker.add("Stapler", "1", None).unwrap();
        let id = tracker.inventory().items()[0].id.clone();

        let prompt = tracker.request_delete(&id).unwrap();
        assert!(prompt.contains("\"Stapler\""));
        tracker.cancel_delete();

        assert!(tracker.confirm_delete().is_none());
        assert!(tracker.inventory().get(&id).is_some());
    }

    #[test]
    fn test_unrelated_notice_clears_pending_delete() {
        let mut tracker = Tracker::in_memory();
        tracker.add("Stapler", "1", None).unwrap();
        let id = tracker.inventory().items()[0].id.clone();

        tracker.request_delete(&id).unwrap();
        tracker.add("Staples", "100", None).unwrap();
        assert!(tracker.confirm_delete().is_none());
        assert!(tracker.inventory().get(&id).is_some());

        tracker.request_delete(&id).unwrap();
        let _ = tracker.add("", "1", None);
        assert!(tracker.confirm_delete().is_none());
        assert!(tracker.inventory().get(&id).is_some());
    }

    #[test]
    fn test_confirm_delete() {
        let mut tracker = Tracker::in_memory();
        tracker.add("Stapler", "1", None).unwrap();
        let id = tracker.inventory().items()[0].id.clone();

        tracker.request_delete(&id).unwrap();
        let outcome = tracker.confirm_delete().unwrap();
        assert_eq!(outcome.message, "Item deleted successfully!");
        assert!(tracker.inventory().is_empty());
        assert_eq!(tracker.storage().load_inventory().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_confirm_delete_unknown_id_is_noop_success() {
        let mut tracker = Tracker::in_memory();
        let prompt = tracker.request_delete("ghost").unwrap();
        assert!(prompt.contains("this item"));
        assert!(tracker.confirm_delete().is_some());
        assert!(tracker.request_delete("").is_err());
    }

    #[test]
    fn test_reorder_across_groups_rejected() {
        let mut tracker = Tracker::in_memory();
        tracker.add("A", "1", None).unwrap();
        tracker.add("B", "1", None).unwrap();
        let a = tracker.inventory().items()[0].id.clone();
        let b = tracker.inventory().items()[1].id.clone();
        tracker.toggle_favorite(&a).unwrap();
        let before = tracker.inventory().clone();

        assert!(tracker.reorder(&a, &b).is_err());
        assert_eq!(tracker.inventory(), &before);
        assert!(is_favorites_first(tracker.inventory().items()));
    }

    #[test]
    fn test_import_failure_leaves_inventory() {
        let mut tracker = Tracker::in_memory();
        tracker.add("A", "1", None).unwrap();
        let before = tracker.inventory().clone();

        let err = tracker.import_json("{\"name\":\"B\"}", true).unwrap_err();
        assert!(matches!(err, InventoryError::MalformedImport(_)));
        assert_eq!(tracker.inventory(), &before);
    }

    #[test]
    fn test_master_list_feeds_suggestions() {
        let mut tracker = Tracker::in_memory();
        let outcome =
            tracker.merge_master_list(vec!["Quinoa".to_string(), " ".to_string(), "Milk".to_string()]);
        assert!(outcome.message.contains("1 new"));
        assert_eq!(tracker.suggest("quin"), vec!["Quinoa"]);

        let stored = tracker.storage().load_master_list().unwrap();
        assert!(stored.contains(&"Quinoa".to_string()));
    }

    #[test]
    fn test_uploaded_names_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut tracker =
                Tracker::open(Box::new(JsonDirBackend::new(temp_dir.path())), no_seed());
            tracker.merge_master_list(vec!["Kombucha".to_string()]);
        }
        let tracker = Tracker::open(Box::new(JsonDirBackend::new(temp_dir.path())), no_seed());
        assert_eq!(tracker.suggest("kombu"), vec!["Kombucha"]);
    }
}
