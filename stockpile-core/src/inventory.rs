//! The ordered item collection and every operation that mutates it
//!
//! All favorites precede all non-favorites at all times. Each mutating
//! operation ends with [`restore_favorites_first`], a stable partition, so
//! the relative order inside each group is whatever the user left it.

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::error::InventoryError;
use crate::models::{generate_id, parse_quantity, ExportedItem, Item, ItemColor, RawItem};

/// Stable partition: favorites first, order within each group preserved
pub fn restore_favorites_first(items: &mut [Item]) {
    items.sort_by_key(|item| !item.is_favorite);
}

/// True when no non-favorite item precedes a favorite one
pub fn is_favorites_first(items: &[Item]) -> bool {
    items
        .iter()
        .skip_while(|item| item.is_favorite)
        .all(|item| !item.is_favorite)
}

/// Result of [`Inventory::add`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new item was appended
    Added { id: String, name: String },
    /// An item with the same name existed and its quantity was increased
    Updated {
        id: String,
        name: String,
        quantity: u32,
    },
}

impl AddOutcome {
    pub fn id(&self) -> &str {
        match self {
            AddOutcome::Added { id, .. } | AddOutcome::Updated { id, .. } => id,
        }
    }

    pub fn message(&self) -> String {
        match self {
            AddOutcome::Added { .. } => "Item added successfully!".to_string(),
            AddOutcome::Updated { name, quantity, .. } => format!(
                "\"{}\" already exists. Quantity updated to {}.",
                name, quantity
            ),
        }
    }
}

/// Counts produced by a bulk import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub updated: usize,
    pub total: usize,
}

impl ImportSummary {
    pub fn message(&self) -> String {
        format!(
            "Inventory imported successfully! ({} added, {} updated, {} total)",
            self.added, self.updated, self.total
        )
    }
}

/// Summary figures for the whole inventory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InventoryStats {
    pub items: usize,
    pub favorites: usize,
    pub total_quantity: u64,
}

/// Ordered collection of items, unique by id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: Vec<Item>,
    default_color: ItemColor,
}

impl Inventory {
    /// Creates an empty inventory
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty inventory whose new items default to `color`
    pub fn with_default_color(color: ItemColor) -> Self {
        Self {
            items: Vec::new(),
            default_color: color,
        }
    }

    /// Builds an inventory from stored records, filling defaults and
    /// replacing missing or duplicate ids
    pub fn from_raw(records: &[RawItem], default_color: ItemColor) -> Result<Self, InventoryError> {
        let mut inventory = Self::with_default_color(default_color);
        inventory.items = inventory.ingest_all(records, &mut HashSet::new())?;
        restore_favorites_first(&mut inventory.items);
        Ok(inventory)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn default_color(&self) -> ItemColor {
        self.default_color
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Item, InventoryError> {
        self.items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| InventoryError::NotFound(id.to_string()))
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Finds an item by name, ignoring case
    pub fn find_by_name(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.has_name(name))
    }

    /// Resolves a user-supplied reference: exact id, unique id prefix, or
    /// case-insensitive name
    pub fn resolve(&self, reference: &str) -> Result<&Item, InventoryError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(InventoryError::validation("Item reference cannot be empty."));
        }
        if let Some(item) = self.get(reference) {
            return Ok(item);
        }
        if let Some(item) = self.find_by_name(reference) {
            return Ok(item);
        }

        let matches: Vec<&Item> = self
            .items
            .iter()
            .filter(|item| item.id.starts_with(reference))
            .collect();
        match matches.as_slice() {
            [item] => Ok(item),
            [] => Err(InventoryError::NotFound(reference.to_string())),
            many => Err(InventoryError::validation(format!(
                "Ambiguous id prefix '{}' matches {} items",
                reference,
                many.len()
            ))),
        }
    }

    /// Adds an item, or increases the quantity of the item with the same
    /// name (case-insensitive)
    pub fn add(
        &mut self,
        name: &str,
        quantity: &str,
        color: Option<ItemColor>,
    ) -> Result<AddOutcome, InventoryError> {
        let name = name.trim();
        if name.is_empty() || quantity.trim().is_empty() {
            return Err(InventoryError::validation("Please fill all fields."));
        }
        let quantity = parse_quantity(quantity)?;

        let outcome = if let Some(pos) = self.items.iter().position(|i| i.has_name(name)) {
            let existing = &mut self.items[pos];
            existing.quantity = existing.quantity.checked_add(quantity).ok_or_else(|| {
                InventoryError::validation("Quantity is too large to add.")
            })?;
            debug!(id = %existing.id, quantity = existing.quantity, "merged add into existing item");
            AddOutcome::Updated {
                id: existing.id.clone(),
                name: existing.name.clone(),
                quantity: existing.quantity,
            }
        } else {
            let item = Item::new(name, quantity, color.unwrap_or(self.default_color));
            let outcome = AddOutcome::Added {
                id: item.id.clone(),
                name: item.name.clone(),
            };
            debug!(id = %item.id, name = %item.name, "added item");
            self.items.push(item);
            outcome
        };

        restore_favorites_first(&mut self.items);
        Ok(outcome)
    }

    /// Changes an item's quantity by `delta`. A result below zero is
    /// rejected and nothing changes.
    pub fn adjust_quantity(&mut self, id: &str, delta: i64) -> Result<u32, InventoryError> {
        let item = self.get_mut(id)?;
        let updated = i64::from(item.quantity).saturating_add(delta);
        if updated < 0 {
            warn!(id, delta, "rejected quantity adjustment below zero");
            return Err(InventoryError::validation("Quantity cannot be negative."));
        }
        item.quantity = u32::try_from(updated)
            .map_err(|_| InventoryError::validation("Quantity is too large."))?;
        Ok(item.quantity)
    }

    /// Replaces an item's quantity with the parsed `quantity` text
    pub fn edit(&mut self, id: &str, quantity: &str) -> Result<u32, InventoryError> {
        let quantity = parse_quantity(quantity)?;
        let item = self.get_mut(id)?;
        item.quantity = quantity;
        Ok(quantity)
    }

    /// Removes an item. Unknown ids are a no-op.
    pub fn delete(&mut self, id: &str) -> Option<Item> {
        let removed = self.position(id).map(|pos| self.items.remove(pos));
        restore_favorites_first(&mut self.items);
        removed
    }

    /// Flips the favorite flag and returns the new value
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, InventoryError> {
        let item = self.get_mut(id)?;
        item.is_favorite = !item.is_favorite;
        let now_favorite = item.is_favorite;
        restore_favorites_first(&mut self.items);
        Ok(now_favorite)
    }

    /// Moves `dragged_id` to sit immediately before `target_id`.
    ///
    /// Both items must be in the same group (favorite or not).
    pub fn reorder(&mut self, dragged_id: &str, target_id: &str) -> Result<(), InventoryError> {
        if dragged_id == target_id {
            return Err(InventoryError::validation("Cannot move an item onto itself."));
        }
        let from = self
            .position(dragged_id)
            .ok_or_else(|| InventoryError::NotFound(dragged_id.to_string()))?;
        let target = self
            .position(target_id)
            .ok_or_else(|| InventoryError::NotFound(target_id.to_string()))?;

        if self.items[from].is_favorite != self.items[target].is_favorite {
            warn!(dragged_id, target_id, "rejected cross-group reorder");
            return Err(InventoryError::validation(
                "Favorites and non-favorites cannot be reordered across each other.",
            ));
        }

        let dragged = self.items.remove(from);
        let insert_at = if from < target { target - 1 } else { target };
        self.items.insert(insert_at, dragged);
        Ok(())
    }

    /// Imports records, either replacing the inventory or merging by name.
    ///
    /// Every record is validated before anything changes, so a malformed
    /// batch leaves the inventory untouched.
    pub fn bulk_import(
        &mut self,
        records: &[RawItem],
        clear_existing: bool,
    ) -> Result<ImportSummary, InventoryError> {
        if clear_existing {
            let items = self.ingest_all(records, &mut HashSet::new())?;
            let summary = ImportSummary {
                added: items.len(),
                updated: 0,
                total: items.len(),
            };
            self.items = items;
            restore_favorites_first(&mut self.items);
            return Ok(summary);
        }

        let normalized = records
            .iter()
            .map(|raw| raw.normalize(self.default_color).map(|item| (raw, item)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut merged = self.items.clone();
        let mut taken: HashSet<String> = merged.iter().map(|i| i.id.clone()).collect();
        let mut summary = ImportSummary::default();

        for (raw, mut incoming) in normalized {
            if let Some(pos) = merged.iter().position(|i| i.has_name(&incoming.name)) {
                let existing = &mut merged[pos];
                existing.quantity = incoming.quantity;
                if let Some(favorite) = raw.is_favorite {
                    existing.is_favorite = favorite;
                }
                if let Some(color) = raw.parsed_color() {
                    existing.color = color;
                }
                if raw.location.is_some() {
                    existing.location = incoming.location;
                }
                summary.updated += 1;
            } else {
                if !taken.insert(incoming.id.clone()) {
                    incoming.id = generate_id();
                    taken.insert(incoming.id.clone());
                }
                merged.push(incoming);
                summary.added += 1;
            }
        }

        restore_favorites_first(&mut merged);
        summary.total = merged.len();
        self.items = merged;
        Ok(summary)
    }

    /// Parses `json` as an array of item records and imports it
    pub fn import_json(
        &mut self,
        json: &str,
        clear_existing: bool,
    ) -> Result<ImportSummary, InventoryError> {
        let records = parse_import(json)?;
        self.bulk_import(&records, clear_existing)
    }

    /// The inventory in order, without ids
    pub fn export(&self) -> Vec<ExportedItem> {
        self.items.iter().map(Item::to_exported).collect()
    }

    /// Pretty-printed JSON of [`Inventory::export`]
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.export())
    }

    pub fn stats(&self) -> InventoryStats {
        InventoryStats {
            items: self.items.len(),
            favorites: self.items.iter().filter(|i| i.is_favorite).count(),
            total_quantity: self.items.iter().map(|i| u64::from(i.quantity)).sum(),
        }
    }

    /// Normalizes records, assigning fresh ids where missing or taken
    fn ingest_all(
        &self,
        records: &[RawItem],
        taken: &mut HashSet<String>,
    ) -> Result<Vec<Item>, InventoryError> {
        records
            .iter()
            .map(|raw| {
                let mut item = raw.normalize(self.default_color)?;
                if !taken.insert(item.id.clone()) {
                    item.id = generate_id();
                    taken.insert(item.id.clone());
                }
                Ok(item)
            })
            .collect()
    }
}

/// Parses import text into raw records, requiring a JSON array of objects
pub fn parse_import(json: &str) -> Result<Vec<RawItem>, InventoryError> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| InventoryError::MalformedImport(format!("invalid JSON ({})", e)))?;

    let serde_json::Value::Array(entries) = value else {
        return Err(InventoryError::MalformedImport(
            "Invalid JSON format. Expected an array of items.".into(),
        ));
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            if !entry.is_object() {
                return Err(InventoryError::MalformedImport(format!(
                    "entry {} is not an item object",
                    index + 1
                )));
            }
            serde_json::from_value(entry).map_err(|e| {
                InventoryError::MalformedImport(format!("entry {}: {}", index + 1, e))
            })
        })
        .collect()
}
