//! Autocomplete source for item names
//!
//! The index is the union of a seed list and every name currently in the
//! inventory, deduplicated and sorted in plain (case-sensitive) string
//! order.

use std::collections::BTreeSet;
use tracing::debug;

use crate::inventory::Inventory;
use crate::models::{Item, ItemColor};

/// Built-in names used to bootstrap the index
pub const DEFAULT_ITEM_NAMES: &[&str] = &[
    "Aluminum Foil",
    "Apples",
    "Baking Soda",
    "Bananas",
    "Batteries",
    "Bread",
    "Butter",
    "Canned Tomatoes",
    "Cereal",
    "Cheese",
    "Coffee",
    "Dish Soap",
    "Eggs",
    "Flour",
    "Hand Soap",
    "Laundry Detergent",
    "Light Bulbs",
    "Milk",
    "Olive Oil",
    "Paper Towels",
    "Pasta",
    "Rice",
    "Salt",
    "Shampoo",
    "Sugar",
    "Tea",
    "Toilet Paper",
    "Toothpaste",
    "Trash Bags",
];

/// Seed names as owned strings
pub fn default_seed() -> BTreeSet<String> {
    DEFAULT_ITEM_NAMES.iter().map(|s| s.to_string()).collect()
}

/// Splits an uploaded master list into names: one per line, trimmed,
/// blank lines dropped
pub fn parse_master_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Small starter inventory used when storage has never held one
pub fn sample_items() -> Vec<Item> {
    let mut items = vec![
        Item::new("Coffee", 2, ItemColor::Orange),
        Item::new("Eggs", 12, ItemColor::Yellow),
        Item::new("Milk", 1, ItemColor::Blue),
        Item::new("Paper Towels", 6, ItemColor::Green),
        Item::new("Batteries", 8, ItemColor::Gray),
    ];
    items[0].is_favorite = true;
    items
}

/// Sorted, deduplicated set of known item names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameIndex {
    names: Vec<String>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores an index from a previously stored name list
    pub fn from_stored(names: Vec<String>) -> Self {
        let set: BTreeSet<String> = names.into_iter().collect();
        Self {
            names: set.into_iter().collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Recomputes the index from `seed` and the inventory's names.
    /// Returns true when the content changed, i.e. when it needs saving.
    pub fn rebuild<'a, I>(&mut self, inventory: &'a Inventory, seed: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        let rebuilt: BTreeSet<&str> = seed
            .into_iter()
            .map(String::as_str)
            .chain(inventory.items().iter().map(|item| item.name.as_str()))
            .collect();

        let changed = rebuilt.len() != self.names.len()
            || rebuilt.iter().zip(&self.names).any(|(new, old)| *new != old.as_str());
        if changed {
            self.names = rebuilt.into_iter().map(str::to_string).collect();
            debug!(names = self.names.len(), "name index rebuilt");
        }
        changed
    }

    /// Names containing `query`, ignoring case, in index order. A blank
    /// query yields nothing.
    pub fn suggest(&self, query: &str) -> Vec<&str> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.names
            .iter()
            .filter(|name| name.to_lowercase().contains(&query))
            .map(String::as_str)
            .collect()
    }
}
