use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::InventoryError;

/// Display tag attached to every item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    #[default]
    Gray,
}

impl ItemColor {
    /// The full palette, in display order. The last entry is the default.
    pub const PALETTE: [ItemColor; 7] = [
        ItemColor::Red,
        ItemColor::Orange,
        ItemColor::Yellow,
        ItemColor::Green,
        ItemColor::Blue,
        ItemColor::Purple,
        ItemColor::Gray,
    ];

    /// Parse a color name (case-insensitive). "grey" is accepted as an alias.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "red" => Some(ItemColor::Red),
            "orange" => Some(ItemColor::Orange),
            "yellow" => Some(ItemColor::Yellow),
            "green" => Some(ItemColor::Green),
            "blue" => Some(ItemColor::Blue),
            "purple" => Some(ItemColor::Purple),
            "gray" | "grey" => Some(ItemColor::Gray),
            _ => None,
        }
    }
}

impl fmt::Display for ItemColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemColor::Red => write!(f, "red"),
            ItemColor::Orange => write!(f, "orange"),
            ItemColor::Yellow => write!(f, "yellow"),
            ItemColor::Green => write!(f, "green"),
            ItemColor::Blue => write!(f, "blue"),
            ItemColor::Purple => write!(f, "purple"),
            ItemColor::Gray => write!(f, "gray"),
        }
    }
}

/// A single inventory record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Opaque unique identifier, fixed at creation
    pub id: String,

    /// Display name; uniqueness checks ignore case
    pub name: String,

    pub quantity: u32,

    #[serde(default)]
    pub is_favorite: bool,

    #[serde(default)]
    pub color: ItemColor,

    /// Free-text storage location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Item {
    /// Creates a non-favorite item with a freshly generated id
    pub fn new(name: impl Into<String>, quantity: u32, color: ItemColor) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            quantity,
            is_favorite: false,
            color,
            location: None,
        }
    }

    /// Case-insensitive name comparison used for de-duplication
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Strips the internal id for export
    pub fn to_exported(&self) -> ExportedItem {
        ExportedItem {
            name: self.name.clone(),
            quantity: self.quantity,
            is_favorite: self.is_favorite,
            color: self.color,
            location: self.location.clone(),
        }
    }
}

/// Generates a new opaque item id
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// An item record as it appears in import files and stored snapshots,
/// before defaults are filled in
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    #[serde(default, deserialize_with = "deserialize_loose_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub is_favorite: Option<bool>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Accepts string or numeric ids. Any other value is treated as absent so
/// the record gets a fresh id.
fn deserialize_loose_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(id)) => Some(id),
        Some(serde_json::Value::Number(id)) => Some(id.to_string()),
        _ => None,
    })
}

impl RawItem {
    /// Validates the required fields and fills defaults for the optional ones.
    ///
    /// The returned item keeps the record's id when it has one; callers that
    /// need uniqueness must check it against their own id set.
    pub fn normalize(&self, default_color: ItemColor) -> Result<Item, InventoryError> {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| InventoryError::MalformedImport("record is missing a name".into()))?;

        let quantity = match self.quantity {
            Some(q) => u32::try_from(q).map_err(|_| {
                InventoryError::MalformedImport(format!(
                    "quantity for \"{}\" must be a non-negative number",
                    name
                ))
            })?,
            None => {
                return Err(InventoryError::MalformedImport(format!(
                    "record \"{}\" is missing a quantity",
                    name
                )))
            }
        };

        Ok(Item {
            id: self
                .id
                .clone()
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(generate_id),
            name: name.to_string(),
            quantity,
            is_favorite: self.is_favorite.unwrap_or(false),
            color: self.parsed_color().unwrap_or(default_color),
            location: self.location.clone(),
        })
    }

    /// The record's color, if present and recognised
    pub fn parsed_color(&self) -> Option<ItemColor> {
        self.color.as_deref().and_then(ItemColor::parse)
    }
}

impl From<&Item> for RawItem {
    fn from(item: &Item) -> Self {
        Self {
            id: Some(item.id.clone()),
            name: Some(item.name.clone()),
            quantity: Some(i64::from(item.quantity)),
            is_favorite: Some(item.is_favorite),
            color: Some(item.color.to_string()),
            location: item.location.clone(),
        }
    }
}

/// The externalized shape of an item (no id)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportedItem {
    pub name: String,
    pub quantity: u32,
    pub is_favorite: bool,
    pub color: ItemColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Parses user-entered quantity text as a non-negative integer
pub fn parse_quantity(text: &str) -> Result<u32, InventoryError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(InventoryError::Validation("Please fill all fields.".into()));
    }
    let value: i64 = text.parse().map_err(|_| {
        InventoryError::Validation("Quantity must be a non-negative number.".into())
    })?;
    u32::try_from(value)
        .map_err(|_| InventoryError::Validation("Quantity must be a non-negative number.".into()))
}
