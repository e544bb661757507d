use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::ItemColor;

/// A named inventory location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventoryEntry {
    /// Path to the data directory or SQLite file
    pub path: String,
    #[serde(default)]
    pub description: String,
}

/// User configuration, stored as YAML
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub inventories: BTreeMap<String, InventoryEntry>,

    /// Inventory used when none is named
    #[serde(default)]
    pub default_inventory: Option<String>,

    /// Seed a starter inventory when storage has never held one
    #[serde(default = "default_seed_sample_items")]
    pub seed_sample_items: bool,

    /// Color given to items added without one
    #[serde(default)]
    pub default_color: ItemColor,
}

fn default_seed_sample_items() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inventories: BTreeMap::new(),
            default_inventory: None,
            seed_sample_items: true,
            default_color: ItemColor::default(),
        }
    }
}

impl Config {
    /// Loads the config from `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))
    }

    /// Loads the config, falling back to defaults when the file is absent
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config")
    }

    /// Saves the config to `path`, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_yaml()?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path.as_ref()))?;

        Ok(())
    }

    pub fn get_inventory(&self, name: &str) -> Option<&InventoryEntry> {
        self.inventories.get(name)
    }

    /// Registers a new inventory or updates an existing one
    pub fn register_inventory(&mut self, name: String, path: String, description: String) {
        self.inventories
            .insert(name, InventoryEntry { path, description });
    }

    /// Sets an inventory as the default
    pub fn set_default_inventory(&mut self, name: &str) -> Result<()> {
        if !self.inventories.contains_key(name) {
            anyhow::bail!("Inventory '{}' not found in config", name);
        }
        self.default_inventory = Some(name.to_string());
        Ok(())
    }

    /// Gets the default inventory if set and still registered
    pub fn get_default_inventory(&self) -> Option<(&str, &InventoryEntry)> {
        let name = self.default_inventory.as_deref()?;
        self.inventories.get(name).map(|entry| (name, entry))
    }
}

/// Gets the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var("STOCKPILE_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    let home_dir = dirs::home_dir().context("Failed to determine home directory")?;
    Ok(home_dir.join(".stockpile.config"))
}

/// Default data location when nothing else is configured
pub fn default_data_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .or_else(dirs::home_dir)
        .context("Failed to determine data directory")?;
    Ok(data_dir.join("stockpile"))
}

/// Determines which data location to use.
///
/// Order: explicit path, named inventory, `STOCKPILE_INVENTORY`,
/// `STOCKPILE_DATA`, the only configured inventory, the default inventory,
/// then the platform data directory.
pub fn determine_data_path(
    config: &Config,
    explicit_path: Option<&Path>,
    inventory_name: Option<&str>,
) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(path.to_path_buf());
    }

    if let Some(name) = inventory_name {
        return config
            .get_inventory(name)
            .map(|entry| PathBuf::from(&entry.path))
            .with_context(|| format!("Inventory '{}' not found in config", name));
    }

    if let Ok(name) = env::var("STOCKPILE_INVENTORY") {
        return config
            .get_inventory(&name)
            .map(|entry| PathBuf::from(&entry.path))
            .with_context(|| format!("Inventory '{}' from STOCKPILE_INVENTORY not found", name));
    }

    if let Ok(path) = env::var("STOCKPILE_DATA") {
        return Ok(PathBuf::from(path));
    }

    if config.inventories.len() == 1 {
        if let Some(entry) = config.inventories.values().next() {
            return Ok(PathBuf::from(&entry.path));
        }
    }

    if let Some((_, entry)) = config.get_default_inventory() {
        return Ok(PathBuf::from(&entry.path));
    }

    default_data_path()
}
