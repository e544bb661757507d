use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

use crate::inventory::Inventory;
use crate::suggestions::parse_master_list;

/// File name used for exports when none is given, e.g. `inventory_2024-03-09.json`
pub fn default_export_file_name(date: NaiveDate) -> String {
    format!("inventory_{}.json", date.format("%Y-%m-%d"))
}

/// Export file name for today's local date
pub fn todays_export_file_name() -> String {
    default_export_file_name(chrono::Local::now().date_naive())
}

/// Writes the inventory as pretty-printed JSON (no ids) to `output_path`
pub fn export_json(inventory: &Inventory, output_path: &Path) -> Result<PathBuf> {
    let json = inventory
        .export_json()
        .context("Failed to serialize inventory")?;
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output_path, json)
        .with_context(|| format!("Failed to write export file: {:?}", output_path))?;
    Ok(output_path.to_path_buf())
}

/// Reads an import file's text. Parsing happens in the session so that
/// malformed content is reported like any other import failure.
pub fn read_import_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read import file: {:?}", path))
}

/// Reads a master name list: one name per line, blanks dropped
pub fn read_master_list_file(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read master list: {:?}", path))?;
    Ok(parse_master_list(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(default_export_file_name(date), "inventory_2024-03-09.json");
    }

    #[test]
    fn test_export_then_import_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out/export.json");

        let mut inventory = Inventory::new();
        inventory.add("Tea", "4", None).unwrap();
        export_json(&inventory, &path).unwrap();

        let text = read_import_file(&path).unwrap();
        assert!(text.contains("\"isFavorite\": false"));
        assert!(!text.contains("\"id\""));

        let mut restored = Inventory::new();
        restored.import_json(&text, true).unwrap();
        assert_eq!(restored.export(), inventory.export());
    }

    #[test]
    fn test_read_master_list_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("names.txt");
        fs::write(&path, "Milk\n\nEggs\n  \n").unwrap();
        assert_eq!(read_master_list_file(&path).unwrap(), vec!["Milk", "Eggs"]);
    }
}
