use anyhow::Result;
use inquire::{Confirm, CustomUserError, Select, Text};
use std::path::PathBuf;

use stockpile_core::{ItemColor, NameIndex};

/// Autocomplete source backed by the index's own matching
fn name_suggester(
    index: NameIndex,
) -> impl Fn(&str) -> Result<Vec<String>, CustomUserError> + Clone {
    move |input: &str| {
        Ok(index
            .suggest(input)
            .into_iter()
            .map(str::to_string)
            .collect())
    }
}

/// Prompts for a new item. Names autocomplete from `known_names`.
pub fn prompt_new_item(
    known_names: NameIndex,
    default_color: ItemColor,
) -> Result<(String, String, ItemColor)> {
    let name = Text::new("Item name:")
        .with_autocomplete(name_suggester(known_names))
        .prompt()?;

    let quantity = Text::new("Quantity:").with_default("1").prompt()?;

    let palette = ItemColor::PALETTE.to_vec();
    let cursor = palette
        .iter()
        .position(|c| *c == default_color)
        .unwrap_or(palette.len() - 1);
    let color = Select::new("Color:", palette)
        .with_starting_cursor(cursor)
        .prompt()?;

    Ok((name, quantity, color))
}

/// Asks before a delete goes ahead
pub fn confirm_delete(prompt: &str) -> Result<bool> {
    Ok(Confirm::new(prompt).with_default(false).prompt()?)
}

/// Asks whether an import should replace the inventory. Returns true for
/// replace, false for merge.
pub fn prompt_clear_before_import(current_items: usize) -> Result<bool> {
    let question = format!(
        "Clear the existing {} items before importing? (No merges by name)",
        current_items
    );
    Ok(Confirm::new(&question).with_default(false).prompt()?)
}

/// Prompts the user for inventory registration details
pub fn prompt_register_inventory() -> Result<(String, PathBuf, String, bool)> {
    let name = Text::new("Inventory name:").prompt()?;

    let path_input = Text::new("Data directory or .db file:").prompt()?;
    let path = PathBuf::from(path_input);

    let description = Text::new("Description:").prompt()?;

    let default = Confirm::new("Set as default inventory?").prompt()?;

    Ok((name, path, description, default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_suggester_matches_index() {
        let index = NameIndex::from_stored(vec![
            "Dish Soap".to_string(),
            "Hand Soap".to_string(),
            "Milk".to_string(),
        ]);
        let suggester = name_suggester(index.clone());

        assert_eq!(suggester("SOAP").unwrap(), index.suggest("SOAP"));
        assert_eq!(suggester("soap").unwrap(), vec!["Dish Soap", "Hand Soap"]);
        assert!(suggester("  ").unwrap().is_empty());
    }
}
