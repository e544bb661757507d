//! Read-only views over an inventory: search filtering and column sorting.
//!
//! Views never change the stored order.

use std::cmp::Ordering;
use std::fmt;

use crate::inventory::Inventory;
use crate::models::Item;

/// Sortable table column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Quantity,
}

impl SortColumn {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Some(SortColumn::Name),
            "quantity" | "qty" => Some(SortColumn::Quantity),
            _ => None,
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortColumn::Name => write!(f, "name"),
            SortColumn::Quantity => write!(f, "quantity"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Current sort of the table view. `None` means stored order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState(Option<(SortColumn, SortDirection)>);

impl SortState {
    pub fn unsorted() -> Self {
        Self(None)
    }

    pub fn by(column: SortColumn, direction: SortDirection) -> Self {
        Self(Some((column, direction)))
    }

    pub fn current(&self) -> Option<(SortColumn, SortDirection)> {
        self.0
    }

    /// Header click: asc, then desc, then back to unsorted. A different
    /// column always starts at ascending.
    pub fn click(self, column: SortColumn) -> Self {
        match self.0 {
            Some((current, SortDirection::Ascending)) if current == column => {
                Self::by(column, SortDirection::Descending)
            }
            Some((current, SortDirection::Descending)) if current == column => Self::unsorted(),
            _ => Self::by(column, SortDirection::Ascending),
        }
    }
}

fn compare(a: &Item, b: &Item, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortColumn::Quantity => a.quantity.cmp(&b.quantity),
    }
}

/// True when `item`'s name contains `term`, ignoring case. A blank term
/// matches everything.
pub fn matches_search(item: &Item, term: &str) -> bool {
    let term = term.trim();
    term.is_empty() || item.name.to_lowercase().contains(&term.to_lowercase())
}

/// Stable sort of borrowed items
pub fn sort_items<'a>(mut items: Vec<&'a Item>, sort: SortState) -> Vec<&'a Item> {
    if let Some((column, direction)) = sort.current() {
        items.sort_by(|a, b| {
            let ordering = compare(a, b, column);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }
    items
}

impl Inventory {
    /// Items whose name contains `term` (case-insensitive), in stored order
    pub fn filtered_view<'a>(&'a self, term: &'a str) -> impl Iterator<Item = &'a Item> + 'a {
        self.items().iter().filter(move |item| matches_search(item, term))
    }

    /// All items sorted by `column`
    pub fn sorted_view(&self, column: SortColumn, direction: SortDirection) -> Vec<&Item> {
        sort_items(self.items().iter().collect(), SortState::by(column, direction))
    }

    /// Filter first, then sort
    pub fn table_view(&self, term: &str, sort: SortState) -> Vec<&Item> {
        let matching = self
            .items()
            .iter()
            .filter(|item| matches_search(item, term))
            .collect();
        sort_items(matching, sort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory() -> Inventory {
        let mut inv = Inventory::new();
        for (name, qty) in [("banana", "7"), ("Apple", "2"), ("cherry", "7"), ("Blueberry", "1")] {
            inv.add(name, qty, None).unwrap();
        }
        inv
    }

    fn names(items: &[&Item]) -> Vec<String> {
        items.iter().map(|i| i.name.clone()).collect()
    }

    #[test]
    fn test_sort_state_cycle() {
        let state = SortState::unsorted().click(SortColumn::Name);
        assert_eq!(state, SortState::by(SortColumn::Name, SortDirection::Ascending));

        let state = state.click(SortColumn::Name);
        assert_eq!(state, SortState::by(SortColumn::Name, SortDirection::Descending));

        let state = state.click(SortColumn::Name);
        assert_eq!(state, SortState::unsorted());

        let switched = SortState::by(SortColumn::Name, SortDirection::Descending)
            .click(SortColumn::Quantity);
        assert_eq!(switched, SortState::by(SortColumn::Quantity, SortDirection::Ascending));
    }

    #[test]
    fn test_sorted_by_name_ignores_case() {
        let inv = inventory();
        let sorted = inv.sorted_view(SortColumn::Name, SortDirection::Ascending);
        assert_eq!(names(&sorted), vec!["Apple", "banana", "Blueberry", "cherry"]);

        let sorted = inv.sorted_view(SortColumn::Name, SortDirection::Descending);
        assert_eq!(names(&sorted), vec!["cherry", "Blueberry", "banana", "Apple"]);
    }

    #[test]
    fn test_sorted_by_quantity_is_stable() {
        let inv = inventory();
        let sorted = inv.sorted_view(SortColumn::Quantity, SortDirection::Ascending);
        assert_eq!(names(&sorted), vec!["Blueberry", "Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_sorting_does_not_touch_stored_order() {
        let inv = inventory();
        let _ = inv.sorted_view(SortColumn::Name, SortDirection::Ascending);
        assert_eq!(inv.items()[0].name, "banana");
    }

    #[test]
    fn test_filtered_view() {
        let inv = inventory();
        let found: Vec<&Item> = inv.filtered_view("ERR").collect();
        assert_eq!(names(&found), vec!["cherry", "Blueberry"]);
        assert_eq!(inv.filtered_view("  ").count(), 4);
        assert_eq!(inv.filtered_view("kiwi").count(), 0);
    }

    #[test]
    fn test_table_view_filters_then_sorts() {
        let inv = inventory();
        let view = inv.table_view("b", SortState::by(SortColumn::Name, SortDirection::Ascending));
        assert_eq!(names(&view), vec!["banana", "Blueberry"]);

        let view = inv.table_view("an", SortState::unsorted());
        assert_eq!(names(&view), vec!["banana"]);
    }

    #[test]
    fn test_table_view_rows_outlive_search_term() {
        let inv = inventory();
        let view = {
            let term = String::from("ERR");
            inv.table_view(&term, SortState::by(SortColumn::Quantity, SortDirection::Descending))
        };
        assert_eq!(names(&view), vec!["cherry", "Blueberry"]);
    }

    #[test]
    fn test_sort_column_parse() {
        assert_eq!(SortColumn::parse("Qty"), Some(SortColumn::Quantity));
        assert_eq!(SortColumn::parse("name"), Some(SortColumn::Name));
        assert_eq!(SortColumn::parse("color"), None);
    }
}
