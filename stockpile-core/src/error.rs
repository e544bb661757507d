//! Error types for inventory operations
//!
//! Every variant carries a message fit to show the user as-is.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// Missing or invalid field; the operation was aborted
    #[error("{0}")]
    Validation(String),

    /// Import payload was not an array of item records
    #[error("Failed to import JSON: {0}")]
    MalformedImport(String),

    /// No item with the given id
    #[error("Item not found: {0}")]
    NotFound(String),
}

impl InventoryError {
    /// Shorthand for a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        InventoryError::Validation(message.into())
    }
}
