pub mod config;
pub mod db;
pub mod dialog;
pub mod error;
pub mod export;
pub mod inventory;
pub mod models;
pub mod session;
pub mod storage;
pub mod suggestions;
pub mod views;

// Re-export commonly used types
pub use config::{default_data_path, determine_data_path, get_config_path, Config, InventoryEntry};
pub use db::{create_backend, snapshot_backend, BackendType, KeyValueBackend, MemoryBackend};
pub use dialog::{Dialog, DialogState};
pub use error::InventoryError;
pub use export::{read_import_file, read_master_list_file, todays_export_file_name};
pub use inventory::{AddOutcome, ImportSummary, Inventory, InventoryStats};
pub use models::{ExportedItem, Item, ItemColor, RawItem};
pub use session::{Outcome, SessionOptions, Tracker};
pub use storage::Storage;
pub use suggestions::NameIndex;
pub use views::{SortColumn, SortDirection, SortState};
