use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "A simple household inventory tracker")]
pub struct Cli {
    /// Data location (a directory, or a .db file for SQLite)
    #[clap(long, global = true)]
    pub data: Option<PathBuf>,

    /// Inventory name to use from the config file
    #[clap(long, short = 'i', global = true)]
    pub inventory: Option<String>,

    /// Log debug output to stderr
    #[clap(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Run against an in-memory copy; nothing is written
    #[clap(long, global = true)]
    pub dry_run: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Register a named inventory
    Register {
        /// Name of the inventory
        #[clap(long)]
        name: Option<String>,

        /// Data directory or SQLite file
        #[clap(long)]
        path: Option<PathBuf>,

        /// Description of the inventory
        #[clap(long)]
        description: Option<String>,

        /// Set this inventory as the default
        #[clap(long)]
        default: bool,

        /// Use interactive mode (prompts)
        #[clap(long)]
        interactive: bool,
    },

    /// Print the data location in use, or that of a named inventory
    Path {
        /// The name of the inventory to look up
        #[clap(long)]
        name: Option<String>,
    },

    /// Print the config file
    Show,
}

#[derive(Subcommand, Debug)]
pub enum DbCommand {
    /// Copy stored data to another location or backend
    Migrate {
        /// Current data location
        from: PathBuf,

        /// New data location
        to: PathBuf,

        /// Backend for the new location (json, sqlite); inferred if omitted
        #[clap(long)]
        to_type: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add an item, or add to its quantity if the name exists
    Add {
        /// Item name
        name: Option<String>,

        /// Quantity to add (defaults to 1)
        quantity: Option<String>,

        /// Color tag (red, orange, yellow, green, blue, purple, gray)
        #[clap(long, short = 'c')]
        color: Option<String>,

        /// Use interactive mode (prompts)
        #[clap(long)]
        interactive: bool,
    },

    /// List items
    List {
        /// Only show items whose name contains this text
        #[clap(long, short = 's')]
        search: Option<String>,

        /// Sort by column (name, quantity)
        #[clap(long)]
        sort: Option<String>,

        /// Sort descending
        #[clap(long)]
        desc: bool,
    },

    /// Increase an item's quantity
    Inc {
        /// Item id, id prefix, or name
        item: String,

        #[clap(long, short = 'n', default_value = "1")]
        by: u32,
    },

    /// Decrease an item's quantity
    Dec {
        /// Item id, id prefix, or name
        item: String,

        #[clap(long, short = 'n', default_value = "1")]
        by: u32,
    },

    /// Set an item's quantity
    Edit {
        /// Item id, id prefix, or name
        item: String,

        /// New quantity
        quantity: String,
    },

    /// Delete an item
    Del {
        /// Item id, id prefix, or name
        item: String,

        /// Skip confirmation
        #[clap(long, short = 'y')]
        yes: bool,
    },

    /// Toggle an item's favorite flag
    Fav {
        /// Item id, id prefix, or name
        item: String,
    },

    /// Move an item so it sits directly before another
    Move {
        /// Item to move
        item: String,

        /// Item it should precede
        #[clap(long)]
        before: String,
    },

    /// Import items from a JSON file
    Import {
        /// JSON file holding an array of items
        file: PathBuf,

        /// Replace the current inventory
        #[clap(long, conflicts_with = "merge")]
        clear: bool,

        /// Merge into the current inventory by name
        #[clap(long)]
        merge: bool,
    },

    /// Export items to a JSON file
    Export {
        /// Output file (defaults to inventory_YYYY-MM-DD.json)
        #[clap(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Suggest item names matching text
    Suggest {
        query: String,
    },

    /// Print every known item name
    Names,

    /// Load extra item names from a text file, one per line
    MasterList {
        file: PathBuf,
    },

    /// Show inventory totals
    Stats,

    /// Manage the config file
    #[clap(subcommand)]
    Config(ConfigCommand),

    /// Storage maintenance
    #[clap(subcommand)]
    Db(DbCommand),
}
