mod cli;
mod prompts;

use anyhow::{Context, Result};
use clap::Parser;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use stockpile_core::db::migrate;
use stockpile_core::export::export_json;
use stockpile_core::{
    create_backend, determine_data_path, get_config_path, read_import_file, read_master_list_file,
    snapshot_backend, todays_export_file_name, BackendType, Config, ItemColor, KeyValueBackend,
    Outcome, SessionOptions, SortColumn, SortDirection, SortState, Tracker,
};

use crate::cli::{Cli, Command, ConfigCommand, DbCommand};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = get_config_path()?;
    let config = Config::load_or_default(&config_path)?;

    match &cli.command {
        Command::Config(config_cmd) => {
            return handle_config_command(config_cmd, &cli, config, &config_path);
        }
        Command::Db(db_cmd) => {
            return handle_db_command(db_cmd, cli.dry_run);
        }
        _ => {}
    }

    // Determine which data location to use
    let data_path = determine_data_path(&config, cli.data.as_deref(), cli.inventory.as_deref())?;
    let backend = open_backend(&data_path, cli.dry_run)?;
    debug!(path = %data_path.display(), backend = %backend.backend_type(), "opening inventory");

    let mut tracker = Tracker::open(backend, SessionOptions::from(&config));
    if let Some(notice) = tracker.dialog().message() {
        eprintln!("{} {}", "!".yellow(), notice);
    }
    tracker.dismiss();

    match &cli.command {
        Command::Add {
            name,
            quantity,
            color,
            interactive,
        } => {
            // Default to interactive mode if no name is provided
            if *interactive || name.is_none() {
                add_item_interactive(&mut tracker, config.default_color)?;
            } else {
                let name = name.as_deref().unwrap_or_default();
                let color = parse_color(color.as_deref())?;
                let outcome = tracker.add(name, quantity.as_deref().unwrap_or("1"), color)?;
                report(&outcome);
            }
        }
        Command::List { search, sort, desc } => {
            list_items(&tracker, search.as_deref(), sort.as_deref(), *desc)?;
        }
        Command::Inc { item, by } => {
            let id = resolve_id(&tracker, item)?;
            report(&tracker.adjust_quantity(&id, i64::from(*by))?);
        }
        Command::Dec { item, by } => {
            let id = resolve_id(&tracker, item)?;
            report(&tracker.adjust_quantity(&id, -i64::from(*by))?);
        }
        Command::Edit { item, quantity } => {
            let id = resolve_id(&tracker, item)?;
            report(&tracker.edit(&id, quantity)?);
        }
        Command::Del { item, yes } => {
            delete_item(&mut tracker, item, *yes)?;
        }
        Command::Fav { item } => {
            let id = resolve_id(&tracker, item)?;
            report(&tracker.toggle_favorite(&id)?);
        }
        Command::Move { item, before } => {
            let dragged = resolve_id(&tracker, item)?;
            let target = resolve_id(&tracker, before)?;
            report(&tracker.reorder(&dragged, &target)?);
        }
        Command::Import { file, clear, merge } => {
            import_items(&mut tracker, file, *clear, *merge)?;
        }
        Command::Export { output } => {
            let output = output
                .clone()
                .unwrap_or_else(|| PathBuf::from(todays_export_file_name()));
            let written = export_json(tracker.inventory(), &output)?;
            println!(
                "{} Exported {} items to {}",
                "✓".green(),
                tracker.inventory().len(),
                written.display()
            );
        }
        Command::Suggest { query } => {
            let suggestions = tracker.suggest(query);
            if suggestions.is_empty() {
                println!("{}", "No suggestions.".yellow());
            }
            for name in suggestions {
                println!("{}", name);
            }
        }
        Command::Names => {
            for name in tracker.names().names() {
                println!("{}", name);
            }
        }
        Command::MasterList { file } => {
            let names = read_master_list_file(file)?;
            report(&tracker.merge_master_list(names));
        }
        Command::Stats => {
            let stats = tracker.stats();
            println!("{:<16} {}", "Items:".bold(), stats.items);
            println!("{:<16} {}", "Favorites:".bold(), stats.favorites);
            println!("{:<16} {}", "Total quantity:".bold(), stats.total_quantity);
            println!("{:<16} {}", "Known names:".bold(), tracker.names().len());
        }
        // Handled before storage is opened
        Command::Config(_) | Command::Db(_) => {}
    }

    if cli.dry_run {
        println!("{}", "Dry run: no changes were saved.".yellow());
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("STOCKPILE_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_backend(data_path: &Path, dry_run: bool) -> Result<Box<dyn KeyValueBackend>> {
    if dry_run {
        let snapshot = snapshot_backend(data_path, None)
            .with_context(|| format!("Failed to read {:?} for dry run", data_path))?;
        return Ok(Box::new(snapshot));
    }
    create_backend(data_path, None)
}

fn report(outcome: &Outcome) {
    println!("{} {}", "✓".green(), outcome.message);
    if let Some(err) = &outcome.storage_error {
        eprintln!("{} Changes could not be saved: {}", "!".yellow(), err);
    }
}

fn resolve_id(tracker: &Tracker, reference: &str) -> Result<String> {
    Ok(tracker.inventory().resolve(reference)?.id.clone())
}

fn parse_color(color: Option<&str>) -> Result<Option<ItemColor>> {
    color
        .map(|c| {
            ItemColor::parse(c).with_context(|| {
                format!(
                    "Unknown color '{}'. Valid colors: red, orange, yellow, green, blue, purple, gray",
                    c
                )
            })
        })
        .transpose()
}

fn terminal_color(color: ItemColor) -> Color {
    match color {
        ItemColor::Red => Color::Red,
        ItemColor::Orange => Color::TrueColor {
            r: 255,
            g: 165,
            b: 0,
        },
        ItemColor::Yellow => Color::Yellow,
        ItemColor::Green => Color::Green,
        ItemColor::Blue => Color::Blue,
        ItemColor::Purple => Color::Magenta,
        ItemColor::Gray => Color::BrightBlack,
    }
}

fn add_item_interactive(tracker: &mut Tracker, default_color: ItemColor) -> Result<()> {
    let known_names = tracker.names().clone();
    let (name, quantity, color) = crate::prompts::prompt_new_item(known_names, default_color)?;
    let outcome = tracker.add(&name, &quantity, Some(color))?;
    report(&outcome);
    Ok(())
}

fn list_items(
    tracker: &Tracker,
    search: Option<&str>,
    sort: Option<&str>,
    descending: bool,
) -> Result<()> {
    let sort_state = match sort {
        Some(column) => {
            let column = SortColumn::parse(column)
                .with_context(|| format!("Unknown sort column '{}'. Use name or quantity", column))?;
            let direction = if descending {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            SortState::by(column, direction)
        }
        None => SortState::unsorted(),
    };

    let items = tracker
        .inventory()
        .table_view(search.unwrap_or_default(), sort_state);

    if items.is_empty() {
        println!("{}", "No items found.".yellow());
        return Ok(());
    }

    println!("{:<2} {:<8} | {:<30} | {:>8} | {:<8}", "", "ID", "Name", "Qty", "Color");
    println!("{}", "-".repeat(66));

    for item in items {
        let favorite = if item.is_favorite {
            "★".yellow()
        } else {
            " ".normal()
        };
        let short_id: String = item.id.chars().take(8).collect();
        let quantity = if item.quantity == 0 {
            item.quantity.to_string().red()
        } else {
            item.quantity.to_string().normal()
        };

        println!(
            "{:<2} {:<8} | {:<30} | {:>8} | {:<8}",
            favorite,
            short_id,
            item.name.color(terminal_color(item.color)),
            quantity,
            item.color
        );
    }

    Ok(())
}

fn delete_item(tracker: &mut Tracker, reference: &str, skip_confirm: bool) -> Result<()> {
    let id = resolve_id(tracker, reference)?;
    let prompt = tracker.request_delete(&id)?;

    // Confirm deletion unless --yes flag is used
    if !skip_confirm && !crate::prompts::confirm_delete(&prompt)? {
        tracker.cancel_delete();
        println!("{}", "Deletion cancelled.".yellow());
        return Ok(());
    }

    if let Some(outcome) = tracker.confirm_delete() {
        report(&outcome);
    }
    Ok(())
}

fn import_items(tracker: &mut Tracker, file: &Path, clear: bool, merge: bool) -> Result<()> {
    let json = read_import_file(file)?;

    let clear_existing = if clear || merge || tracker.inventory().is_empty() {
        clear
    } else {
        crate::prompts::prompt_clear_before_import(tracker.inventory().len())?
    };

    let outcome = tracker.import_json(&json, clear_existing)?;
    report(&outcome);
    Ok(())
}

fn handle_config_command(
    cmd: &ConfigCommand,
    cli: &Cli,
    mut config: Config,
    config_path: &Path,
) -> Result<()> {
    match cmd {
        ConfigCommand::Register {
            name,
            path,
            description,
            default,
            interactive,
        } => {
            // Default to interactive mode if no specific arguments are provided
            let should_be_interactive =
                *interactive || (name.is_none() && path.is_none() && description.is_none());

            let (inventory_name, inventory_path, inventory_description, is_default) =
                if should_be_interactive {
                    crate::prompts::prompt_register_inventory()?
                } else {
                    let inventory_name = name
                        .clone()
                        .ok_or_else(|| anyhow::anyhow!("Inventory name is required"))?;
                    let inventory_path = path
                        .clone()
                        .ok_or_else(|| anyhow::anyhow!("Inventory path is required"))?;
                    let inventory_description = description.clone().unwrap_or_default();

                    (inventory_name, inventory_path, inventory_description, *default)
                };

            config.register_inventory(
                inventory_name.clone(),
                inventory_path.to_string_lossy().to_string(),
                inventory_description,
            );
            if is_default {
                config.set_default_inventory(&inventory_name)?;
            }
            config.save(config_path)?;

            println!(
                "{} Inventory '{}' registered successfully.",
                "✓".green(),
                inventory_name
            );
            if is_default {
                println!("{} Inventory '{}' set as default.", "✓".green(), inventory_name);
            }
        }
        ConfigCommand::Path { name } => {
            if let Some(inventory_name) = name {
                match config.get_inventory(inventory_name) {
                    Some(entry) => println!("{}", entry.path),
                    None => println!(
                        "{} Inventory '{}' not found in config. Use 'stock config register' to add it.",
                        "!".yellow(),
                        inventory_name
                    ),
                }
            } else {
                let data_path =
                    determine_data_path(&config, cli.data.as_deref(), cli.inventory.as_deref())?;
                println!("{}", data_path.display());
            }
        }
        ConfigCommand::Show => {
            println!("{} {}", "Config file:".bold(), config_path.display());
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}

fn handle_db_command(cmd: &DbCommand, dry_run: bool) -> Result<()> {
    match cmd {
        DbCommand::Migrate { from, to, to_type } => {
            let to_type = to_type
                .as_deref()
                .map(|t| {
                    BackendType::parse(t)
                        .with_context(|| format!("Unknown backend '{}'. Use json or sqlite", t))
                })
                .transpose()?;

            if dry_run {
                let source = snapshot_backend(from, None)?;
                println!(
                    "{} Would copy {} documents from {} to {}",
                    "~".yellow(),
                    source.keys()?.len(),
                    from.display(),
                    to.display()
                );
                return Ok(());
            }

            let copied = migrate(from, to, to_type)?;
            println!(
                "{} Copied {} documents from {} to {}",
                "✓".green(),
                copied,
                from.display(),
                to.display()
            );
        }
    }

    Ok(())
}
