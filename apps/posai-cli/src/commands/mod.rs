//! # Command Handlers
//!
//! One module per portal. Each handler takes the open [`Database`] and an
//! [`Output`], and returns `CliResult<()>`.

pub mod category;
pub mod inventory;
pub mod sale;
pub mod setup;

use std::io::{BufRead, Write};

use crate::cli::{CategoryCommand, Command, InventoryCommand, SaleCommand};
use crate::error::CliResult;
use crate::render::Output;
use posai_db::Database;

/// Runs one subcommand. `input` is only read by the sale session.
pub async fn dispatch<R: BufRead, W: Write>(
    command: Command,
    db: &Database,
    database_path: &str,
    input: R,
    out: &mut Output<W>,
) -> CliResult<()> {
    match command {
        Command::Init => setup::init(db, out, database_path).await,
        Command::Seed { demo_products } => setup::seed(db, out, demo_products).await,

        Command::Categories(CategoryCommand::List) => category::list(db, out).await,
        Command::Categories(CategoryCommand::Add {
            name,
            description,
            parent,
        }) => category::add(db, out, &name, description, parent).await,

        Command::Inventory(cmd) => match cmd {
            InventoryCommand::Lookup { sku } => inventory::lookup(db, out, &sku).await,
            InventoryCommand::Save(args) => inventory::save(db, out, args).await,
            InventoryCommand::Recent { limit } => inventory::recent(db, out, limit).await,
            InventoryCommand::Search { query, limit } => {
                inventory::search(db, out, &query, limit).await
            }
            InventoryCommand::LowStock { limit } => inventory::low_stock(db, out, limit).await,
            InventoryCommand::Deactivate { sku } => {
                inventory::set_active(db, out, &sku, false).await
            }
            InventoryCommand::Activate { sku } => inventory::set_active(db, out, &sku, true).await,
            InventoryCommand::Adjust { sku, delta } => {
                inventory::adjust(db, out, &sku, delta).await
            }
        },

        Command::Sale(cmd) => match cmd {
            SaleCommand::Session => sale::session(db, out, input).await,
            SaleCommand::Quote { items } => sale::quote(db, out, &items).await,
            SaleCommand::Checkout { items } => sale::checkout(db, out, &items).await,
        },
    }
}
