//! # Command Line
//!
//! ```text
//! posai [--db PATH] [--config PATH] [--json] <COMMAND>
//!
//! (none)       home portal menu
//! init         create / verify tables
//! seed         default categories, optional demo products
//! categories   list | add
//! inventory    lookup | save | recent | search | low-stock
//!              | deactivate | activate | adjust
//! sale         session | quote | checkout
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "posai", version, about = "POS.AI point of sale and inventory")]
pub struct Cli {
    /// SQLite database file (overrides config and POSAI_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Config file (default: platform config dir / posai.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or verify the database tables
    Init,

    /// Insert the default categories, optionally with demo products
    Seed {
        /// Also generate this many demo products
        #[arg(long, default_value_t = 0, value_name = "N")]
        demo_products: usize,
    },

    /// Product categories
    #[command(subcommand)]
    Categories(CategoryCommand),

    /// Inventory portal
    #[command(subcommand)]
    Inventory(InventoryCommand),

    /// Sale portal
    #[command(subcommand)]
    Sale(SaleCommand),
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    /// List categories with their IDs
    List,

    /// Add a category
    Add {
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// Parent category ID
        #[arg(long, value_name = "ID")]
        parent: Option<i64>,
    },
}

#[derive(Debug, Subcommand)]
pub enum InventoryCommand {
    /// Scan a barcode: show the product or report a new SKU
    Lookup { sku: String },

    /// Save a product (insert a new SKU, update an existing one)
    Save(SaveArgs),

    /// Recently updated items
    Recent {
        #[arg(long, value_name = "N")]
        limit: Option<u32>,
    },

    /// Find active products by SKU or name
    Search {
        #[arg(default_value = "")]
        query: String,

        #[arg(long, default_value_t = 20, value_name = "N")]
        limit: u32,
    },

    /// Products at or below their reorder level
    LowStock {
        #[arg(long, value_name = "N")]
        limit: Option<u32>,
    },

    /// Hide a product from sale
    Deactivate { sku: String },

    /// Make a product sellable again
    Activate { sku: String },

    /// Add to (or, with a negative number, take from) stock
    Adjust {
        sku: String,

        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
}

/// Inventory form fields.
///
/// For an existing SKU, omitted fields keep their stored values. For a new
/// SKU they start blank, with stock 0 and reorder level 10.
#[derive(Debug, Default, Args)]
pub struct SaveArgs {
    #[arg(long, default_value = "")]
    pub sku: String,

    #[arg(long)]
    pub name: Option<String>,

    /// Category ID (see `posai categories list`); empty for none
    #[arg(long, value_name = "ID")]
    pub category: Option<String>,

    #[arg(long = "cost", value_name = "AMOUNT")]
    pub cost_price: Option<String>,

    #[arg(long = "price", value_name = "AMOUNT")]
    pub selling_price: Option<String>,

    #[arg(long = "stock", value_name = "N")]
    pub current_stock: Option<String>,

    #[arg(long = "reorder", value_name = "N")]
    pub reorder_level: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_name = "N")]
    pub max_stock: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum SaleCommand {
    /// Interactive sale: scan items, then checkout
    Session,

    /// Price a list of items without selling them
    Quote {
        /// SKU or SKU:QTY, repeatable
        #[arg(long = "item", required = true, value_name = "SKU[:QTY]")]
        items: Vec<String>,
    },

    /// Sell a list of items in one go
    Checkout {
        /// SKU or SKU:QTY, repeatable
        #[arg(long = "item", required = true, value_name = "SKU[:QTY]")]
        items: Vec<String>,
    },
}
