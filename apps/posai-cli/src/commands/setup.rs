//! # Setup Commands
//!
//! `posai init` and `posai seed`.
//!
//! ## Seed Data
//! - The four default categories (skipped if present)
//! - Optionally N demo products spread over those categories:
//!   SKU `{CODE}-{NNNN}`, prices Rs. 20.00 - Rs. 999.00, stock 0 - 60

use serde::Serialize;
use std::io::Write;
use tracing::{info, warn};

use crate::error::CliResult;
use crate::render::Output;
use posai_core::{Money, ProductInput};
use posai_db::Database;

/// Demo catalog per default category: (category, SKU code, names).
const DEMO_CATALOG: &[(&str, &str, &[&str])] = &[
    (
        "Electronics",
        "ELC",
        &[
            "USB Cable",
            "Phone Charger",
            "Earphones",
            "Power Bank",
            "LED Bulb",
            "Extension Board",
            "AA Batteries",
            "Memory Card",
        ],
    ),
    (
        "Clothing",
        "CLO",
        &[
            "Cotton T-Shirt",
            "Socks Pair",
            "Handkerchief Set",
            "Cap",
            "Kurta",
            "Dupatta",
            "Track Pants",
            "Vest",
        ],
    ),
    (
        "Home & Kitchen",
        "HMK",
        &[
            "Steel Tumbler",
            "Pressure Cooker Gasket",
            "Dish Sponge",
            "Matchbox Pack",
            "Tea Strainer",
            "Plastic Bucket",
            "Broom",
            "Kitchen Towel",
        ],
    ),
    (
        "Books",
        "BKS",
        &[
            "Notebook 200pg",
            "Drawing Book",
            "Urdu Reader",
            "English Grammar",
            "Atlas",
            "Dictionary",
            "Story Book",
            "Diary",
        ],
    ),
];

const SIZES: &[(&str, i64)] = &[("", 0), ("Large", 5000), ("Pack of 3", 12000)];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitReport {
    pub database_path: String,
    pub tables: Vec<String>,
    pub migrations: usize,
    pub migrations_applied: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub categories_inserted: u64,
    pub products_requested: usize,
    pub products_inserted: usize,
    pub products_skipped: bool,
}

/// Creates or verifies the schema and lists the tables.
pub async fn init<W: Write>(db: &Database, out: &mut Output<W>, database_path: &str) -> CliResult<()> {
    db.run_migrations().await?;

    let tables = db.list_tables().await?;
    let (migrations, migrations_applied) = db.migration_status().await?;

    let report = InitReport {
        database_path: database_path.to_string(),
        tables,
        migrations,
        migrations_applied,
    };

    out.emit(&report, |o, r| {
        o.line(format!("Initializing database at {}...", r.database_path))?;
        o.line(format!("Created / verified tables: {}", r.tables.join(", ")))?;
        o.line("Database initialized successfully.")
    })
}

/// Inserts default categories and, when asked, demo products.
///
/// Demo products are only generated into an empty PRODUCTS table.
pub async fn seed<W: Write>(db: &Database, out: &mut Output<W>, demo_products: usize) -> CliResult<()> {
    let categories_inserted = db.categories().seed_defaults().await?;

    let mut products_inserted = 0;
    let mut products_skipped = false;

    if demo_products > 0 {
        let existing = db.products().count().await?;
        if existing > 0 {
            warn!(existing = existing, "Products already present, skipping demo products");
            products_skipped = true;
        } else {
            let capacity = demo_capacity();
            if demo_products > capacity {
                warn!(
                    requested = demo_products,
                    capacity = capacity,
                    "Demo catalog is smaller than requested"
                );
            }
            products_inserted = seed_demo_products(db, demo_products.min(capacity)).await?;
        }
    }

    let report = SeedReport {
        categories_inserted,
        products_requested: demo_products,
        products_inserted,
        products_skipped,
    };

    out.emit(&report, |o, r| {
        o.line(format!("Categories added: {}", r.categories_inserted))?;
        if r.products_skipped {
            o.line("Products already exist; demo products skipped.")?;
        } else if r.products_inserted > 0 {
            o.line(format!("Demo products added: {}", r.products_inserted))?;
            if r.products_inserted < r.products_requested {
                o.line(format!(
                    "Only {} demo products exist; {} requested.",
                    r.products_inserted, r.products_requested
                ))?;
            }
        }
        o.line("Seed complete.")
    })
}

async fn seed_demo_products(db: &Database, count: usize) -> CliResult<usize> {
    let mut generated = 0;

    'catalog: for (size_idx, (size_name, size_addon)) in SIZES.iter().enumerate() {
        for (code_idx, (category, code, names)) in DEMO_CATALOG.iter().enumerate() {
            let category_id = db.categories().get_by_name(category).await?.map(|c| c.id);

            for (name_idx, name) in names.iter().enumerate() {
                if generated >= count {
                    break 'catalog;
                }

                let seed = size_idx * 1000 + code_idx * 100 + name_idx;
                let input = demo_product(code, name, size_name, *size_addon, category_id, seed);
                db.products().save(&input).await?;
                generated += 1;
            }
        }
    }

    info!(generated = generated, "Demo products generated");
    Ok(generated)
}

fn demo_product(
    code: &str,
    name: &str,
    size: &str,
    size_addon: i64,
    category_id: Option<i64>,
    seed: usize,
) -> ProductInput {
    let seed = seed as i64;

    // Rs. 20.00 - Rs. 999.00 before the size add-on
    let selling = 2000 + (seed * 1733) % 97_900 + size_addon;
    let cost = selling * 3 / 4;
    let stock = (seed * 7) % 61;

    let name = if size.is_empty() {
        name.to_string()
    } else {
        format!("{} {}", name, size)
    };

    ProductInput {
        sku: format!("{}-{:04}", code, seed),
        name,
        category_id,
        cost_price: Money::from_minor(cost),
        selling_price: Money::from_minor(selling),
        current_stock: stock,
        reorder_level: posai_core::DEFAULT_REORDER_LEVEL,
        description: None,
        max_stock: None,
    }
}

/// Number of distinct demo products available.
fn demo_capacity() -> usize {
    SIZES.len() * DEMO_CATALOG.iter().map(|(_, _, names)| names.len()).sum::<usize>()
}
