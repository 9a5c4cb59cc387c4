//! # Inventory Portal
//!
//! ```text
//! lookup SKU ──► "Product loaded." + details
//!            └─► "New SKU detected."
//!
//! save --sku SKU [fields] ──► form (stored values, or blank for a new SKU)
//!                             │  overlay given fields
//!                             ▼
//!                          validate ──► insert / update
//!                             │
//!                             ▼
//!                "Inventory Updated!" + Recently Updated Items
//! ```

use serde::Serialize;
use std::io::Write;
use tracing::debug;

use crate::cli::SaveArgs;
use crate::error::{CliError, CliResult};
use crate::render::{Output, ProductDto, ProductSummaryDto};
use posai_core::validation::{validate_search_query, validate_sku};
use posai_core::{InventoryForm, SaveOutcome};
use posai_db::Database;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    /// `"loaded"` or `"new"`
    pub status: &'static str,
    pub sku: String,
    pub product: Option<ProductDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResult {
    /// `"outcome": "inserted" | "updated"` plus the row `id`
    #[serde(flatten)]
    pub outcome: SaveOutcome,
    pub sku: String,
    pub recent: Vec<ProductSummaryDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockResult {
    pub sku: String,
    pub current_stock: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResult {
    pub sku: String,
    pub is_active: bool,
}

/// Scans a barcode.
pub async fn lookup<W: Write>(db: &Database, out: &mut Output<W>, sku: &str) -> CliResult<()> {
    let sku = sku.trim();
    validate_sku(sku)?;

    let product = db.products().get_by_sku(sku).await?;
    let result = LookupResult {
        status: if product.is_some() { "loaded" } else { "new" },
        sku: sku.to_string(),
        product: product.map(ProductDto::from),
    };

    out.emit(&result, |o, r| match &r.product {
        Some(product) => {
            o.line("Product loaded.")?;
            o.product(product)
        }
        None => o.line("New SKU detected."),
    })
}

/// Builds the form the way the inventory screen would after a scan.
async fn prepare_form(db: &Database, args: SaveArgs) -> CliResult<InventoryForm> {
    let mut form = InventoryForm::new();
    form.sku = args.sku.trim().to_string();

    if !form.sku.is_empty() {
        match db.products().get_by_sku(&form.sku).await? {
            Some(product) => {
                debug!(sku = %form.sku, "Editing existing product");
                form.load(&product);
            }
            None => form.reset_for_new_sku(),
        }
    }

    if let Some(name) = args.name {
        form.name = name;
    }
    if let Some(category) = args.category {
        form.category = category;
    }
    if let Some(cost) = args.cost_price {
        form.cost_price = cost;
    }
    if let Some(price) = args.selling_price {
        form.selling_price = price;
    }
    if let Some(stock) = args.current_stock {
        form.current_stock = stock;
    }
    if let Some(reorder) = args.reorder_level {
        form.reorder_level = reorder;
    }
    if args.description.is_some() {
        form.description = args.description;
    }
    if args.max_stock.is_some() {
        form.max_stock = args.max_stock;
    }

    Ok(form)
}

/// Saves the inventory form, then shows the refreshed recent list.
pub async fn save<W: Write>(db: &Database, out: &mut Output<W>, args: SaveArgs) -> CliResult<()> {
    let form = prepare_form(db, args).await?;
    let input = form.validate()?;

    let outcome = db.products().save(&input).await?;
    let recent = recent_rows(db, out.config().recent_limit).await?;

    let result = SaveResult {
        outcome,
        sku: input.sku,
        recent,
    };

    out.emit(&result, |o, r| {
        o.line("Inventory Updated!")?;
        o.line("")?;
        o.recent_table(&r.recent)
    })
}

async fn recent_rows(db: &Database, limit: u32) -> CliResult<Vec<ProductSummaryDto>> {
    Ok(db
        .products()
        .recent(limit)
        .await?
        .into_iter()
        .map(ProductSummaryDto::from)
        .collect())
}

pub async fn recent<W: Write>(db: &Database, out: &mut Output<W>, limit: Option<u32>) -> CliResult<()> {
    let limit = limit.unwrap_or(out.config().recent_limit);
    let rows = recent_rows(db, limit).await?;
    out.emit(&rows, |o, r| o.recent_table(r))
}

pub async fn search<W: Write>(
    db: &Database,
    out: &mut Output<W>,
    query: &str,
    limit: u32,
) -> CliResult<()> {
    let query = validate_search_query(query)?;

    let products: Vec<ProductDto> = db
        .products()
        .search(&query, limit)
        .await?
        .into_iter()
        .map(ProductDto::from)
        .collect();

    out.emit(&products, |o, p| o.product_table(p))
}

pub async fn low_stock<W: Write>(db: &Database, out: &mut Output<W>, limit: Option<u32>) -> CliResult<()> {
    let limit = limit.unwrap_or(out.config().low_stock_limit);

    let products: Vec<ProductDto> = db
        .products()
        .low_stock(limit)
        .await?
        .into_iter()
        .map(ProductDto::from)
        .collect();

    out.emit(&products, |o, p| {
        if p.is_empty() {
            o.line("All products are above their reorder level.")
        } else {
            o.line("Low Stock")?;
            o.product_table(p)
        }
    })
}

pub async fn set_active<W: Write>(
    db: &Database,
    out: &mut Output<W>,
    sku: &str,
    active: bool,
) -> CliResult<()> {
    let sku = sku.trim();
    validate_sku(sku)?;

    db.products().set_active(sku, active).await?;

    let result = StatusResult {
        sku: sku.to_string(),
        is_active: active,
    };
    out.emit(&result, |o, r| {
        let state = if r.is_active { "activated" } else { "deactivated" };
        o.line(format!("Product {} {}.", r.sku, state))
    })
}

pub async fn adjust<W: Write>(db: &Database, out: &mut Output<W>, sku: &str, delta: i64) -> CliResult<()> {
    let sku = sku.trim();
    validate_sku(sku)?;
    if delta == 0 {
        return Err(CliError::validation("Adjustment must not be zero"));
    }

    let current_stock = db.products().adjust_stock(sku, delta).await?;

    let result = StockResult {
        sku: sku.to_string(),
        current_stock,
    };
    out.emit(&result, |o, r| {
        o.line(format!("Stock for {} is now {}.", r.sku, r.current_stock))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::error::ErrorCode;
    use posai_db::DbConfig;

    async fn setup(json: bool) -> (Database, Output<Vec<u8>>) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        (db, Output::new(Vec::new(), json, AppConfig::default()))
    }

    fn save_args(sku: &str) -> SaveArgs {
        SaveArgs {
            sku: sku.to_string(),
            ..SaveArgs::default()
        }
    }

    fn printed(out: Output<Vec<u8>>) -> String {
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[tokio::test]
    async fn test_save_new_then_lookup() {
        let (db, mut out) = setup(false).await;

        let args = SaveArgs {
            name: Some("Basmati Rice 1kg".into()),
            cost_price: Some("180".into()),
            selling_price: Some("220.5".into()),
            current_stock: Some("40".into()),
            ..save_args("RICE-1KG")
        };
        save(&db, &mut out, args).await.unwrap();
        lookup(&db, &mut out, "RICE-1KG").await.unwrap();

        let text = printed(out);
        assert!(text.contains("Inventory Updated!"));
        assert!(text.contains("Recently Updated Items"));
        assert!(text.contains("Product loaded."));
        assert!(text.contains("Selling Price:  Rs. 220.50"));
        assert!(text.contains("Unit Margin:    Rs. 40.50"));
        assert!(text.contains("Reorder Level:  10"));
    }

    #[tokio::test]
    async fn test_save_existing_keeps_omitted_fields() {
        let (db, mut out) = setup(true).await;

        let args = SaveArgs {
            name: Some("Tea 250g".into()),
            cost_price: Some("90".into()),
            selling_price: Some("120".into()),
            current_stock: Some("12".into()),
            description: Some("Loose leaf".into()),
            ..save_args("TEA-250")
        };
        save(&db, &mut out, args).await.unwrap();

        let args = SaveArgs {
            selling_price: Some("125".into()),
            ..save_args("TEA-250")
        };
        save(&db, &mut out, args).await.unwrap();

        let product = db.products().get_by_sku("TEA-250").await.unwrap().unwrap();
        assert_eq!(product.name, "Tea 250g");
        assert_eq!(product.selling_price_minor, 12500);
        assert_eq!(product.cost_price_minor, 9000);
        assert_eq!(product.current_stock, 12);
        assert_eq!(product.description.as_deref(), Some("Loose leaf"));

        let text = printed(out);
        let last: serde_json::Value = serde_json::from_str(text.lines().last().unwrap()).unwrap();
        assert_eq!(last["sku"], "TEA-250");
        assert_eq!(last["outcome"], "updated");
        assert_eq!(last["recent"][0]["sellingPrice"], "125.00");
    }

    #[tokio::test]
    async fn test_save_requires_sku_and_name() {
        let (db, mut out) = setup(false).await;

        let err = save(&db, &mut out, save_args("")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "SKU and Name are required!");

        let err = save(&db, &mut out, save_args("NEW-1")).await.unwrap_err();
        assert_eq!(err.message, "SKU and Name are required!");
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_save_rejects_bad_price() {
        let (db, mut out) = setup(false).await;

        let args = SaveArgs {
            name: Some("Soap".into()),
            cost_price: Some("ten".into()),
            selling_price: Some("12".into()),
            ..save_args("SOAP")
        };
        let err = save(&db, &mut out, args).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_lookup_unknown_sku() {
        let (db, mut out) = setup(true).await;
        lookup(&db, &mut out, "NOPE-1").await.unwrap();

        let json: serde_json::Value = serde_json::from_str(printed(out).trim()).unwrap();
        assert_eq!(json["status"], "new");
        assert_eq!(json["product"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_adjust_deactivate_and_low_stock() {
        let (db, mut out) = setup(false).await;

        let args = SaveArgs {
            name: Some("Matches".into()),
            cost_price: Some("1".into()),
            selling_price: Some("2".into()),
            current_stock: Some("15".into()),
            ..save_args("MATCH")
        };
        save(&db, &mut out, args).await.unwrap();

        adjust(&db, &mut out, "MATCH", -6).await.unwrap();
        let err = adjust(&db, &mut out, "MATCH", -100).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        let err = adjust(&db, &mut out, "MATCH", i64::MAX).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        low_stock(&db, &mut out, None).await.unwrap();
        set_active(&db, &mut out, "MATCH", false).await.unwrap();

        let err = set_active(&db, &mut out, "GHOST", true).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let text = printed(out);
        assert!(text.contains("Stock for MATCH is now 9."));
        assert!(text.contains("Low Stock"));
        assert!(text.contains("Product MATCH deactivated."));
    }
}
