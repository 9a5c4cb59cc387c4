//! # Sale Repository
//!
//! Commits a cart: every line takes its quantity off the shelf, or nothing
//! does.
//!
//! ## Checkout Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    for each cart line:                                                  │
//! │      UPDATE PRODUCTS SET CURRENT_STOCK = CURRENT_STOCK - qty            │
//! │      WHERE SKU = ? AND IS_ACTIVE AND CURRENT_STOCK >= qty               │
//! │         │                                                               │
//! │         ├── 1 row  ──► next line                                        │
//! │         └── 0 rows ──► why? NotFound / InsufficientStock ──► ROLLBACK   │
//! │  COMMIT ──► Receipt { id, receipt_number, lines, total }                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart's frozen prices are what the receipt shows; the shelf price at
//! commit time is not re-read.

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use posai_core::{Cart, CartItem, Receipt, ReceiptLine};

#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Decrements stock for every line of `cart` in one transaction.
    ///
    /// ## Errors
    /// - `NotFound` if a SKU is unknown or was deactivated since scanning
    /// - `InsufficientStock` if the shelf no longer covers a line
    ///
    /// Any error leaves every product's stock untouched.
    pub async fn checkout(&self, cart: &Cart) -> DbResult<Receipt> {
        if cart.is_empty() {
            return Err(DbError::Internal("checkout called with an empty cart".to_string()));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        for item in &cart.items {
            take_from_shelf(&mut tx, item).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let completed_at = Utc::now();
        let receipt = Receipt {
            id: Uuid::new_v4().to_string(),
            receipt_number: generate_receipt_number(completed_at),
            lines: cart
                .items
                .iter()
                .map(|item| ReceiptLine {
                    sku: item.sku.clone(),
                    name: item.name.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    line_total: item.line_total(),
                })
                .collect(),
            total_quantity: cart.total_quantity(),
            total: cart.customer_total(),
            completed_at,
        };

        info!(
            receipt_number = %receipt.receipt_number,
            lines = receipt.lines.len(),
            total = receipt.total.minor_units(),
            "Checkout committed"
        );
        Ok(receipt)
    }
}

async fn take_from_shelf(tx: &mut Transaction<'_, Sqlite>, item: &CartItem) -> DbResult<()> {
    debug!(sku = %item.sku, quantity = item.quantity, "Decrementing stock");

    let result = sqlx::query(
        r#"
        UPDATE PRODUCTS
        SET CURRENT_STOCK = CURRENT_STOCK - ?1,
            UPDATED_AT = CURRENT_TIMESTAMP
        WHERE SKU = ?2
          AND COALESCE(IS_ACTIVE, 1) = 1
          AND CURRENT_STOCK >= ?1
        "#,
    )
    .bind(item.quantity)
    .bind(&item.sku)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 1 {
        return Ok(());
    }

    let row: Option<(i64, bool)> = sqlx::query_as(
        "SELECT CURRENT_STOCK, COALESCE(IS_ACTIVE, 1) FROM PRODUCTS WHERE SKU = ?",
    )
    .bind(&item.sku)
    .fetch_optional(&mut **tx)
    .await?;

    warn!(sku = %item.sku, "Checkout line rejected, rolling back");

    match row {
        Some((available, true)) => Err(DbError::InsufficientStock {
            sku: item.sku.clone(),
            available,
            requested: item.quantity,
        }),
        Some((_, false)) => Err(DbError::not_found("Active product", item.sku.clone())),
        None => Err(DbError::not_found("Product", item.sku.clone())),
    }
}

/// `YYMMDD-HHMMSS-NNNN`, the last part taken from the sub-second clock.
fn generate_receipt_number(at: DateTime<Utc>) -> String {
    let seq = at.timestamp_subsec_micros() % 10_000;
    format!("{}-{:04}", at.format("%y%m%d-%H%M%S"), seq)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::TimeZone;
    use posai_core::{Money, ProductInput};

    async fn setup() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for (sku, price, stock) in [("COKE-330", 4000, 10), ("RICE-1KG", 12050, 2)] {
            db.products()
                .save(&ProductInput {
                    sku: sku.to_string(),
                    name: format!("Product {}", sku),
                    category_id: None,
                    cost_price: Money::from_minor(price / 2),
                    selling_price: Money::from_minor(price),
                    current_stock: stock,
                    reorder_level: 1,
                    description: None,
                    max_stock: None,
                })
                .await
                .unwrap();
        }
        db
    }

    async fn cart_of(db: &Database, lines: &[(&str, i64)]) -> Cart {
        let mut cart = Cart::new();
        for (sku, qty) in lines {
            let product = db.products().get_by_sku(sku).await.unwrap().unwrap();
            cart.add_item(&product, *qty).unwrap();
        }
        cart
    }

    async fn stock(db: &Database, sku: &str) -> i64 {
        db.products().get_by_sku(sku).await.unwrap().unwrap().current_stock
    }

    #[test]
    fn test_receipt_number_format() {
        let at = Utc.with_ymd_and_hms(2026, 3, 7, 14, 5, 9).unwrap();
        let number = generate_receipt_number(at);
        assert_eq!(number, "260307-140509-0000");
    }

    #[tokio::test]
    async fn test_checkout_decrements_stock() {
        let db = setup().await;
        let cart = cart_of(&db, &[("COKE-330", 3), ("RICE-1KG", 2)]).await;

        let receipt = db.sales().checkout(&cart).await.unwrap();

        assert_eq!(receipt.lines.len(), 2);
        assert_eq!(receipt.total_quantity, 5);
        assert_eq!(receipt.total.minor_units(), 3 * 4000 + 2 * 12050);
        assert_eq!(receipt.receipt_number.len(), 18);
        assert!(Uuid::parse_str(&receipt.id).is_ok());

        assert_eq!(stock(&db, "COKE-330").await, 7);
        assert_eq!(stock(&db, "RICE-1KG").await, 0);
    }

    #[tokio::test]
    async fn test_checkout_rolls_back_on_short_shelf() {
        let db = setup().await;
        let cart = cart_of(&db, &[("COKE-330", 3), ("RICE-1KG", 2)]).await;

        // Someone else sells the rice first
        db.products().adjust_stock("RICE-1KG", -1).await.unwrap();

        match db.sales().checkout(&cart).await.unwrap_err() {
            DbError::InsufficientStock {
                sku,
                available,
                requested,
            } => {
                assert_eq!(sku, "RICE-1KG");
                assert_eq!(available, 1);
                assert_eq!(requested, 2);
            }
            other => panic!("unexpected: {other:?}"),
        }

        assert_eq!(stock(&db, "COKE-330").await, 10);
        assert_eq!(stock(&db, "RICE-1KG").await, 1);
    }

    #[tokio::test]
    async fn test_checkout_rejects_deactivated_product() {
        let db = setup().await;
        let cart = cart_of(&db, &[("COKE-330", 1)]).await;
        db.products().set_active("COKE-330", false).await.unwrap();

        assert!(matches!(
            db.sales().checkout(&cart).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
        assert_eq!(stock(&db, "COKE-330").await, 10);
    }

    #[tokio::test]
    async fn test_checkout_empty_cart() {
        let db = setup().await;
        assert!(db.sales().checkout(&Cart::new()).await.is_err());
    }
}
