//! # Product Repository
//!
//! Database operations for `PRODUCTS`.
//!
//! ## Save / Update Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    save(input) in one transaction                       │
//! │                                                                         │
//! │  SELECT ID FROM PRODUCTS WHERE SKU = ?                                 │
//! │       │                                                                 │
//! │       ├── row found ──► UPDATE ... UPDATED_AT = CURRENT_TIMESTAMP      │
//! │       │                  └──► SaveOutcome::Updated { id }              │
//! │       │                                                                 │
//! │       └── no row ─────► INSERT INTO PRODUCTS (...)                     │
//! │                          └──► SaveOutcome::Inserted { id }             │
//! │                                                                         │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Money Columns
//! `COST_PRICE` and `SELLING_PRICE` are `DECIMAL(10,2)`. Prices are bound as
//! decimal text and selected as `CAST(ROUND(col * 100) AS INTEGER)` so no
//! float ever reaches Rust.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use posai_core::{Product, ProductInput, ProductSummary, SaveOutcome};

const SELECT_PRODUCT: &str = r#"
    SELECT
        p.ID AS id,
        p.SKU AS sku,
        p.NAME AS name,
        p.DESCRIPTION AS description,
        p.CATEGORY_ID AS category_id,
        c.NAME AS category_name,
        p.SUPPLIER_ID AS supplier_id,
        CAST(ROUND(p.COST_PRICE * 100) AS INTEGER) AS cost_price_minor,
        CAST(ROUND(p.SELLING_PRICE * 100) AS INTEGER) AS selling_price_minor,
        p.CURRENT_STOCK AS current_stock,
        p.REORDER_LEVEL AS reorder_level,
        p.MAX_STOCK AS max_stock,
        COALESCE(p.IS_ACTIVE, 1) AS is_active,
        p.CREATED_AT AS created_at,
        p.UPDATED_AT AS updated_at
    FROM PRODUCTS p
    LEFT JOIN CATEGORIES c ON c.ID = p.CATEGORY_ID
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// // Barcode scan
/// let product = repo.get_by_sku("8901030865278").await?;
///
/// // "Recently Updated Items"
/// let rows = repo.recent(5).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Looks up a product by its scanned SKU, active or not.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found, with its category name
    /// * `Ok(None)` - SKU not registered
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let sku = sku.trim();
        debug!(sku = %sku, "Looking up product");

        let sql = format!("{SELECT_PRODUCT} WHERE p.SKU = ?");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(sku)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts the product, or updates it in place if its SKU exists.
    ///
    /// `description` and `max_stock` keep their stored values on update when
    /// the input leaves them as `None`.
    ///
    /// ## Errors
    /// - `ForeignKeyViolation` if `category_id` is not a category
    /// - `CheckViolation` if a value slipped past validation
    pub async fn save(&self, input: &ProductInput) -> DbResult<SaveOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let existing: Option<i64> = sqlx::query_scalar("SELECT ID FROM PRODUCTS WHERE SKU = ?")
            .bind(&input.sku)
            .fetch_optional(&mut *tx)
            .await?;

        let cost_price = input.cost_price.to_decimal_string();
        let selling_price = input.selling_price.to_decimal_string();

        let outcome = match existing {
            Some(id) => {
                sqlx::query(
                    r#"
                    UPDATE PRODUCTS SET
                        NAME = ?,
                        CATEGORY_ID = ?,
                        COST_PRICE = ?,
                        SELLING_PRICE = ?,
                        CURRENT_STOCK = ?,
                        REORDER_LEVEL = ?,
                        DESCRIPTION = COALESCE(?, DESCRIPTION),
                        MAX_STOCK = COALESCE(?, MAX_STOCK),
                        UPDATED_AT = CURRENT_TIMESTAMP
                    WHERE ID = ?
                    "#,
                )
                .bind(&input.name)
                .bind(input.category_id)
                .bind(&cost_price)
                .bind(&selling_price)
                .bind(input.current_stock)
                .bind(input.reorder_level)
                .bind(&input.description)
                .bind(input.max_stock)
                .bind(id)
                .execute(&mut *tx)
                .await?;

                SaveOutcome::Updated { id }
            }
            None => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO PRODUCTS (
                        SKU, NAME, DESCRIPTION, CATEGORY_ID,
                        COST_PRICE, SELLING_PRICE,
                        CURRENT_STOCK, REORDER_LEVEL, MAX_STOCK
                    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(&input.sku)
                .bind(&input.name)
                .bind(&input.description)
                .bind(input.category_id)
                .bind(&cost_price)
                .bind(&selling_price)
                .bind(input.current_stock)
                .bind(input.reorder_level)
                .bind(input.max_stock)
                .execute(&mut *tx)
                .await
                .map_err(|e| DbError::from(e).with_value(&input.sku))?;

                SaveOutcome::Inserted {
                    id: result.last_insert_rowid(),
                }
            }
        };

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            sku = %input.sku,
            id = outcome.id(),
            inserted = outcome.is_insert(),
            "Product saved"
        );
        Ok(outcome)
    }

    /// The most recently touched products, newest first.
    ///
    /// `UPDATED_AT` has one-second resolution; ties go to the higher ID.
    pub async fn recent(&self, limit: u32) -> DbResult<Vec<ProductSummary>> {
        let rows = sqlx::query_as::<_, ProductSummary>(
            r#"
            SELECT
                SKU AS sku,
                NAME AS name,
                CURRENT_STOCK AS current_stock,
                CAST(ROUND(SELLING_PRICE * 100) AS INTEGER) AS selling_price_minor
            FROM PRODUCTS
            ORDER BY UPDATED_AT DESC, ID DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded recent products");
        Ok(rows)
    }

    /// Active products whose SKU or name contains `query`, by name.
    ///
    /// Matching is case-insensitive. An empty query lists every active
    /// product.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();
        debug!(query = %query, limit = %limit, "Searching products");

        let pattern = format!("%{}%", escape_like(query));
        let sql = format!(
            r#"{SELECT_PRODUCT}
            WHERE COALESCE(p.IS_ACTIVE, 1) = 1
              AND (p.SKU LIKE ?1 ESCAPE '\' OR p.NAME LIKE ?1 ESCAPE '\')
            ORDER BY p.NAME, p.ID
            LIMIT ?2"#
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(pattern)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Active products at or below their reorder level, emptiest shelf first.
    pub async fn low_stock(&self, limit: u32) -> DbResult<Vec<Product>> {
        let sql = format!(
            r#"{SELECT_PRODUCT}
            WHERE COALESCE(p.IS_ACTIVE, 1) = 1
              AND p.CURRENT_STOCK <= p.REORDER_LEVEL
            ORDER BY p.CURRENT_STOCK, p.NAME
            LIMIT ?"#
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Soft-deletes (`false`) or restores (`true`) a product.
    pub async fn set_active(&self, sku: &str, active: bool) -> DbResult<()> {
        let sku = sku.trim();

        let result = sqlx::query(
            "UPDATE PRODUCTS SET IS_ACTIVE = ?, UPDATED_AT = CURRENT_TIMESTAMP WHERE SKU = ?",
        )
        .bind(active)
        .bind(sku)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", sku));
        }

        info!(sku = %sku, active = active, "Product active flag changed");
        Ok(())
    }

    /// Adds `delta` (negative to remove) to a product's stock.
    ///
    /// Returns the new stock level. A result below zero, or one that does not
    /// fit in an `i64`, is refused and nothing changes.
    pub async fn adjust_stock(&self, sku: &str, delta: i64) -> DbResult<i64> {
        let sku = sku.trim();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let current: i64 = sqlx::query_scalar("SELECT CURRENT_STOCK FROM PRODUCTS WHERE SKU = ?")
            .bind(sku)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Product", sku))?;

        let new_stock = current
            .checked_add(delta)
            .ok_or_else(|| DbError::CheckViolation {
                message: format!("stock for {} would overflow: {} + {}", sku, current, delta),
            })?;
        if new_stock < 0 {
            return Err(DbError::InsufficientStock {
                sku: sku.to_string(),
                available: current,
                requested: delta.saturating_neg(),
            });
        }

        sqlx::query(
            "UPDATE PRODUCTS SET CURRENT_STOCK = ?, UPDATED_AT = CURRENT_TIMESTAMP WHERE SKU = ?",
        )
        .bind(new_stock)
        .bind(sku)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(sku = %sku, delta = delta, stock = new_stock, "Stock adjusted");
        Ok(new_stock)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM PRODUCTS")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Escapes LIKE wildcards so user text matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use posai_core::{InventoryForm, Money, NewCategory};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn input(sku: &str, name: &str, price_minor: i64, stock: i64) -> ProductInput {
        ProductInput {
            sku: sku.to_string(),
            name: name.to_string(),
            category_id: None,
            cost_price: Money::from_minor(price_minor / 2),
            selling_price: Money::from_minor(price_minor),
            current_stock: stock,
            reorder_level: 10,
            description: None,
            max_stock: None,
        }
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[tokio::test]
    async fn test_save_inserts_then_updates() {
        let db = setup().await;
        let repo = db.products();

        let first = repo.save(&input("RICE-1KG", "Basmati Rice", 12050, 40)).await.unwrap();
        assert!(first.is_insert());

        let mut changed = input("RICE-1KG", "Basmati Rice 1kg", 12500, 35);
        changed.reorder_level = 5;
        let second = repo.save(&changed).await.unwrap();
        assert_eq!(second, SaveOutcome::Updated { id: first.id() });

        let product = repo.get_by_sku("RICE-1KG").await.unwrap().unwrap();
        assert_eq!(product.name, "Basmati Rice 1kg");
        assert_eq!(product.selling_price_minor, 12500);
        assert_eq!(product.cost_price_minor, 6250);
        assert_eq!(product.current_stock, 35);
        assert_eq!(product.reorder_level, 5);
        assert!(product.is_active);
        assert!(product.updated_at.is_some());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_prices_survive_decimal_column() {
        let db = setup().await;
        let repo = db.products();

        for (sku, minor) in [("A", 1), ("B", 10), ("C", 1999), ("D", 9_999_999_999), ("E", 0)] {
            repo.save(&input(sku, "Item", minor, 1)).await.unwrap();
            let product = repo.get_by_sku(sku).await.unwrap().unwrap();
            assert_eq!(product.selling_price_minor, minor, "sku {}", sku);
        }
    }

    #[tokio::test]
    async fn test_update_keeps_description_when_absent() {
        let db = setup().await;
        let repo = db.products();

        let mut with_extras = input("BK-1", "Rust Book", 199900, 3);
        with_extras.description = Some("Hardcover".to_string());
        with_extras.max_stock = Some(30);
        repo.save(&with_extras).await.unwrap();

        repo.save(&input("BK-1", "Rust Book 2e", 199900, 3)).await.unwrap();

        let product = repo.get_by_sku("BK-1").await.unwrap().unwrap();
        assert_eq!(product.name, "Rust Book 2e");
        assert_eq!(product.description.as_deref(), Some("Hardcover"));
        assert_eq!(product.max_stock, Some(30));
    }

    #[tokio::test]
    async fn test_lookup_joins_category_name() {
        let db = setup().await;
        let category = db
            .categories()
            .insert(&NewCategory::new("Grocery"))
            .await
            .unwrap();

        let mut item = input("RICE", "Rice", 100, 1);
        item.category_id = Some(category.id);
        db.products().save(&item).await.unwrap();

        let product = db.products().get_by_sku(" RICE ").await.unwrap().unwrap();
        assert_eq!(product.category_id, Some(category.id));
        assert_eq!(product.category_name.as_deref(), Some("Grocery"));

        assert!(db.products().get_by_sku("NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_category_is_rejected() {
        let db = setup().await;
        let mut item = input("RICE", "Rice", 100, 1);
        item.category_id = Some(77);

        assert!(matches!(
            db.products().save(&item).await.unwrap_err(),
            DbError::ForeignKeyViolation { .. }
        ));
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_form_to_database() {
        let db = setup().await;
        let form = InventoryForm {
            sku: "8901030865278".to_string(),
            name: "Atta 5kg".to_string(),
            cost_price: "210".to_string(),
            selling_price: "Rs. 249.99".to_string(),
            current_stock: "12".to_string(),
            ..InventoryForm::default()
        };

        let outcome = db.products().save(&form.validate().unwrap()).await.unwrap();
        assert!(outcome.is_insert());

        let mut reloaded = InventoryForm::new();
        reloaded.load(&db.products().get_by_sku("8901030865278").await.unwrap().unwrap());
        assert_eq!(reloaded.selling_price, "249.99");
        assert_eq!(reloaded.reorder_level, "10");
    }

    #[tokio::test]
    async fn test_recent_newest_first_with_limit() {
        let db = setup().await;
        let repo = db.products();
        for i in 1..=7 {
            repo.save(&input(&format!("SKU-{}", i), &format!("Item {}", i), 100 * i, i))
                .await
                .unwrap();
        }

        let recent = repo.recent(5).await.unwrap();
        let skus: Vec<&str> = recent.iter().map(|r| r.sku.as_str()).collect();
        assert_eq!(skus, vec!["SKU-7", "SKU-6", "SKU-5", "SKU-4", "SKU-3"]);
        assert_eq!(recent[0].selling_price().minor_units(), 700);
        assert_eq!(recent[0].current_stock, 7);
    }

    #[tokio::test]
    async fn test_search_matches_sku_or_name() {
        let db = setup().await;
        let repo = db.products();
        repo.save(&input("COKE-330", "Coca-Cola 330ml", 4000, 10)).await.unwrap();
        repo.save(&input("COKE-500", "Coca-Cola 500ml", 6000, 10)).await.unwrap();
        repo.save(&input("PEPSI-330", "Pepsi 330ml", 4000, 10)).await.unwrap();
        repo.save(&input("SALE_1", "Half off", 100, 10)).await.unwrap();

        assert_eq!(repo.search("coca", 20).await.unwrap().len(), 2);
        assert_eq!(repo.search("330", 20).await.unwrap().len(), 2);
        assert_eq!(repo.search("", 20).await.unwrap().len(), 4);
        assert_eq!(repo.search("", 2).await.unwrap().len(), 2);

        // `_` is literal, not a wildcard
        let underscored = repo.search("E_1", 20).await.unwrap();
        assert_eq!(underscored.len(), 1);
        assert_eq!(underscored[0].sku, "SALE_1");

        repo.set_active("COKE-500", false).await.unwrap();
        let results = repo.search("coke", 20).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].sku, "COKE-330");
    }

    #[tokio::test]
    async fn test_low_stock() {
        let db = setup().await;
        let repo = db.products();
        repo.save(&input("A", "Plenty", 100, 50)).await.unwrap();
        repo.save(&input("B", "At level", 100, 10)).await.unwrap();
        repo.save(&input("C", "Empty", 100, 0)).await.unwrap();

        let low: Vec<String> = repo
            .low_stock(20)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.sku)
            .collect();
        assert_eq!(low, vec!["C", "B"]);
    }

    #[tokio::test]
    async fn test_set_active_round_trip() {
        let db = setup().await;
        let repo = db.products();
        repo.save(&input("A", "Item", 100, 1)).await.unwrap();

        repo.set_active("A", false).await.unwrap();
        assert!(!repo.get_by_sku("A").await.unwrap().unwrap().is_active);

        repo.set_active("A", true).await.unwrap();
        assert!(repo.get_by_sku("A").await.unwrap().unwrap().is_active);

        assert!(matches!(
            repo.set_active("MISSING", true).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_adjust_stock() {
        let db = setup().await;
        let repo = db.products();
        repo.save(&input("A", "Item", 100, 5)).await.unwrap();

        assert_eq!(repo.adjust_stock("A", 10).await.unwrap(), 15);
        assert_eq!(repo.adjust_stock("A", -15).await.unwrap(), 0);

        match repo.adjust_stock("A", -1).await.unwrap_err() {
            DbError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 0);
                assert_eq!(requested, 1);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(repo.get_by_sku("A").await.unwrap().unwrap().current_stock, 0);

        assert!(matches!(
            repo.adjust_stock("MISSING", 1).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_adjust_stock_extreme_deltas() {
        let db = setup().await;
        let repo = db.products();
        repo.save(&input("A", "Item", 100, 5)).await.unwrap();

        assert!(matches!(
            repo.adjust_stock("A", i64::MAX).await.unwrap_err(),
            DbError::CheckViolation { .. }
        ));

        match repo.adjust_stock("A", i64::MIN).await.unwrap_err() {
            DbError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 5);
                assert_eq!(requested, i64::MAX);
            }
            other => panic!("unexpected: {other:?}"),
        }

        assert_eq!(repo.get_by_sku("A").await.unwrap().unwrap().current_stock, 5);
    }
}
