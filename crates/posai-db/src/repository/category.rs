//! # Category Repository
//!
//! Reads and writes `CATEGORIES`, the source of the inventory screen's
//! category dropdown.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use posai_core::{Category, NewCategory, DEFAULT_CATEGORIES};

const SELECT_CATEGORY: &str = r#"
    SELECT
        ID AS id,
        NAME AS name,
        DESCRIPTION AS description,
        PARENT_ID AS parent_id,
        CREATED_AT AS created_at
    FROM CATEGORIES
"#;

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// All categories, alphabetically.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let sql = format!("{SELECT_CATEGORY} ORDER BY NAME");
        let categories = sqlx::query_as::<_, Category>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = categories.len(), "Listed categories");
        Ok(categories)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        let sql = format!("{SELECT_CATEGORY} WHERE ID = ?");
        let category = sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Category>> {
        let sql = format!("{SELECT_CATEGORY} WHERE NAME = ?");
        let category = sqlx::query_as::<_, Category>(&sql)
            .bind(name.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    /// Inserts a category and returns the stored row.
    ///
    /// ## Errors
    /// - `UniqueViolation` if the name is taken
    /// - `ForeignKeyViolation` if `parent_id` does not exist
    pub async fn insert(&self, category: &NewCategory) -> DbResult<Category> {
        let name = category.name.trim();

        let result = sqlx::query(
            "INSERT INTO CATEGORIES (NAME, DESCRIPTION, PARENT_ID) VALUES (?, ?, ?)",
        )
        .bind(name)
        .bind(&category.description)
        .bind(category.parent_id)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_value(name))?;

        let id = result.last_insert_rowid();
        info!(id = id, name = %name, "Category created");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Category", id.to_string()))
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM CATEGORIES")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Inserts the default categories that are not present yet.
    ///
    /// Returns how many rows were added; a second call adds none.
    pub async fn seed_defaults(&self) -> DbResult<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut inserted = 0;
        for (name, description) in DEFAULT_CATEGORIES {
            let result =
                sqlx::query("INSERT OR IGNORE INTO CATEGORIES (NAME, DESCRIPTION) VALUES (?, ?)")
                    .bind(*name)
                    .bind(*description)
                    .execute(&mut *tx)
                    .await?;
            inserted += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(inserted = inserted, "Default categories seeded");
        Ok(inserted)
    }
}
