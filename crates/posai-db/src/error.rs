//! # posai-db Errors
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← constraint name picked out of the message     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CliError (posai binary) ← ErrorCode + message                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  "error: ..." on stderr, exit status 1                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Everything a PRODUCTS / CATEGORIES query can fail with.
#[derive(Debug, Error)]
pub enum DbError {
    /// No row for this SKU or ID.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A `UNIQUE` column already holds this value:
    /// - Inserting a duplicate SKU
    /// - Adding a category whose name exists
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A reference points at a missing row:
    /// - `CATEGORY_ID` that is not in CATEGORIES
    /// - `PARENT_ID` that is not in CATEGORIES
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// A CHECK constraint rejected the row (negative price, stock, reorder level).
    #[error("Check constraint failed: {message}")]
    CheckViolation { message: String },

    /// Stock would drop below zero.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// The file or its directory could not be opened or created.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Every pooled connection stayed busy past the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Fills in the offending value of a `UniqueViolation` raised by SQLite.
    ///
    /// SQLite only names the column, so callers that know the value attach it.
    pub fn with_value(self, value: impl Into<String>) -> Self {
        match self {
            DbError::UniqueViolation { field, .. } => DbError::UniqueViolation {
                field,
                value: value.into(),
            },
            other => other,
        }
    }
}

/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → UNIQUE / FOREIGN KEY / CHECK by message
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => classify_message(db_err.message()),

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

// SQLite messages:
//   "UNIQUE constraint failed: PRODUCTS.SKU"
//   "FOREIGN KEY constraint failed"
//   "CHECK constraint failed: CURRENT_STOCK >= 0"
fn classify_message(msg: &str) -> DbError {
    if let Some(field) = msg.split("UNIQUE constraint failed: ").nth(1) {
        DbError::duplicate(field, "unknown")
    } else if msg.contains("FOREIGN KEY constraint failed") {
        DbError::ForeignKeyViolation {
            message: msg.to_string(),
        }
    } else if msg.contains("CHECK constraint failed") {
        DbError::CheckViolation {
            message: msg.to_string(),
        }
    } else {
        DbError::QueryFailed(msg.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_constraint_messages() {
        match classify_message("UNIQUE constraint failed: PRODUCTS.SKU") {
            DbError::UniqueViolation { field, .. } => assert_eq!(field, "PRODUCTS.SKU"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(
            classify_message("FOREIGN KEY constraint failed"),
            DbError::ForeignKeyViolation { .. }
        ));
        assert!(matches!(
            classify_message("CHECK constraint failed: CURRENT_STOCK >= 0"),
            DbError::CheckViolation { .. }
        ));
        assert!(matches!(
            classify_message("no such table: SALES"),
            DbError::QueryFailed(_)
        ));
    }

    #[test]
    fn test_with_value_only_touches_unique() {
        let err = DbError::duplicate("CATEGORIES.NAME", "unknown").with_value("Books");
        assert_eq!(
            err.to_string(),
            "Duplicate CATEGORIES.NAME: 'Books' already exists"
        );

        let err = DbError::PoolExhausted.with_value("x");
        assert!(matches!(err, DbError::PoolExhausted));
    }
}
