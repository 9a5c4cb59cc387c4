//! # CLI Error Type
//!
//! What the terminal user sees when a command fails.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in posai                                  │
//! │                                                                         │
//! │  ValidationError ──┐                                                    │
//! │  CoreError ────────┼──► CliError { code, message }                     │
//! │  DbError ──────────┤          │                                         │
//! │  ConfigError ──────┘          ├── text:  "error: <message>" on stderr   │
//! │                               └── --json: {"code": "...", ...}          │
//! │                                                                         │
//! │  Exit status 1                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use crate::config::ConfigError;
use posai_core::{CoreError, ValidationError};
use posai_db::DbError;

/// A failed command.
///
/// ```json
/// { "code": "NOT_FOUND", "message": "Product not found: SKU-123" }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct CliError {
    pub code: ErrorCode,
    pub message: String,
}

/// Machine-readable error codes for `--json` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    AlreadyExists,
    InsufficientStock,
    CartError,
    ConfigError,
    DatabaseError,
    IoError,
    Internal,
}

pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        CliError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }
}

impl From<DbError> for CliError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CliError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => CliError::new(
                ErrorCode::AlreadyExists,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::debug!("Foreign key violation: {}", message);
                CliError::validation("Unknown category or supplier")
            }
            DbError::CheckViolation { message } => {
                tracing::debug!("Check violation: {}", message);
                CliError::validation("Prices, stock and reorder level must be zero or more and in range")
            }
            err @ DbError::InsufficientStock { .. } => {
                CliError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            DbError::ConnectionFailed(e) => CliError::new(
                ErrorCode::DatabaseError,
                format!("Database connection failed: {}", e),
            ),
            DbError::MigrationFailed(e) => CliError::new(
                ErrorCode::DatabaseError,
                format!("Database migration failed: {}", e),
            ),
            DbError::QueryFailed(e) | DbError::TransactionFailed(e) | DbError::Internal(e) => {
                tracing::error!("Database operation failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                CliError::new(ErrorCode::DatabaseError, "Database is busy, try again")
            }
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ProductNotFound(_) => ErrorCode::NotFound,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::Validation(_) | CoreError::QuantityTooLarge { .. } => {
                ErrorCode::ValidationError
            }
            CoreError::ProductInactive(_)
            | CoreError::NotInCart(_)
            | CoreError::CartTooLarge { .. }
            | CoreError::EmptyCart => ErrorCode::CartError,
        };

        match err {
            CoreError::Validation(e) => e.into(),
            other => CliError::new(code, other.to_string()),
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::validation(err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::new(ErrorCode::IoError, err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::new(ErrorCode::Internal, err.to_string())
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_errors_map_to_codes() {
        let err: CliError = DbError::not_found("Product", "SKU-1").into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: SKU-1");

        let err: CliError = DbError::duplicate("CATEGORIES.NAME", "Books").into();
        assert_eq!(err.code, ErrorCode::AlreadyExists);

        let err: CliError = DbError::InsufficientStock {
            sku: "A".into(),
            available: 1,
            requested: 2,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err: CliError = CoreError::Validation(ValidationError::SkuAndNameRequired).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.to_string(), "SKU and Name are required!");
    }

    #[test]
    fn test_json_shape() {
        let err = CliError::new(ErrorCode::CartError, "Cart is empty");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "CART_ERROR");
        assert_eq!(json["message"], "Cart is empty");
    }
}
