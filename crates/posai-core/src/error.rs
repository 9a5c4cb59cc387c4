//! # Error Types
//!
//! Domain-specific error types for posai-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  posai-core errors (this file)                                         │
//! │  ├── CoreError        - Cart and business rule violations              │
//! │  └── ValidationError  - Form field failures                            │
//! │                                                                         │
//! │  posai-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  posai app errors                                                      │
//! │  └── CliError         - What the terminal user sees                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CliError → stderr                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised while building a sale.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No product is registered under this SKU.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The product exists but was deactivated.
    #[error("Product {0} is inactive and cannot be sold")]
    ProductInactive(String),

    /// Trying to sell more than is on the shelf.
    ///
    /// ```text
    /// Scan COKE-330, qty 5
    ///      │
    ///      ▼
    /// CURRENT_STOCK = 3
    ///      │
    ///      ▼
    /// InsufficientStock { sku: "COKE-330", available: 3, requested: 5 }
    /// ```
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// SKU is not in the cart.
    #[error("{0} is not in the cart")]
    NotInCart(String),

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart is full ({max} different items)")]
    CartTooLarge { max: usize },

    /// One line would hold more units than a single sale allows.
    #[error("Quantity {requested} is over the per-item limit of {max}")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Checkout attempted with nothing scanned.
    #[error("Cart is empty")]
    EmptyCart,

    /// A form field or scan entry was rejected.
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before anything reaches SQLite, so CHECK constraints in the schema
/// are a second line rather than the first.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Blank where a value is needed.
    #[error("{field} cannot be blank")]
    Required { field: String },

    /// Both identifying fields of the inventory form are blank.
    #[error("SKU and Name are required!")]
    SkuAndNameRequired,

    #[error("{field} is longer than {max} characters")]
    TooLong { field: String, max: usize },

    /// e.g. a scanned quantity of 0 or 5000.
    #[error("{field} must be from {min} to {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be greater than zero")]
    MustBePositive { field: String },

    /// Value must be zero or more.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Text could not be parsed (bad number, bad price, bad characters).
    #[error("Invalid {field}: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result for cart and sale rules.
pub type CoreResult<T> = Result<T, CoreError>;
