//! # Validation Module
//!
//! Field validators and text parsers for POS.AI.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Terminal input                                               │
//! │  └── Raw text exactly as typed or scanned                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Parse numbers and prices                                          │
//! │  └── Business rules (lengths, ranges, SKU charset)                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  ├── CHECK (price >= 0, stock >= 0, reorder >= 0)                      │
//! │  └── Foreign keys (CATEGORY_ID, PARENT_ID)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (the scanned barcode).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 50 characters
/// - Letters, digits, hyphens and underscores only
///
/// ```rust
/// use posai_core::validation::validate_sku;
///
/// assert!(validate_sku("8901030865278").is_ok());
/// assert!(validate_sku("COKE-330").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::invalid(
            "sku",
            "must contain only letters, numbers, hyphens, and underscores",
        ));
    }

    Ok(())
}

/// Validates a product name: non-empty, at most 200 characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, 200)
}

/// Validates a category name: non-empty, at most 100 characters.
pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    validate_text("category name", name, 100)
}

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a search query and returns it trimmed. Empty is allowed.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart quantity: 1 ..= 999.
///
/// ```rust
/// use posai_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(1000).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Rejects negative counts (stock, reorder level, max stock).
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Text Parsers
// =============================================================================

/// Parses a whole, non-negative number typed into a count field.
///
/// ```rust
/// use posai_core::validation::parse_whole_number;
///
/// assert_eq!(parse_whole_number("stock", " 12 ").unwrap(), 12);
/// assert!(parse_whole_number("stock", "-1").is_err());
/// assert!(parse_whole_number("stock", "1.5").is_err());
/// ```
pub fn parse_whole_number(field: &str, text: &str) -> ValidationResult<i64> {
    let text = text.trim();

    if text.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let value: i64 = text
        .parse()
        .map_err(|_| ValidationError::invalid(field, "must be a whole number"))?;

    validate_non_negative(field, value)?;
    Ok(value)
}

/// Parses a price field into [`Money`], naming `field` in any error.
pub fn parse_price(field: &str, text: &str) -> ValidationResult<Money> {
    if text.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Money::parse_decimal(text).map_err(|err| match err {
        ValidationError::InvalidFormat { reason, .. } => ValidationError::invalid(field, reason),
        other => other,
    })
}

/// Parses the category selection. Blank means "no category".
pub fn parse_category_id(text: &str) -> ValidationResult<Option<i64>> {
    let text = text.trim();

    if text.is_empty() {
        return Ok(None);
    }

    match text.parse::<i64>() {
        Ok(id) if id > 0 => Ok(Some(id)),
        _ => Err(ValidationError::invalid(
            "category",
            "must be a category ID from `posai categories list`",
        )),
    }
}

/// Parses a cart entry of the form `SKU` or `SKU:QTY`.
///
/// ```rust
/// use posai_core::validation::parse_cart_entry;
///
/// assert_eq!(parse_cart_entry("COKE-330").unwrap(), ("COKE-330".to_string(), 1));
/// assert_eq!(parse_cart_entry("COKE-330:4").unwrap(), ("COKE-330".to_string(), 4));
/// ```
pub fn parse_cart_entry(entry: &str) -> ValidationResult<(String, i64)> {
    let (sku, qty) = match entry.trim().rsplit_once(':') {
        Some((sku, qty)) => {
            let qty: i64 = qty
                .trim()
                .parse()
                .map_err(|_| ValidationError::invalid("quantity", "must be a whole number"))?;
            (sku.trim(), qty)
        }
        None => (entry.trim(), 1),
    };

    validate_sku(sku)?;
    validate_quantity(qty)?;
    Ok((sku.to_string(), qty))
}

// =============================================================================
// Unit Tests
// =============================================================================
