//! # Domain Types
//!
//! Core domain types used throughout POS.AI.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Category     │   │    Receipt      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (INTEGER)   │   │  id (INTEGER)   │   │  id (UUID)      │       │
//! │  │  sku (barcode)  │   │  name (unique)  │   │  receipt_number │       │
//! │  │  selling_price  │   │  parent_id      │   │  lines, total   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ProductInput   │   │  SaveOutcome    │   │ ProductSummary  │       │
//! │  │  (validated     │   │  Inserted       │   │ (recent table   │       │
//! │  │   form data)    │   │  Updated        │   │  row)           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Row types derive `sqlx::FromRow` when the `sqlx` feature is on. Their field
//! names match the lowercase aliases the repositories select.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A row of `PRODUCTS`, joined with its category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,

    /// Barcode / stock keeping unit. Unique.
    pub sku: String,

    pub name: String,

    pub description: Option<String>,

    pub category_id: Option<i64>,

    /// `CATEGORIES.NAME` for `category_id`, if any.
    pub category_name: Option<String>,

    pub supplier_id: Option<i64>,

    /// `COST_PRICE` in minor units.
    pub cost_price_minor: i64,

    /// `SELLING_PRICE` in minor units.
    pub selling_price_minor: i64,

    pub current_stock: i64,

    pub reorder_level: i64,

    pub max_stock: Option<i64>,

    pub is_active: bool,

    pub created_at: Option<NaiveDateTime>,

    pub updated_at: Option<NaiveDateTime>,
}

impl Product {
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_minor(self.selling_price_minor)
    }

    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_minor(self.cost_price_minor)
    }

    /// Selling price minus cost price, per unit.
    pub fn unit_margin(&self) -> Money {
        self.selling_price() - self.cost_price()
    }

    /// True once stock has fallen to the reorder level.
    pub fn needs_reorder(&self) -> bool {
        self.current_stock <= self.reorder_level
    }

    /// Checks if `quantity` units can be sold right now.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.is_active && self.current_stock >= quantity
    }
}

/// One line of the "Recently Updated Items" table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductSummary {
    pub sku: String,
    pub name: String,
    pub current_stock: i64,
    pub selling_price_minor: i64,
}

impl ProductSummary {
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_minor(self.selling_price_minor)
    }
}

// =============================================================================
// Product Input
// =============================================================================

/// Validated payload for the save/update flow.
///
/// Built by [`crate::form::InventoryForm::validate`]; every numeric field has
/// already been parsed and range-checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    pub sku: String,
    pub name: String,
    pub category_id: Option<i64>,
    pub cost_price: Money,
    pub selling_price: Money,
    pub current_stock: i64,
    pub reorder_level: i64,
    /// Left untouched on update when `None`.
    pub description: Option<String>,
    /// Left untouched on update when `None`.
    pub max_stock: Option<i64>,
}

/// Which branch the save flow took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SaveOutcome {
    /// SKU was new; a row was inserted.
    Inserted { id: i64 },
    /// SKU already existed; the row was updated in place.
    Updated { id: i64 },
}

impl SaveOutcome {
    pub fn id(&self) -> i64 {
        match self {
            SaveOutcome::Inserted { id } | SaveOutcome::Updated { id } => *id,
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, SaveOutcome::Inserted { .. })
    }
}

// =============================================================================
// Category
// =============================================================================

/// A row of `CATEGORIES`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
}

/// Payload for creating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        NewCategory {
            name: name.into(),
            description: None,
            parent_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_parent(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// Categories inserted by `posai seed`.
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Electronics", "Electronic devices and accessories"),
    ("Clothing", "Apparel and fashion items"),
    ("Home & Kitchen", "Household items and kitchenware"),
    ("Books", "Books and educational materials"),
];

// =============================================================================
// Receipt
// =============================================================================

/// A completed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// UUID v4.
    pub id: String,
    /// Human-readable number, `YYMMDD-HHMMSS-NNNN`.
    pub receipt_number: String,
    pub lines: Vec<ReceiptLine>,
    pub total_quantity: i64,
    pub total: Money,
    pub completed_at: DateTime<Utc>,
}

/// One sold line, frozen at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}
