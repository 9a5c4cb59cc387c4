//! # posai-core: Pure Domain Logic for POS.AI
//!
//! Everything the inventory and sale screens decide without touching the
//! database lives here: money parsing, form validation, and cart math.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          POS.AI Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    posai (terminal front-end)                   │   │
//! │  │   inventory lookup/save/recent ──► sale session ──► checkout    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ posai-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   form    │  │   cart    │  │   │
//! │  │   │  Product  │  │   Money   │  │ Inventory │  │   Cart    │  │   │
//! │  │   │  Category │  │  parsing  │  │   Form    │  │ CartItem  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO TERMINAL • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    posai-db (Database Layer)                    │   │
//! │  │          PRODUCTS / CATEGORIES queries, migrations              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Category, Receipt, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`form`] - Inventory form state and validation
//! - [`cart`] - Sale cart
//! - [`error`] - Domain error types
//! - [`validation`] - Field validators and parsers
//!
//! ## Example Usage
//!
//! ```rust
//! use posai_core::money::Money;
//!
//! let price = Money::parse_decimal("12.5").unwrap();
//! assert_eq!(price.minor_units(), 1250);
//! assert_eq!(price.to_decimal_string(), "12.50");
//! ```

pub mod cart;
pub mod error;
pub mod form;
pub mod money;
pub mod types;
pub mod validation;

pub use cart::{Cart, CartItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use form::InventoryForm;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item in cart.
///
/// Guards against a scanner or a typo turning 10 into 1000.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Reorder level a fresh inventory form starts with (`PRODUCTS.REORDER_LEVEL` default).
pub const DEFAULT_REORDER_LEVEL: i64 = 10;

/// Number of rows in the "Recently Updated Items" table.
pub const RECENT_LIMIT: u32 = 5;
