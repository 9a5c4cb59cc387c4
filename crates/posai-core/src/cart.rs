//! # Sale Cart
//!
//! The in-progress sale on the Sale Portal.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Session Input            Cart Method              Cart Change          │
//! │  ─────────────            ───────────              ───────────          │
//! │                                                                         │
//! │  SKU [QTY] ──────────────► add_item() ───────────► push or merge line   │
//! │                                                                         │
//! │  qty SKU N ──────────────► update_quantity() ────► lines[i].qty = n     │
//! │                                                                         │
//! │  remove SKU ─────────────► remove_item() ────────► lines.remove(i)      │
//! │                                                                         │
//! │  clear ──────────────────► clear() ──────────────► lines.clear()        │
//! │                                                                         │
//! │  (display) ──────────────► customer_total() ─────► (read only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock is checked here against the product as last read. The checkout
//! transaction re-checks it against the live row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::validation::validate_quantity;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// One scanned product in the cart.
///
/// Name and price are frozen when the line is first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub sku: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
    /// Shelf stock seen when the line was last touched.
    pub available: i64,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    fn from_product(product: &Product, quantity: i64) -> Self {
        CartItem {
            sku: product.sku.clone(),
            name: product.name.clone(),
            unit_price: product.selling_price(),
            quantity,
            available: product.current_stock,
            added_at: Utc::now(),
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// The sale being rung up.
///
/// ## Invariants
/// - Lines are unique by SKU (scanning again increases quantity)
/// - Every quantity is 1 ..= `MAX_ITEM_QUANTITY`
/// - At most `MAX_CART_ITEMS` lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds `quantity` units of `product`, merging with an existing line.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if !product.is_active {
            return Err(CoreError::ProductInactive(product.sku.clone()));
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.sku == product.sku) {
            let new_qty = item.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            check_stock(&product.sku, product.current_stock, new_qty)?;
            item.quantity = new_qty;
            item.available = product.current_stock;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        check_stock(&product.sku, product.current_stock, quantity)?;
        self.items.push(CartItem::from_product(product, quantity));
        Ok(())
    }

    /// Sets a line's quantity. Zero removes the line.
    pub fn update_quantity(&mut self, sku: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_item(sku);
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }
        validate_quantity(quantity)?;

        let item = self
            .items
            .iter_mut()
            .find(|i| i.sku == sku)
            .ok_or_else(|| CoreError::NotInCart(sku.to_string()))?;

        check_stock(sku, item.available, quantity)?;
        item.quantity = quantity;
        Ok(())
    }

    pub fn remove_item(&mut self, sku: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.sku != sku);

        if self.items.len() == initial_len {
            Err(CoreError::NotInCart(sku.to_string()))
        } else {
            Ok(())
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    pub fn get(&self, sku: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.sku == sku)
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// What the customer pays: the sum of every line total.
    pub fn customer_total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn check_stock(sku: &str, available: i64, requested: i64) -> CoreResult<()> {
    if requested > available {
        return Err(CoreError::InsufficientStock {
            sku: sku.to_string(),
            available,
            requested,
        });
    }
    Ok(())
}
