//! # Inventory Form
//!
//! The inventory screen's field state, kept as raw text until saved.
//!
//! ## Screen Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Step 1: Scan Barcode                                                   │
//! │     │                                                                   │
//! │     ├── SKU known?   ──► load(&product)       "Product loaded."         │
//! │     └── SKU unknown? ──► reset_for_new_sku()  "New SKU detected."       │
//! │                                                                         │
//! │  Step 2: Product Details (edit fields)                                  │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  validate() ──► ProductInput ──► ProductRepository::save()              │
//! │     │                                                                   │
//! │     └── SKU or name blank ──► "SKU and Name are required!"              │
//! │                                                                         │
//! │  After a save: clear() ──► stock "0", reorder "10", rest blank          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::{Product, ProductInput};
use crate::validation::{
    parse_category_id, parse_price, parse_whole_number, validate_non_negative,
    validate_product_name, validate_sku,
};
use crate::DEFAULT_REORDER_LEVEL;

/// Raw text of every inventory field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryForm {
    pub sku: String,
    pub name: String,
    /// Category ID as text; blank for none.
    pub category: String,
    pub cost_price: String,
    pub selling_price: String,
    pub current_stock: String,
    pub reorder_level: String,
    pub description: Option<String>,
    pub max_stock: Option<String>,
}

impl Default for InventoryForm {
    fn default() -> Self {
        InventoryForm {
            sku: String::new(),
            name: String::new(),
            category: String::new(),
            cost_price: String::new(),
            selling_price: String::new(),
            current_stock: "0".to_string(),
            reorder_level: DEFAULT_REORDER_LEVEL.to_string(),
            description: None,
            max_stock: None,
        }
    }
}

impl InventoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets every field to its initial value.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Fills the form from an existing product.
    pub fn load(&mut self, product: &Product) {
        self.sku = product.sku.clone();
        self.name = product.name.clone();
        self.category = product
            .category_id
            .map(|id| id.to_string())
            .unwrap_or_default();
        self.cost_price = product.cost_price().to_decimal_string();
        self.selling_price = product.selling_price().to_decimal_string();
        self.current_stock = product.current_stock.to_string();
        self.reorder_level = product.reorder_level.to_string();
        self.description = product.description.clone();
        self.max_stock = product.max_stock.map(|m| m.to_string());
    }

    /// Blanks the detail fields after scanning an unknown SKU.
    ///
    /// The SKU and the reorder level survive; stock goes back to `"0"`.
    pub fn reset_for_new_sku(&mut self) {
        self.name.clear();
        self.category.clear();
        self.cost_price.clear();
        self.selling_price.clear();
        self.current_stock = "0".to_string();
        self.description = None;
        self.max_stock = None;
    }

    /// Parses and checks every field.
    ///
    /// ## Order of checks
    /// 1. SKU and name present (one combined message, like the screen shows)
    /// 2. SKU charset/length, name length
    /// 3. Category, prices, stock, reorder level, max stock
    pub fn validate(&self) -> Result<ProductInput, ValidationError> {
        let sku = self.sku.trim();
        let name = self.name.trim();

        if sku.is_empty() || name.is_empty() {
            return Err(ValidationError::SkuAndNameRequired);
        }

        validate_sku(sku)?;
        validate_product_name(name)?;

        let category_id = parse_category_id(&self.category)?;
        let cost_price = parse_price("cost price", &self.cost_price)?;
        let selling_price = parse_price("selling price", &self.selling_price)?;
        let current_stock = parse_whole_number("current stock", &self.current_stock)?;
        let reorder_level = parse_whole_number("reorder level", &self.reorder_level)?;

        let max_stock = match self.max_stock.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => {
                let max = parse_whole_number("max stock", text)?;
                validate_non_negative("max stock", max)?;
                Some(max)
            }
        };

        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(ProductInput {
            sku: sku.to_string(),
            name: name.to_string(),
            category_id,
            cost_price,
            selling_price,
            current_stock,
            reorder_level,
            description,
            max_stock,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> InventoryForm {
        InventoryForm {
            sku: " 8901030865278 ".to_string(),
            name: "Basmati Rice 1kg".to_string(),
            category: "2".to_string(),
            cost_price: "90".to_string(),
            selling_price: "Rs. 120.50".to_string(),
            current_stock: "40".to_string(),
            reorder_level: "5".to_string(),
            description: None,
            max_stock: None,
        }
    }

    #[test]
    fn test_defaults_match_blank_screen() {
        let form = InventoryForm::new();
        assert_eq!(form.current_stock, "0");
        assert_eq!(form.reorder_level, "10");
        assert!(form.sku.is_empty());
    }

    #[test]
    fn test_validate_builds_input() {
        let input = filled().validate().unwrap();
        assert_eq!(input.sku, "8901030865278");
        assert_eq!(input.category_id, Some(2));
        assert_eq!(input.cost_price.minor_units(), 9000);
        assert_eq!(input.selling_price.minor_units(), 12050);
        assert_eq!(input.current_stock, 40);
        assert_eq!(input.reorder_level, 5);
        assert_eq!(input.max_stock, None);
    }

    #[test]
    fn test_sku_and_name_required() {
        let mut form = filled();
        form.name = "   ".to_string();
        assert_eq!(form.validate().unwrap_err(), ValidationError::SkuAndNameRequired);

        let mut form = filled();
        form.sku.clear();
        assert_eq!(form.validate().unwrap_err(), ValidationError::SkuAndNameRequired);
    }

    #[test]
    fn test_field_errors_surface() {
        let mut form = filled();
        form.current_stock = "-2".to_string();
        assert!(matches!(
            form.validate().unwrap_err(),
            ValidationError::Negative { .. }
        ));

        let mut form = filled();
        form.cost_price.clear();
        assert!(matches!(
            form.validate().unwrap_err(),
            ValidationError::Required { .. }
        ));

        let mut form = filled();
        form.max_stock = Some("lots".to_string());
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_blank_optionals_are_none() {
        let mut form = filled();
        form.category = " ".to_string();
        form.description = Some("  ".to_string());
        form.max_stock = Some(String::new());
        let input = form.validate().unwrap();
        assert_eq!(input.category_id, None);
        assert_eq!(input.description, None);
        assert_eq!(input.max_stock, None);
    }

    #[test]
    fn test_clear_and_new_sku_reset() {
        let mut form = filled();
        form.reset_for_new_sku();
        assert_eq!(form.sku, " 8901030865278 ");
        assert_eq!(form.reorder_level, "5");
        assert_eq!(form.current_stock, "0");
        assert!(form.name.is_empty() && form.cost_price.is_empty());

        form.clear();
        assert_eq!(form, InventoryForm::default());
    }

    #[test]
    fn test_load_round_trips_through_validate() {
        let product = Product {
            id: 4,
            sku: "BK-001".to_string(),
            name: "Rust Book".to_string(),
            description: Some("Hardcover".to_string()),
            category_id: Some(4),
            category_name: Some("Books".to_string()),
            supplier_id: None,
            cost_price_minor: 150000,
            selling_price_minor: 199900,
            current_stock: 7,
            reorder_level: 2,
            max_stock: Some(30),
            is_active: true,
            created_at: None,
            updated_at: None,
        };

        let mut form = InventoryForm::new();
        form.load(&product);
        assert_eq!(form.selling_price, "1999.00");

        let input = form.validate().unwrap();
        assert_eq!(input.selling_price, product.selling_price());
        assert_eq!(input.max_stock, Some(30));
        assert_eq!(input.description.as_deref(), Some("Hardcover"));
    }
}
