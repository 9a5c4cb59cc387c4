//! # Output
//!
//! Every command writes through [`Output`], which prints either text tables
//! or the same DTOs as JSON (`--json`).
//!
//! DTOs decouple the terminal contract from the domain types: money is sent
//! both as minor units and as the formatted decimal string.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::config::AppConfig;
use crate::error::CliResult;
use posai_core::{Cart, CartItem, Category, Product, ProductSummary, Receipt, ReceiptLine};

// =============================================================================
// Output
// =============================================================================

pub struct Output<W: Write> {
    writer: W,
    json: bool,
    config: AppConfig,
}

impl<W: Write> Output<W> {
    pub fn new(writer: W, json: bool, config: AppConfig) -> Self {
        Output {
            writer,
            json,
            config,
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Formats paise with the configured currency.
    pub fn money(&self, minor_units: i64) -> String {
        self.config.format_currency(minor_units)
    }

    pub fn line(&mut self, text: impl std::fmt::Display) -> CliResult<()> {
        writeln!(self.writer, "{}", text)?;
        Ok(())
    }

    /// Writes `value` as one line of JSON.
    pub fn json<T: Serialize>(&mut self, value: &T) -> CliResult<()> {
        serde_json::to_writer(&mut self.writer, value)?;
        writeln!(self.writer)?;
        Ok(())
    }

    /// JSON when `--json` is set, otherwise whatever `text` prints.
    pub fn emit<T, F>(&mut self, value: &T, text: F) -> CliResult<()>
    where
        T: Serialize,
        F: FnOnce(&mut Self, &T) -> CliResult<()>,
    {
        if self.json {
            self.json(value)
        } else {
            text(self, value)
        }
    }

    pub fn flush(&mut self) -> CliResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    // =========================================================================
    // Text Renderers
    // =========================================================================

    pub fn product(&mut self, p: &ProductDto) -> CliResult<()> {
        let category = match (&p.category_id, &p.category_name) {
            (Some(id), Some(name)) => format!("{} ({})", name, id),
            (Some(id), None) => id.to_string(),
            _ => "-".to_string(),
        };

        self.line(format!("SKU:            {}", p.sku))?;
        self.line(format!("Name:           {}", p.name))?;
        self.line(format!("Category:       {}", category))?;
        self.line(format!("Cost Price:     {}", self.money(p.cost_price_minor)))?;
        self.line(format!("Selling Price:  {}", self.money(p.selling_price_minor)))?;
        self.line(format!("Unit Margin:    {}", self.money(p.unit_margin_minor)))?;
        self.line(format!("Current Stock:  {}", p.current_stock))?;
        self.line(format!("Reorder Level:  {}", p.reorder_level))?;
        if let Some(max) = p.max_stock {
            self.line(format!("Max Stock:      {}", max))?;
        }
        if let Some(description) = &p.description {
            self.line(format!("Description:    {}", description))?;
        }
        if !p.is_active {
            self.line("Status:         INACTIVE")?;
        }
        Ok(())
    }

    pub fn product_table(&mut self, products: &[ProductDto]) -> CliResult<()> {
        if products.is_empty() {
            return self.line("No products.");
        }

        self.line(format!(
            "{:<20} {:<32} {:>7} {:>7} {:>14}",
            "SKU", "Name", "Stock", "Reorder", "Price"
        ))?;
        for p in products {
            let price = self.money(p.selling_price_minor);
            self.line(format!(
                "{:<20} {:<32} {:>7} {:>7} {:>14}",
                p.sku,
                truncate(&p.name, 32),
                p.current_stock,
                p.reorder_level,
                price
            ))?;
        }
        Ok(())
    }

    /// The "Recently Updated Items" table.
    pub fn recent_table(&mut self, rows: &[ProductSummaryDto]) -> CliResult<()> {
        self.line("Recently Updated Items")?;
        if rows.is_empty() {
            return self.line("  (none yet)");
        }

        self.line(format!("{:<20} {:<32} {:>7} {:>14}", "SKU", "Name", "Stock", "Price"))?;
        for row in rows {
            let price = self.money(row.selling_price_minor);
            self.line(format!(
                "{:<20} {:<32} {:>7} {:>14}",
                row.sku,
                truncate(&row.name, 32),
                row.current_stock,
                price
            ))?;
        }
        Ok(())
    }

    pub fn category_table(&mut self, categories: &[CategoryDto]) -> CliResult<()> {
        if categories.is_empty() {
            return self.line("No categories. Run `posai seed` to add the defaults.");
        }

        self.line(format!("{:>4}  {:<24} {}", "ID", "Name", "Description"))?;
        for c in categories {
            self.line(format!(
                "{:>4}  {:<24} {}",
                c.id,
                c.name,
                c.description.as_deref().unwrap_or("")
            ))?;
        }
        Ok(())
    }

    pub fn cart(&mut self, cart: &CartDto) -> CliResult<()> {
        if cart.lines.is_empty() {
            self.line("Cart is empty.")?;
        } else {
            self.line(format!(
                "{:<20} {:<28} {:>5} {:>12} {:>14}",
                "Barcode", "Name", "Qty", "Price", "Total"
            ))?;
            for line in &cart.lines {
                let price = self.money(line.unit_price_minor);
                let total = self.money(line.line_total_minor);
                self.line(format!(
                    "{:<20} {:<28} {:>5} {:>12} {:>14}",
                    line.sku,
                    truncate(&line.name, 28),
                    line.quantity,
                    price,
                    total
                ))?;
            }
        }
        let total = self.money(cart.total_minor);
        self.line(format!("Customer Total: {}", total))
    }

    pub fn receipt(&mut self, receipt: &ReceiptDto) -> CliResult<()> {
        let store = self.config.store_name.clone();
        self.line(format!("{} - Receipt {}", store, receipt.receipt_number))?;
        self.line(receipt.completed_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        for line in &receipt.lines {
            let total = self.money(line.line_total_minor);
            self.line(format!(
                "  {:<28} {:>4} x {:>12} {:>14}",
                truncate(&line.name, 28),
                line.quantity,
                self.money(line.unit_price_minor),
                total
            ))?;
        }
        let total = self.money(receipt.total_minor);
        self.line(format!("Items: {}   Total: {}", receipt.total_quantity, total))
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub cost_price_minor: i64,
    pub cost_price: String,
    pub selling_price_minor: i64,
    pub selling_price: String,
    pub unit_margin_minor: i64,
    pub unit_margin: String,
    pub current_stock: i64,
    pub reorder_level: i64,
    pub max_stock: Option<i64>,
    pub needs_reorder: bool,
    pub is_active: bool,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            needs_reorder: p.needs_reorder(),
            cost_price: p.cost_price().to_decimal_string(),
            selling_price: p.selling_price().to_decimal_string(),
            unit_margin_minor: p.unit_margin().minor_units(),
            unit_margin: p.unit_margin().to_decimal_string(),
            id: p.id,
            sku: p.sku,
            name: p.name,
            description: p.description,
            category_id: p.category_id,
            category_name: p.category_name,
            cost_price_minor: p.cost_price_minor,
            selling_price_minor: p.selling_price_minor,
            current_stock: p.current_stock,
            reorder_level: p.reorder_level,
            max_stock: p.max_stock,
            is_active: p.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummaryDto {
    pub sku: String,
    pub name: String,
    pub current_stock: i64,
    pub selling_price_minor: i64,
    pub selling_price: String,
}

impl From<ProductSummary> for ProductSummaryDto {
    fn from(s: ProductSummary) -> Self {
        ProductSummaryDto {
            selling_price: s.selling_price().to_decimal_string(),
            sku: s.sku,
            name: s.name,
            current_stock: s.current_stock,
            selling_price_minor: s.selling_price_minor,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
}

impl From<Category> for CategoryDto {
    fn from(c: Category) -> Self {
        CategoryDto {
            id: c.id,
            name: c.name,
            description: c.description,
            parent_id: c.parent_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDto {
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price_minor: i64,
    pub line_total_minor: i64,
}

impl From<&CartItem> for LineDto {
    fn from(item: &CartItem) -> Self {
        LineDto {
            sku: item.sku.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            unit_price_minor: item.unit_price.minor_units(),
            line_total_minor: item.line_total().minor_units(),
        }
    }
}

impl From<ReceiptLine> for LineDto {
    fn from(line: ReceiptLine) -> Self {
        LineDto {
            sku: line.sku,
            name: line.name,
            quantity: line.quantity,
            unit_price_minor: line.unit_price.minor_units(),
            line_total_minor: line.line_total.minor_units(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDto {
    pub lines: Vec<LineDto>,
    pub item_count: usize,
    pub total_quantity: i64,
    pub total_minor: i64,
    pub total: String,
}

impl From<&Cart> for CartDto {
    fn from(cart: &Cart) -> Self {
        CartDto {
            lines: cart.items.iter().map(LineDto::from).collect(),
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total_minor: cart.customer_total().minor_units(),
            total: cart.customer_total().to_decimal_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptDto {
    pub id: String,
    pub receipt_number: String,
    pub lines: Vec<LineDto>,
    pub total_quantity: i64,
    pub total_minor: i64,
    pub total: String,
    pub completed_at: DateTime<Utc>,
}

impl From<Receipt> for ReceiptDto {
    fn from(r: Receipt) -> Self {
        ReceiptDto {
            total: r.total.to_decimal_string(),
            total_minor: r.total.minor_units(),
            id: r.id,
            receipt_number: r.receipt_number,
            lines: r.lines.into_iter().map(LineDto::from).collect(),
            total_quantity: r.total_quantity,
            completed_at: r.completed_at,
        }
    }
}
