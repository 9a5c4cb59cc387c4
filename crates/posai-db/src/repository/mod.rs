//! # Repository Module
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  posai inventory save --sku ... --name ...                             │
//! │       │                                                                 │
//! │       │  db.products().save(input)                                     │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── get_by_sku(&self, sku)                                            │
//! │  ├── save(&self, input)          SELECT ID → UPDATE or INSERT          │
//! │  ├── recent(&self, limit)                                              │
//! │  └── ...                                                                │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database (PRODUCTS, CATEGORIES)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Barcode lookup, save/update, recent, search, stock
//! - [`category::CategoryRepository`] - Category dropdown and seeding
//! - [`sale::SaleRepository`] - Checkout stock transaction

pub mod category;
pub mod product;
pub mod sale;
