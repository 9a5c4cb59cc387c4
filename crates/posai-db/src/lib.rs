//! # posai-db: Database Layer for POS.AI
//!
//! SQLite access for the inventory and sale screens, through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        POS.AI Data Flow                                 │
//! │                                                                         │
//! │  posai inventory lookup 8901030865278                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     posai-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ CategoryRepo  │    │ 001_initial_ │  │   │
//! │  │   │               │    │ SaleRepo      │    │ schema.sql   │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   SQLite file: PRODUCTS, CATEGORIES, SUPPLIERS                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use posai_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("data/posai.db")).await?;
//! let product = db.products().get_by_sku("8901030865278").await?;
//! let recent = db.products().recent(5).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::category::CategoryRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
