//! # Schema Migrations
//!
//! The SQL under `migrations/sqlite/` is compiled into the binary, so a
//! fresh `posai.db` gets its tables without any files next to it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      posai.db schema                                    │
//! │                                                                         │
//! │  Database::new / posai init                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Check _sqlx_migrations table (created if missing)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  001_initial_schema.sql  ⬜ → SUPPLIERS, PRODUCTS, CATEGORIES           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Record checksum in _sqlx_migrations                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! New migrations go in `migrations/sqlite/` as `NNN_description.sql`.
//! Never edit one that has shipped.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

/// Embedded migrations from `migrations/sqlite` at the workspace root.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies whatever has not been applied yet; a second call does nothing.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(embedded = MIGRATOR.migrations.len(), "Applying schema");

    MIGRATOR.run(pool).await?;

    info!("Schema up to date");
    Ok(())
}

/// `(embedded, applied)` counts. A database that was never migrated has no
/// ledger table and reports zero applied; any other failure is returned.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.migrations.len();

    let has_ledger: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;

    if has_ledger == 0 {
        return Ok((embedded, 0));
    }

    let applied: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?;

    Ok((embedded, usize::try_from(applied).unwrap_or(0)))
}
