//! # SQLite Schema Migrations
//!
//! The schema for the SQLite backend lives in `migrations/sqlite/` at the
//! workspace root and is compiled into the binary.
//!
//! ```text
//! SqlitePersistence::connect
//!      │
//!      ▼
//! _sqlx_migrations ── already recorded? ── skip
//!      │
//!      ▼
//! 001_initial_schema.sql   app_state(key, value, updated_at)
//! ```
//!
//! Files are applied in sequence order (`NNN_description.sql`). Applied
//! files are checksummed, so change the schema with a new file only.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::StoreResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies any migration not yet recorded in the database.
pub async fn run_migrations(pool: &SqlitePool) -> StoreResult<()> {
    debug!(embedded = MIGRATOR.migrations.len(), "Applying schema migrations");

    MIGRATOR.run(pool).await?;

    info!("Schema up to date");
    Ok(())
}

/// `(embedded, applied)` migration counts.
pub async fn migration_status(pool: &SqlitePool) -> StoreResult<(usize, usize)> {
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
        .fetch_one(pool)
        .await?;

    Ok((MIGRATOR.migrations.len(), applied.max(0) as usize))
}
