//! # SQLite Backend
//!
//! Stores each collection as one JSON text row in `app_state`.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SQLite Persistence                                 │
//! │                                                                         │
//! │  SqliteConfig::new(path)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqlitePersistence::connect(config) ← pool + migrations                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────────────────────────┐                      │
//! │  │ app_state                                    │                      │
//! │  │  key        │ value (JSON array) │ updated_at│                      │
//! │  │  products   │ [{"id":"p1",...}]  │ 2024-...  │                      │
//! │  │  sales      │ [...]              │           │                      │
//! │  │  suppliers  │ [...]              │           │                      │
//! │  │  users      │ [...]              │           │                      │
//! │  └──────────────────────────────────────────────┘                      │
//! │                                                                         │
//! │  save(): BEGIN → upsert every key → COMMIT                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! File databases run in WAL mode with NORMAL synchronous, matching a
//! single-terminal workload.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use super::{decode_collections, encode_collections, Persistence};
use crate::error::{StoreError, StoreResult};
use crate::migrations;
use grocer_core::StoreState;

// =============================================================================
// Configuration
// =============================================================================

/// SQLite backend configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = SqliteConfig::new("/path/to/grocer.db");
/// let backend = SqlitePersistence::connect(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,
}

impl SqliteConfig {
    /// Configuration for a database file, created if missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SqliteConfig {
            database_path: path.into(),
            max_connections: 5,
            connect_timeout: Duration::from_secs(30),
        }
    }

    /// Creates an in-memory database configuration (for testing).
    pub fn in_memory() -> Self {
        SqliteConfig {
            database_path: PathBuf::from(":memory:"),
            // Each in-memory connection is its own database.
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == ":memory:"
    }
}

// =============================================================================
// Backend
// =============================================================================

/// `app_state` key/value persistence.
#[derive(Debug, Clone)]
pub struct SqlitePersistence {
    pool: SqlitePool,
    location: String,
}

impl SqlitePersistence {
    /// Opens the pool and applies pending migrations.
    pub async fn connect(config: SqliteConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| StoreError::Database(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&config.database_path)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(connect_options)
            .await?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        migrations::run_migrations(&pool).await?;

        Ok(SqlitePersistence {
            pool,
            location: config.database_path.display().to_string(),
        })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the connection pool.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }
}

#[async_trait]
impl Persistence for SqlitePersistence {
    async fn load(&self) -> StoreResult<StoreState> {
        let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM app_state")
            .fetch_all(&self.pool)
            .await?;

        debug!(rows = rows.len(), "Loaded app_state rows");

        let mut by_key: HashMap<String, String> = rows.into_iter().collect();
        decode_collections(|key| by_key.remove(key))
    }

    async fn save(&self, state: &StoreState) -> StoreResult<()> {
        let collections = encode_collections(state, false)?;
        let updated_at = Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await?;

        for (key, value) in &collections {
            sqlx::query(
                r#"
                INSERT INTO app_state (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(*key)
            .bind(value)
            .bind(&updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(keys = collections.len(), "Saved app_state");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.location)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
