//! # CLI Commands Module
//!
//! Every subcommand of the `grocer` binary.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (AppContext, dispatch)
//! ├── product.rs    ◄─── Catalog CRUD, search, barcode lookup
//! ├── sale.rs       ◄─── Checkout, sales history, receipt reprint
//! ├── report.rs     ◄─── Overview, product sales, finances
//! └── directory.rs  ◄─── Suppliers and staff accounts
//! ```
//!
//! Each command returns the text to print. With `--json` the same data is
//! emitted as JSON instead of a table.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::config::{AppConfig, Backend};
use crate::error::ApiError;
use crate::Commands;
use grocer_store::{JsonPersistence, Persistence, SqliteConfig, SqlitePersistence, Store, StoreError};

pub mod directory;
pub mod product;
pub mod report;
pub mod sale;

/// Everything a command needs.
pub struct AppContext {
    pub store: Store,
    pub config: AppConfig,
    pub json: bool,
}

impl AppContext {
    /// Opens the configured backend.
    pub async fn open(config: AppConfig, json: bool) -> Result<Self, ApiError> {
        let persistence: Arc<dyn Persistence> = match config.backend {
            Backend::Json => Arc::new(JsonPersistence::new(&config.data_dir)),
            Backend::Sqlite => {
                tokio::fs::create_dir_all(&config.data_dir)
                    .await
                    .map_err(|e| StoreError::io(&config.data_dir, e))?;
                Arc::new(SqlitePersistence::connect(SqliteConfig::new(config.sqlite_path())).await?)
            }
        };

        let store = Store::open(persistence, config.stock_policy).await?;
        Ok(AppContext::new(store, config, json))
    }

    pub fn new(store: Store, config: AppConfig, json: bool) -> Self {
        AppContext { store, config, json }
    }

    pub async fn dispatch(&self, command: Commands) -> Result<String, ApiError> {
        debug!(command = ?command, "Dispatching command");

        match command {
            Commands::Products(cmd) => product::run(self, cmd).await,
            Commands::Checkout(args) => sale::checkout(self, args).await,
            Commands::Sales(cmd) => sale::run(self, cmd).await,
            Commands::Report(cmd) => report::run(self, cmd).await,
            Commands::Suppliers(cmd) => directory::run_suppliers(self, cmd).await,
            Commands::Users(cmd) => directory::run_users(self, cmd).await,
            Commands::Settings => self.output(&self.config, settings_text),
        }
    }

    /// Formats a value as JSON or as text.
    pub(crate) fn output<T: Serialize>(
        &self,
        value: &T,
        text: impl FnOnce(&T) -> String,
    ) -> Result<String, ApiError> {
        if self.json {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(text(value))
        }
    }

    pub(crate) fn money(&self, amount: grocer_core::Money) -> String {
        amount.format_with(&self.config.currency_symbol)
    }
}

fn settings_text(config: &AppConfig) -> String {
    [
        format!("Store name:          {}", config.store_name),
        format!("Currency symbol:     {}", config.currency_symbol),
        format!("Data directory:      {}", config.data_dir.display()),
        format!("Backend:             {}", config.backend),
        format!("Stock policy:        {}", config.stock_policy),
        format!("Low stock threshold: {}", config.low_stock_threshold),
        format!("Operator:            {}", config.operator),
    ]
    .join("\n")
}
