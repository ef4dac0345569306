//! # Grocer POS Command Line
//!
//! Command-line front end over the Grocer store.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Application Startup                                │
//! │                                                                         │
//! │  1. Parse Arguments ──────────────────────────────────────────────────► │
//! │     • clap derive, flags fall back to GROCER_* env vars                 │
//! │                                                                         │
//! │  2. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter, written to stderr            │
//! │     • Default: WARN, -v for INFO, -vv for DEBUG, RUST_LOG wins         │
//! │                                                                         │
//! │  3. Load Configuration ───────────────────────────────────────────────► │
//! │     • defaults < grocer.toml < env < flags                             │
//! │                                                                         │
//! │  4. Open Store ───────────────────────────────────────────────────────► │
//! │     • JSON collections or SQLite, directory seeded on first run        │
//! │                                                                         │
//! │  5. Run Command ──────────────────────────────────────────────────────► │
//! │     • stdout: result text (or JSON with --json)                        │
//! │     • stderr: logs and "error: [CODE] message"                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod config;
pub mod error;

use commands::AppContext;
use config::{AppConfig, Backend, ConfigOverrides};
use error::ApiError;
use grocer_core::StockPolicy;

/// Top-level arguments.
#[derive(Debug, Parser)]
#[command(name = "grocer", version, about = "Grocer POS", long_about = None)]
pub struct Cli {
    /// Config file (defaults to grocer.toml in the platform config dir)
    #[arg(long, global = true, env = "GROCER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the store data
    #[arg(long, global = true, env = "GROCER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Persistence backend
    #[arg(long, global = true, env = "GROCER_BACKEND", value_enum)]
    pub backend: Option<Backend>,

    /// allow_negative or reject
    #[arg(long, global = true, env = "GROCER_STOCK_POLICY")]
    pub stock_policy: Option<StockPolicy>,

    /// Stock below this value counts as low
    #[arg(long, global = true, env = "GROCER_LOW_STOCK_THRESHOLD")]
    pub low_stock_threshold: Option<i64>,

    /// Username performing user-management commands
    #[arg(long, global = true, env = "GROCER_OPERATOR")]
    pub operator: Option<String>,

    /// Receipt title
    #[arg(long, global = true, env = "GROCER_STORE_NAME")]
    pub store_name: Option<String>,

    #[arg(long, global = true, env = "GROCER_CURRENCY_SYMBOL")]
    pub currency_symbol: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage the product catalog
    #[command(subcommand)]
    Products(commands::product::ProductCommand),

    /// Ring up a sale
    Checkout(commands::sale::CheckoutArgs),

    /// Browse recorded sales
    #[command(subcommand)]
    Sales(commands::sale::SalesCommand),

    /// Dashboard and reports
    #[command(subcommand)]
    Report(commands::report::ReportCommand),

    /// Manage suppliers
    #[command(subcommand)]
    Suppliers(commands::directory::SupplierCommand),

    /// Manage staff accounts
    #[command(subcommand)]
    Users(commands::directory::UserCommand),

    /// Show the effective settings
    Settings,
}

impl Cli {
    /// Flag and environment values that override the config file.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            store_name: self.store_name.clone(),
            currency_symbol: self.currency_symbol.clone(),
            data_dir: self.data_dir.clone(),
            backend: self.backend,
            stock_policy: self.stock_policy,
            low_stock_threshold: self.low_stock_threshold,
            operator: self.operator.clone(),
        }
    }

    /// Loads the configuration, opens the store and runs the command.
    ///
    /// Returns the text to print on stdout.
    pub async fn run(self) -> Result<String, ApiError> {
        let config = AppConfig::load(&self.overrides())?;

        info!(
            data_dir = %config.data_dir.display(),
            backend = %config.backend,
            stock_policy = %config.stock_policy,
            "Configuration loaded"
        );

        let ctx = AppContext::open(config, self.json).await?;
        ctx.dispatch(self.command).await
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=grocer_store=trace` - Trace only the store
/// - Without `RUST_LOG`, `verbose` picks warn, info or debug
///
/// Logs go to stderr so stdout stays clean for command output.
pub fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info,sqlx=warn",
        _ => "debug,sqlx=warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
