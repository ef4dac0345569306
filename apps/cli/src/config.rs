//! # Configuration
//!
//! Application configuration loaded once at startup.
//!
//! ## Configuration Sources (Priority Order, highest first)
//! 1. Command-line flags (`--data-dir`, `--backend`, ...)
//! 2. Environment variables (`GROCER_*`, read by clap for the same flags)
//! 3. Config file (`grocer.toml` in the platform config dir, or `--config` /
//!    `GROCER_CONFIG`)
//! 4. Defaults (this file)
//!
//! ## Example `grocer.toml`
//! ```toml
//! store_name = "Corner Market"
//! currency_symbol = "FCFA "
//! backend = "sqlite"
//! stock_policy = "reject"
//! low_stock_threshold = 5
//! operator = "manager1"
//! ```
//!
//! Configuration is read-only after loading, so no lock is needed.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use grocer_core::{StockPolicy, DEFAULT_LOW_STOCK_THRESHOLD};

/// Default config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "grocer.toml";

/// SQLite database file name inside the data directory.
pub const SQLITE_FILE_NAME: &str = "grocer.db";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    Missing(PathBuf),

    #[error("Could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid {field}: {reason}")]
    Invalid { field: String, reason: String },
}

// =============================================================================
// AppConfig
// =============================================================================

/// Which persistence backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One JSON file per collection in the data directory.
    #[default]
    Json,
    /// `grocer.db` in the data directory.
    Sqlite,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Json => write!(f, "json"),
            Backend::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Store name (receipt title)
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Directory holding the persisted collections
    pub data_dir: PathBuf,

    pub backend: Backend,

    /// Whether checkout may drive stock below zero
    pub stock_policy: StockPolicy,

    /// Products with stock below this count as low on stock
    pub low_stock_threshold: i64,

    /// Username acting for user-management commands
    pub operator: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            store_name: "My Grocery Store".to_string(),
            currency_symbol: "$".to_string(),
            data_dir: default_data_dir(),
            backend: Backend::Json,
            stock_policy: StockPolicy::AllowNegative,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            operator: "admin".to_string(),
        }
    }
}

/// Values that win over the config file. `None` leaves the file value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub store_name: Option<String>,
    pub currency_symbol: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub backend: Option<Backend>,
    pub stock_policy: Option<StockPolicy>,
    pub low_stock_threshold: Option<i64>,
    pub operator: Option<String>,
}

impl AppConfig {
    /// Loads defaults, then the config file, then `overrides`.
    ///
    /// A missing default config file is fine; a missing file that was asked
    /// for explicitly is an error.
    pub fn load(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = match &overrides.config_path {
            Some(path) if !path.exists() => return Err(ConfigError::Missing(path.clone())),
            Some(path) => AppConfig::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => AppConfig::from_file(&path)?,
                _ => AppConfig::default(),
            },
        };

        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML config file. Absent keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies every override that is set.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(v) = &overrides.store_name {
            self.store_name = v.clone();
        }
        if let Some(v) = &overrides.currency_symbol {
            self.currency_symbol = v.clone();
        }
        if let Some(v) = &overrides.data_dir {
            self.data_dir = v.clone();
        }
        if let Some(v) = overrides.backend {
            self.backend = v;
        }
        if let Some(v) = overrides.stock_policy {
            self.stock_policy = v;
        }
        if let Some(v) = overrides.low_stock_threshold {
            self.low_stock_threshold = v;
        }
        if let Some(v) = &overrides.operator {
            self.operator = v.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "store_name".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.low_stock_threshold < 0 {
            return Err(ConfigError::Invalid {
                field: "low_stock_threshold".to_string(),
                reason: "must not be negative".to_string(),
            });
        }
        if self.operator.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "operator".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Location of the SQLite database for the sqlite backend.
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join(SQLITE_FILE_NAME)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "grocer", "pos")
}

/// `grocer.toml` in the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Platform data directory, or `./data` when none can be determined.
///
/// - **macOS**: `~/Library/Application Support/com.grocer.pos`
/// - **Windows**: `%APPDATA%\grocer\pos\data`
/// - **Linux**: `~/.local/share/pos`
pub fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./data"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.store_name, "My Grocery Store");
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.backend, Backend::Json);
        assert_eq!(config.stock_policy, StockPolicy::AllowNegative);
        assert_eq!(config.low_stock_threshold, 10);
        assert_eq!(config.operator, "admin");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_values_fill_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grocer.toml");
        std::fs::write(
            &path,
            r#"
            store_name = "Corner Market"
            backend = "sqlite"
            stock_policy = "reject"
            low_stock_threshold = 5
            "#,
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.store_name, "Corner Market");
        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.stock_policy, StockPolicy::Reject);
        assert_eq!(config.low_stock_threshold, 5);
        // Untouched keys keep their defaults.
        assert_eq!(config.currency_symbol, "$");
    }

    #[test]
    fn test_overrides_win_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grocer.toml");
        std::fs::write(&path, "store_name = \"Corner Market\"\noperator = \"manager1\"\n").unwrap();

        let config = AppConfig::load(&ConfigOverrides {
            config_path: Some(path),
            operator: Some("cashier1".to_string()),
            data_dir: Some(dir.path().join("data")),
            ..ConfigOverrides::default()
        })
        .unwrap();

        assert_eq!(config.store_name, "Corner Market");
        assert_eq!(config.operator, "cashier1");
        assert_eq!(config.sqlite_path(), dir.path().join("data").join("grocer.db"));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let err = AppConfig::load(&ConfigOverrides {
            config_path: Some(PathBuf::from("/definitely/not/here/grocer.toml")),
            ..ConfigOverrides::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grocer.toml");
        std::fs::write(&path, "store_nmae = \"typo\"\n").unwrap();

        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_negative_threshold() {
        let mut config = AppConfig::default();
        config.apply(&ConfigOverrides {
            low_stock_threshold: Some(-1),
            ..ConfigOverrides::default()
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
