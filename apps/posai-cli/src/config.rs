//! # Configuration
//!
//! Store settings loaded once at startup and read-only afterwards.
//!
//! ## Load Order (later overrides earlier)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. AppConfig::default()                                                │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  2. posai.toml  (--config PATH, else the platform config dir)          │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  3. POSAI_DB_PATH, POSAI_STORE_NAME,                                    │
//! │     POSAI_CURRENCY_SYMBOL, POSAI_RECENT_LIMIT                           │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  4. --db flag (applied by the caller)                                   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  validate()                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example `posai.toml`
//! ```toml
//! database_path = "/var/lib/posai/posai.db"
//! store_name = "Corner Store"
//! currency_symbol = "Rs. "
//! recent_limit = 5
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const CONFIG_FILE: &str = "posai.toml";
const DATABASE_FILE: &str = "posai.db";

/// Configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file. `None` means the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Shown on the home menu and receipts.
    pub store_name: String,

    /// Prefix for amounts, including any trailing space.
    pub currency_symbol: String,

    /// Decimal places shown for amounts.
    pub currency_decimals: u8,

    /// Rows in "Recently Updated Items".
    pub recent_limit: u32,

    /// Rows in the low-stock report.
    pub low_stock_limit: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: None,
            store_name: "POS.AI".to_string(),
            currency_symbol: "Rs. ".to_string(),
            currency_decimals: 2,
            recent_limit: posai_core::RECENT_LIMIT,
            low_stock_limit: 20,
        }
    }
}

impl AppConfig {
    /// Loads defaults, then the config file, then environment overrides.
    ///
    /// An explicit `config_path` must exist; the default location is
    /// optional.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::from_file(path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading config file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `POSAI_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("POSAI_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(name) = lookup("POSAI_STORE_NAME") {
            self.store_name = name;
        }

        if let Some(symbol) = lookup("POSAI_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(limit) = lookup("POSAI_RECENT_LIMIT") {
            match limit.parse::<u32>() {
                Ok(n) => self.recent_limit = n,
                Err(_) => warn!(value = %limit, "Ignoring non-numeric POSAI_RECENT_LIMIT"),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recent_limit == 0 {
            return Err(ConfigError::Invalid(
                "recent_limit must be greater than 0".into(),
            ));
        }

        if self.currency_decimals > 4 {
            return Err(ConfigError::Invalid(format!(
                "currency_decimals must be at most 4, got {}",
                self.currency_decimals
            )));
        }

        Ok(())
    }

    /// The database file to open.
    pub fn resolve_database_path(&self) -> PathBuf {
        if let Some(path) = &self.database_path {
            return path.clone();
        }

        ProjectDirs::from("com", "posai", "pos")
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
            .unwrap_or_else(|| PathBuf::from("data").join(DATABASE_FILE))
    }

    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "posai", "pos").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Formats an amount held in paise.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(1234), "Rs. 12.34");
    /// ```
    pub fn format_currency(&self, minor_units: i64) -> String {
        let sign = if minor_units < 0 { "-" } else { "" };
        let paise = minor_units.unsigned_abs();

        let amount = match self.currency_decimals {
            0 => ((paise + 50) / 100).to_string(),
            1 => {
                let tenths = (paise + 5) / 10;
                format!("{}.{}", tenths / 10, tenths % 10)
            }
            d => format!(
                "{}.{:02}{}",
                paise / 100,
                paise % 100,
                "0".repeat(usize::from(d) - 2)
            ),
        };

        format!("{}{}{}", sign, self.currency_symbol, amount)
    }
}
