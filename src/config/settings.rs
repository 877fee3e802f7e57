//! Application settings loading from config.toml
//!
//! The config file is optional. Missing sections fall back to defaults, and the
//! `DATABASE_URL` environment variable (usually provided through `.env`) takes precedence
//! over the file's `database_url`.

use crate::{
    config::database::DEFAULT_DATABASE_URL,
    core::aggregation::{BudgetThresholds, TimeRange},
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Default config file location
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Longest daily spending series the dashboard will build
pub const MAX_DAILY_SERIES_DAYS: u32 = 366;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database connection string
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Dashboard presentation settings
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Ratios of spent-to-limit used for budget alerts
    #[serde(default)]
    pub thresholds: BudgetThresholds,
    /// Categories created for a user on first start
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

impl AppConfig {
    /// Checks values that deserialize fine but cannot be used.
    ///
    /// # Errors
    /// Returns [`Error::Config`] for a daily series length outside
    /// `1..=MAX_DAILY_SERIES_DAYS`, or for thresholds that are not finite, not positive, or
    /// not in ascending order.
    pub fn validate(&self) -> Result<()> {
        let days = self.dashboard.daily_series_days;
        if !(1..=MAX_DAILY_SERIES_DAYS).contains(&days) {
            return Err(Error::Config {
                message: format!(
                    "dashboard.daily_series_days must be between 1 and {MAX_DAILY_SERIES_DAYS}, got {days}"
                ),
            });
        }

        let BudgetThresholds {
            warning,
            critical,
            overspent,
        } = self.thresholds;
        if [warning, critical, overspent]
            .iter()
            .any(|t| !t.is_finite() || *t <= 0.0)
        {
            return Err(Error::Config {
                message: format!(
                    "thresholds must be finite and positive, got {warning}/{critical}/{overspent}"
                ),
            });
        }
        if warning > critical || critical > overspent {
            return Err(Error::Config {
                message: format!(
                    "thresholds must satisfy warning <= critical <= overspent, got {warning}/{critical}/{overspent}"
                ),
            });
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            dashboard: DashboardConfig::default(),
            thresholds: BudgetThresholds::default(),
            categories: Vec::new(),
        }
    }
}

/// Dashboard settings
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Number of days in the spending trend series
    #[serde(default = "default_daily_series_days")]
    pub daily_series_days: u32,
    /// Window of transactions summarised on the dashboard
    #[serde(default)]
    pub time_range: TimeRange,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            daily_series_days: default_daily_series_days(),
            time_range: TimeRange::default(),
        }
    }
}

/// Configuration for a single seeded category
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    /// Category name
    pub name: String,
    /// Optional chart color
    #[serde(default)]
    pub color: Option<String>,
    /// Optional icon name
    #[serde(default)]
    pub icon: Option<String>,
    /// Optional spending limit
    #[serde(default)]
    pub budget_limit: Option<f64>,
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

const fn default_daily_series_days() -> u32 {
    7
}

/// Parses and validates configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()?;
    Ok(config)
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    parse_config(&contents)
}

/// Replaces file-provided values with environment overrides.
#[must_use]
pub fn apply_env_overrides(mut config: AppConfig, database_url: Option<String>) -> AppConfig {
    if let Some(url) = database_url.filter(|url| !url.trim().is_empty()) {
        config.database_url = url;
    }
    config
}

/// Loads the application configuration.
///
/// Reads the file named by `BUDGET_BUDDY_CONFIG` (default `config.toml`). A missing file
/// yields the defaults; an unreadable or malformed file is an error.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("BUDGET_BUDDY_CONFIG")
        .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let config = if Path::new(&path).exists() {
        load_config(&path)?
    } else {
        info!("No config file at {path}, using defaults");
        AppConfig::default()
    };

    Ok(apply_env_overrides(
        config,
        std::env::var("DATABASE_URL").ok(),
    ))
}
