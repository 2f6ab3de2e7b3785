//! Application configuration.
//!
//! Settings are read from a TOML file (`energy-dash.toml`) and then
//! overridden by environment variables:
//!
//! - `ENERGY_DASH_CONFIG`: explicit path of the configuration file
//! - `REPOSITORY_TYPE`: `local` or `snapshot`
//! - `ENERGY_DASH_DATASET`: dataset file for the snapshot repository
//! - `HOST` / `PORT`: bind address of the HTTP server
//!
//! ```toml
//! [repository]
//! type = "snapshot"
//!
//! [snapshot]
//! dataset_path = "data/sample_dataset.json"
//!
//! [dashboard]
//! week_limit = 10
//! forecast_horizons = [1, 4, 12]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::db::factory::RepositoryType;
use crate::db::repository::RepositoryError;

pub const CONFIG_FILE_NAME: &str = "energy-dash.toml";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub snapshot: SnapshotSettings,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub server: ServerSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
        }
    }
}

fn default_repo_type() -> String {
    "local".to_string()
}

/// Dataset snapshot settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotSettings {
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,
}

/// Limits and windows used when assembling dashboard views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Weeks offered in the week selector.
    #[serde(default = "default_week_limit")]
    pub week_limit: usize,
    /// Weeks loaded into the table used for alignment.
    #[serde(default = "default_week_table_limit")]
    pub week_table_limit: usize,
    #[serde(default = "default_product_limit")]
    pub product_limit: usize,
    /// Weeks of price history before the current week.
    #[serde(default = "default_lookback_weeks")]
    pub price_lookback_weeks: u32,
    #[serde(default = "default_lookback_weeks")]
    pub history_weeks: u32,
    #[serde(default = "default_forecast_horizons")]
    pub forecast_horizons: Vec<u32>,
}

fn default_week_limit() -> usize {
    10
}

fn default_week_table_limit() -> usize {
    200
}

fn default_product_limit() -> usize {
    200
}

fn default_lookback_weeks() -> u32 {
    10
}

fn default_forecast_horizons() -> Vec<u32> {
    vec![1, 4, 12]
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            week_limit: default_week_limit(),
            week_table_limit: default_week_table_limit(),
            product_limit: default_product_limit(),
            price_lookback_weeks: default_lookback_weeks(),
            history_weeks: default_lookback_weeks(),
            forecast_horizons: default_forecast_horizons(),
        }
    }
}

/// HTTP bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// A relative `dataset_path` is resolved against the file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;
        let mut config = Self::from_toml_str(&content)?;
        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        config.snapshot.dataset_path = config.snapshot.dataset_path.take().map(|dataset| {
            if dataset.is_relative() {
                dir.join(dataset)
            } else {
                dataset
            }
        });
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load configuration from the first `energy-dash.toml` found in the
    /// current directory, `backend/` or the parent directory.
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::configuration(format!(
            "No {} found in standard locations",
            CONFIG_FILE_NAME
        )))
    }

    /// Resolve the effective configuration: explicit file, default location or
    /// built-in defaults, then environment overrides.
    pub fn load() -> Result<Self, RepositoryError> {
        let config = match std::env::var("ENERGY_DASH_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::from_default_location().unwrap_or_default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Apply `REPOSITORY_TYPE`, `ENERGY_DASH_DATASET`, `HOST` and `PORT`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dataset) = std::env::var("ENERGY_DASH_DATASET") {
            self.snapshot.dataset_path = Some(PathBuf::from(dataset));
            if std::env::var("REPOSITORY_TYPE").is_err() {
                self.repository.repo_type = "snapshot".to_string();
            }
        }
        if let Ok(repo_type) = std::env::var("REPOSITORY_TYPE") {
            self.repository.repo_type = repo_type;
        }
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        self
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }
}
