//! Repository factory for dependency injection.
//!
//! Creates repository instances from runtime configuration.

use log::info;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::checksum::short_fingerprint;
use super::dataset::Dataset;
use super::repositories::LocalRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::config::AppConfig;

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Empty in-memory repository
    Local,
    /// In-memory repository seeded from a JSON dataset file
    Snapshot,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("local", "memory", "snapshot", "dataset").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            "snapshot" | "dataset" => Ok(Self::Snapshot),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variables.
    ///
    /// Reads `REPOSITORY_TYPE`. Defaults to Snapshot if `ENERGY_DASH_DATASET`
    /// is present, otherwise Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().unwrap_or(Self::Local);
        }

        if std::env::var("ENERGY_DASH_DATASET").is_ok() {
            Self::Snapshot
        } else {
            Self::Local
        }
    }
}

/// Repository factory for creating repository instances.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `dataset_path` - Dataset file (required for Snapshot)
    pub fn create(
        repo_type: RepositoryType,
        dataset_path: Option<&Path>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::Snapshot => {
                let path = dataset_path.ok_or_else(|| {
                    RepositoryError::configuration("Snapshot repository requires a dataset path")
                })?;
                let repo = Self::create_snapshot(path)?;
                Ok(repo as Arc<dyn FullRepository>)
            }
        }
    }

    /// Create an empty in-memory repository.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create an in-memory repository seeded from a dataset file.
    pub fn create_snapshot(path: &Path) -> RepositoryResult<Arc<LocalRepository>> {
        let loaded = Dataset::from_file(path)?;
        info!(
            "Loaded dataset {} ({} weeks, {} products, fingerprint {})",
            path.display(),
            loaded.dataset.weeks.len(),
            loaded.dataset.products.len(),
            short_fingerprint(&loaded.checksum)
        );
        Ok(Arc::new(LocalRepository::from_dataset(loaded)))
    }

    /// Create repository from environment configuration.
    pub fn from_env() -> RepositoryResult<Arc<dyn FullRepository>> {
        let dataset = std::env::var("ENERGY_DASH_DATASET").ok();
        Self::create(
            RepositoryType::from_env(),
            dataset.as_deref().map(Path::new),
        )
    }

    /// Create repository from an application configuration.
    pub fn from_config(config: &AppConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        Self::create(repo_type, config.snapshot.dataset_path.as_deref())
    }
}
