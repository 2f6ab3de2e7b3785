//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::db::repository::FullRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for data access
    pub repository: Arc<dyn FullRepository>,
    /// Limits and windows used when assembling views
    pub dashboard: Arc<DashboardConfig>,
}

impl AppState {
    /// Create a new application state with default dashboard settings.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self::with_config(repository, DashboardConfig::default())
    }

    pub fn with_config(repository: Arc<dyn FullRepository>, dashboard: DashboardConfig) -> Self {
        Self {
            repository,
            dashboard: Arc::new(dashboard),
        }
    }
}
