//! Energy dashboard HTTP server binary.
//!
//! Loads the configuration, builds the repository, sets up the HTTP router
//! and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Empty in-memory repository (default)
//! cargo run --bin energy-server
//!
//! # Seeded from a dataset snapshot
//! ENERGY_DASH_DATASET=data/sample_dataset.json cargo run --bin energy-server
//! ```
//!
//! # Environment Variables
//!
//! - `ENERGY_DASH_CONFIG`: configuration file (default: `energy-dash.toml` if found)
//! - `ENERGY_DASH_DATASET`: dataset file, selects the snapshot repository
//! - `REPOSITORY_TYPE`: `local` or `snapshot`
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log filter (default: info)

use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use energy_dash::config::AppConfig;
use energy_dash::db::RepositoryFactory;
use energy_dash::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting energy dashboard HTTP server");

    let config = AppConfig::load()?;
    info!(
        "Repository type: {}, dataset: {}",
        config.repository.repo_type,
        config
            .snapshot
            .dataset_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    );

    let repository = RepositoryFactory::from_config(&config)?;
    info!("Repository initialized successfully");

    let state = AppState::with_config(repository, config.dashboard.clone());
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
