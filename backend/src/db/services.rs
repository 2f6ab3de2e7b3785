//! High-level database service layer.
//!
//! Repository-agnostic read operations shared by the HTTP handlers and the
//! dashboard services. These add logging and sanity limits on top of the
//! raw repository calls.
//!
//! # Usage
//!
//! ```no_run
//! use energy_dash::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let weeks = services::list_operational_weeks(&repo, 10).await?;
//!     println!("Found {} weeks", weeks.len());
//!     Ok(())
//! }
//! ```

use log::{debug, info};

use super::repository::{FullRepository, RepositoryResult};
use crate::models::{Product, WeekId, WeekTable};

/// Upper bound applied to caller-supplied limits.
pub const MAX_LIMIT: usize = 1000;

fn clamp_limit(limit: usize) -> usize {
    limit.clamp(1, MAX_LIMIT)
}

/// Check if the storage backend is healthy.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Fingerprint of the data currently served, if tracked.
pub async fn data_version<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Option<String>> {
    repo.data_version().await
}

/// List the most recent operational week identifiers, newest first.
pub async fn list_operational_weeks<R: FullRepository + ?Sized>(
    repo: &R,
    limit: usize,
) -> RepositoryResult<Vec<WeekId>> {
    let weeks = repo.list_operational_weeks(clamp_limit(limit)).await?;
    debug!("Service layer: listed {} operational weeks", weeks.len());
    Ok(weeks)
}

/// Load the ordered week table used for alignment.
pub async fn get_week_table<R: FullRepository + ?Sized>(
    repo: &R,
    limit: usize,
) -> RepositoryResult<WeekTable> {
    let table = repo.get_operational_weeks_table(clamp_limit(limit)).await?;
    info!(
        "Service layer: week table with {} weeks (most recent: {})",
        table.len(),
        table
            .most_recent()
            .map(|w| w.id.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    Ok(table)
}

/// List catalog products, most relevant first.
pub async fn list_products<R: FullRepository + ?Sized>(
    repo: &R,
    limit: usize,
) -> RepositoryResult<Vec<Product>> {
    let products = repo.list_products(clamp_limit(limit)).await?;
    debug!("Service layer: listed {} products", products.len());
    Ok(products)
}

/// Find a catalog product by name.
pub async fn find_product<R: FullRepository + ?Sized>(
    repo: &R,
    name: &str,
) -> RepositoryResult<Option<Product>> {
    repo.find_product(name).await
}
