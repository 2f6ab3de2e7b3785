//! Storage collaborator for the dashboard.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP layer / dashboard services                        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - logging, limits          │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/)                        │
//! │  - WeekRepository (weeks, metrics, spot prices)         │
//! │  - MarketRepository (catalog, prices, forecasts)        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │   Local Repository (in-memory, optionally    │
//!     │   seeded from a JSON dataset snapshot)        │
//!     └──────────────────────────────────────────────┘
//! ```

pub mod checksum;
pub mod dataset;
pub mod factory;
pub mod repositories;
pub mod repository;
pub mod services;

pub use checksum::calculate_checksum;
pub use dataset::{Dataset, LoadedDataset};
pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
pub use repository::{
    ErrorContext, FullRepository, MarketRepository, RepositoryError, RepositoryResult,
    WeekRepository,
};
