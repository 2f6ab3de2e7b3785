//! Repository trait definitions for the dashboard's storage collaborator.
//!
//! The storage layer is split across two focused traits:
//!
//! - [`WeekRepository`]: operational weeks, weekly metrics and spot prices
//! - [`MarketRepository`]: futures catalog, contract resolution, price
//!   series and stored forecasts
//!
//! # Convenience Trait Bound
//!
//! Services that need both sides use the [`FullRepository`] bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let table = repo.get_operational_weeks_table(200).await?;
//!     let products = repo.list_products(20).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod market;
pub mod weeks;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use market::MarketRepository;
pub use weeks::WeekRepository;

/// Composite trait bound for a complete repository implementation.
pub trait FullRepository: WeekRepository + MarketRepository {}

// Blanket implementation: any type implementing both traits is a FullRepository
impl<T> FullRepository for T where T: WeekRepository + MarketRepository {}
