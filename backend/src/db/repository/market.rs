//! Repository trait for the futures catalog and its price data.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::models::{ContractKey, Forecast, PricePoint, Product};

/// Read access to the futures market data.
#[async_trait]
pub trait MarketRepository: Send + Sync {
    /// Catalog products, most relevant first.
    async fn list_products(&self, limit: usize) -> RepositoryResult<Vec<Product>>;

    /// Look a product up by catalog name.
    async fn find_product(&self, name: &str) -> RepositoryResult<Option<Product>>;

    /// Map a contract key to a listed product.
    ///
    /// `Ok(None)` means the contract is simply not listed (yet).
    async fn resolve_contract(&self, key: &ContractKey) -> RepositoryResult<Option<Product>>;

    /// Daily prices of `products` between `start` and `end` (inclusive),
    /// ordered by date then by the order of `products`.
    async fn get_price_series(
        &self,
        products: &[Product],
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<PricePoint>>;

    /// Stored forecasts for `product` anchored at `anchor_date`, one per
    /// requested horizon that exists, in horizon order.
    async fn get_forecasts(
        &self,
        product: &str,
        anchor_date: NaiveDate,
        horizons: &[u32],
    ) -> RepositoryResult<Vec<Forecast>>;
}
