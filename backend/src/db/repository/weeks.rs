//! Repository trait for operational weeks and their metric tables.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use super::error::RepositoryResult;
use crate::models::{MetricsTable, OperationalWeek, WeekId, WeekTable};

/// Read access to the weekly operational data.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across request handlers.
#[async_trait]
pub trait WeekRepository: Send + Sync {
    /// Check if the storage backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// List the `limit` most recent operational week identifiers, newest first.
    async fn list_operational_weeks(&self, limit: usize) -> RepositoryResult<Vec<WeekId>>;

    /// The `limit` most recent weeks with their date ranges, newest first.
    ///
    /// Must preserve the ordering of [`list_operational_weeks`](Self::list_operational_weeks).
    async fn get_operational_weeks_table(&self, limit: usize) -> RepositoryResult<WeekTable>;

    /// Metrics rows of one week. Unknown weeks yield an empty table.
    async fn get_week_metrics(&self, week_id: &WeekId) -> RepositoryResult<MetricsTable>;

    /// Spot price rows (CMO/PLD per submarket) of the week starting at `week_start`.
    async fn get_spot_prices(&self, week_start: NaiveDate) -> RepositoryResult<MetricsTable>;

    /// Up to `weeks_back` weeks whose start is at or before `anchor_start`,
    /// returned oldest first together with their metrics.
    async fn get_metrics_history(
        &self,
        anchor_start: NaiveDate,
        weeks_back: usize,
    ) -> RepositoryResult<Vec<(OperationalWeek, MetricsTable)>>;

    /// Timestamp of the most recent data load, if known.
    async fn last_update(&self) -> RepositoryResult<Option<NaiveDateTime>>;

    /// Fingerprint of the loaded data, if the backend tracks one.
    async fn data_version(&self) -> RepositoryResult<Option<String>>;
}
