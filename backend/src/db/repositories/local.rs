//! In-memory local repository implementation.
//!
//! Stores weeks, metrics, the futures catalog and price data in memory. It is
//! used for local development, for serving a JSON dataset snapshot, and as the
//! deterministic backend of the test suite.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::dataset::LoadedDataset;
use crate::db::repository::*;
use crate::models::{
    ContractKey, Forecast, MetricsTable, OperationalWeek, PricePoint, Product, WeekId, WeekTable,
};

/// In-memory local repository.
///
/// # Example
/// ```
/// use energy_dash::db::repositories::LocalRepository;
/// use energy_dash::models::{MetricRow, MetricsTable, OperationalWeek};
/// use chrono::NaiveDate;
///
/// let repo = LocalRepository::new();
/// let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
/// repo.insert_week(
///     OperationalWeek::new("2025-09", start, end),
///     MetricsTable::new(vec![MetricRow::new("SE/CO").with_value("load_mwavg", 41000.0)]),
/// );
/// assert_eq!(repo.week_count(), 1);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    weeks: HashMap<WeekId, OperationalWeek>,
    metrics: HashMap<WeekId, MetricsTable>,
    spot_prices: HashMap<NaiveDate, MetricsTable>,
    // Catalog order is the resolver's preference order.
    products: Vec<Product>,
    prices: Vec<PricePoint>,
    forecasts: Vec<Forecast>,
    last_update: Option<NaiveDateTime>,
    checksum: Option<String>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            weeks: HashMap::new(),
            metrics: HashMap::new(),
            spot_prices: HashMap::new(),
            products: Vec::new(),
            prices: Vec::new(),
            forecasts: Vec::new(),
            last_update: None,
            checksum: None,
            is_healthy: true,
        }
    }
}

impl LocalData {
    fn sorted_weeks(&self) -> Vec<OperationalWeek> {
        let mut weeks: Vec<OperationalWeek> = self.weeks.values().cloned().collect();
        weeks.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        weeks
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository pre-populated from a dataset snapshot.
    pub fn from_dataset(loaded: LoadedDataset) -> Self {
        let repo = Self::new();
        repo.load_dataset(loaded);
        repo
    }

    /// Replace all stored data with a dataset snapshot.
    pub fn load_dataset(&self, loaded: LoadedDataset) {
        let LoadedDataset { dataset, checksum } = loaded;
        let mut data = self.data.write();
        let is_healthy = data.is_healthy;
        *data = LocalData {
            is_healthy,
            ..Default::default()
        };

        for record in &dataset.weeks {
            let week = record.week();
            data.metrics.insert(week.id.clone(), record.metrics_table());
            data.weeks.insert(week.id.clone(), week);
        }
        for record in dataset.spot_prices {
            data.spot_prices
                .insert(record.week_start, MetricsTable::new(record.rows));
        }
        data.products = dataset.products;
        data.prices = dataset.prices;
        data.forecasts = dataset.forecasts;
        data.last_update = dataset.last_update;
        data.checksum = Some(checksum);
    }

    /// Add or replace a week and its metrics.
    pub fn insert_week(&self, week: OperationalWeek, metrics: MetricsTable) {
        let mut data = self.data.write();
        data.metrics.insert(week.id.clone(), metrics);
        data.weeks.insert(week.id.clone(), week);
    }

    /// Add or replace the spot prices of the week starting at `week_start`.
    pub fn insert_spot_prices(&self, week_start: NaiveDate, rows: MetricsTable) {
        self.data.write().spot_prices.insert(week_start, rows);
    }

    /// Append a product to the catalog.
    pub fn insert_product(&self, product: Product) {
        self.data.write().products.push(product);
    }

    pub fn insert_prices(&self, prices: impl IntoIterator<Item = PricePoint>) {
        self.data.write().prices.extend(prices);
    }

    pub fn insert_forecast(&self, forecast: Forecast) {
        self.data.write().forecasts.push(forecast);
    }

    pub fn set_last_update(&self, at: NaiveDateTime) {
        self.data.write().last_update = Some(at);
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    pub fn week_count(&self) -> usize {
        self.data.read().weeks.len()
    }

    /// Checksum of the dataset the repository was loaded from.
    pub fn dataset_checksum(&self) -> Option<String> {
        self.data.read().checksum.clone()
    }

    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Storage backend is not reachable",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeekRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn list_operational_weeks(&self, limit: usize) -> RepositoryResult<Vec<WeekId>> {
        self.check_health("list_operational_weeks")?;
        let data = self.data.read();
        Ok(data
            .sorted_weeks()
            .into_iter()
            .take(limit)
            .map(|w| w.id)
            .collect())
    }

    async fn get_operational_weeks_table(&self, limit: usize) -> RepositoryResult<WeekTable> {
        self.check_health("get_operational_weeks_table")?;
        let weeks: Vec<OperationalWeek> = {
            let data = self.data.read();
            data.sorted_weeks().into_iter().take(limit).collect()
        };
        WeekTable::from_descending(weeks)
            .map_err(|e| RepositoryError::from(e).with_operation("get_operational_weeks_table"))
    }

    async fn get_week_metrics(&self, week_id: &WeekId) -> RepositoryResult<MetricsTable> {
        self.check_health("get_week_metrics")?;
        let data = self.data.read();
        let metrics = data.metrics.get(week_id).cloned().unwrap_or_default();
        debug!("Local repository: week {} has {} metric rows", week_id, metrics.len());
        Ok(metrics)
    }

    async fn get_spot_prices(&self, week_start: NaiveDate) -> RepositoryResult<MetricsTable> {
        self.check_health("get_spot_prices")?;
        let data = self.data.read();
        Ok(data.spot_prices.get(&week_start).cloned().unwrap_or_default())
    }

    async fn get_metrics_history(
        &self,
        anchor_start: NaiveDate,
        weeks_back: usize,
    ) -> RepositoryResult<Vec<(OperationalWeek, MetricsTable)>> {
        self.check_health("get_metrics_history")?;
        let data = self.data.read();
        let mut history: Vec<(OperationalWeek, MetricsTable)> = data
            .sorted_weeks()
            .into_iter()
            .filter(|w| w.start_date <= anchor_start)
            .filter_map(|w| {
                let metrics = data.metrics.get(&w.id)?;
                (!metrics.is_empty()).then(|| (w.clone(), metrics.clone()))
            })
            .take(weeks_back)
            .collect();
        history.reverse();
        Ok(history)
    }

    async fn last_update(&self) -> RepositoryResult<Option<NaiveDateTime>> {
        self.check_health("last_update")?;
        Ok(self.data.read().last_update)
    }

    async fn data_version(&self) -> RepositoryResult<Option<String>> {
        Ok(self.dataset_checksum())
    }
}

#[async_trait]
impl MarketRepository for LocalRepository {
    async fn list_products(&self, limit: usize) -> RepositoryResult<Vec<Product>> {
        self.check_health("list_products")?;
        let data = self.data.read();
        Ok(data.products.iter().take(limit).cloned().collect())
    }

    async fn find_product(&self, name: &str) -> RepositoryResult<Option<Product>> {
        self.check_health("find_product")?;
        let data = self.data.read();
        Ok(data.products.iter().find(|p| p.name == name).cloned())
    }

    async fn resolve_contract(&self, key: &ContractKey) -> RepositoryResult<Option<Product>> {
        self.check_health("resolve_contract")?;
        let data = self.data.read();
        Ok(data.products.iter().find(|p| p.matches(key)).cloned())
    }

    async fn get_price_series(
        &self,
        products: &[Product],
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<PricePoint>> {
        self.check_health("get_price_series")?;
        let rank: HashMap<&str, usize> = products
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.name.as_str(), idx))
            .collect();

        let data = self.data.read();
        let mut series: Vec<(usize, PricePoint)> = data
            .prices
            .iter()
            .filter(|p| start <= p.date && p.date <= end)
            .filter_map(|p| rank.get(p.product.as_str()).map(|idx| (*idx, p.clone())))
            .collect();
        series.sort_by(|(ia, a), (ib, b)| a.date.cmp(&b.date).then(ia.cmp(ib)));
        Ok(series.into_iter().map(|(_, p)| p).collect())
    }

    async fn get_forecasts(
        &self,
        product: &str,
        anchor_date: NaiveDate,
        horizons: &[u32],
    ) -> RepositoryResult<Vec<Forecast>> {
        self.check_health("get_forecasts")?;
        let data = self.data.read();

        // Use the latest forecast run that is not newer than the anchor.
        let run = data
            .forecasts
            .iter()
            .filter(|f| f.product == product && f.anchor_date <= anchor_date)
            .map(|f| f.anchor_date)
            .max();
        let Some(run) = run else {
            return Ok(Vec::new());
        };

        Ok(horizons
            .iter()
            .filter_map(|h| {
                data.forecasts
                    .iter()
                    .find(|f| f.product == product && f.anchor_date == run && f.horizon_weeks == *h)
                    .cloned()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetricRow;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn metrics(v: f64) -> MetricsTable {
        MetricsTable::new(vec![MetricRow::new("SE/CO").with_value("ear_pct", v)])
    }

    fn seeded() -> LocalRepository {
        let repo = LocalRepository::new();
        repo.insert_week(OperationalWeek::new("w1", d(2025, 3, 1), d(2025, 3, 7)), metrics(50.0));
        repo.insert_week(OperationalWeek::new("w3", d(2025, 3, 15), d(2025, 3, 21)), metrics(52.0));
        repo.insert_week(
            OperationalWeek::new("w2", d(2025, 3, 8), d(2025, 3, 14)),
            MetricsTable::empty(),
        );
        repo
    }

    #[tokio::test]
    async fn test_weeks_are_listed_newest_first() {
        let repo = seeded();
        let ids = repo.list_operational_weeks(10).await.unwrap();
        let ids: Vec<&str> = ids.iter().map(|w| w.as_str()).collect();
        assert_eq!(ids, vec!["w3", "w2", "w1"]);

        let table = repo.get_operational_weeks_table(2).await.unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.most_recent().unwrap().id.as_str(), "w3");
    }

    #[tokio::test]
    async fn test_unknown_week_has_empty_metrics() {
        let repo = seeded();
        let m = repo.get_week_metrics(&WeekId::from("missing")).await.unwrap();
        assert!(m.is_empty());
    }

    #[tokio::test]
    async fn test_history_skips_empty_weeks_and_is_oldest_first() {
        let repo = seeded();
        let history = repo.get_metrics_history(d(2025, 3, 15), 10).await.unwrap();
        let ids: Vec<&str> = history.iter().map(|(w, _)| w.id.as_str()).collect();
        assert_eq!(ids, vec!["w1", "w3"]);

        let history = repo.get_metrics_history(d(2025, 3, 14), 10).await.unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_unhealthy_repository_fails_with_connection_error() {
        let repo = seeded();
        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());

        let err = repo.list_operational_weeks(10).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConnectionError { .. }));
        assert_eq!(
            err.context().operation.as_deref(),
            Some("list_operational_weeks")
        );
    }

    #[tokio::test]
    async fn test_resolve_contract_prefers_catalog_order() {
        let repo = LocalRepository::new();
        repo.insert_product(Product::new("SE CON ANU 2027 A", ContractKey::annual(2027)));
        repo.insert_product(Product::new("SE CON ANU 2027 B", ContractKey::annual(2027)));

        let p = repo
            .resolve_contract(&ContractKey::annual(2027))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(p.name, "SE CON ANU 2027 A");
        assert!(repo
            .resolve_contract(&ContractKey::annual(2028))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_price_series_filters_and_orders() {
        let repo = LocalRepository::new();
        let a = Product::new("A", ContractKey::annual(2027));
        let b = Product::new("B", ContractKey::annual(2028));
        let point = |product: &str, date: NaiveDate, price: f64| PricePoint {
            product: product.to_string(),
            date,
            price,
            volume_mwh: 0.0,
        };
        repo.insert_prices(vec![
            point("B", d(2025, 3, 2), 200.0),
            point("A", d(2025, 3, 2), 180.0),
            point("A", d(2025, 2, 1), 170.0),
            point("C", d(2025, 3, 2), 999.0),
        ]);

        let series = repo
            .get_price_series(&[a, b], d(2025, 3, 1), d(2025, 3, 31))
            .await
            .unwrap();
        let names: Vec<&str> = series.iter().map(|p| p.product.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_forecasts_use_latest_run_before_anchor() {
        let repo = LocalRepository::new();
        for (anchor, horizon, value) in [
            (d(2025, 3, 1), 1, 100.0),
            (d(2025, 3, 8), 1, 110.0),
            (d(2025, 3, 8), 4, 120.0),
            (d(2025, 3, 15), 1, 130.0),
        ] {
            repo.insert_forecast(Forecast {
                product: "A".to_string(),
                anchor_date: anchor,
                horizon_weeks: horizon,
                target_date: anchor + chrono::Duration::weeks(horizon as i64),
                value,
                lower: None,
                upper: None,
            });
        }

        let fc = repo.get_forecasts("A", d(2025, 3, 10), &[1, 4, 12]).await.unwrap();
        let values: Vec<f64> = fc.iter().map(|f| f.value).collect();
        assert_eq!(values, vec![110.0, 120.0]);

        let fc = repo.get_forecasts("A", d(2025, 2, 1), &[1]).await.unwrap();
        assert!(fc.is_empty());
    }
}
