//! JSON dataset snapshots used to seed the local repository.
//!
//! A dataset bundles everything the dashboard reads from storage: the
//! operational weeks with their metrics, weekly spot prices, the futures
//! catalog, daily prices and stored forecasts.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::checksum::calculate_checksum;
use super::repository::{ErrorContext, RepositoryError, RepositoryResult};
use crate::models::{
    ContractKey, Forecast, MetricRow, MetricsTable, OperationalWeek, PricePoint, Product, WeekId,
};

/// One operational week together with its metric rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekRecord {
    pub id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub metrics: Vec<MetricRow>,
}

impl WeekRecord {
    pub fn week(&self) -> OperationalWeek {
        OperationalWeek {
            id: WeekId::new(self.id.clone()),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    pub fn metrics_table(&self) -> MetricsTable {
        MetricsTable::new(self.metrics.clone())
    }
}

/// Spot price rows keyed by the start date of their week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotPriceRecord {
    pub week_start: NaiveDate,
    #[serde(default)]
    pub rows: Vec<MetricRow>,
}

/// Complete dataset snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub last_update: Option<NaiveDateTime>,
    #[serde(default)]
    pub weeks: Vec<WeekRecord>,
    #[serde(default)]
    pub spot_prices: Vec<SpotPriceRecord>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub prices: Vec<PricePoint>,
    #[serde(default)]
    pub forecasts: Vec<Forecast>,
}

/// A parsed dataset plus the checksum of its source text.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub checksum: String,
}

impl Dataset {
    /// Parse a dataset from JSON text.
    pub fn from_json_str(content: &str) -> RepositoryResult<LoadedDataset> {
        let dataset: Dataset = serde_json::from_str(content).map_err(|e| {
            RepositoryError::validation_with_context(
                format!("Failed to parse dataset: {}", e),
                ErrorContext::new("load_dataset").with_entity("dataset"),
            )
        })?;
        dataset.validate()?;
        Ok(LoadedDataset {
            dataset,
            checksum: calculate_checksum(content),
        })
    }

    /// Read and parse a dataset file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> RepositoryResult<LoadedDataset> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration_with_context(
                format!("Failed to read dataset file: {}", e),
                ErrorContext::new("load_dataset").with_entity_id(path.display()),
            )
        })?;
        Self::from_json_str(&content)
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> RepositoryResult<()> {
        for product in &self.products {
            ContractKey::new(
                product.kind,
                product.year,
                product.month_start,
                product.month_end,
            )
            .map_err(|e| {
                RepositoryError::validation_with_context(
                    e.to_string(),
                    ErrorContext::new("load_dataset")
                        .with_entity("product")
                        .with_entity_id(&product.name),
                )
            })?;
        }
        for week in &self.weeks {
            if week.end_date < week.start_date {
                return Err(RepositoryError::validation_with_context(
                    "week ends before it starts",
                    ErrorContext::new("load_dataset")
                        .with_entity("week")
                        .with_entity_id(&week.id),
                ));
            }
        }
        Ok(())
    }
}
