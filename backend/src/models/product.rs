//! Catalog products, traded price points and stored forecasts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::contract::{ContractKey, ContractKind};

/// A futures product listed in the exchange catalog.
///
/// Products are identified by their catalog name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub kind: ContractKind,
    pub year: i32,
    pub month_start: u32,
    pub month_end: u32,
}

impl Product {
    pub fn new(name: impl Into<String>, key: ContractKey) -> Self {
        Self {
            name: name.into(),
            kind: key.kind,
            year: key.year,
            month_start: key.month_start,
            month_end: key.month_end,
        }
    }

    pub fn key(&self) -> ContractKey {
        ContractKey {
            kind: self.kind,
            year: self.year,
            month_start: self.month_start,
            month_end: self.month_end,
        }
    }

    pub fn matches(&self, key: &ContractKey) -> bool {
        self.key() == *key
    }
}

/// Daily average traded price of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub product: String,
    pub date: NaiveDate,
    /// Average price in R$/MWh.
    pub price: f64,
    #[serde(default)]
    pub volume_mwh: f64,
}

/// Point forecast produced by the (external) forecasting model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub product: String,
    pub anchor_date: NaiveDate,
    pub horizon_weeks: u32,
    pub target_date: NaiveDate,
    pub value: f64,
    #[serde(default)]
    pub lower: Option<f64>,
    #[serde(default)]
    pub upper: Option<f64>,
}
