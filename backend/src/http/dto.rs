//! Data Transfer Objects for the HTTP API.
//!
//! View payloads from the service layer already derive `Serialize` and are
//! returned as-is; this module holds the request queries and the thin
//! response wrappers around them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use crate::models::{OperationalWeek, Product};
pub use crate::services::alignment::{MetricDelta, WeekBlock};
pub use crate::services::contracts::ResolvedContract;
pub use crate::services::dashboard::{DashboardView, ProductDetailView, ViewPayload};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: String,
    /// Short fingerprint of the loaded dataset, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_version: Option<String>,
}

/// `?limit=` query used by the list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekListResponse {
    pub weeks: Vec<OperationalWeek>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekBlocksResponse {
    pub week_id: String,
    pub blocks: Vec<WeekBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Query for the forward contract endpoint; `date` takes precedence.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForwardQuery {
    pub date: Option<NaiveDate>,
    pub week: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForwardContractsResponse {
    pub reference_date: NaiveDate,
    pub contracts: Vec<ResolvedContract>,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub total: usize,
}
