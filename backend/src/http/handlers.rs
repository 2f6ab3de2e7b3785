//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Local, NaiveDate};

use super::dto::{
    ForwardContractsResponse, ForwardQuery, HealthResponse, LimitQuery, ProductListResponse,
    ViewPayload, WeekBlocksResponse, WeekListResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::checksum::short_fingerprint;
use crate::db::services as db_services;
use crate::models::WeekId;
use crate::services::{alignment, contracts, dashboard, navigation::NavigationParams};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Query key selecting the dashboard week on `/v1/view`.
const WEEK_PARAM: &str = "week";

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and storage is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let repo = state.repository.as_ref();
    let storage = match db_services::health_check(repo).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };
    let data_version = db_services::data_version(repo)
        .await
        .ok()
        .flatten()
        .map(|checksum| short_fingerprint(&checksum).to_string());

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        storage,
        data_version,
    }))
}

// =============================================================================
// Weeks
// =============================================================================

/// GET /v1/weeks?limit=
///
/// Operational weeks, newest first.
pub async fn list_weeks(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> HandlerResult<WeekListResponse> {
    let limit = query.limit.unwrap_or(state.dashboard.week_limit);
    let table = db_services::get_week_table(state.repository.as_ref(), limit).await?;
    let weeks = table.as_slice().to_vec();

    Ok(Json(WeekListResponse {
        total: weeks.len(),
        weeks,
    }))
}

/// GET /v1/weeks/{week_id}/blocks
///
/// Aligned week blocks ending at `week_id`. An unknown week yields an empty
/// list with a notice.
pub async fn get_week_blocks(
    State(state): State<AppState>,
    Path(week_id): Path<String>,
) -> HandlerResult<WeekBlocksResponse> {
    let repo = state.repository.as_ref();
    let table = db_services::get_week_table(repo, state.dashboard.week_table_limit).await?;
    let selected = WeekId::new(week_id);
    let notice = table
        .position(&selected)
        .is_none()
        .then(|| dashboard::NOTICE_UNKNOWN_WEEK.to_string());

    let blocks = alignment::align(repo, &table, &selected).await?;

    Ok(Json(WeekBlocksResponse {
        week_id: selected.to_string(),
        blocks,
        notice,
    }))
}

// =============================================================================
// Contracts and products
// =============================================================================

/// GET /v1/contracts/forward?date=YYYY-MM-DD | ?week=<id>
///
/// The forward contract keys for a reference date, or for the end date of an
/// operational week, with the catalog products they resolve to.
pub async fn get_forward_contracts(
    State(state): State<AppState>,
    Query(query): Query<ForwardQuery>,
) -> HandlerResult<ForwardContractsResponse> {
    let repo = state.repository.as_ref();
    let reference_date = match (query.date, query.week) {
        (Some(date), _) => date,
        (None, Some(week)) => {
            let table = db_services::get_week_table(repo, state.dashboard.week_table_limit).await?;
            let week = table
                .find(&WeekId::new(week.clone()))
                .ok_or_else(|| AppError::NotFound(format!("Week {} not found", week)))?;
            contracts::reference_date_for(week)
        }
        (None, None) => {
            return Err(AppError::BadRequest(
                "Either `date` or `week` is required".to_string(),
            ))
        }
    };

    let keys = contracts::select_forward_contracts(reference_date);
    let resolved = contracts::resolve_contracts(repo, &keys).await?;
    let products = contracts::dedup_preserving_order(
        resolved.iter().filter_map(|r| r.product.clone()),
        |p| p.name.clone(),
    );

    Ok(Json(ForwardContractsResponse {
        reference_date,
        contracts: resolved,
        products,
    }))
}

/// GET /v1/products?limit=
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> HandlerResult<ProductListResponse> {
    let limit = query.limit.unwrap_or(state.dashboard.product_limit);
    let products = db_services::list_products(state.repository.as_ref(), limit).await?;

    Ok(Json(ProductListResponse {
        total: products.len(),
        products,
    }))
}

// =============================================================================
// View entry point
// =============================================================================

/// GET /v1/view?week=&bbce_view=&bbce_prod=&bbce_anchor=
///
/// Routes the navigation parameters to the dashboard or the product detail
/// payload. Malformed parameters never fail the request.
pub async fn get_view(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> HandlerResult<ViewPayload> {
    let params = NavigationParams::from_pairs(pairs.iter().map(|(k, v)| (k, v)));
    let selected = pairs
        .iter()
        .find(|(k, _)| k == WEEK_PARAM)
        .filter(|(_, v)| !v.is_empty())
        .map(|(_, v)| WeekId::new(v.as_str()));

    let payload = dashboard::build_view(
        state.repository.as_ref(),
        &state.dashboard,
        &params,
        selected.as_ref(),
        today(),
    )
    .await?;
    Ok(Json(payload))
}
