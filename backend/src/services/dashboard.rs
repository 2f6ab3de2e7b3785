//! Dashboard and product detail payloads.
//!
//! Both views are assembled from repository reads only; the payloads are
//! ready to serialize and carry a `notice` instead of failing when the data
//! needed for a section is missing.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::{debug, info};
use serde::Serialize;

use super::alignment::{self, WeekBlock};
use super::contracts::{self, ResolvedContract};
use super::navigation::{self, Mode, NavigationParams};
use crate::config::DashboardConfig;
use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::{Forecast, MetricsTable, OperationalWeek, PricePoint, Product, WeekId};

pub const NOTICE_NO_DATA: &str = "load data to enable the dashboard";
pub const NOTICE_NO_WEEK_DATA: &str = "no data for selected week";
pub const NOTICE_UNKNOWN_WEEK: &str = "selected week is not available";
pub const NOTICE_UNKNOWN_PRODUCT: &str = "product not found in catalog";

/// Metrics of one week in the history series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub week: OperationalWeek,
    pub metrics: MetricsTable,
}

/// Forward contracts of the selected week and their prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForwardSection {
    pub reference_date: Option<NaiveDate>,
    pub contracts: Vec<ResolvedContract>,
    pub products: Vec<Product>,
    pub price_window: Option<(NaiveDate, NaiveDate)>,
    pub prices: Vec<PricePoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardView {
    pub weeks: Vec<OperationalWeek>,
    pub selected_week: Option<OperationalWeek>,
    pub selected_product: Option<Product>,
    pub metrics: MetricsTable,
    pub forecasts: Vec<Forecast>,
    pub blocks: Vec<WeekBlock>,
    pub forward: ForwardSection,
    pub history: Vec<HistoryPoint>,
    pub last_update: Option<NaiveDateTime>,
    pub notice: Option<String>,
}

impl DashboardView {
    fn with_notice(notice: &str) -> Self {
        Self {
            notice: Some(notice.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDetailView {
    pub product_id: String,
    pub anchor_date: NaiveDate,
    pub product: Option<Product>,
    pub price_window: (NaiveDate, NaiveDate),
    pub prices: Vec<PricePoint>,
    pub forecasts: Vec<Forecast>,
    pub notice: Option<String>,
}

/// Payload of the routed entry point, tagged by `mode`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ViewPayload {
    Dashboard(DashboardView),
    ProductDetail(ProductDetailView),
}

/// `[end - weeks, end]`
pub fn lookback_window(end: NaiveDate, weeks: u32) -> (NaiveDate, NaiveDate) {
    (end - Duration::weeks(i64::from(weeks)), end)
}

/// Assemble the full dashboard for `selected` (defaults to the most recent
/// week).
pub async fn build_dashboard<R: FullRepository + ?Sized>(
    repo: &R,
    config: &DashboardConfig,
    selected: Option<&WeekId>,
) -> RepositoryResult<DashboardView> {
    let recent = repo.get_operational_weeks_table(config.week_limit).await?;
    let products = repo.list_products(config.product_limit).await?;
    if recent.is_empty() || products.is_empty() {
        info!(
            "Dashboard: {} weeks and {} products available, nothing to show",
            recent.len(),
            products.len()
        );
        return Ok(DashboardView::with_notice(NOTICE_NO_DATA));
    }

    let table = repo
        .get_operational_weeks_table(config.week_table_limit)
        .await?;
    let week = match selected {
        Some(id) => table.find(id).or_else(|| recent.find(id)),
        None => recent.most_recent(),
    };
    let last_update = repo.last_update().await?;
    let mut view = DashboardView {
        weeks: recent.as_slice().to_vec(),
        selected_product: products.first().cloned(),
        last_update,
        ..DashboardView::default()
    };

    let Some(week) = week.cloned() else {
        debug!("Dashboard: selected week not in table");
        view.notice = Some(NOTICE_UNKNOWN_WEEK.to_string());
        return Ok(view);
    };
    view.selected_week = Some(week.clone());

    view.metrics = repo.get_week_metrics(&week.id).await?;
    if view.metrics.is_empty() {
        view.notice = Some(NOTICE_NO_WEEK_DATA.to_string());
        return Ok(view);
    }

    if let Some(product) = &view.selected_product {
        view.forecasts = repo
            .get_forecasts(&product.name, week.start_date, &config.forecast_horizons)
            .await?;
    }

    view.blocks = alignment::align(repo, &table, &week.id).await?;
    view.forward = forward_section(repo, config, &week).await?;
    view.history = repo
        .get_metrics_history(week.start_date, config.history_weeks as usize)
        .await?
        .into_iter()
        .map(|(week, metrics)| HistoryPoint { week, metrics })
        .collect();

    info!(
        "Dashboard: week {} with {} blocks, {} forward products, {} history points",
        week.id,
        view.blocks.len(),
        view.forward.products.len(),
        view.history.len()
    );
    Ok(view)
}

async fn forward_section<R: FullRepository + ?Sized>(
    repo: &R,
    config: &DashboardConfig,
    week: &OperationalWeek,
) -> RepositoryResult<ForwardSection> {
    let reference = contracts::reference_date_for(week);
    let keys = contracts::select_forward_contracts(reference);
    let resolved = contracts::resolve_contracts(repo, &keys).await?;
    let products = contracts::dedup_preserving_order(
        resolved.iter().filter_map(|r| r.product.clone()),
        |p| p.name.clone(),
    );

    let (start, _) = lookback_window(week.start_date, config.price_lookback_weeks);
    let end = week.end_date;
    let prices = if products.is_empty() {
        Vec::new()
    } else {
        repo.get_price_series(&products, start, end).await?
    };

    Ok(ForwardSection {
        reference_date: Some(reference),
        contracts: resolved,
        products,
        price_window: Some((start, end)),
        prices,
    })
}

/// Assemble the detail view of one product around `anchor_date`.
pub async fn build_product_detail<R: FullRepository + ?Sized>(
    repo: &R,
    config: &DashboardConfig,
    product_id: &str,
    anchor_date: NaiveDate,
) -> RepositoryResult<ProductDetailView> {
    let price_window = lookback_window(anchor_date, config.price_lookback_weeks);
    let mut view = ProductDetailView {
        product_id: product_id.to_string(),
        anchor_date,
        product: None,
        price_window,
        prices: Vec::new(),
        forecasts: Vec::new(),
        notice: None,
    };

    let Some(product) = repo.find_product(product_id).await? else {
        info!("Product detail: {} not in catalog", product_id);
        view.notice = Some(NOTICE_UNKNOWN_PRODUCT.to_string());
        return Ok(view);
    };

    let (start, end) = price_window;
    view.prices = repo
        .get_price_series(std::slice::from_ref(&product), start, end)
        .await?;
    view.forecasts = repo
        .get_forecasts(&product.name, anchor_date, &config.forecast_horizons)
        .await?;
    view.product = Some(product);
    Ok(view)
}

/// Route the navigation parameters and build the matching payload.
pub async fn build_view<R: FullRepository + ?Sized>(
    repo: &R,
    config: &DashboardConfig,
    params: &NavigationParams,
    selected: Option<&WeekId>,
    today: NaiveDate,
) -> RepositoryResult<ViewPayload> {
    let weeks = repo.get_operational_weeks_table(config.week_limit).await?;
    match navigation::route(params, &weeks, today) {
        Mode::ProductDetail {
            product_id,
            anchor_date,
        } => build_product_detail(repo, config, &product_id, anchor_date)
            .await
            .map(ViewPayload::ProductDetail),
        Mode::Dashboard => build_dashboard(repo, config, selected)
            .await
            .map(ViewPayload::Dashboard),
    }
}
