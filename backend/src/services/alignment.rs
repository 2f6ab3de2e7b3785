//! Alignment of a selected operational week against the week table.
//!
//! The selected week `S` and its neighbours are shown oldest to newest as
//! `[S-2, S-1, S]`. Each displayed week is compared with the week right before
//! it in the table, so the window fetched from storage is `[S, S-1, S-2, S-3]`.
//!
//! Weeks with no metrics are never displayed, and a comparison against such a
//! week is reported as absent rather than as an error.

use futures::future::try_join_all;
use log::{debug, info};
use serde::Serialize;
use std::collections::HashMap;

use crate::db::repository::{RepositoryResult, WeekRepository};
use crate::models::{MetricsTable, OperationalWeek, WeekId, WeekTable};

/// Number of week blocks shown side by side.
pub const DISPLAY_WEEKS: usize = 3;

/// Weeks read from the table: the displayed ones plus one older week so the
/// oldest displayed block still has a comparison.
pub const WINDOW_WEEKS: usize = DISPLAY_WEEKS + 1;

/// A displayed week and the week it is compared with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowPair {
    pub current: OperationalWeek,
    pub compare: Option<OperationalWeek>,
}

/// Positional pairing of a selected week with its neighbours.
///
/// Built once from the week table; `pairs` is ordered oldest to newest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    window: Vec<OperationalWeek>,
    pairs: Vec<WindowPair>,
}

impl WindowSpec {
    /// `None` when `selected` is not in `table`.
    pub fn build(table: &WeekTable, selected: &WeekId) -> Option<Self> {
        let i0 = table.position(selected)?;
        let window = table.window(i0, WINDOW_WEEKS).to_vec();
        let shown = window.len().min(DISPLAY_WEEKS);

        let pairs = (0..shown)
            .rev()
            .map(|k| WindowPair {
                current: window[k].clone(),
                compare: window.get(k + 1).cloned(),
            })
            .collect();

        Some(Self { window, pairs })
    }

    /// Weeks whose data is needed, newest first (`[S, S-1, S-2, S-3]`).
    pub fn window(&self) -> &[OperationalWeek] {
        &self.window
    }

    /// Display pairs, oldest first.
    pub fn pairs(&self) -> &[WindowPair] {
        &self.pairs
    }
}

/// Storage data of one week inside the alignment window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeekData {
    pub metrics: MetricsTable,
    pub spot_prices: MetricsTable,
}

/// Change of one metric between a week and its comparison week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDelta {
    pub submarket: String,
    pub column: String,
    pub current: f64,
    pub previous: f64,
    pub delta: f64,
    /// Relative change in percent; `None` when the previous value is zero.
    pub delta_pct: Option<f64>,
}

/// One displayed week with its comparison data.
///
/// `deltas` and `spot_price_deltas` are empty when there is no comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekBlock {
    pub label: String,
    pub week: OperationalWeek,
    pub metrics: MetricsTable,
    pub spot_prices: MetricsTable,
    pub compare_week: Option<OperationalWeek>,
    pub compare_metrics: Option<MetricsTable>,
    pub compare_spot_prices: Option<MetricsTable>,
    pub deltas: Vec<MetricDelta>,
    pub spot_price_deltas: Vec<MetricDelta>,
}

/// Deltas for every `(submarket, column)` present in both tables, in the row
/// and column order of `current`.
pub fn compute_deltas(current: &MetricsTable, previous: &MetricsTable) -> Vec<MetricDelta> {
    let mut deltas = Vec::new();
    for row in current.rows() {
        let Some(prev_row) = previous.row(&row.submarket) else {
            continue;
        };
        for (column, value) in &row.values {
            let Some(prev) = prev_row.values.get(column) else {
                continue;
            };
            let delta = value - prev;
            deltas.push(MetricDelta {
                submarket: row.submarket.clone(),
                column: column.clone(),
                current: *value,
                previous: *prev,
                delta,
                delta_pct: (*prev != 0.0).then(|| delta / prev.abs() * 100.0),
            });
        }
    }
    deltas
}

/// Turn a window specification and the fetched week data into display blocks.
///
/// Weeks missing from `data` are treated as having empty metrics.
pub fn assemble_blocks(spec: &WindowSpec, data: &HashMap<WeekId, WeekData>) -> Vec<WeekBlock> {
    let non_empty = |week: &OperationalWeek| {
        data.get(&week.id)
            .filter(|d| !d.metrics.is_empty())
    };

    spec.pairs()
        .iter()
        .filter_map(|pair| {
            let Some(current) = non_empty(&pair.current) else {
                debug!("Alignment: week {} has no metrics, not displayed", pair.current.id);
                return None;
            };
            let compare = pair
                .compare
                .as_ref()
                .and_then(|week| non_empty(week).map(|d| (week, d)));

            let (deltas, spot_price_deltas) = match compare {
                Some((_, previous)) => (
                    compute_deltas(&current.metrics, &previous.metrics),
                    compute_deltas(&current.spot_prices, &previous.spot_prices),
                ),
                None => (Vec::new(), Vec::new()),
            };

            Some(WeekBlock {
                label: pair.current.label(),
                week: pair.current.clone(),
                metrics: current.metrics.clone(),
                spot_prices: current.spot_prices.clone(),
                compare_week: compare.map(|(w, _)| w.clone()),
                compare_metrics: compare.map(|(_, d)| d.metrics.clone()),
                compare_spot_prices: compare.map(|(_, d)| d.spot_prices.clone()),
                deltas,
                spot_price_deltas,
            })
        })
        .collect()
}

/// Align `selected` against `table` and fetch the data of its window.
///
/// Returns an empty list when `selected` is not in the table. Only storage
/// failures are reported as errors.
pub async fn align<R: WeekRepository + ?Sized>(
    repo: &R,
    table: &WeekTable,
    selected: &WeekId,
) -> RepositoryResult<Vec<WeekBlock>> {
    let Some(spec) = WindowSpec::build(table, selected) else {
        info!("Alignment: week {} not found in week table", selected);
        return Ok(Vec::new());
    };

    let data = fetch_window_data(repo, spec.window()).await?;
    let blocks = assemble_blocks(&spec, &data);
    info!(
        "Alignment: week {} -> {} blocks from a window of {}",
        selected,
        blocks.len(),
        spec.window().len()
    );
    Ok(blocks)
}

/// Fetch metrics for every window week, and spot prices for those with metrics.
async fn fetch_window_data<R: WeekRepository + ?Sized>(
    repo: &R,
    window: &[OperationalWeek],
) -> RepositoryResult<HashMap<WeekId, WeekData>> {
    let fetched = try_join_all(window.iter().map(|week| async move {
        let metrics = repo.get_week_metrics(&week.id).await?;
        let spot_prices = if metrics.is_empty() {
            MetricsTable::empty()
        } else {
            repo.get_spot_prices(week.start_date).await?
        };
        Ok::<_, crate::db::repository::RepositoryError>((
            week.id.clone(),
            WeekData {
                metrics,
                spot_prices,
            },
        ))
    }))
    .await?;

    Ok(fetched.into_iter().collect())
}
