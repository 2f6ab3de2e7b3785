use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use std::collections::HashMap;

use super::alignment::*;
use crate::db::repositories::LocalRepository;
use crate::db::repository::WeekRepository;
use crate::models::{MetricRow, MetricsTable, OperationalWeek, WeekId, WeekTable};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// `n` consecutive weeks, newest first, the newest starting on 2025-06-07.
fn weekly_table(n: usize) -> WeekTable {
    let newest = d(2025, 6, 7);
    let weeks = (0..n)
        .map(|i| {
            let start = newest - Duration::weeks(i as i64);
            OperationalWeek::new(format!("w{}", n - i), start, start + Duration::days(6))
        })
        .collect();
    WeekTable::from_descending(weeks).unwrap()
}

fn metrics(ear: f64) -> MetricsTable {
    MetricsTable::new(vec![
        MetricRow::new("SE/CO").with_value("ear_pct", ear),
        MetricRow::new("S").with_value("ear_pct", ear / 2.0),
    ])
}

fn full_data(table: &WeekTable) -> HashMap<WeekId, WeekData> {
    table
        .iter()
        .enumerate()
        .map(|(i, w)| {
            (
                w.id.clone(),
                WeekData {
                    metrics: metrics(60.0 - i as f64),
                    spot_prices: MetricsTable::empty(),
                },
            )
        })
        .collect()
}

#[test]
fn test_window_pairs_run_oldest_to_newest() {
    let table = weekly_table(6);
    let spec = WindowSpec::build(&table, &WeekId::from("w5")).unwrap();

    let window: Vec<&str> = spec.window().iter().map(|w| w.id.as_str()).collect();
    assert_eq!(window, vec!["w5", "w4", "w3", "w2"]);

    let pairs: Vec<(&str, Option<&str>)> = spec
        .pairs()
        .iter()
        .map(|p| (p.current.id.as_str(), p.compare.as_ref().map(|w| w.id.as_str())))
        .collect();
    assert_eq!(
        pairs,
        vec![("w3", Some("w2")), ("w4", Some("w3")), ("w5", Some("w4"))]
    );
    assert_eq!(spec.window()[0].id.as_str(), "w5");
}

#[test]
fn test_unknown_week_has_no_window() {
    let table = weekly_table(4);
    assert!(WindowSpec::build(&table, &WeekId::from("nope")).is_none());
}

#[test]
fn test_oldest_week_shows_fewer_blocks() {
    let table = weekly_table(5);
    let spec = WindowSpec::build(&table, &WeekId::from("w2")).unwrap();
    let blocks = assemble_blocks(&spec, &full_data(&table));

    let shown: Vec<&str> = blocks.iter().map(|b| b.week.id.as_str()).collect();
    assert_eq!(shown, vec!["w1", "w2"]);
    assert!(blocks[0].compare_week.is_none());
    assert_eq!(blocks[1].compare_week.as_ref().unwrap().id.as_str(), "w1");
}

#[test]
fn test_empty_weeks_are_dropped_and_not_compared() {
    let table = weekly_table(4);
    let mut data = full_data(&table);
    data.get_mut(&WeekId::from("w2")).unwrap().metrics = MetricsTable::empty();

    let spec = WindowSpec::build(&table, &WeekId::from("w4")).unwrap();
    let blocks = assemble_blocks(&spec, &data);

    let shown: Vec<&str> = blocks.iter().map(|b| b.week.id.as_str()).collect();
    assert_eq!(shown, vec!["w3", "w4"]);
    // w3 compares against the empty w2
    assert!(blocks[0].compare_metrics.is_none());
    assert!(blocks[0].deltas.is_empty());
    assert!(blocks[0].spot_price_deltas.is_empty());
    assert!(blocks[1].compare_metrics.is_some());
    assert!(!blocks[1].deltas.is_empty());
}

#[test]
fn test_compute_deltas_handles_zero_previous() {
    let current = MetricsTable::new(vec![
        MetricRow::new("SE/CO").with_value("ear_pct", 55.0).with_value("load_mw", 10.0),
        MetricRow::new("N").with_value("ear_pct", 80.0),
    ]);
    let previous = MetricsTable::new(vec![
        MetricRow::new("SE/CO").with_value("ear_pct", 50.0).with_value("load_mw", 0.0),
    ]);

    let deltas = compute_deltas(&current, &previous);
    assert_eq!(deltas.len(), 2);

    let ear = deltas.iter().find(|d| d.column == "ear_pct").unwrap();
    assert_eq!(ear.delta, 5.0);
    assert!((ear.delta_pct.unwrap() - 10.0).abs() < 1e-9);

    let load = deltas.iter().find(|d| d.column == "load_mw").unwrap();
    assert_eq!(load.delta, 10.0);
    assert!(load.delta_pct.is_none());
}

#[tokio::test]
async fn test_align_reads_metrics_and_spot_prices() {
    let repo = LocalRepository::new();
    let table = weekly_table(4);
    for (i, week) in table.iter().enumerate() {
        repo.insert_week(week.clone(), metrics(40.0 + i as f64));
        repo.insert_spot_prices(
            week.start_date,
            MetricsTable::new(vec![MetricRow::new("SE/CO").with_value("pld", 100.0 + i as f64)]),
        );
    }

    let blocks = align(&repo, &table, &WeekId::from("w4")).await.unwrap();
    assert_eq!(blocks.len(), 3);

    let newest = &blocks[2];
    assert_eq!(newest.week.id.as_str(), "w4");
    assert_eq!(newest.spot_prices.value("SE/CO", "pld"), Some(100.0));
    assert_eq!(
        newest.compare_spot_prices.as_ref().unwrap().value("SE/CO", "pld"),
        Some(101.0)
    );
    assert_eq!(newest.spot_price_deltas[0].delta, -1.0);
}

#[tokio::test]
async fn test_align_unknown_week_is_empty_not_error() {
    let repo = LocalRepository::new();
    let table = weekly_table(3);
    let blocks = align(&repo, &table, &WeekId::from("missing")).await.unwrap();
    assert!(blocks.is_empty());
}

#[tokio::test]
async fn test_align_propagates_storage_failure() {
    let repo = LocalRepository::new();
    let table = weekly_table(3);
    repo.set_healthy(false);
    assert!(!repo.health_check().await.unwrap());
    assert!(align(&repo, &table, &WeekId::from("w3")).await.is_err());
}

proptest! {
    #[test]
    fn prop_blocks_are_bounded_and_compare_older(
        n in 1usize..12,
        pick in 0usize..12,
        empty_mask in proptest::collection::vec(any::<bool>(), 12),
    ) {
        let table = weekly_table(n);
        let selected = table.get(pick % n).unwrap().id.clone();
        let mut data = full_data(&table);
        for (week, empty) in table.iter().zip(&empty_mask) {
            if *empty {
                data.get_mut(&week.id).unwrap().metrics = MetricsTable::empty();
            }
        }

        let spec = WindowSpec::build(&table, &selected).unwrap();
        let blocks = assemble_blocks(&spec, &data);

        prop_assert!(blocks.len() <= DISPLAY_WEEKS);
        for pair in blocks.windows(2) {
            prop_assert!(pair[0].week.start_date < pair[1].week.start_date);
        }
        for block in &blocks {
            prop_assert!(!block.metrics.is_empty());
            if let Some(compare) = &block.compare_week {
                prop_assert!(compare.start_date < block.week.start_date);
                prop_assert!(block.compare_metrics.as_ref().is_some_and(|m| !m.is_empty()));
            }
        }
    }
}
