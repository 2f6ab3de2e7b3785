use chrono::NaiveDate;

use super::navigation::*;
use crate::models::{OperationalWeek, WeekTable};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn table() -> WeekTable {
    WeekTable::from_descending(vec![
        OperationalWeek::new("2025-23", d(2025, 6, 7), d(2025, 6, 13)),
        OperationalWeek::new("2025-22", d(2025, 5, 31), d(2025, 6, 6)),
    ])
    .unwrap()
}

fn today() -> NaiveDate {
    d(2025, 6, 20)
}

fn params(pairs: &[(&str, &str)]) -> NavigationParams {
    NavigationParams::from_pairs(pairs.iter().copied())
}

#[test]
fn test_no_params_is_dashboard() {
    assert_eq!(route(&NavigationParams::default(), &table(), today()), Mode::Dashboard);
}

#[test]
fn test_product_view_with_valid_anchor() {
    let p = params(&[
        ("bbce_view", "product"),
        ("bbce_prod", "SE CON MEN JUL/25"),
        ("bbce_anchor", "20250301"),
    ]);
    assert_eq!(
        route(&p, &table(), today()),
        Mode::ProductDetail {
            product_id: "SE CON MEN JUL/25".to_string(),
            anchor_date: d(2025, 3, 1),
        }
    );
}

#[test]
fn test_malformed_anchor_falls_back_to_latest_week() {
    let p = params(&[
        ("bbce_view", "product"),
        ("bbce_prod", "X"),
        ("bbce_anchor", "not-a-date"),
    ]);
    assert_eq!(
        route(&p, &table(), today()),
        Mode::ProductDetail {
            product_id: "X".to_string(),
            anchor_date: d(2025, 6, 7),
        }
    );
}

#[test]
fn test_missing_anchor_with_empty_table_uses_today() {
    let p = params(&[("bbce_view", "product"), ("bbce_prod", "X")]);
    assert_eq!(
        route(&p, &WeekTable::default(), today()),
        Mode::ProductDetail {
            product_id: "X".to_string(),
            anchor_date: today(),
        }
    );
}

#[test]
fn test_product_view_without_product_is_dashboard() {
    let p = params(&[("bbce_view", "product"), ("bbce_prod", "")]);
    assert_eq!(p.product, None);
    assert_eq!(route(&p, &table(), today()), Mode::Dashboard);
}

#[test]
fn test_blank_first_product_is_not_replaced_by_later_value() {
    let p = params(&[
        ("bbce_view", "product"),
        ("bbce_prod", ""),
        ("bbce_prod", "X"),
    ]);
    assert_eq!(p.product, None);
    assert_eq!(route(&p, &table(), today()), Mode::Dashboard);
}

#[test]
fn test_other_view_value_is_dashboard() {
    let p = params(&[("bbce_view", "Product"), ("bbce_prod", "X")]);
    assert_eq!(route(&p, &table(), today()), Mode::Dashboard);
}

#[test]
fn test_view_value_is_not_trimmed() {
    let p = params(&[("bbce_view", " product "), ("bbce_prod", "X")]);
    assert_eq!(p.view.as_deref(), Some(" product "));
    assert_eq!(route(&p, &table(), today()), Mode::Dashboard);
}

#[test]
fn test_repeated_key_keeps_first_value() {
    let p = params(&[
        ("bbce_prod", "first"),
        ("bbce_prod", "second"),
        ("unrelated", "ignored"),
    ]);
    assert_eq!(p.product.as_deref(), Some("first"));
    assert_eq!(p.view, None);
}

#[test]
fn test_parse_or_default() {
    let fallback = || 7u32;
    assert_eq!(parse_or_default(Some("12"), str::parse::<u32>, fallback), 12);
    assert_eq!(parse_or_default(Some("x"), str::parse::<u32>, fallback), 7);
    assert_eq!(parse_or_default(None, str::parse::<u32>, fallback), 7);
}

#[test]
fn test_mode_serializes_with_tag() {
    let json = serde_json::to_value(Mode::ProductDetail {
        product_id: "X".to_string(),
        anchor_date: d(2025, 3, 1),
    })
    .unwrap();
    assert_eq!(json["mode"], "product_detail");
    assert_eq!(json["anchor_date"], "2025-03-01");
}
