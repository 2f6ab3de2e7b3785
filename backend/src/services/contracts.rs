//! Forward futures contract selection.
//!
//! From a single reference date the selector derives the contracts whose
//! delivery has not started yet: the next four calendar years, the two
//! semesters after the current one and the two quarters after the current
//! one. The result does not depend on what the catalog actually lists;
//! [`resolve_forward_products`] maps the keys to catalog products afterwards.

use chrono::{Datelike, NaiveDate};
use log::{debug, info};
use std::collections::HashSet;
use std::hash::Hash;

use crate::db::repository::{MarketRepository, RepositoryResult};
use crate::models::{ContractKey, OperationalWeek, Product};

pub const ANNUAL_CONTRACTS: u32 = 4;
pub const SEMESTER_CONTRACTS: u32 = 2;
pub const QUARTER_CONTRACTS: u32 = 2;

/// Half of the year a month belongs to (1 = Jan–Jun, 2 = Jul–Dec).
pub fn semester_of(month: u32) -> u32 {
    if month <= 6 {
        1
    } else {
        2
    }
}

/// Quarter a month belongs to, `ceil(month / 3)`.
pub fn quarter_of(month: u32) -> u32 {
    (month - 1) / 3 + 1
}

/// The `count` periods after `(year, current)` for a year split into
/// `per_year` periods, rolling into the next year after the last one.
fn following_periods(year: i32, current: u32, per_year: u32, count: u32) -> Vec<(i32, u32)> {
    let (mut year, mut period) = (year, current);
    (0..count)
        .map(|_| {
            period += 1;
            if period > per_year {
                period = 1;
                year += 1;
            }
            (year, period)
        })
        .collect()
}

pub fn forward_annuals(reference: NaiveDate) -> Vec<ContractKey> {
    (1..=ANNUAL_CONTRACTS as i32)
        .map(|offset| ContractKey::annual(reference.year() + offset))
        .collect()
}

/// In H1 this yields `H2 of Y` and `H1 of Y+1`; in H2 both land in `Y+1`.
pub fn forward_semesters(reference: NaiveDate) -> Vec<ContractKey> {
    following_periods(
        reference.year(),
        semester_of(reference.month()),
        2,
        SEMESTER_CONTRACTS,
    )
    .into_iter()
    .map(|(year, half)| ContractKey::semester(year, half))
    .collect()
}

pub fn forward_quarters(reference: NaiveDate) -> Vec<ContractKey> {
    following_periods(
        reference.year(),
        quarter_of(reference.month()),
        4,
        QUARTER_CONTRACTS,
    )
    .into_iter()
    .map(|(year, q)| ContractKey::quarter(year, q))
    .collect()
}

/// The 8 forward contract keys for `reference_date`: annual, then semester,
/// then quarter, each group ascending in time.
pub fn select_forward_contracts(reference_date: NaiveDate) -> Vec<ContractKey> {
    let keys = forward_annuals(reference_date)
        .into_iter()
        .chain(forward_semesters(reference_date))
        .chain(forward_quarters(reference_date));
    dedup_preserving_order(keys, |k| *k)
}

/// Reference date used for an operational week.
///
/// The week's end date is used, so a week spanning the new year belongs to
/// the later year.
pub fn reference_date_for(week: &OperationalWeek) -> NaiveDate {
    week.end_date
}

/// Forward contract keys for an operational week.
pub fn select_for_week(week: &OperationalWeek) -> Vec<ContractKey> {
    select_forward_contracts(reference_date_for(week))
}

/// Drop repeated items (by `identity`), keeping the first occurrence.
pub fn dedup_preserving_order<T, K, I, F>(items: I, identity: F) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(identity(item)))
        .collect()
}

/// A forward contract key and the catalog product it resolved to, if any.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ResolvedContract {
    pub key: ContractKey,
    pub label: String,
    pub product: Option<Product>,
}

/// Resolve every key against the catalog.
pub async fn resolve_contracts<R: MarketRepository + ?Sized>(
    repo: &R,
    keys: &[ContractKey],
) -> RepositoryResult<Vec<ResolvedContract>> {
    let mut resolved = Vec::with_capacity(keys.len());
    for key in keys {
        let product = repo.resolve_contract(key).await?;
        if product.is_none() {
            debug!("Contracts: {} is not listed in the catalog", key);
        }
        resolved.push(ResolvedContract {
            key: *key,
            label: key.label(),
            product,
        });
    }
    Ok(resolved)
}

/// Combined product list for `keys`: unlisted contracts are skipped and a
/// product reached through several keys appears once, at its first position.
pub async fn resolve_forward_products<R: MarketRepository + ?Sized>(
    repo: &R,
    keys: &[ContractKey],
) -> RepositoryResult<Vec<Product>> {
    let resolved = resolve_contracts(repo, keys).await?;
    let products = dedup_preserving_order(
        resolved.into_iter().filter_map(|r| r.product),
        |p| p.name.clone(),
    );
    info!(
        "Contracts: {} of {} forward contracts resolved to products",
        products.len(),
        keys.len()
    );
    Ok(products)
}
