//! Query-parameter routing between the dashboard and the product detail view.
//!
//! Navigation state lives in three optional query parameters. None of them is
//! ever rejected: a value that cannot be read is treated as absent and the
//! documented fallback is used instead.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::WeekTable;

pub const VIEW_PARAM: &str = "bbce_view";
pub const PRODUCT_PARAM: &str = "bbce_prod";
pub const ANCHOR_PARAM: &str = "bbce_anchor";

/// Value of the view parameter that selects the product detail view.
pub const PRODUCT_VIEW: &str = "product";

/// Date format of the anchor parameter (`YYYYMMDD`).
pub const ANCHOR_FORMAT: &str = "%Y%m%d";

/// Raw navigation parameters, as read from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationParams {
    pub view: Option<String>,
    pub product: Option<String>,
    pub anchor: Option<String>,
}

impl NavigationParams {
    /// Collect the navigation parameters from decoded query pairs.
    ///
    /// Only the first occurrence of a key is read, and an empty first value
    /// leaves the parameter absent. Values are compared as given, untrimmed.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = Self::default();
        let mut seen = [false; 3];
        for (key, value) in pairs {
            let (slot, read) = match key.as_ref() {
                VIEW_PARAM => (&mut params.view, &mut seen[0]),
                PRODUCT_PARAM => (&mut params.product, &mut seen[1]),
                ANCHOR_PARAM => (&mut params.anchor, &mut seen[2]),
                _ => continue,
            };
            if std::mem::replace(read, true) {
                continue;
            }
            let value = value.as_ref();
            if !value.is_empty() {
                *slot = Some(value.to_string());
            }
        }
        params
    }

    pub fn wants_product_view(&self) -> bool {
        self.view.as_deref() == Some(PRODUCT_VIEW)
    }
}

/// View selected by the navigation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Mode {
    Dashboard,
    ProductDetail {
        product_id: String,
        anchor_date: NaiveDate,
    },
}

/// Parse an optional raw value, falling back to `default` when it is absent
/// or does not parse.
pub fn parse_or_default<T, E, P, D>(raw: Option<&str>, parse: P, default: D) -> T
where
    P: FnOnce(&str) -> Result<T, E>,
    D: FnOnce() -> T,
{
    raw.and_then(|value| parse(value).ok())
        .unwrap_or_else(default)
}

pub fn parse_anchor(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw, ANCHOR_FORMAT)
}

/// Anchor used when the parameter is missing or malformed: the start of the
/// most recent week, or `today` for an empty table.
pub fn default_anchor(weeks: &WeekTable, today: NaiveDate) -> NaiveDate {
    weeks
        .most_recent()
        .map(|week| week.start_date)
        .unwrap_or(today)
}

/// Decide which view to render.
pub fn route(params: &NavigationParams, weeks: &WeekTable, today: NaiveDate) -> Mode {
    match (params.wants_product_view(), params.product.as_deref()) {
        (true, Some(product_id)) => Mode::ProductDetail {
            product_id: product_id.to_string(),
            anchor_date: parse_or_default(params.anchor.as_deref(), parse_anchor, || {
                default_anchor(weeks, today)
            }),
        },
        _ => Mode::Dashboard,
    }
}

