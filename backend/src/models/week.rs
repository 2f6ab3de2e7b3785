//! Operational weeks, the ordered week table and per-week metric tables.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Operational week identifier (opaque storage key, e.g. the BSO week code).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekId(pub String);

impl WeekId {
    pub fn new(value: impl Into<String>) -> Self {
        WeekId(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WeekId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WeekId {
    fn from(value: &str) -> Self {
        WeekId(value.to_string())
    }
}

/// A business-defined weekly period with an inclusive calendar range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationalWeek {
    pub id: WeekId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl OperationalWeek {
    pub fn new(id: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: WeekId::new(id),
            start_date,
            end_date,
        }
    }

    /// Display label in the `DD.MM a DD.MM` form.
    pub fn label(&self) -> String {
        format!(
            "{} a {}",
            self.start_date.format("%d.%m"),
            self.end_date.format("%d.%m")
        )
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Errors raised when a week table violates its ordering invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WeekTableError {
    #[error("week {0} appears more than once")]
    DuplicateWeek(WeekId),

    #[error("week {newer} (start {newer_start}) is not more recent than {older} (start {older_start})")]
    NotDescending {
        newer: WeekId,
        newer_start: NaiveDate,
        older: WeekId,
        older_start: NaiveDate,
    },

    #[error("week {0} ends before it starts")]
    InvertedRange(WeekId),
}

/// Ordered snapshot of operational weeks, most recent first.
///
/// Index 0 is the most recent week. An auxiliary id -> position index makes
/// lookups independent of table length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekTable {
    weeks: Vec<OperationalWeek>,
    positions: HashMap<WeekId, usize>,
}

impl WeekTable {
    /// Build a table from weeks already ordered most-recent-first.
    pub fn from_descending(weeks: Vec<OperationalWeek>) -> Result<Self, WeekTableError> {
        let mut positions = HashMap::with_capacity(weeks.len());
        for (idx, week) in weeks.iter().enumerate() {
            if week.end_date < week.start_date {
                return Err(WeekTableError::InvertedRange(week.id.clone()));
            }
            if positions.insert(week.id.clone(), idx).is_some() {
                return Err(WeekTableError::DuplicateWeek(week.id.clone()));
            }
        }
        for pair in weeks.windows(2) {
            let (newer, older) = (&pair[0], &pair[1]);
            if newer.start_date <= older.start_date {
                return Err(WeekTableError::NotDescending {
                    newer: newer.id.clone(),
                    newer_start: newer.start_date,
                    older: older.id.clone(),
                    older_start: older.start_date,
                });
            }
        }
        Ok(Self { weeks, positions })
    }

    /// Build a table from weeks in any order, sorting them by recency.
    pub fn from_unordered(mut weeks: Vec<OperationalWeek>) -> Result<Self, WeekTableError> {
        weeks.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Self::from_descending(weeks)
    }

    pub fn position(&self, id: &WeekId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn get(&self, index: usize) -> Option<&OperationalWeek> {
        self.weeks.get(index)
    }

    pub fn find(&self, id: &WeekId) -> Option<&OperationalWeek> {
        self.position(id).and_then(|idx| self.weeks.get(idx))
    }

    pub fn most_recent(&self) -> Option<&OperationalWeek> {
        self.weeks.first()
    }

    /// Up to `len` consecutive weeks starting at `start`, newest first.
    pub fn window(&self, start: usize, len: usize) -> &[OperationalWeek] {
        if start >= self.weeks.len() {
            return &[];
        }
        let end = (start + len).min(self.weeks.len());
        &self.weeks[start..end]
    }

    /// Keep only the `limit` most recent weeks.
    pub fn truncated(&self, limit: usize) -> Self {
        let weeks: Vec<OperationalWeek> = self.weeks.iter().take(limit).cloned().collect();
        let positions = weeks
            .iter()
            .enumerate()
            .map(|(idx, w)| (w.id.clone(), idx))
            .collect();
        Self { weeks, positions }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OperationalWeek> {
        self.weeks.iter()
    }

    pub fn as_slice(&self) -> &[OperationalWeek] {
        &self.weeks
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}

/// One row of a metrics table: a submarket and its named numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub submarket: String,
    #[serde(default)]
    pub values: BTreeMap<String, f64>,
}

impl MetricRow {
    pub fn new(submarket: impl Into<String>) -> Self {
        Self {
            submarket: submarket.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, column: impl Into<String>, value: f64) -> Self {
        self.values.insert(column.into(), value);
        self
    }
}

/// Rows of business metrics for one week (generation, load, reservoirs...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricsTable {
    rows: Vec<MetricRow>,
}

impl MetricsTable {
    pub fn new(rows: Vec<MetricRow>) -> Self {
        Self { rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    pub fn row(&self, submarket: &str) -> Option<&MetricRow> {
        self.rows.iter().find(|r| r.submarket == submarket)
    }

    pub fn value(&self, submarket: &str, column: &str) -> Option<f64> {
        self.row(submarket).and_then(|r| r.values.get(column).copied())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn week(id: &str, start: NaiveDate) -> OperationalWeek {
        OperationalWeek::new(id, start, start + chrono::Duration::days(6))
    }

    #[test]
    fn test_label_format() {
        let w = OperationalWeek::new("2025-52", d(2025, 12, 27), d(2026, 1, 2));
        assert_eq!(w.label(), "27.12 a 02.01");
    }

    #[test]
    fn test_table_positions() {
        let table = WeekTable::from_descending(vec![
            week("w3", d(2025, 3, 15)),
            week("w2", d(2025, 3, 8)),
            week("w1", d(2025, 3, 1)),
        ])
        .unwrap();

        assert_eq!(table.position(&WeekId::from("w3")), Some(0));
        assert_eq!(table.position(&WeekId::from("w1")), Some(2));
        assert_eq!(table.position(&WeekId::from("nope")), None);
        assert_eq!(table.most_recent().unwrap().id.as_str(), "w3");
    }

    #[test]
    fn test_table_rejects_ascending_order() {
        let result = WeekTable::from_descending(vec![
            week("w1", d(2025, 3, 1)),
            week("w2", d(2025, 3, 8)),
        ]);
        assert!(matches!(result, Err(WeekTableError::NotDescending { .. })));
    }

    #[test]
    fn test_table_rejects_duplicates() {
        let result = WeekTable::from_descending(vec![
            week("w1", d(2025, 3, 8)),
            week("w1", d(2025, 3, 1)),
        ]);
        assert_eq!(
            result.unwrap_err(),
            WeekTableError::DuplicateWeek(WeekId::from("w1"))
        );
    }

    #[test]
    fn test_from_unordered_sorts_by_recency() {
        let table = WeekTable::from_unordered(vec![
            week("w1", d(2025, 3, 1)),
            week("w3", d(2025, 3, 15)),
            week("w2", d(2025, 3, 8)),
        ])
        .unwrap();
        let ids: Vec<&str> = table.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["w3", "w2", "w1"]);
    }

    #[test]
    fn test_window_clamps_at_end() {
        let table = WeekTable::from_descending(vec![
            week("w3", d(2025, 3, 15)),
            week("w2", d(2025, 3, 8)),
            week("w1", d(2025, 3, 1)),
        ])
        .unwrap();

        assert_eq!(table.window(1, 4).len(), 2);
        assert!(table.window(5, 4).is_empty());
        assert_eq!(table.truncated(2).len(), 2);
        assert_eq!(table.truncated(2).position(&WeekId::from("w1")), None);
    }

    #[test]
    fn test_metrics_value_lookup() {
        let table = MetricsTable::new(vec![
            MetricRow::new("SE/CO").with_value("ear_pct", 61.5),
            MetricRow::new("NE").with_value("ear_pct", 48.0),
        ]);
        assert_eq!(table.value("NE", "ear_pct"), Some(48.0));
        assert_eq!(table.value("S", "ear_pct"), None);
        assert!(!table.is_empty());
    }
}
