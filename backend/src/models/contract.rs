//! Forward contract keys (annual, semester and quarter periods).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Delivery period granularity of a futures product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractKind {
    Annual,
    Semester,
    Quarter,
}

impl ContractKind {
    /// Number of delivery months covered by one contract of this kind.
    pub fn span_months(&self) -> u32 {
        match self {
            ContractKind::Annual => 12,
            ContractKind::Semester => 6,
            ContractKind::Quarter => 3,
        }
    }

    /// Catalog code used by the exchange product names.
    pub fn code(&self) -> &'static str {
        match self {
            ContractKind::Annual => "ANU",
            ContractKind::Semester => "SEM",
            ContractKind::Quarter => "TRI",
        }
    }
}

impl FromStr for ContractKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ANU" | "ANNUAL" => Ok(Self::Annual),
            "SEM" | "SEMESTER" => Ok(Self::Semester),
            "TRI" | "QUARTER" => Ok(Self::Quarter),
            _ => Err(format!("Unknown contract kind: {}", s)),
        }
    }
}

impl std::fmt::Display for ContractKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractKeyError {
    #[error("month {0} is outside 1..=12")]
    MonthOutOfRange(u32),

    #[error("{kind} contract must span {expected} months, got {month_start}..={month_end}")]
    WrongSpan {
        kind: ContractKind,
        expected: u32,
        month_start: u32,
        month_end: u32,
    },

    #[error("{kind} contract starting in month {month_start} is not aligned to a period boundary")]
    Misaligned { kind: ContractKind, month_start: u32 },
}

/// Identity of a forward contract: kind, delivery year and month range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContractKey {
    pub kind: ContractKind,
    pub year: i32,
    pub month_start: u32,
    pub month_end: u32,
}

impl ContractKey {
    /// Validated constructor.
    pub fn new(
        kind: ContractKind,
        year: i32,
        month_start: u32,
        month_end: u32,
    ) -> Result<Self, ContractKeyError> {
        for month in [month_start, month_end] {
            if !(1..=12).contains(&month) {
                return Err(ContractKeyError::MonthOutOfRange(month));
            }
        }
        let expected = kind.span_months();
        if month_end < month_start || month_end - month_start + 1 != expected {
            return Err(ContractKeyError::WrongSpan {
                kind,
                expected,
                month_start,
                month_end,
            });
        }
        if (month_start - 1) % expected != 0 {
            return Err(ContractKeyError::Misaligned { kind, month_start });
        }
        Ok(Self {
            kind,
            year,
            month_start,
            month_end,
        })
    }

    /// Calendar-year contract (Jan–Dec).
    pub fn annual(year: i32) -> Self {
        Self {
            kind: ContractKind::Annual,
            year,
            month_start: 1,
            month_end: 12,
        }
    }

    /// Semester contract; `half` is clamped to 1 (Jan–Jun) or 2 (Jul–Dec).
    pub fn semester(year: i32, half: u32) -> Self {
        let half = half.clamp(1, 2);
        let month_start = 1 + (half - 1) * 6;
        Self {
            kind: ContractKind::Semester,
            year,
            month_start,
            month_end: month_start + 5,
        }
    }

    /// Quarter contract; `quarter` is clamped to 1..=4.
    pub fn quarter(year: i32, quarter: u32) -> Self {
        let quarter = quarter.clamp(1, 4);
        let month_start = 1 + (quarter - 1) * 3;
        Self {
            kind: ContractKind::Quarter,
            year,
            month_start,
            month_end: month_start + 2,
        }
    }

    /// First delivery day.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month_start, 1)
    }

    /// Last delivery day.
    pub fn last_day(&self) -> Option<NaiveDate> {
        let (year, month) = if self.month_end == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month_end + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1).and_then(|d| d.pred_opt())
    }

    /// Whether delivery has not started yet at `date`.
    pub fn is_forward_of(&self, date: NaiveDate) -> bool {
        (self.year, self.month_start) > (date.year(), date.month())
    }

    /// Short label such as `ANU 2026`, `SEM 2026 01-06`, `TRI 2026 04-06`.
    pub fn label(&self) -> String {
        match self.kind {
            ContractKind::Annual => format!("{} {}", self.kind.code(), self.year),
            _ => format!(
                "{} {} {:02}-{:02}",
                self.kind.code(),
                self.year,
                self.month_start,
                self.month_end
            ),
        }
    }
}

impl std::fmt::Display for ContractKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_constructors_match_validated() {
        assert_eq!(
            ContractKey::new(ContractKind::Annual, 2026, 1, 12).unwrap(),
            ContractKey::annual(2026)
        );
        assert_eq!(
            ContractKey::new(ContractKind::Semester, 2026, 7, 12).unwrap(),
            ContractKey::semester(2026, 2)
        );
        assert_eq!(
            ContractKey::new(ContractKind::Quarter, 2026, 10, 12).unwrap(),
            ContractKey::quarter(2026, 4)
        );
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(
            ContractKey::new(ContractKind::Quarter, 2026, 0, 2).unwrap_err(),
            ContractKeyError::MonthOutOfRange(0)
        );
        assert!(matches!(
            ContractKey::new(ContractKind::Semester, 2026, 1, 3),
            Err(ContractKeyError::WrongSpan { .. })
        ));
        assert!(matches!(
            ContractKey::new(ContractKind::Quarter, 2026, 2, 4),
            Err(ContractKeyError::Misaligned { .. })
        ));
    }

    #[test]
    fn test_delivery_days() {
        let q1 = ContractKey::quarter(2028, 1);
        assert_eq!(q1.first_day(), NaiveDate::from_ymd_opt(2028, 1, 1));
        assert_eq!(q1.last_day(), NaiveDate::from_ymd_opt(2028, 3, 31));

        let h2 = ContractKey::semester(2026, 2);
        assert_eq!(h2.last_day(), NaiveDate::from_ymd_opt(2026, 12, 31));
    }

    #[test]
    fn test_kind_parsing_and_labels() {
        assert_eq!("tri".parse::<ContractKind>().unwrap(), ContractKind::Quarter);
        assert_eq!("ANNUAL".parse::<ContractKind>().unwrap(), ContractKind::Annual);
        assert!("MEN".parse::<ContractKind>().is_err());

        assert_eq!(ContractKey::annual(2027).label(), "ANU 2027");
        assert_eq!(ContractKey::quarter(2026, 2).label(), "TRI 2026 04-06");
    }

    #[test]
    fn test_kind_serializes_screaming_case() {
        let json = serde_json::to_string(&ContractKind::Semester).unwrap();
        assert_eq!(json, "\"SEMESTER\"");
    }
}
