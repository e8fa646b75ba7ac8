//! Master quarterly date list shared by every fund in a projection run
//!
//! All fund series are generated off the same calendar so the portfolio
//! aggregator can sum them index by index without resampling.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::PERIODS_PER_YEAR;

/// Absolute quarter number: year * 4 + quarter (0-based)
fn quarter_index(date: NaiveDate) -> i32 {
    date.year() * PERIODS_PER_YEAR as i32 + date.month0() as i32 / 3
}

/// Last calendar day of an absolute quarter
fn quarter_end(index: i32) -> NaiveDate {
    let year = index.div_euclid(PERIODS_PER_YEAR as i32);
    let quarter = index.rem_euclid(PERIODS_PER_YEAR as i32) as u32;
    let (month, day) = match quarter {
        0 => (3, 31),
        1 => (6, 30),
        2 => (9, 30),
        _ => (12, 31),
    };
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

pub fn quarter_label(date: NaiveDate) -> String {
    format!("{}-Q{}", date.year(), date.month0() / 3 + 1)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    /// Quarter-end dates, ascending
    dates: Vec<NaiveDate>,
    /// Index of the first forecast period
    boundary: usize,
}

impl Calendar {
    /// Build a calendar of `periods_actual` closed quarters ending at or before
    /// `as_of`, followed by `periods_forecast` forecast quarters.
    pub fn quarterly(as_of: NaiveDate, periods_actual: u32, periods_forecast: u32) -> Self {
        let current = quarter_index(as_of);
        let last_actual = if quarter_end(current) == as_of {
            current
        } else {
            current - 1
        };
        let first = last_actual - periods_actual as i32 + 1;
        let total = (periods_actual + periods_forecast) as i32;

        Self {
            dates: (first..first + total).map(quarter_end).collect(),
            boundary: periods_actual as usize,
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of actual (closed) periods; also the index of the first forecast period
    pub fn boundary(&self) -> usize {
        self.boundary
    }

    /// First forecast quarter-end date, if any forecast periods exist
    pub fn forecast_start(&self) -> Option<NaiveDate> {
        self.dates.get(self.boundary).copied()
    }

    pub fn is_actual(&self, index: usize) -> bool {
        index < self.boundary
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    /// Span covered by the calendar in years
    pub fn years(&self) -> f64 {
        self.dates.len() as f64 / PERIODS_PER_YEAR as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_quarter_end_as_of() {
        let cal = Calendar::quarterly(date(2024, 6, 30), 8, 24);

        assert_eq!(cal.len(), 32);
        assert_eq!(cal.boundary(), 8);
        assert_eq!(cal.first(), Some(date(2022, 9, 30)));
        assert_eq!(cal.dates()[7], date(2024, 6, 30));
        assert_eq!(cal.forecast_start(), Some(date(2024, 9, 30)));
        assert_eq!(cal.dates()[31], date(2030, 6, 30));
    }

    #[test]
    fn test_mid_quarter_as_of_uses_last_closed_quarter() {
        let cal = Calendar::quarterly(date(2024, 5, 15), 4, 4);
        assert_eq!(cal.dates()[3], date(2024, 3, 31));
        assert_eq!(cal.forecast_start(), Some(date(2024, 6, 30)));
    }

    #[test]
    fn test_dates_ascending_and_flags() {
        let cal = Calendar::quarterly(date(2023, 12, 31), 3, 5);
        assert!(cal.dates().windows(2).all(|w| w[0] < w[1]));
        assert!(cal.is_actual(2));
        assert!(!cal.is_actual(3));
        assert_eq!(cal.years(), 2.0);
    }

    #[test]
    fn test_labels() {
        assert_eq!(quarter_label(date(2024, 9, 30)), "2024-Q3");
        assert_eq!(quarter_label(date(2025, 3, 31)), "2025-Q1");
    }
}
