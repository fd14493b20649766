//! Inclusive calendar date windows.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date format used for window bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive `[start, end]` range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Create a window, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DataError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Window covering both dates, whichever comes first.
    pub fn spanning(a: NaiveDate, b: NaiveDate) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Parse a window from two `YYYY-MM-DD` strings.
    ///
    /// # Example
    /// ```
    /// use macrostress_data::DateWindow;
    ///
    /// let window = DateWindow::parse("2020-02-01", "2020-04-30").unwrap();
    /// assert_eq!(window.start().to_string(), "2020-02-01");
    /// ```
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let parse = |s: &str| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .map_err(|e| DataError::Parse(format!("invalid date '{s}': {e}")))
        };
        Self::new(parse(start)?, parse(end)?)
    }

    /// First date in the window.
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last date in the window.
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside the window (bounds included).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inclusive_bounds() {
        let window = DateWindow::parse("2023-03-01", "2023-04-30").unwrap();
        assert!(window.contains(NaiveDate::from_ymd_opt(2023, 3, 1).unwrap()));
        assert!(window.contains(NaiveDate::from_ymd_opt(2023, 4, 30).unwrap()));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2023, 5, 1).unwrap()));
    }

    #[test]
    fn test_reversed_window_rejected() {
        let result = DateWindow::parse("2020-04-30", "2020-02-01");
        assert!(matches!(result, Err(DataError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_spanning_orders_bounds() {
        let early = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let late = NaiveDate::from_ymd_opt(2022, 12, 31).unwrap();
        assert_eq!(DateWindow::spanning(late, early), DateWindow::new(early, late).unwrap());
    }

    #[test]
    fn test_single_day_window() {
        let window = DateWindow::parse("2020-03-16", "2020-03-16").unwrap();
        assert_eq!(window.start(), window.end());
    }

    #[test]
    fn test_bad_date_format() {
        assert!(matches!(
            DateWindow::parse("03/16/2020", "2020-04-30"),
            Err(DataError::Parse(_))
        ));
    }
}
