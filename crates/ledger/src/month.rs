//! Calendar month arithmetic.
//!
//! [`YearMonth`] identifies one calendar month. Months are ordered and can
//! be converted to a linear index, which keeps month distances and year
//! rollover free of loops.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{LedgerError, ResultLedger, recurrence::DateWindow};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Returns `None` if `month` is not in `1..=12` or the year is outside
    /// the range chrono can represent.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MAX)
    }

    /// Following month, rolling December over into January.
    pub fn succ(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Month `count` months after this one, `None` past the calendar range.
    pub fn plus(self, count: u32) -> Option<Self> {
        let index = self.index().checked_add(i64::from(count))?;
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        let month = u32::try_from(index.rem_euclid(12) + 1).ok()?;
        Self::new(year, month)
    }

    /// Half-open window `[first day, first day of next month)`.
    pub fn window(self) -> DateWindow {
        self.span(1)
    }

    /// Half-open window covering `count` months from this one.
    pub fn span(self, count: u32) -> DateWindow {
        let start = self.first_day();
        let end = start
            .checked_add_months(Months::new(count))
            .unwrap_or(NaiveDate::MAX);
        DateWindow::new(start, end)
    }

    /// Months elapsed since year zero; `index(b) - index(a)` is the distance
    /// in months between `a` and `b`.
    pub(crate) fn index(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = LedgerError;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> ResultLedger<Self> {
        let invalid = || LedgerError::InvalidDate(format!("expected YYYY-MM, got {s:?}"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn rejects_out_of_range_month() {
        assert!(YearMonth::new(2024, 0).is_none());
        assert!(YearMonth::new(2024, 13).is_none());
    }

    #[test]
    fn succ_rolls_over_year() {
        assert_eq!(ym(2024, 11).succ(), ym(2024, 12));
        assert_eq!(ym(2024, 12).succ(), ym(2025, 1));
    }

    #[test]
    fn plus_matches_repeated_succ() {
        let start = ym(2023, 7);
        let mut walked = start;
        for count in 0..40 {
            assert_eq!(start.plus(count), Some(walked));
            walked = walked.succ();
        }
    }

    #[test]
    fn plus_stops_at_calendar_range() {
        let last = YearMonth::of(NaiveDate::MAX);
        assert_eq!(last.plus(0), Some(last));
        assert_eq!(last.plus(1), None);
        assert_eq!(ym(2024, 1).plus(u32::MAX), None);
    }

    #[test]
    fn window_is_half_open() {
        let window = ym(2024, 2).window();
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(window.end, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(window.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(!window.contains(window.end));
    }

    #[test]
    fn parse_and_display() {
        let month: YearMonth = "2024-03".parse().unwrap();
        assert_eq!(month, ym(2024, 3));
        assert_eq!(month.to_string(), "2024-03");
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("March".parse::<YearMonth>().is_err());
    }
}
