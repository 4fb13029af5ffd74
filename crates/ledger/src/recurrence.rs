//! Recurrence expansion.
//!
//! An entry recurs from its origin date by a fixed [`Interval`] until an
//! optional inclusive end date. [`occurrences`] yields the dates that land in
//! a half-open [`DateWindow`]. The first in-window occurrence is computed in
//! closed form from the origin, so the cost only depends on how many
//! occurrences the window holds, never on the age of the entry.

use std::{fmt, iter::FusedIterator, str::FromStr};

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{LedgerError, YearMonth};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interval {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Interval {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// Parses a stored tag, degrading anything unrecognised to
    /// [`Interval::None`] so a bad tag counts as a single occurrence.
    pub fn parse_lenient(tag: &str) -> Self {
        tag.parse().unwrap_or_else(|err: LedgerError| {
            tracing::warn!("{err}; treating as a one-time entry");
            Self::None
        })
    }

    fn step(self) -> Option<Step> {
        match self {
            Self::None => None,
            Self::Daily => Some(Step::Days(1)),
            Self::Weekly => Some(Step::Days(7)),
            Self::Monthly => Some(Step::Months(1)),
            Self::Quarterly => Some(Step::Months(3)),
            Self::Yearly => Some(Step::Months(12)),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(LedgerError::InvalidRecurrenceInterval(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Days(u64),
    Months(u32),
}

impl Step {
    /// Date of occurrence `index`, always measured from the origin so
    /// month-end clamping (Jan 31 -> Feb 29) never carries over.
    fn nth(self, origin: NaiveDate, index: u64) -> Option<NaiveDate> {
        match self {
            Step::Days(days) => origin.checked_add_days(Days::new(index.checked_mul(days)?)),
            Step::Months(months) => {
                let offset = u32::try_from(index).ok()?.checked_mul(months)?;
                origin.checked_add_months(Months::new(offset))
            }
        }
    }

    /// Index of the first occurrence on or after `date`.
    fn first_index_on_or_after(self, origin: NaiveDate, date: NaiveDate) -> u64 {
        if date <= origin {
            return 0;
        }
        match self {
            Step::Days(days) => {
                let elapsed = (date - origin).num_days().unsigned_abs();
                elapsed.div_ceil(days)
            }
            Step::Months(months) => {
                let elapsed = YearMonth::of(date).index() - YearMonth::of(origin).index();
                let index = elapsed.unsigned_abs() / u64::from(months);
                // Same-month candidates may fall on an earlier day.
                match self.nth(origin, index) {
                    Some(candidate) if candidate < date => index + 1,
                    _ => index,
                }
            }
        }
    }
}

/// Half-open date range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// First occurrence of a recurring schedule on or after `date`.
///
/// One-time schedules only ever occur on `origin`.
pub fn first_on_or_after(
    origin: NaiveDate,
    interval: Interval,
    date: NaiveDate,
) -> Option<NaiveDate> {
    match interval.step() {
        None => (origin >= date).then_some(origin),
        Some(step) => step.nth(origin, step.first_index_on_or_after(origin, date)),
    }
}

/// Occurrence dates of a schedule inside `window`.
///
/// `recurrence_end` is inclusive. The returned iterator is lazy, bounded by
/// the window and can be cloned to restart the expansion.
pub fn occurrences(
    origin: NaiveDate,
    interval: Interval,
    recurrence_end: Option<NaiveDate>,
    window: DateWindow,
) -> Occurrences {
    let limit = match recurrence_end {
        Some(end) => end.succ_opt().map_or(window.end, |after| after.min(window.end)),
        None => window.end,
    };
    let step = interval.step();
    let next = match step {
        _ if limit <= window.start || limit <= origin => None,
        None => Some(0),
        Some(step) => Some(step.first_index_on_or_after(origin, window.start)),
    };

    Occurrences {
        origin,
        step,
        start: window.start,
        limit,
        next,
    }
}

/// Iterator returned by [`occurrences`].
#[derive(Clone, Debug)]
pub struct Occurrences {
    origin: NaiveDate,
    step: Option<Step>,
    start: NaiveDate,
    /// Exclusive upper bound: window end or the day after the recurrence end.
    limit: NaiveDate,
    next: Option<u64>,
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let index = self.next.take()?;
        let date = match self.step {
            None => self.origin,
            Some(step) => step.nth(self.origin, index)?,
        };
        if date < self.start || date >= self.limit {
            return None;
        }
        if self.step.is_some() {
            self.next = Some(index + 1);
        }
        Some(date)
    }
}

impl FusedIterator for Occurrences {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn month(year: i32, m: u32) -> DateWindow {
        YearMonth::new(year, m).unwrap().window()
    }

    fn collect(
        origin: NaiveDate,
        interval: Interval,
        end: Option<NaiveDate>,
        window: DateWindow,
    ) -> Vec<NaiveDate> {
        occurrences(origin, interval, end, window).collect()
    }

    #[test]
    fn one_time_entry_occurs_once_inside_window() {
        let origin = date(2024, 1, 20);
        assert_eq!(
            collect(origin, Interval::None, None, month(2024, 1)),
            vec![origin]
        );
        assert!(collect(origin, Interval::None, None, month(2024, 2)).is_empty());
        assert!(collect(origin, Interval::None, None, month(2023, 12)).is_empty());
    }

    #[test]
    fn one_time_entry_respects_end_date() {
        let origin = date(2024, 1, 20);
        assert_eq!(
            collect(origin, Interval::None, Some(origin), month(2024, 1)),
            vec![origin]
        );
        assert!(collect(origin, Interval::None, Some(date(2024, 1, 19)), month(2024, 1)).is_empty());
    }

    #[test]
    fn monthly_on_the_fifteenth_once_per_month() {
        let origin = date(2023, 11, 15);
        let window = YearMonth::new(2024, 1).unwrap().span(6);
        let dates = collect(origin, Interval::Monthly, None, window);
        assert_eq!(dates.len(), 6);
        for (offset, found) in dates.iter().enumerate() {
            assert_eq!(*found, date(2024, offset as u32 + 1, 15));
        }
    }

    #[test]
    fn weekly_expense_in_march() {
        let dates = collect(date(2024, 3, 4), Interval::Weekly, None, month(2024, 3));
        assert_eq!(
            dates,
            vec![
                date(2024, 3, 4),
                date(2024, 3, 11),
                date(2024, 3, 18),
                date(2024, 3, 25)
            ]
        );
    }

    #[test]
    fn yearly_stops_after_end_date() {
        let dates = collect(
            date(2023, 6, 1),
            Interval::Yearly,
            Some(date(2023, 12, 31)),
            month(2024, 6),
        );
        assert!(dates.is_empty());
    }

    #[test]
    fn end_before_window_contributes_nothing() {
        let dates = collect(
            date(2020, 1, 1),
            Interval::Daily,
            Some(date(2024, 2, 29)),
            month(2024, 3),
        );
        assert!(dates.is_empty());
    }

    #[test]
    fn end_date_is_inclusive() {
        let dates = collect(
            date(2024, 3, 1),
            Interval::Weekly,
            Some(date(2024, 3, 15)),
            month(2024, 3),
        );
        assert_eq!(
            dates,
            vec![date(2024, 3, 1), date(2024, 3, 8), date(2024, 3, 15)]
        );
    }

    #[test]
    fn ancient_daily_origin_is_not_walked() {
        let dates = collect(date(1900, 1, 1), Interval::Daily, None, month(2024, 2));
        assert_eq!(dates.len(), 29);
        assert_eq!(dates.first(), Some(&date(2024, 2, 1)));
        assert_eq!(dates.last(), Some(&date(2024, 2, 29)));
    }

    #[test]
    fn month_end_clamping_does_not_drift() {
        let origin = date(2024, 1, 31);
        let window = YearMonth::new(2024, 1).unwrap().span(4);
        assert_eq!(
            collect(origin, Interval::Monthly, None, window),
            vec![
                date(2024, 1, 31),
                date(2024, 2, 29),
                date(2024, 3, 31),
                date(2024, 4, 30)
            ]
        );
    }

    #[test]
    fn quarterly_skips_months_between() {
        let origin = date(2023, 2, 10);
        assert_eq!(
            collect(origin, Interval::Quarterly, None, month(2024, 2)),
            vec![date(2024, 2, 10)]
        );
        assert!(collect(origin, Interval::Quarterly, None, month(2024, 3)).is_empty());
        assert_eq!(
            collect(origin, Interval::Quarterly, None, month(2024, 5)),
            vec![date(2024, 5, 10)]
        );
    }

    #[test]
    fn window_starting_mid_month_skips_earlier_day() {
        let window = DateWindow::new(date(2024, 5, 20), date(2024, 7, 20));
        assert_eq!(
            collect(date(2024, 1, 10), Interval::Monthly, None, window),
            vec![date(2024, 6, 10), date(2024, 7, 10)]
        );
    }

    #[test]
    fn nothing_before_origin() {
        assert!(collect(date(2024, 4, 10), Interval::Daily, None, month(2024, 3)).is_empty());
        let dates = collect(date(2024, 3, 30), Interval::Daily, None, month(2024, 3));
        assert_eq!(dates, vec![date(2024, 3, 30), date(2024, 3, 31)]);
    }

    #[test]
    fn expansion_restarts_from_clone() {
        let iter = occurrences(date(2024, 3, 4), Interval::Weekly, None, month(2024, 3));
        let again = iter.clone();
        assert_eq!(iter.count(), 4);
        assert_eq!(again.count(), 4);
    }

    #[test]
    fn unknown_tag_degrades_to_single_occurrence() {
        let interval = Interval::parse_lenient("fortnightly");
        assert_eq!(interval, Interval::None);
        let origin = date(2024, 3, 4);
        assert_eq!(collect(origin, interval, None, month(2024, 3)), vec![origin]);
    }

    #[test]
    fn strict_parse_rejects_unknown_tag() {
        assert_eq!("Monthly".parse::<Interval>().unwrap(), Interval::Monthly);
        assert_eq!(
            "biweekly".parse::<Interval>().unwrap_err(),
            LedgerError::InvalidRecurrenceInterval("biweekly".to_string())
        );
    }

    #[test]
    fn first_on_or_after_uses_closed_form() {
        let origin = date(2001, 5, 31);
        assert_eq!(
            first_on_or_after(origin, Interval::Monthly, date(2024, 2, 1)),
            Some(date(2024, 2, 29))
        );
        assert_eq!(
            first_on_or_after(origin, Interval::Weekly, origin),
            Some(origin)
        );
        assert_eq!(
            first_on_or_after(origin, Interval::None, date(2024, 1, 1)),
            None
        );
    }
}
