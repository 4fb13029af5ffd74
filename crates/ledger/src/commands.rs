//! Command structs for entry maintenance.
//!
//! These types group parameters for entry writes, keeping call sites readable
//! and avoiding long argument lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{EntryKind, Interval, MoneyCents};

/// Create an entry and re-run propagation from its month.
#[derive(Clone, Debug)]
pub struct NewEntryCmd {
    pub user_id: String,
    pub kind: EntryKind,
    pub amount: MoneyCents,
    pub origin_date: NaiveDate,
    pub interval: Interval,
    pub recurrence_end: Option<NaiveDate>,
    pub note: Option<String>,
}

impl NewEntryCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        kind: EntryKind,
        amount: MoneyCents,
        origin_date: NaiveDate,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            kind,
            amount,
            origin_date,
            interval: Interval::None,
            recurrence_end: None,
            note: None,
        }
    }

    #[must_use]
    pub fn income(user_id: impl Into<String>, amount: MoneyCents, origin_date: NaiveDate) -> Self {
        Self::new(user_id, EntryKind::Income, amount, origin_date)
    }

    #[must_use]
    pub fn expense(
        user_id: impl Into<String>,
        amount: MoneyCents,
        origin_date: NaiveDate,
    ) -> Self {
        Self::new(user_id, EntryKind::Expense, amount, origin_date)
    }

    #[must_use]
    pub fn every(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn until(mut self, recurrence_end: NaiveDate) -> Self {
        self.recurrence_end = Some(recurrence_end);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Change an existing entry. Fields left as `None` keep their value.
#[derive(Clone, Debug)]
pub struct UpdateEntryCmd {
    pub user_id: String,
    pub entry_id: Uuid,
    pub amount: Option<MoneyCents>,
    pub origin_date: Option<NaiveDate>,
    pub interval: Option<Interval>,
    /// `Some(None)` clears the end date.
    pub recurrence_end: Option<Option<NaiveDate>>,
    pub note: Option<Option<String>>,
}

impl UpdateEntryCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, entry_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            entry_id,
            amount: None,
            origin_date: None,
            interval: None,
            recurrence_end: None,
            note: None,
        }
    }

    #[must_use]
    pub fn amount(mut self, amount: MoneyCents) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn origin_date(mut self, origin_date: NaiveDate) -> Self {
        self.origin_date = Some(origin_date);
        self
    }

    #[must_use]
    pub fn interval(mut self, interval: Interval) -> Self {
        self.interval = Some(interval);
        self
    }

    #[must_use]
    pub fn recurrence_end(mut self, recurrence_end: Option<NaiveDate>) -> Self {
        self.recurrence_end = Some(recurrence_end);
        self
    }

    #[must_use]
    pub fn note(mut self, note: Option<String>) -> Self {
        self.note = Some(note);
        self
    }
}
