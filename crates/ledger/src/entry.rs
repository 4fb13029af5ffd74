//! The module contains `MonetaryEntry`, one income or expense record.
//!
//! Entries are written by the surrounding CRUD layer; the propagator only
//! reads them.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Interval, LedgerError, MoneyCents, ResultLedger,
    recurrence::{self, DateWindow, Occurrences},
    util::parse_uuid,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for EntryKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(LedgerError::InvalidKind(other.to_string())),
        }
    }
}

/// One income or expense, possibly recurring.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonetaryEntry {
    pub id: Uuid,
    pub user_id: String,
    pub kind: EntryKind,
    /// Never negative; the kind decides the sign.
    pub amount: MoneyCents,
    pub origin_date: NaiveDate,
    pub interval: Interval,
    /// Inclusive last day the entry may occur on.
    pub recurrence_end: Option<NaiveDate>,
    pub note: Option<String>,
}

impl MonetaryEntry {
    pub fn new(
        user_id: String,
        kind: EntryKind,
        amount: MoneyCents,
        origin_date: NaiveDate,
        interval: Interval,
        recurrence_end: Option<NaiveDate>,
    ) -> ResultLedger<Self> {
        let entry = Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            amount,
            origin_date,
            interval,
            recurrence_end,
            note: None,
        };
        entry.validate()?;
        Ok(entry)
    }

    pub(crate) fn validate(&self) -> ResultLedger<()> {
        if self.amount.is_negative() {
            return Err(LedgerError::InvalidAmount(
                "amount must be >= 0".to_string(),
            ));
        }
        if let Some(end) = self.recurrence_end
            && end < self.origin_date
        {
            return Err(LedgerError::InvalidDate(format!(
                "recurrence end {end} precedes origin {}",
                self.origin_date
            )));
        }
        Ok(())
    }

    /// Dates this entry counts on inside `window`.
    pub fn occurrences_in(&self, window: DateWindow) -> Occurrences {
        recurrence::occurrences(self.origin_date, self.interval, self.recurrence_end, window)
    }

    /// Total amount this entry contributes to `window`.
    ///
    /// Fails with [`LedgerError::InvalidAmount`] when the total does not fit
    /// in [`MoneyCents`].
    pub fn contribution(&self, window: DateWindow) -> ResultLedger<MoneyCents> {
        let count = self.occurrences_in(window).count();
        self.amount.checked_times(count).ok_or_else(|| {
            LedgerError::InvalidAmount(format!(
                "entry {} overflows over {count} occurrences of {}",
                self.id, self.amount
            ))
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub amount_minor: i64,
    pub origin_date: Date,
    pub recurrence: String,
    pub recurrence_end: Option<Date>,
    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for MonetaryEntry {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "entry")?,
            user_id: model.user_id,
            kind: EntryKind::try_from(model.kind.as_str())?,
            amount: MoneyCents::new(model.amount_minor),
            origin_date: model.origin_date,
            interval: Interval::parse_lenient(&model.recurrence),
            recurrence_end: model.recurrence_end,
            note: model.note,
        })
    }
}

impl From<&MonetaryEntry> for ActiveModel {
    fn from(value: &MonetaryEntry) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.clone()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(value.amount.cents()),
            origin_date: ActiveValue::Set(value.origin_date),
            recurrence: ActiveValue::Set(value.interval.as_str().to_string()),
            recurrence_end: ActiveValue::Set(value.recurrence_end),
            note: ActiveValue::Set(value.note.clone()),
        }
    }
}
