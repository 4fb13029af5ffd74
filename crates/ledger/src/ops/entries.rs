use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{
    LedgerError, MonetaryEntry, ResultLedger, YearMonth,
    commands::{NewEntryCmd, UpdateEntryCmd},
    propagate::PropagationReport,
    store,
    util::{normalize_optional_text, normalize_user_id},
};

use super::{Engine, with_tx};

/// Outcome of an entry write: the entry touched and the propagation it
/// triggered.
#[derive(Clone, Debug)]
pub struct EntryChange {
    pub entry: MonetaryEntry,
    pub propagation: PropagationReport,
}

impl Engine {
    /// All entries of `user_id`, oldest first.
    pub async fn entries(&self, user_id: &str) -> ResultLedger<Vec<MonetaryEntry>> {
        let user_id = normalize_user_id(user_id)?;
        store::list_entries(&self.database, &user_id, None, None).await
    }

    /// Store a new entry and propagate from its month.
    ///
    /// The insert and the walk share one DB transaction.
    pub async fn add_entry(&self, cmd: NewEntryCmd) -> ResultLedger<EntryChange> {
        let NewEntryCmd {
            user_id,
            kind,
            amount,
            origin_date,
            interval,
            recurrence_end,
            note,
        } = cmd;
        let user_id = normalize_user_id(&user_id)?;
        let mut entry =
            MonetaryEntry::new(user_id, kind, amount, origin_date, interval, recurrence_end)?;
        entry.note = normalize_optional_text(note.as_deref());

        let _guard = self.locks.acquire(&entry.user_id).await;
        with_tx!(self, |db_tx| {
            store::insert_entry(&db_tx, &entry).await?;
            let propagation = self
                .walk(
                    &db_tx,
                    &entry.user_id,
                    YearMonth::of(entry.origin_date),
                    self.horizon_months,
                )
                .await?;
            Ok(EntryChange { entry, propagation })
        })
    }

    /// Change an entry and propagate from the earlier of its old and new
    /// months, so both the month it left and the month it moved to are
    /// recomputed.
    pub async fn update_entry(&self, cmd: UpdateEntryCmd) -> ResultLedger<EntryChange> {
        let user_id = normalize_user_id(&cmd.user_id)?;

        let _guard = self.locks.acquire(&user_id).await;
        with_tx!(self, |db_tx| {
            let previous = store::find_entry(&db_tx, &user_id, cmd.entry_id)
                .await?
                .ok_or_else(|| LedgerError::KeyNotFound(cmd.entry_id.to_string()))?;

            let mut entry = previous.clone();
            if let Some(amount) = cmd.amount {
                entry.amount = amount;
            }
            if let Some(origin_date) = cmd.origin_date {
                entry.origin_date = origin_date;
            }
            if let Some(interval) = cmd.interval {
                entry.interval = interval;
            }
            if let Some(recurrence_end) = cmd.recurrence_end {
                entry.recurrence_end = recurrence_end;
            }
            if let Some(note) = cmd.note {
                entry.note = normalize_optional_text(note.as_deref());
            }
            entry.validate()?;

            store::update_entry(&db_tx, &entry).await?;
            let anchor = YearMonth::of(previous.origin_date.min(entry.origin_date));
            let propagation = self
                .walk(&db_tx, &user_id, anchor, self.horizon_months)
                .await?;
            Ok(EntryChange { entry, propagation })
        })
    }

    /// Remove an entry and propagate from its month.
    ///
    /// Rows already written for later months are kept and recomputed without
    /// the entry's contribution.
    pub async fn delete_entry(&self, user_id: &str, entry_id: Uuid) -> ResultLedger<EntryChange> {
        let user_id = normalize_user_id(user_id)?;

        let _guard = self.locks.acquire(&user_id).await;
        with_tx!(self, |db_tx| {
            let entry = store::find_entry(&db_tx, &user_id, entry_id)
                .await?
                .ok_or_else(|| LedgerError::KeyNotFound(entry_id.to_string()))?;
            store::delete_entry(&db_tx, &user_id, entry_id).await?;
            let propagation = self
                .walk(
                    &db_tx,
                    &user_id,
                    YearMonth::of(entry.origin_date),
                    self.horizon_months,
                )
                .await?;
            Ok(EntryChange { entry, propagation })
        })
    }
}
