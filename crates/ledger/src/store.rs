//! Ledger store: sea-orm queries over entries and monthly balances.
//!
//! Every function is generic over [`ConnectionTrait`] so the engine can run
//! them on a plain connection or inside a database transaction.

use sea_orm::{
    Condition, ConnectionTrait, QueryFilter, QueryOrder, prelude::*, sea_query::OnConflict,
};
use uuid::Uuid;

use crate::{
    EntryKind, LedgerError, MonetaryEntry, MonthlyBalance, ResultLedger, YearMonth, entry,
    monthly_balance, recurrence::DateWindow,
};

/// Entries of `user_id`, optionally restricted to one kind and to entries
/// whose active span overlaps `window`.
///
/// The overlap test keeps entries that start before the window ends and
/// whose recurrence end, if any, is not before the window starts.
pub async fn list_entries<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    kind: Option<EntryKind>,
    window: Option<DateWindow>,
) -> ResultLedger<Vec<MonetaryEntry>> {
    let mut query = entry::Entity::find().filter(entry::Column::UserId.eq(user_id));
    if let Some(kind) = kind {
        query = query.filter(entry::Column::Kind.eq(kind.as_str()));
    }
    if let Some(window) = window {
        query = query
            .filter(entry::Column::OriginDate.lt(window.end))
            .filter(
                Condition::any()
                    .add(entry::Column::RecurrenceEnd.is_null())
                    .add(entry::Column::RecurrenceEnd.gte(window.start)),
            );
    }

    query
        .order_by_asc(entry::Column::OriginDate)
        .order_by_asc(entry::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(MonetaryEntry::try_from)
        .collect()
}

pub async fn find_entry<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    entry_id: Uuid,
) -> ResultLedger<Option<MonetaryEntry>> {
    entry::Entity::find_by_id(entry_id.to_string())
        .filter(entry::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .map(MonetaryEntry::try_from)
        .transpose()
}

pub async fn insert_entry<C: ConnectionTrait>(
    conn: &C,
    record: &MonetaryEntry,
) -> ResultLedger<()> {
    entry::ActiveModel::from(record).insert(conn).await?;
    Ok(())
}

pub async fn update_entry<C: ConnectionTrait>(
    conn: &C,
    record: &MonetaryEntry,
) -> ResultLedger<()> {
    entry::ActiveModel::from(record).update(conn).await?;
    Ok(())
}

/// Returns `true` if a row was removed.
pub async fn delete_entry<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    entry_id: Uuid,
) -> ResultLedger<bool> {
    let result = entry::Entity::delete_many()
        .filter(entry::Column::Id.eq(entry_id.to_string()))
        .filter(entry::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn get_monthly_balance<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    month: YearMonth,
) -> ResultLedger<Option<MonthlyBalance>> {
    monthly_balance::Entity::find_by_id((
        user_id.to_string(),
        month.year(),
        month.month() as i32,
    ))
    .one(conn)
    .await?
    .map(MonthlyBalance::try_from)
    .transpose()
}

/// Insert the row for (user, year, month) or overwrite both balances of the
/// existing one.
pub async fn upsert_monthly_balance<C: ConnectionTrait>(
    conn: &C,
    balance: &MonthlyBalance,
) -> ResultLedger<MonthlyBalance> {
    monthly_balance::Entity::insert(monthly_balance::ActiveModel::from(balance))
        .on_conflict(
            OnConflict::columns([
                monthly_balance::Column::UserId,
                monthly_balance::Column::Year,
                monthly_balance::Column::Month,
            ])
            .update_columns([
                monthly_balance::Column::StartingBalance,
                monthly_balance::Column::RemainingBalance,
            ])
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(balance.clone())
}

/// Persisted balances of `user_id` for the `count` months starting at
/// `from`, in calendar order. Months never touched are absent.
pub async fn list_monthly_balances<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    from: YearMonth,
    count: u32,
) -> ResultLedger<Vec<MonthlyBalance>> {
    let until = from.plus(count).ok_or_else(|| {
        LedgerError::InvalidDate(format!("{count} months after {from} is out of range"))
    })?;
    let on_or_after = Condition::any()
        .add(monthly_balance::Column::Year.gt(from.year()))
        .add(
            Condition::all()
                .add(monthly_balance::Column::Year.eq(from.year()))
                .add(monthly_balance::Column::Month.gte(from.month() as i32)),
        );
    let before = Condition::any()
        .add(monthly_balance::Column::Year.lt(until.year()))
        .add(
            Condition::all()
                .add(monthly_balance::Column::Year.eq(until.year()))
                .add(monthly_balance::Column::Month.lt(until.month() as i32)),
        );

    monthly_balance::Entity::find()
        .filter(monthly_balance::Column::UserId.eq(user_id))
        .filter(on_or_after)
        .filter(before)
        .order_by_asc(monthly_balance::Column::Year)
        .order_by_asc(monthly_balance::Column::Month)
        .all(conn)
        .await?
        .into_iter()
        .map(MonthlyBalance::try_from)
        .collect()
}
