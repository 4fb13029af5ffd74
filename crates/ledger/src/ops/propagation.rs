use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, TransactionTrait};

use crate::{
    MoneyCents, MonthlyBalance, ResultLedger, YearMonth,
    propagate::{BalanceChain, PropagationReport, check_horizon},
    store,
    util::normalize_user_id,
};

use super::{Engine, persistence_at, with_tx};

impl Engine {
    /// Recomputes `user_id`'s monthly balances forward from the month of
    /// `anchor_date`, over the configured horizon.
    ///
    /// This is the hook the CRUD layer calls after an entry dated
    /// `anchor_date` is created, edited or deleted.
    pub async fn propagate(
        &self,
        user_id: &str,
        anchor_date: NaiveDate,
    ) -> ResultLedger<PropagationReport> {
        self.propagate_from(user_id, YearMonth::of(anchor_date), self.horizon_months)
            .await
    }

    /// Recomputes `horizon` months of balances starting at `anchor`.
    ///
    /// `horizon` must be in `1..=MAX_HORIZON_MONTHS`.
    ///
    /// - The anchor keeps its persisted starting balance (zero if the month
    ///   was never written); every later month starts at the remaining
    ///   balance computed just before it.
    /// - The walk runs in one DB transaction under the user's lock: a
    ///   failure leaves every row as it was before the call.
    /// - Re-running with unchanged entries rewrites identical rows.
    pub async fn propagate_from(
        &self,
        user_id: &str,
        anchor: YearMonth,
        horizon: u32,
    ) -> ResultLedger<PropagationReport> {
        let user_id = normalize_user_id(user_id)?;
        let horizon = check_horizon(horizon)?;

        let _guard = self.locks.acquire(&user_id).await;
        with_tx!(self, |db_tx| {
            self.walk(&db_tx, &user_id, anchor, horizon).await
        })
    }

    /// Persisted balances of `user_id` for `months` months from `from`.
    pub async fn monthly_balances(
        &self,
        user_id: &str,
        from: YearMonth,
        months: u32,
    ) -> ResultLedger<Vec<MonthlyBalance>> {
        let user_id = normalize_user_id(user_id)?;
        store::list_monthly_balances(&self.database, &user_id, from, months).await
    }

    /// Load, fold and upsert. Callers hold the user's lock.
    pub(super) async fn walk<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        anchor: YearMonth,
        horizon: u32,
    ) -> ResultLedger<PropagationReport> {
        let anchor_starting = match store::get_monthly_balance(conn, user_id, anchor)
            .await
            .map_err(persistence_at(anchor))?
        {
            Some(existing) => existing.starting_balance,
            None => {
                tracing::debug!(user_id, %anchor, "no balance for anchor month, starting at zero");
                MoneyCents::ZERO
            }
        };

        let entries = store::list_entries(conn, user_id, None, Some(anchor.span(horizon)))
            .await
            .map_err(persistence_at(anchor))?;

        let mut months = Vec::new();
        for balance in BalanceChain::new(user_id, anchor, horizon, anchor_starting, &entries) {
            let balance = balance?;
            let month = balance.month;
            tracing::debug!(
                user_id,
                %month,
                starting = %balance.starting_balance,
                remaining = %balance.remaining_balance,
                "upserting monthly balance"
            );
            let saved = store::upsert_monthly_balance(conn, &balance)
                .await
                .map_err(persistence_at(month))?;
            months.push(saved);
        }

        tracing::info!(
            user_id,
            %anchor,
            months = months.len(),
            entries = entries.len(),
            "balance chain propagated"
        );
        Ok(PropagationReport {
            user_id: user_id.to_string(),
            anchor,
            months,
        })
    }
}
