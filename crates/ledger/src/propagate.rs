//! Balance chain over a bounded horizon of months.
//!
//! The chain is a fold: every month consumes the remaining balance produced
//! by the month before it and yields its own [`MonthlyBalance`]. Only the
//! anchor month takes its starting balance from outside the chain.
//!
//! Nothing here touches storage; [`Engine::propagate`] loads the inputs and
//! persists what [`BalanceChain`] yields.
//!
//! [`Engine::propagate`]: crate::Engine::propagate

use serde::Serialize;

use crate::{
    LedgerError, MonetaryEntry, MoneyCents, MonthlyBalance, ResultLedger, YearMonth,
    aggregate::aggregate,
};

/// Default number of months a propagation run walks.
pub const DEFAULT_HORIZON_MONTHS: u32 = 16;

/// Upper bound on the months one run may walk.
pub const MAX_HORIZON_MONTHS: u32 = 240;

/// Accepts horizons in `1..=MAX_HORIZON_MONTHS`.
pub(crate) fn check_horizon(horizon: u32) -> ResultLedger<u32> {
    if horizon == 0 || horizon > MAX_HORIZON_MONTHS {
        return Err(LedgerError::InvalidHorizon(horizon));
    }
    Ok(horizon)
}

/// Where the chain stands before producing its next month.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainState {
    /// First month; starting balance read from storage (zero if absent).
    Anchor { starting: MoneyCents },
    /// Every later month; starts where the previous month ended.
    Chained { previous_remaining: MoneyCents },
    /// Horizon exhausted.
    Done,
}

impl ChainState {
    /// Starting balance of the next month, `None` once done.
    pub fn starting_balance(self) -> Option<MoneyCents> {
        match self {
            Self::Anchor { starting } => Some(starting),
            Self::Chained { previous_remaining } => Some(previous_remaining),
            Self::Done => None,
        }
    }
}

/// Rows written by one propagation run, in calendar order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PropagationReport {
    pub user_id: String,
    pub anchor: YearMonth,
    pub months: Vec<MonthlyBalance>,
}

impl PropagationReport {
    /// Last month reached by the run.
    pub fn last(&self) -> Option<&MonthlyBalance> {
        self.months.last()
    }
}

/// Computes one month from its starting balance.
///
/// Fails with [`LedgerError::InvalidAmount`] if the month's totals or its
/// remaining balance overflow.
pub fn step_month(
    user_id: &str,
    month: YearMonth,
    starting_balance: MoneyCents,
    entries: &[MonetaryEntry],
) -> ResultLedger<MonthlyBalance> {
    let totals = aggregate(user_id, month, entries)?;
    let remaining_balance = totals
        .net()
        .and_then(|net| starting_balance.checked_add(net))
        .ok_or_else(|| LedgerError::InvalidAmount(format!("balance of {month} overflows")))?;
    Ok(MonthlyBalance {
        user_id: user_id.to_string(),
        month,
        starting_balance,
        remaining_balance,
    })
}

/// Iterator over the months of one propagation run.
///
/// A month that fails to compute is yielded as an error and ends the chain.
#[derive(Clone, Debug)]
pub struct BalanceChain<'a> {
    user_id: &'a str,
    entries: &'a [MonetaryEntry],
    next_month: YearMonth,
    months_left: u32,
    state: ChainState,
}

impl<'a> BalanceChain<'a> {
    pub fn new(
        user_id: &'a str,
        anchor: YearMonth,
        horizon: u32,
        anchor_starting: MoneyCents,
        entries: &'a [MonetaryEntry],
    ) -> Self {
        let state = if horizon == 0 {
            ChainState::Done
        } else {
            ChainState::Anchor {
                starting: anchor_starting,
            }
        };
        Self {
            user_id,
            entries,
            next_month: anchor,
            months_left: horizon,
            state,
        }
    }

    pub fn state(&self) -> ChainState {
        self.state
    }
}

impl Iterator for BalanceChain<'_> {
    type Item = ResultLedger<MonthlyBalance>;

    fn next(&mut self) -> Option<Self::Item> {
        let starting = self.state.starting_balance()?;
        let month = self.next_month;
        let balance = match step_month(self.user_id, month, starting, self.entries) {
            Ok(balance) => balance,
            Err(err) => {
                self.months_left = 0;
                self.state = ChainState::Done;
                return Some(Err(err));
            }
        };

        self.months_left -= 1;
        self.next_month = month.succ();
        self.state = if self.months_left == 0 {
            ChainState::Done
        } else {
            ChainState::Chained {
                previous_remaining: balance.remaining_balance,
            }
        };
        Some(Ok(balance))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.months_left as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for BalanceChain<'_> {}
