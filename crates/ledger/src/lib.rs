//! Recurring-aware monthly balance ledger.
//!
//! Income and expense entries, one-time or recurring, are expanded into
//! occurrences, summed per calendar month and chained into persisted
//! [`MonthlyBalance`] rows: every month starts where the previous one ended.
//! [`Engine::propagate`] recomputes that chain forward from the month of a
//! changed entry.

pub use aggregate::{MonthlyTotals, aggregate};
pub use commands::{NewEntryCmd, UpdateEntryCmd};
pub use entry::{EntryKind, MonetaryEntry};
pub use error::LedgerError;
pub use money::MoneyCents;
pub use month::YearMonth;
pub use monthly_balance::MonthlyBalance;
pub use ops::{Engine, EngineBuilder, EntryChange};
pub use propagate::{
    BalanceChain, ChainState, DEFAULT_HORIZON_MONTHS, MAX_HORIZON_MONTHS, PropagationReport,
    step_month,
};
pub use recurrence::{DateWindow, Interval, Occurrences, first_on_or_after, occurrences};

mod aggregate;
mod commands;
mod entry;
mod error;
mod locks;
mod money;
mod month;
mod monthly_balance;
mod ops;
mod propagate;
mod recurrence;
pub mod store;
mod util;

pub type ResultLedger<T> = Result<T, LedgerError>;
