//! The module contains the errors the ledger can throw.
//!
//! The errors are:
//!
//! - [`InvalidRecurrenceInterval`] thrown when a user supplied interval tag is
//!   not recognised. Stored tags never raise it: they degrade to
//!   [`Interval::None`].
//! - [`PersistenceFailure`] thrown when the store fails while a propagation
//!   walk is processing a month.
//! - [`KeyNotFound`] thrown when an item is not found.
//!
//!  [`InvalidRecurrenceInterval`]: LedgerError::InvalidRecurrenceInterval
//!  [`PersistenceFailure`]: LedgerError::PersistenceFailure
//!  [`KeyNotFound`]: LedgerError::KeyNotFound
//!  [`Interval::None`]: crate::Interval::None
use sea_orm::DbErr;
use thiserror::Error;

use crate::YearMonth;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid recurrence interval: {0}")]
    InvalidRecurrenceInterval(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid entry kind: {0}")]
    InvalidKind(String),
    #[error("Invalid horizon: {0} months")]
    InvalidHorizon(u32),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("propagation aborted at {month}: {source}")]
    PersistenceFailure {
        month: YearMonth,
        #[source]
        source: DbErr,
    },
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl LedgerError {
    /// Month a failed propagation walk stopped at, if any.
    pub fn failed_month(&self) -> Option<YearMonth> {
        match self {
            Self::PersistenceFailure { month, .. } => Some(*month),
            _ => None,
        }
    }
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidRecurrenceInterval(a), Self::InvalidRecurrenceInterval(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::InvalidKind(a), Self::InvalidKind(b)) => a == b,
            (Self::InvalidHorizon(a), Self::InvalidHorizon(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (
                Self::PersistenceFailure {
                    month: a,
                    source: sa,
                },
                Self::PersistenceFailure {
                    month: b,
                    source: sb,
                },
            ) => a == b && sa.to_string() == sb.to_string(),
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
