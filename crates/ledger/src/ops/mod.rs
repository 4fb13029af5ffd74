use sea_orm::DatabaseConnection;

use crate::{LedgerError, ResultLedger, YearMonth, locks::UserLocks, propagate};

mod entries;
mod propagation;

pub use entries::EntryChange;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Entry point of the ledger: owns the database handle, the propagation
/// horizon and the per-user write locks.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    horizon_months: u32,
    locks: UserLocks,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Months walked by [`Engine::propagate`].
    pub fn horizon_months(&self) -> u32 {
        self.horizon_months
    }
}

/// Tag store failures with the month the walk was processing.
fn persistence_at(month: YearMonth) -> impl FnOnce(LedgerError) -> LedgerError {
    move |err| match err {
        LedgerError::Database(source) => LedgerError::PersistenceFailure { month, source },
        other => other,
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    horizon_months: Option<u32>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Months a propagation run walks forward, anchor included. Checked
    /// against [`MAX_HORIZON_MONTHS`](crate::MAX_HORIZON_MONTHS) by `build`.
    pub fn horizon_months(mut self, months: u32) -> EngineBuilder {
        self.horizon_months = Some(months);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultLedger<Engine> {
        let horizon_months = propagate::check_horizon(
            self.horizon_months
                .unwrap_or(propagate::DEFAULT_HORIZON_MONTHS),
        )?;
        Ok(Engine {
            database: self.database,
            horizon_months,
            locks: UserLocks::default(),
        })
    }
}
