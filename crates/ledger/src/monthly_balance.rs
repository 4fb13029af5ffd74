//! The module contains `MonthlyBalance`, the persisted ledger snapshot of one
//! user for one calendar month.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{LedgerError, MoneyCents, YearMonth, util::model_month};

/// Starting and remaining balance of a user-month.
///
/// `remaining = starting + income - expense` for the month's occurrences.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBalance {
    pub user_id: String,
    pub month: YearMonth,
    pub starting_balance: MoneyCents,
    pub remaining_balance: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "monthly_balances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub year: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub month: i32,
    pub starting_balance: i64,
    pub remaining_balance: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for MonthlyBalance {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            month: model_month(model.year, model.month)?,
            user_id: model.user_id,
            starting_balance: MoneyCents::new(model.starting_balance),
            remaining_balance: MoneyCents::new(model.remaining_balance),
        })
    }
}

impl From<&MonthlyBalance> for ActiveModel {
    fn from(value: &MonthlyBalance) -> Self {
        Self {
            user_id: ActiveValue::Set(value.user_id.clone()),
            year: ActiveValue::Set(value.month.year()),
            month: ActiveValue::Set(value.month.month() as i32),
            starting_balance: ActiveValue::Set(value.starting_balance.cents()),
            remaining_balance: ActiveValue::Set(value.remaining_balance.cents()),
        }
    }
}
