//! One ledger snapshot per user and calendar month.
//!
//! (user_id, year, month) is the primary key, which the propagator's upsert
//! relies on as its conflict target.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MonthlyBalances::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MonthlyBalances::UserId).string().not_null())
                    .col(ColumnDef::new(MonthlyBalances::Year).integer().not_null())
                    .col(ColumnDef::new(MonthlyBalances::Month).integer().not_null())
                    .col(
                        ColumnDef::new(MonthlyBalances::StartingBalance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MonthlyBalances::RemainingBalance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk-monthly_balances")
                            .col(MonthlyBalances::UserId)
                            .col(MonthlyBalances::Year)
                            .col(MonthlyBalances::Month),
                    )
                    .check(
                        Expr::col(MonthlyBalances::Month)
                            .gte(1)
                            .and(Expr::col(MonthlyBalances::Month).lte(12)),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MonthlyBalances::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MonthlyBalances {
    Table,
    UserId,
    Year,
    Month,
    StartingBalance,
    RemainingBalance,
}
