//! Income and expense entries, one-time or recurring.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Entries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Entries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Entries::UserId).string().not_null())
                    .col(ColumnDef::new(Entries::Kind).string().not_null())
                    .col(ColumnDef::new(Entries::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Entries::OriginDate).date().not_null())
                    .col(
                        ColumnDef::new(Entries::Recurrence)
                            .string()
                            .not_null()
                            .default("none"),
                    )
                    .col(ColumnDef::new(Entries::RecurrenceEnd).date())
                    .col(ColumnDef::new(Entries::Note).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-entries-user_id-origin_date")
                    .table(Entries::Table)
                    .col(Entries::UserId)
                    .col(Entries::OriginDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Entries::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
enum Entries {
    Table,
    Id,
    UserId,
    Kind,
    AmountMinor,
    OriginDate,
    Recurrence,
    RecurrenceEnd,
    Note,
}
