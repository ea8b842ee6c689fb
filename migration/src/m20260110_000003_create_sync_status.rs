use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One sync cursor per lottery code
        manager
            .create_table(
                Table::create()
                    .table(SyncStatus::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SyncStatus::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SyncStatus::LotteryCode)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(SyncStatus::LastSyncedIssue).string_len(30).null())
                    .col(ColumnDef::new(SyncStatus::LastSyncedDate).date().null())
                    .col(ColumnDef::new(SyncStatus::OldestSyncedIssue).string_len(30).null())
                    .col(
                        ColumnDef::new(SyncStatus::IsHistoryComplete)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(SyncStatus::LastSyncAt).timestamp().null())
                    .col(
                        ColumnDef::new(SyncStatus::SyncCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SyncStatus::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SyncStatus {
    Table,
    Id,
    LotteryCode,
    LastSyncedIssue,
    LastSyncedDate,
    OldestSyncedIssue,
    IsHistoryComplete,
    LastSyncAt,
    SyncCount,
}
