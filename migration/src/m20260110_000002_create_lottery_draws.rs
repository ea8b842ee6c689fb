use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LotteryDraws::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LotteryDraws::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LotteryDraws::LotteryCode).string_len(20).not_null())
                    .col(ColumnDef::new(LotteryDraws::Issue).string_len(30).not_null())
                    .col(ColumnDef::new(LotteryDraws::DrawDate).date().not_null())
                    .col(ColumnDef::new(LotteryDraws::DrawTime).timestamp().null())
                    .col(ColumnDef::new(LotteryDraws::MainNumbers).string_len(100).not_null())
                    .col(ColumnDef::new(LotteryDraws::ExtraNumbers).string_len(50).null())
                    // Money columns are stored in cents
                    .col(ColumnDef::new(LotteryDraws::PrizePool).big_integer().null())
                    .col(ColumnDef::new(LotteryDraws::TotalSales).big_integer().null())
                    .col(ColumnDef::new(LotteryDraws::RawData).json().null())
                    .col(
                        ColumnDef::new(LotteryDraws::CreatedAt)
                            .timestamp()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .col(
                        ColumnDef::new(LotteryDraws::UpdatedAt)
                            .timestamp()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await?;

        // One row per (lottery_code, issue)
        manager
            .create_index(
                Index::create()
                    .name("idx_lottery_draws_unique")
                    .table(LotteryDraws::Table)
                    .col(LotteryDraws::LotteryCode)
                    .col(LotteryDraws::Issue)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_lottery_draws_code_date")
                    .table(LotteryDraws::Table)
                    .col(LotteryDraws::LotteryCode)
                    .col((LotteryDraws::DrawDate, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LotteryDraws::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LotteryDraws {
    Table,
    Id,
    LotteryCode,
    Issue,
    DrawDate,
    DrawTime,
    MainNumbers,
    ExtraNumbers,
    PrizePool,
    TotalSales,
    RawData,
    CreatedAt,
    UpdatedAt,
}
