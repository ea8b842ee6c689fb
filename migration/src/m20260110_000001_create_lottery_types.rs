use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (code, name, category, main count, main range, extra count, extra range, draw time, draw days)
const LOTTERY_TYPES: &[(&str, &str, &str, i32, (i32, i32), i32, (i32, i32), &str, &str)] = &[
    ("dlt", "大乐透", "sports", 5, (1, 35), 2, (1, 12), "Mon/Wed/Sat 21:30", "1,3,6"),
    ("ssq", "双色球", "welfare", 6, (1, 33), 1, (1, 16), "Tue/Thu/Sun 21:15", "0,2,4"),
    ("pl3", "排列3", "sports", 3, (0, 9), 0, (0, 0), "Daily 21:30", "0,1,2,3,4,5,6"),
    ("pl5", "排列5", "sports", 5, (0, 9), 0, (0, 0), "Daily 21:30", "0,1,2,3,4,5,6"),
    ("qxc", "七星彩", "sports", 7, (0, 9), 0, (0, 0), "Tue/Fri/Sun 21:30", "0,2,5"),
    ("fc3d", "福彩3D", "welfare", 3, (0, 9), 0, (0, 0), "Daily 21:15", "0,1,2,3,4,5,6"),
    ("qlc", "七乐彩", "welfare", 7, (1, 30), 1, (1, 30), "Mon/Wed/Fri 21:15", "1,3,5"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LotteryTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LotteryTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LotteryTypes::Code)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(LotteryTypes::Name).string_len(50).not_null())
                    .col(ColumnDef::new(LotteryTypes::Category).string_len(20).not_null())
                    .col(ColumnDef::new(LotteryTypes::MainCount).integer().not_null())
                    .col(
                        ColumnDef::new(LotteryTypes::MainRangeStart)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(LotteryTypes::MainRangeEnd).integer().not_null())
                    .col(
                        ColumnDef::new(LotteryTypes::ExtraCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LotteryTypes::ExtraRangeStart)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(LotteryTypes::ExtraRangeEnd)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(LotteryTypes::DrawTime).string_len(100).null())
                    .col(ColumnDef::new(LotteryTypes::DrawDays).string_len(50).null())
                    .col(
                        ColumnDef::new(LotteryTypes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(LotteryTypes::CreatedAt)
                            .timestamp()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await?;

        // Seed the catalogue of supported games
        let mut insert = Query::insert();
        insert.into_table(LotteryTypes::Table).columns([
            LotteryTypes::Code,
            LotteryTypes::Name,
            LotteryTypes::Category,
            LotteryTypes::MainCount,
            LotteryTypes::MainRangeStart,
            LotteryTypes::MainRangeEnd,
            LotteryTypes::ExtraCount,
            LotteryTypes::ExtraRangeStart,
            LotteryTypes::ExtraRangeEnd,
            LotteryTypes::DrawTime,
            LotteryTypes::DrawDays,
        ]);

        for (code, name, category, main_count, main_range, extra_count, extra_range, draw_time, draw_days) in
            LOTTERY_TYPES
        {
            insert.values_panic([
                (*code).into(),
                (*name).into(),
                (*category).into(),
                (*main_count).into(),
                main_range.0.into(),
                main_range.1.into(),
                (*extra_count).into(),
                extra_range.0.into(),
                extra_range.1.into(),
                (*draw_time).into(),
                (*draw_days).into(),
            ]);
        }

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LotteryTypes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LotteryTypes {
    Table,
    Id,
    Code,
    Name,
    Category,
    MainCount,
    MainRangeStart,
    MainRangeEnd,
    ExtraCount,
    ExtraRangeStart,
    ExtraRangeEnd,
    DrawTime,
    DrawDays,
    IsActive,
    CreatedAt,
}
