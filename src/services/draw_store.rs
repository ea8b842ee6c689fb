//! Persistence for lottery draws and the game catalogue
//!
//! Writes are insert-or-backfill keyed by (lottery_code, issue): a stored
//! value is never replaced, only null columns are filled in. Running the
//! same sync twice is therefore harmless.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use serde::Serialize;

use crate::entities::{lottery_draws, lottery_types, prelude::*};
use crate::services::lottery_api::DrawRecord;
use crate::services::ticket::DrawNumbers;

/// Upper bound on draws loaded for a check or simulation
pub const MAX_CORPUS_SIZE: u64 = 10_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSummary {
    pub inserted: usize,
    /// Existing rows that gained a previously-null field
    pub backfilled: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl UpsertSummary {
    pub fn written(&self) -> usize {
        self.inserted + self.backfilled
    }
}

#[derive(Debug, Clone, Default)]
pub struct DrawQuery {
    pub limit: u64,
    pub offset: u64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub async fn upsert_draws(
    db: &DatabaseConnection,
    draws: &[DrawRecord],
) -> Result<UpsertSummary, DbErr> {
    let mut summary = UpsertSummary::default();

    for draw in draws {
        match upsert_draw(db, draw).await {
            Ok(UpsertOutcome::Inserted) => summary.inserted += 1,
            Ok(UpsertOutcome::Backfilled) => summary.backfilled += 1,
            Ok(UpsertOutcome::Unchanged) => summary.unchanged += 1,
            Err(e) => {
                tracing::warn!(
                    lottery_code = %draw.lottery_code,
                    issue = %draw.issue,
                    "Failed to store draw: {}",
                    e
                );
                summary.failed += 1;
            }
        }
    }

    if summary.failed > 0 && summary.failed == draws.len() {
        return Err(DbErr::Custom(format!(
            "all {} draws failed to store",
            summary.failed
        )));
    }

    tracing::debug!(
        "Stored draws: {} inserted, {} backfilled, {} unchanged, {} failed",
        summary.inserted,
        summary.backfilled,
        summary.unchanged,
        summary.failed
    );

    Ok(summary)
}

enum UpsertOutcome {
    Inserted,
    Backfilled,
    Unchanged,
}

async fn upsert_draw(db: &DatabaseConnection, draw: &DrawRecord) -> Result<UpsertOutcome, DbErr> {
    let now = Utc::now().naive_utc();

    let Some(existing) = find_draw(db, &draw.lottery_code, &draw.issue).await? else {
        let record = lottery_draws::ActiveModel {
            lottery_code: Set(draw.lottery_code.clone()),
            issue: Set(draw.issue.clone()),
            draw_date: Set(draw.draw_date),
            draw_time: Set(draw.draw_time),
            main_numbers: Set(draw.main_numbers.clone()),
            extra_numbers: Set(draw.extra_numbers.clone()),
            prize_pool: Set(draw.prize_pool),
            total_sales: Set(draw.total_sales),
            raw_data: Set(draw.raw_data.clone()),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        record.insert(db).await?;
        return Ok(UpsertOutcome::Inserted);
    };

    let mut changed = false;
    let mut active: lottery_draws::ActiveModel = existing.clone().into();

    if existing.draw_time.is_none() && draw.draw_time.is_some() {
        active.draw_time = Set(draw.draw_time);
        changed = true;
    }
    if existing.prize_pool.is_none() && draw.prize_pool.is_some() {
        active.prize_pool = Set(draw.prize_pool);
        changed = true;
    }
    if existing.total_sales.is_none() && draw.total_sales.is_some() {
        active.total_sales = Set(draw.total_sales);
        changed = true;
    }
    if existing.raw_data.is_none() && draw.raw_data.is_some() {
        active.raw_data = Set(draw.raw_data.clone());
        changed = true;
    }

    if !changed {
        return Ok(UpsertOutcome::Unchanged);
    }

    active.updated_at = Set(Some(now));
    active.update(db).await?;

    tracing::debug!(
        lottery_code = %draw.lottery_code,
        issue = %draw.issue,
        "Backfilled missing draw fields"
    );

    Ok(UpsertOutcome::Backfilled)
}

pub async fn find_draw(
    db: &DatabaseConnection,
    lottery_code: &str,
    issue: &str,
) -> Result<Option<lottery_draws::Model>, DbErr> {
    LotteryDraws::find()
        .filter(lottery_draws::Column::LotteryCode.eq(lottery_code))
        .filter(lottery_draws::Column::Issue.eq(issue))
        .one(db)
        .await
}

fn newest_first(select: Select<LotteryDraws>) -> Select<LotteryDraws> {
    select
        .order_by_desc(lottery_draws::Column::DrawDate)
        .order_by_desc(lottery_draws::Column::Issue)
}

/// Page through a game's draws, newest first; returns the page and the
/// total row count matching the date filter
pub async fn list_draws(
    db: &DatabaseConnection,
    lottery_code: &str,
    query: &DrawQuery,
) -> Result<(Vec<lottery_draws::Model>, u64), DbErr> {
    let mut select = LotteryDraws::find().filter(lottery_draws::Column::LotteryCode.eq(lottery_code));

    if let Some(start) = query.start_date {
        select = select.filter(lottery_draws::Column::DrawDate.gte(start));
    }
    if let Some(end) = query.end_date {
        select = select.filter(lottery_draws::Column::DrawDate.lte(end));
    }

    let total = select.clone().count(db).await?;
    let draws = newest_first(select)
        .offset(query.offset)
        .limit(query.limit)
        .all(db)
        .await?;

    Ok((draws, total))
}

pub async fn latest_draw(
    db: &DatabaseConnection,
    lottery_code: &str,
) -> Result<Option<lottery_draws::Model>, DbErr> {
    newest_first(LotteryDraws::find().filter(lottery_draws::Column::LotteryCode.eq(lottery_code)))
        .one(db)
        .await
}

pub async fn count_draws(db: &DatabaseConnection, lottery_code: &str) -> Result<u64, DbErr> {
    LotteryDraws::find()
        .filter(lottery_draws::Column::LotteryCode.eq(lottery_code))
        .count(db)
        .await
}

/// Load up to `cap` draws (newest first) as parsed number sets
pub async fn load_corpus(
    db: &DatabaseConnection,
    lottery_code: &str,
    cap: u64,
) -> Result<Vec<DrawNumbers>, DbErr> {
    let draws = newest_first(LotteryDraws::find().filter(lottery_draws::Column::LotteryCode.eq(lottery_code)))
        .limit(cap.min(MAX_CORPUS_SIZE))
        .all(db)
        .await?;

    Ok(draws.iter().map(DrawNumbers::from).collect())
}

pub async fn list_active_types(db: &DatabaseConnection) -> Result<Vec<lottery_types::Model>, DbErr> {
    LotteryTypes::find()
        .filter(lottery_types::Column::IsActive.eq(true))
        .order_by_asc(lottery_types::Column::Id)
        .all(db)
        .await
}

pub async fn find_type(
    db: &DatabaseConnection,
    code: &str,
) -> Result<Option<lottery_types::Model>, DbErr> {
    LotteryTypes::find()
        .filter(lottery_types::Column::Code.eq(code))
        .one(db)
        .await
}
