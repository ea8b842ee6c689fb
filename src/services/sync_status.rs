//! Per-game sync cursor
//!
//! Tracks how far draw sync has reached for each lottery code so that a
//! restart resumes history backfill instead of starting over.

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};

use crate::entities::sync_status::{self, Entity as SyncStatus};

/// Fields to merge into a cursor; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorUpdate {
    pub last_synced_issue: Option<String>,
    pub last_synced_date: Option<NaiveDate>,
    pub oldest_synced_issue: Option<String>,
    pub is_history_complete: Option<bool>,
}

pub async fn get_cursor(
    db: &DatabaseConnection,
    lottery_code: &str,
) -> Result<Option<sync_status::Model>, DbErr> {
    SyncStatus::find()
        .filter(sync_status::Column::LotteryCode.eq(lottery_code))
        .one(db)
        .await
}

/// Merge `update` into the cursor, creating it on first use
///
/// Bumps the sync counter and stamps the sync time on every call.
pub async fn update_cursor(
    db: &DatabaseConnection,
    lottery_code: &str,
    update: CursorUpdate,
) -> Result<sync_status::Model, DbErr> {
    let now = Utc::now().naive_utc();

    let cursor = match get_cursor(db, lottery_code).await? {
        Some(record) => {
            let sync_count = record.sync_count;
            let mut active_model: sync_status::ActiveModel = record.into();
            if let Some(issue) = update.last_synced_issue {
                active_model.last_synced_issue = Set(Some(issue));
            }
            if let Some(date) = update.last_synced_date {
                active_model.last_synced_date = Set(Some(date));
            }
            if let Some(issue) = update.oldest_synced_issue {
                active_model.oldest_synced_issue = Set(Some(issue));
            }
            if let Some(complete) = update.is_history_complete {
                active_model.is_history_complete = Set(complete);
            }
            active_model.last_sync_at = Set(Some(now));
            active_model.sync_count = Set(sync_count + 1);
            active_model.update(db).await?
        }
        None => {
            let new_record = sync_status::ActiveModel {
                lottery_code: Set(lottery_code.to_string()),
                last_synced_issue: Set(update.last_synced_issue),
                last_synced_date: Set(update.last_synced_date),
                oldest_synced_issue: Set(update.oldest_synced_issue),
                is_history_complete: Set(update.is_history_complete.unwrap_or(false)),
                last_sync_at: Set(Some(now)),
                sync_count: Set(1),
                ..Default::default()
            };
            new_record.insert(db).await?
        }
    };

    tracing::debug!(
        "[{}] Cursor updated (sync #{}, history complete: {})",
        lottery_code,
        cursor.sync_count,
        cursor.is_history_complete
    );
    Ok(cursor)
}

/// Mark history as incomplete so the next sync walks pages again
///
/// Returns false when no cursor exists yet.
pub async fn reset_history(db: &DatabaseConnection, lottery_code: &str) -> Result<bool, DbErr> {
    let Some(record) = get_cursor(db, lottery_code).await? else {
        return Ok(false);
    };

    let mut active_model: sync_status::ActiveModel = record.into();
    active_model.is_history_complete = Set(false);
    active_model.oldest_synced_issue = Set(None);
    active_model.update(db).await?;

    tracing::info!("[{}] History cursor reset", lottery_code);
    Ok(true)
}
