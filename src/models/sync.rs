//! Admin sync request/response models

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::entities::sync_status;
use crate::services::lottery_sync::SyncReport;

#[derive(Debug, Clone, Deserialize)]
pub struct SyncStatusQuery {
    pub code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    /// Fetch and store one page
    Sync,
    /// Full sync step: history or incremental, per the cursor
    Run,
    /// Clear the history-complete flag, keeping stored draws
    Reset,
}

/// Body of POST /api/admin/sync
#[derive(Debug, Clone, Deserialize)]
pub struct SyncRequest {
    pub action: SyncAction,
    pub code: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorEntry {
    pub lottery_code: String,
    pub last_synced_issue: Option<String>,
    pub last_synced_date: Option<NaiveDate>,
    pub oldest_synced_issue: Option<String>,
    pub is_history_complete: bool,
    pub last_sync_at: Option<NaiveDateTime>,
    pub sync_count: i64,
}

impl From<sync_status::Model> for CursorEntry {
    fn from(model: sync_status::Model) -> Self {
        Self {
            lottery_code: model.lottery_code,
            last_synced_issue: model.last_synced_issue,
            last_synced_date: model.last_synced_date,
            oldest_synced_issue: model.oldest_synced_issue,
            is_history_complete: model.is_history_complete,
            last_sync_at: model.last_sync_at,
            sync_count: model.sync_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatusResponse {
    pub success: bool,
    pub sync_status: Option<CursorEntry>,
    pub record_count: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncActionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<SyncReport>,
}
