//! `SeaORM` Entity for sync_status table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sync_status")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub lottery_code: String,
    /// Newest issue seen by any sync
    pub last_synced_issue: Option<String>,
    pub last_synced_date: Option<Date>,
    /// Oldest issue reached by history backfill
    pub oldest_synced_issue: Option<String>,
    pub is_history_complete: bool,
    pub last_sync_at: Option<DateTime>,
    pub sync_count: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
