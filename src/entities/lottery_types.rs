//! `SeaORM` Entity for lottery_types table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "lottery_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    /// "sports" or "welfare"
    pub category: String,
    pub main_count: i32,
    pub main_range_start: i32,
    pub main_range_end: i32,
    pub extra_count: i32,
    pub extra_range_start: i32,
    pub extra_range_end: i32,
    pub draw_time: Option<String>,
    /// Comma-separated weekdays, 0 = Sunday
    pub draw_days: Option<String>,
    pub is_active: bool,
    pub created_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
