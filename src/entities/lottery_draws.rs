//! SeaORM Entity for historical lottery draws
//!
//! One row per (lottery_code, issue). Numbers are stored as comma-joined
//! text in draw order; money columns are in cents.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "lottery_draws")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub lottery_code: String,
    pub issue: String,
    pub draw_date: Date,
    /// Exact draw time, backfilled when the provider reports it
    pub draw_time: Option<DateTime>,
    /// e.g. "19,21,29,32,33"
    pub main_numbers: String,
    pub extra_numbers: Option<String>,
    pub prize_pool: Option<i64>,
    pub total_sales: Option<i64>,
    /// Provider payload the row was normalised from
    #[sea_orm(column_type = "Json", nullable)]
    pub raw_data: Option<Json>,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn main_number_list(&self) -> Vec<u8> {
        parse_number_list(&self.main_numbers)
    }

    pub fn extra_number_list(&self) -> Vec<u8> {
        self.extra_numbers
            .as_deref()
            .map(parse_number_list)
            .unwrap_or_default()
    }
}

/// Parse "01,05, 12" into [1, 5, 12], skipping anything that is not a number
pub fn parse_number_list(raw: &str) -> Vec<u8> {
    raw.split(',')
        .filter_map(|n| n.trim().parse::<u8>().ok())
        .collect()
}
