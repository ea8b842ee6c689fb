//! Random generator request/response models

use serde::{Deserialize, Serialize};

use crate::services::prize_rules::LotteryKind;

#[derive(Debug, Clone, Deserialize)]
pub struct LotteryPickRequest {
    /// "daletu"/"dlt" or "shuangseqiu"/"ssq"
    pub kind: String,
}

impl LotteryPickRequest {
    pub fn lottery_kind(&self) -> Result<LotteryKind, String> {
        LotteryKind::from_code(&self.kind).ok_or_else(|| format!("Unsupported lottery kind '{}'", self.kind))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountRequest {
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntegerQuery {
    #[serde(default = "default_integer_max")]
    pub max: i64,
}

fn default_integer_max() -> i64 {
    100
}

/// Success envelope for generated values
#[derive(Debug, Clone, Serialize)]
pub struct RandomResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> RandomResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}
