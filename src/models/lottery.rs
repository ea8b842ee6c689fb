//! Lottery catalogue, history and ticket-check request/response models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entities::{lottery_draws, lottery_types};
use crate::services::batch_simulator::BatchReport;
use crate::services::draw_parser::default_draw_time;
use crate::services::ticket::Ticket;
use crate::services::ticket_checker::CheckReport;

pub const DEFAULT_HISTORY_LIMIT: u64 = 10;
pub const MAX_HISTORY_LIMIT: u64 = 100;

/// Game checked when a request names none
pub const DEFAULT_LOTTERY_CODE: &str = "dlt";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LotteryTypeEntry {
    pub code: String,
    pub name: String,
    pub category: String,
    pub main_count: i32,
    /// [start, end], inclusive
    pub main_range: [i32; 2],
    pub extra_count: i32,
    pub extra_range: [i32; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_time: Option<String>,
    /// Weekdays, 0 = Sunday
    pub draw_days: Vec<u8>,
}

impl From<lottery_types::Model> for LotteryTypeEntry {
    fn from(model: lottery_types::Model) -> Self {
        let draw_days = model
            .draw_days
            .as_deref()
            .map(lottery_draws::parse_number_list)
            .unwrap_or_default();

        Self {
            code: model.code,
            name: model.name,
            category: model.category,
            main_count: model.main_count,
            main_range: [model.main_range_start, model.main_range_end],
            extra_count: model.extra_count,
            extra_range: [model.extra_range_start, model.extra_range_end],
            draw_time: model.draw_time,
            draw_days,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LotteryTypesResponse {
    pub success: bool,
    pub data: Vec<LotteryTypeEntry>,
}

/// Query parameters for GET /api/lottery/history
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub code: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Look up a single issue instead of paging
    pub issue: Option<String>,
    /// YYYY-MM-DD
    pub start_date: Option<String>,
    /// YYYY-MM-DD
    pub end_date: Option<String>,
}

/// `HistoryQuery` after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidHistoryQuery {
    pub code: String,
    pub limit: u64,
    pub offset: u64,
    pub issue: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl HistoryQuery {
    /// Limit is clamped to `MAX_HISTORY_LIMIT` rather than rejected
    pub fn validate(&self) -> Result<ValidHistoryQuery, String> {
        let code = self
            .code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| "code is required".to_string())?
            .to_lowercase();

        let limit = match self.limit {
            Some(limit) if limit < 1 => return Err("limit must be at least 1".to_string()),
            Some(limit) => (limit as u64).min(MAX_HISTORY_LIMIT),
            None => DEFAULT_HISTORY_LIMIT,
        };

        let offset = match self.offset {
            Some(offset) if offset < 0 => return Err("offset cannot be negative".to_string()),
            Some(offset) => offset as u64,
            None => 0,
        };

        let start_date = parse_date("startDate", self.start_date.as_deref())?;
        let end_date = parse_date("endDate", self.end_date.as_deref())?;
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err("startDate must not be after endDate".to_string());
            }
        }

        Ok(ValidHistoryQuery {
            code,
            limit,
            offset,
            issue: self
                .issue
                .as_deref()
                .map(str::trim)
                .filter(|i| !i.is_empty())
                .map(str::to_string),
            start_date,
            end_date,
        })
    }
}

fn parse_date(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, String> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("{} must be YYYY-MM-DD", name)),
    }
}

/// One stored draw as returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawEntry {
    pub issue: String,
    pub draw_date: NaiveDate,
    /// Exact time when known, otherwise the game's usual draw time
    pub draw_time: String,
    pub main_numbers: Vec<String>,
    pub extra_numbers: Vec<String>,
    pub prize_pool: Option<i64>,
    pub total_sales: Option<i64>,
}

fn split_numbers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

impl From<lottery_draws::Model> for DrawEntry {
    fn from(model: lottery_draws::Model) -> Self {
        let draw_time = model
            .draw_time
            .unwrap_or_else(|| model.draw_date.and_time(default_draw_time(&model.lottery_code)))
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        Self {
            main_numbers: split_numbers(&model.main_numbers),
            extra_numbers: model.extra_numbers.as_deref().map(split_numbers).unwrap_or_default(),
            issue: model.issue,
            draw_date: model.draw_date,
            draw_time,
            prize_pool: model.prize_pool,
            total_sales: model.total_sales,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub data: Vec<DrawEntry>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestQuery {
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LatestResponse {
    pub success: bool,
    pub data: Option<DrawEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of POST /api/lottery/check
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    pub code: Option<String>,
    pub front_numbers: Vec<i64>,
    pub back_numbers: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TicketInput {
    pub front: Vec<i64>,
    pub back: Vec<i64>,
}

/// Body of POST /api/lottery/batch-check
#[derive(Debug, Clone, Deserialize)]
pub struct BatchCheckRequest {
    pub code: Option<String>,
    #[serde(default)]
    pub tickets: Vec<TicketInput>,
}

/// Build a ticket from wire numbers; anything outside u8 cannot be a
/// valid ball and is rejected here with the pool named
pub fn ticket_from_wire(front: &[i64], back: &[i64]) -> Result<Ticket, String> {
    let convert = |pool: &str, numbers: &[i64]| -> Result<Vec<u8>, String> {
        numbers
            .iter()
            .map(|&n| u8::try_from(n).map_err(|_| format!("{} number {} is out of range", pool, n)))
            .collect()
    };

    Ok(Ticket::new(convert("front", front)?, convert("back", back)?))
}

/// Answer of the check endpoints
///
/// An empty draw corpus is reported with `success: false` and code
/// `NO_DRAW_DATA` but still a 200 status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(flatten)]
    pub report: Option<CheckReport>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCheckResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(flatten)]
    pub report: Option<BatchReport>,
}

pub const NO_DRAW_DATA_MESSAGE: &str = "No historical draws yet, sync draw data first";

impl CheckResponse {
    pub fn no_draw_data() -> Self {
        Self {
            success: false,
            error: Some(NO_DRAW_DATA_MESSAGE.to_string()),
            code: Some("NO_DRAW_DATA".to_string()),
            report: None,
        }
    }
}

impl BatchCheckResponse {
    pub fn no_draw_data() -> Self {
        Self {
            success: false,
            error: Some(NO_DRAW_DATA_MESSAGE.to_string()),
            code: Some("NO_DRAW_DATA".to_string()),
            report: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_query_defaults_and_clamp() {
        let query = HistoryQuery {
            code: Some("DLT".to_string()),
            limit: Some(500),
            ..Default::default()
        };
        let valid = query.validate().unwrap();
        assert_eq!(valid.code, "dlt");
        assert_eq!(valid.limit, MAX_HISTORY_LIMIT);
        assert_eq!(valid.offset, 0);

        let query = HistoryQuery {
            code: Some("ssq".to_string()),
            ..Default::default()
        };
        assert_eq!(query.validate().unwrap().limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_history_query_rejects_bad_input() {
        assert!(HistoryQuery::default().validate().is_err());

        let query = HistoryQuery {
            code: Some("dlt".to_string()),
            start_date: Some("2026-02-01".to_string()),
            end_date: Some("2026-01-01".to_string()),
            ..Default::default()
        };
        assert!(query.validate().is_err());

        let query = HistoryQuery {
            code: Some("dlt".to_string()),
            start_date: Some("01/02/2026".to_string()),
            ..Default::default()
        };
        assert_eq!(query.validate().unwrap_err(), "startDate must be YYYY-MM-DD");
    }

    #[test]
    fn test_ticket_from_wire() {
        let ticket = ticket_from_wire(&[1, 2, 3, 4, 5], &[6, 7]).unwrap();
        assert_eq!(ticket.front, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            ticket_from_wire(&[1, 2, 3, 4, 300], &[6, 7]).unwrap_err(),
            "front number 300 is out of range"
        );
    }

    #[test]
    fn test_no_data_response_shape() {
        let json = serde_json::to_value(CheckResponse::no_draw_data()).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "NO_DRAW_DATA");
        assert!(json.get("hasWinning").is_none());
    }
}
