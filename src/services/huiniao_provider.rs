//! Huiniao lottery API (secondary provider)
//!
//! Paginated history endpoint. Numbers come back as positional fields
//! `one`..`seven` whose meaning depends on the game.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};

use crate::services::draw_parser::{extract_date, join_numbers, matches_game_format};
use crate::services::lottery_api::{DrawProvider, DrawRecord, PageResult, ProviderError};

pub const DEFAULT_HUINIAO_API_URL: &str = "http://api.huiniao.top/interface/home";

const PROVIDER_NAME: &str = "huiniao";

#[derive(Clone)]
pub struct HuiniaoProvider {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct HuiniaoResponse {
    code: i64,
    #[serde(default)]
    info: String,
    data: Option<HuiniaoData>,
}

#[derive(Debug, Deserialize)]
struct HuiniaoData {
    data: Option<HuiniaoPage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HuiniaoPage {
    #[serde(default)]
    list: Vec<HuiniaoItem>,
    #[serde(default, deserialize_with = "number_or_string")]
    total_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct HuiniaoItem {
    /// Issue
    #[serde(default, deserialize_with = "string_or_number")]
    pub code: String,
    /// YYYY-MM-DD
    #[serde(default)]
    pub day: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub one: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub two: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub three: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub four: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub five: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub six: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub seven: String,
    #[serde(default)]
    pub open_time: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn number_or_string<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

impl HuiniaoProvider {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl DrawProvider for HuiniaoProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn paginated(&self) -> bool {
        true
    }

    async fn fetch_page(
        &self,
        lottery_code: &str,
        page: u32,
        limit: u32,
    ) -> Result<PageResult, ProviderError> {
        if !is_supported(lottery_code) {
            return Err(ProviderError::UnsupportedLottery(lottery_code.to_string()));
        }

        let url = format!("{}/lotteryHistory", self.base_url);
        tracing::info!(
            "[Huiniao] Fetching {} page {} (limit {})",
            lottery_code,
            page,
            limit
        );

        let page_param = page.to_string();
        let limit_param = limit.to_string();
        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .query(&[
                ("type", lottery_code),
                ("page", page_param.as_str()),
                ("limit", limit_param.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::HttpStatus { status, body });
        }

        let payload: HuiniaoResponse = response.json().await?;
        let (draws, total_count) = parse_response(payload, lottery_code)?;

        tracing::info!("[Huiniao] Fetched {} draws for {}", draws.len(), lottery_code);

        Ok(PageResult::new(draws, limit, total_count, PROVIDER_NAME))
    }
}

fn is_supported(lottery_code: &str) -> bool {
    matches!(lottery_code, "dlt" | "ssq" | "pl3" | "pl5" | "qxc" | "fc3d" | "qlc")
}

fn parse_response(
    payload: HuiniaoResponse,
    lottery_code: &str,
) -> Result<(Vec<DrawRecord>, Option<u64>), ProviderError> {
    if payload.code != 1 {
        let info = if payload.info.is_empty() {
            format!("code {}", payload.code)
        } else {
            payload.info
        };
        return Err(ProviderError::Api(info));
    }

    let page = payload
        .data
        .and_then(|d| d.data)
        .ok_or_else(|| ProviderError::Malformed("missing data.data.list".to_string()))?;

    let draws = page
        .list
        .into_iter()
        .filter_map(|item| {
            let issue = item.code.clone();
            let record = transform_item(item, lottery_code);
            if record.is_none() {
                tracing::warn!("[Huiniao] Skipping malformed draw {} for {}", issue, lottery_code);
            }
            record
        })
        .collect();

    Ok((draws, page.total_count))
}

/// Split positional fields into (main, extra) for a game
fn split_numbers(item: &HuiniaoItem, lottery_code: &str) -> (Option<String>, Option<String>) {
    let all = [
        item.one.as_str(),
        item.two.as_str(),
        item.three.as_str(),
        item.four.as_str(),
        item.five.as_str(),
        item.six.as_str(),
        item.seven.as_str(),
    ];

    match lottery_code {
        // 5 front + 2 back
        "dlt" => (join_numbers(&all[..5]), join_numbers(&all[5..])),
        // 6 red + 1 blue
        "ssq" => (join_numbers(&all[..6]), join_numbers(&all[6..])),
        "qlc" | "qxc" => (join_numbers(&all), None),
        "pl5" => (join_numbers(&all[..5]), None),
        "pl3" | "fc3d" => (join_numbers(&all[..3]), None),
        _ => (join_numbers(&all[..5]), join_numbers(&all[5..])),
    }
}

pub(crate) fn transform_item(item: HuiniaoItem, lottery_code: &str) -> Option<DrawRecord> {
    let draw_date = extract_date(&item.day).or_else(|| extract_date(&item.open_time))?;
    let (main_numbers, extra_numbers) = split_numbers(&item, lottery_code);
    let main_numbers = main_numbers?;
    if !matches_game_format(lottery_code, &main_numbers, extra_numbers.as_deref()) {
        return None;
    }

    let draw_time = NaiveDateTime::parse_from_str(item.open_time.trim(), "%Y-%m-%d %H:%M:%S")
        .ok()
        .filter(|t| t.date() == draw_date);
    let raw_data = serde_json::to_value(&item).ok();

    Some(DrawRecord {
        lottery_code: lottery_code.to_string(),
        issue: item.code.trim().to_string(),
        draw_date,
        draw_time,
        main_numbers,
        extra_numbers,
        prize_pool: None,
        total_sales: None,
        raw_data,
    })
}
