//! AA1 lottery API (primary provider)
//!
//! One POST returns the most recent draws for a game, newest first. There
//! is no pagination, so only page 1 is served; the list is cached briefly
//! because callers often ask for it several times in one sync.

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::services::draw_parser::{extract_date, matches_game_format, normalize_numbers, parse_money_cents};
use crate::services::lottery_api::{DrawProvider, DrawRecord, PageResult, ProviderError};

pub const DEFAULT_AA1_API_URL: &str = "https://tools.mgtv100.com/external/v1/pear/lottery";

const PROVIDER_NAME: &str = "aa1";

#[derive(Clone)]
pub struct Aa1Provider {
    client: Client,
    api_url: String,
    cache: Arc<Cache<String, Arc<Vec<DrawRecord>>>>,
}

#[derive(Debug, Deserialize)]
struct Aa1Response {
    #[serde(default)]
    status: String,
    #[serde(default)]
    code: i64,
    data: Option<Vec<Aa1Item>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Aa1Item {
    pub issue: String,
    /// "2026-01-18 星期六"
    #[serde(default)]
    pub opentime: String,
    /// "2.85亿"
    #[serde(default)]
    pub salemoney: String,
    /// "19 21 29 32 33"
    #[serde(default)]
    pub drawnumber: String,
    /// "06 08"
    #[serde(default)]
    pub trailnumber: String,
}

/// Game code as the AA1 API spells it
fn api_code(lottery_code: &str) -> Option<&'static str> {
    match lottery_code {
        "dlt" => Some("dlt"),
        "ssq" => Some("ssq"),
        "pl3" => Some("pls"),
        "pl5" => Some("plw"),
        "qxc" => Some("qxc"),
        "fc3d" => Some("fc3d"),
        "qlc" => Some("qlc"),
        _ => None,
    }
}

impl Aa1Provider {
    pub fn new(client: Client, api_url: String) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(Duration::from_secs(60))
            .build();

        Self {
            client,
            api_url,
            cache: Arc::new(cache),
        }
    }

    async fn fetch_recent(&self, lottery_code: &str) -> Result<Arc<Vec<DrawRecord>>, ProviderError> {
        if let Some(cached) = self.cache.get(lottery_code).await {
            tracing::debug!("[AA1] Cache hit for {}", lottery_code);
            return Ok(cached);
        }

        let code = api_code(lottery_code)
            .ok_or_else(|| ProviderError::UnsupportedLottery(lottery_code.to_string()))?;

        tracing::info!("[AA1] Fetching lottery data for {}", code);

        let response = self
            .client
            .post(&self.api_url)
            .header("accept", "application/json")
            .json(&serde_json::json!({ "search_lottery": code }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::HttpStatus { status, body });
        }

        let payload: Aa1Response = response.json().await?;
        let draws = Arc::new(parse_response(payload, lottery_code)?);

        tracing::info!("[AA1] Fetched {} draws for {}", draws.len(), lottery_code);

        self.cache
            .insert(lottery_code.to_string(), draws.clone())
            .await;

        Ok(draws)
    }
}

#[async_trait]
impl DrawProvider for Aa1Provider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn paginated(&self) -> bool {
        false
    }

    async fn fetch_page(
        &self,
        lottery_code: &str,
        page: u32,
        limit: u32,
    ) -> Result<PageResult, ProviderError> {
        if page != 1 {
            return Err(ProviderError::PaginationUnsupported);
        }

        let recent = self.fetch_recent(lottery_code).await?;
        let draws: Vec<DrawRecord> = recent.iter().take(limit as usize).cloned().collect();

        Ok(PageResult::new(
            draws,
            limit,
            Some(recent.len() as u64),
            PROVIDER_NAME,
        ))
    }
}

fn parse_response(payload: Aa1Response, lottery_code: &str) -> Result<Vec<DrawRecord>, ProviderError> {
    let items = match payload.data {
        Some(items) if payload.status == "success" && payload.code == 200 => items,
        _ => {
            return Err(ProviderError::Api(format!(
                "unexpected response (status '{}', code {})",
                payload.status, payload.code
            )));
        }
    };

    let total = items.len();
    let draws: Vec<DrawRecord> = items
        .into_iter()
        .filter_map(|item| {
            let issue = item.issue.clone();
            let record = transform_item(item, lottery_code);
            if record.is_none() {
                tracing::warn!("[AA1] Skipping malformed draw {} for {}", issue, lottery_code);
            }
            record
        })
        .collect();

    if total > 0 && draws.is_empty() {
        return Err(ProviderError::Malformed(format!(
            "none of {} AA1 rows could be parsed",
            total
        )));
    }

    Ok(draws)
}

pub(crate) fn transform_item(item: Aa1Item, lottery_code: &str) -> Option<DrawRecord> {
    let draw_date = extract_date(&item.opentime)?;
    let main_numbers = normalize_numbers(&item.drawnumber)?;
    let extra_numbers = normalize_numbers(&item.trailnumber);
    if !matches_game_format(lottery_code, &main_numbers, extra_numbers.as_deref()) {
        return None;
    }
    let total_sales = parse_money_cents(&item.salemoney);
    let raw_data = serde_json::to_value(&item).ok();

    Some(DrawRecord {
        lottery_code: lottery_code.to_string(),
        issue: item.issue.trim().to_string(),
        draw_date,
        // AA1 only reports the date
        draw_time: None,
        main_numbers,
        extra_numbers,
        prize_pool: None,
        total_sales,
        raw_data,
    })
}
