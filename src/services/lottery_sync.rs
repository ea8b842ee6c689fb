//! Draw synchronisation
//!
//! A game starts in history mode: pages are walked on the paginated
//! provider, a bounded number per run, resuming where the stored row count
//! says the previous run stopped. Once a short page marks the history as
//! exhausted, later runs only poll the newest page.

use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::time::Duration;

use crate::services::draw_store::{self, UpsertSummary};
use crate::services::lottery_api::{DrawFetcher, DrawRecord};
use crate::services::sync_status::{self, CursorUpdate};

#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub page_size: u32,
    pub max_pages: u32,
    pub incremental_limit: u32,
    pub page_delay: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            page_size: 50,
            max_pages: 10,
            incremental_limit: 20,
            page_delay: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    History,
    Incremental,
    /// One page requested explicitly
    Page,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub lottery_code: String,
    pub mode: SyncMode,
    pub source: String,
    pub fetched: usize,
    pub pages_fetched: u32,
    pub stored: UpsertSummary,
    pub has_more: bool,
    pub history_complete: bool,
    /// A later history page failed; earlier pages were still stored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub lottery_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<SyncReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn sync_lottery(
    db: &DatabaseConnection,
    fetcher: &DrawFetcher,
    lottery_code: &str,
    settings: &SyncSettings,
) -> Result<SyncReport, Box<dyn std::error::Error + Send + Sync>> {
    let cursor = sync_status::get_cursor(db, lottery_code).await?;
    let history_complete = cursor.as_ref().is_some_and(|c| c.is_history_complete);
    let last_synced_date = cursor.as_ref().and_then(|c| c.last_synced_date);

    if history_complete {
        sync_incremental(db, fetcher, lottery_code, settings, last_synced_date).await
    } else {
        sync_history(db, fetcher, lottery_code, settings, last_synced_date).await
    }
}

async fn sync_history(
    db: &DatabaseConnection,
    fetcher: &DrawFetcher,
    lottery_code: &str,
    settings: &SyncSettings,
    last_synced_date: Option<NaiveDate>,
) -> Result<SyncReport, Box<dyn std::error::Error + Send + Sync>> {
    let page_size = settings.page_size.max(1);
    let stored = draw_store::count_draws(db, lottery_code).await?;
    let start_page = (stored / page_size as u64 + 1) as u32;

    tracing::info!(
        lottery_code = %lottery_code,
        start_page,
        max_pages = settings.max_pages,
        "Starting history sync ({} draws stored)",
        stored
    );

    let batch = fetcher
        .fetch_history(
            lottery_code,
            start_page,
            settings.max_pages,
            page_size,
            settings.page_delay,
        )
        .await?;

    let summary = draw_store::upsert_draws(db, &batch.draws).await?;

    let mut update = newest_update(&batch.draws, last_synced_date);
    update.oldest_synced_issue = oldest(&batch.draws).map(|d| d.issue.clone());
    update.is_history_complete = Some(batch.exhausted);
    let cursor = sync_status::update_cursor(db, lottery_code, update).await?;

    let report = SyncReport {
        lottery_code: lottery_code.to_string(),
        mode: SyncMode::History,
        source: batch.source.to_string(),
        fetched: batch.draws.len(),
        pages_fetched: batch.pages_fetched,
        stored: summary,
        has_more: !batch.exhausted,
        history_complete: cursor.is_history_complete,
        partial_error: batch.partial_error.map(|e| e.to_string()),
    };

    tracing::info!(
        lottery_code = %lottery_code,
        "History sync done: {} pages, {} fetched, {} new, complete: {}",
        report.pages_fetched,
        report.fetched,
        report.stored.inserted,
        report.history_complete
    );

    Ok(report)
}

async fn sync_incremental(
    db: &DatabaseConnection,
    fetcher: &DrawFetcher,
    lottery_code: &str,
    settings: &SyncSettings,
    last_synced_date: Option<NaiveDate>,
) -> Result<SyncReport, Box<dyn std::error::Error + Send + Sync>> {
    let mut report = sync_single_page(
        db,
        fetcher,
        lottery_code,
        1,
        settings.incremental_limit.max(1),
        last_synced_date,
    )
    .await?;
    report.mode = SyncMode::Incremental;

    tracing::info!(
        lottery_code = %lottery_code,
        "Incremental sync done: {} fetched, {} new",
        report.fetched,
        report.stored.inserted
    );

    Ok(report)
}

/// Fetch and store one page without touching the history walk
pub async fn sync_page(
    db: &DatabaseConnection,
    fetcher: &DrawFetcher,
    lottery_code: &str,
    page: u32,
    limit: u32,
) -> Result<SyncReport, Box<dyn std::error::Error + Send + Sync>> {
    let cursor = sync_status::get_cursor(db, lottery_code).await?;
    let last_synced_date = cursor.as_ref().and_then(|c| c.last_synced_date);

    sync_single_page(db, fetcher, lottery_code, page.max(1), limit.max(1), last_synced_date).await
}

async fn sync_single_page(
    db: &DatabaseConnection,
    fetcher: &DrawFetcher,
    lottery_code: &str,
    page: u32,
    limit: u32,
    last_synced_date: Option<NaiveDate>,
) -> Result<SyncReport, Box<dyn std::error::Error + Send + Sync>> {
    let result = fetcher.fetch_page(lottery_code, page, limit).await?;
    let summary = draw_store::upsert_draws(db, &result.draws).await?;

    let update = newest_update(&result.draws, last_synced_date);
    let cursor = sync_status::update_cursor(db, lottery_code, update).await?;

    Ok(SyncReport {
        lottery_code: lottery_code.to_string(),
        mode: SyncMode::Page,
        source: result.source.to_string(),
        fetched: result.draws.len(),
        pages_fetched: 1,
        stored: summary,
        has_more: result.has_more,
        history_complete: cursor.is_history_complete,
        partial_error: None,
    })
}

/// Sync each code in turn; one failing game does not stop the others
pub async fn sync_enabled_lotteries(
    db: &DatabaseConnection,
    fetcher: &DrawFetcher,
    codes: &[String],
    settings: &SyncSettings,
) -> Vec<SyncOutcome> {
    let mut outcomes = Vec::with_capacity(codes.len());

    for code in codes {
        match sync_lottery(db, fetcher, code, settings).await {
            Ok(report) => outcomes.push(SyncOutcome {
                lottery_code: code.clone(),
                report: Some(report),
                error: None,
            }),
            Err(e) => {
                tracing::error!(lottery_code = %code, "Sync failed: {}", e);
                outcomes.push(SyncOutcome {
                    lottery_code: code.clone(),
                    report: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    outcomes
}

fn newest(draws: &[DrawRecord]) -> Option<&DrawRecord> {
    draws
        .iter()
        .max_by(|a, b| (a.draw_date, &a.issue).cmp(&(b.draw_date, &b.issue)))
}

fn oldest(draws: &[DrawRecord]) -> Option<&DrawRecord> {
    draws
        .iter()
        .min_by(|a, b| (a.draw_date, &a.issue).cmp(&(b.draw_date, &b.issue)))
}

/// Advance the newest-issue marker only when the batch reaches past it
fn newest_update(draws: &[DrawRecord], last_synced_date: Option<NaiveDate>) -> CursorUpdate {
    match newest(draws) {
        Some(draw) if last_synced_date.is_none_or(|date| draw.draw_date >= date) => CursorUpdate {
            last_synced_issue: Some(draw.issue.clone()),
            last_synced_date: Some(draw.draw_date),
            ..Default::default()
        },
        _ => CursorUpdate::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(issue: &str, day: u32) -> DrawRecord {
        DrawRecord {
            lottery_code: "dlt".to_string(),
            issue: issue.to_string(),
            draw_date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            draw_time: None,
            main_numbers: "1,2,3,4,5".to_string(),
            extra_numbers: Some("1,2".to_string()),
            prize_pool: None,
            total_sales: None,
            raw_data: None,
        }
    }

    #[test]
    fn test_newest_and_oldest_ignore_input_order() {
        let draws = vec![record("25020", 10), record("25022", 14), record("25018", 6)];
        assert_eq!(newest(&draws).unwrap().issue, "25022");
        assert_eq!(oldest(&draws).unwrap().issue, "25018");
    }

    #[test]
    fn test_newest_update_never_moves_backwards() {
        let draws = vec![record("25010", 1)];
        let stored = NaiveDate::from_ymd_opt(2025, 3, 20);
        assert_eq!(newest_update(&draws, stored), CursorUpdate::default());

        let update = newest_update(&draws, None);
        assert_eq!(update.last_synced_issue.as_deref(), Some("25010"));
        assert!(update.oldest_synced_issue.is_none());
    }

    #[test]
    fn test_empty_batch_leaves_cursor_fields_alone() {
        assert_eq!(newest_update(&[], None), CursorUpdate::default());
    }
}
