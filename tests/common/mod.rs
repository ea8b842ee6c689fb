#![allow(dead_code)]

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use chrono::{Duration, NaiveDate};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use std::collections::HashMap;
use std::env;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use lottery_backend::handlers;
use lottery_backend::services::lottery_api::{
    DrawFetcher, DrawProvider, DrawRecord, PageResult, ProviderError,
};
use lottery_backend::services::lottery_sync::SyncSettings;
use lottery_backend::services::random_org::{RandomApiError, RandomSource};
use lottery_backend::AppState;

pub const TEST_ADMIN_KEY: &str = "test-admin-key";

/// Set up a migrated test database
/// Uses TEST_DATABASE_URL or falls back to an in-memory SQLite database
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let database_url = env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());

    // A single connection keeps every query on the same in-memory database
    let mut options = ConnectOptions::new(database_url);
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Draw number `n` counted back from the newest (n = 0)
pub fn numbered_draw(code: &str, n: u32) -> DrawRecord {
    let newest = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
    DrawRecord {
        lottery_code: code.to_string(),
        issue: (26_500 - n).to_string(),
        draw_date: newest - Duration::days(n as i64),
        draw_time: None,
        main_numbers: "20,21,22,23,24".to_string(),
        extra_numbers: Some("11,12".to_string()),
        prize_pool: None,
        total_sales: None,
        raw_data: None,
    }
}

pub fn draw_with_numbers(code: &str, issue: &str, date: NaiveDate, main: &str, extra: Option<&str>) -> DrawRecord {
    DrawRecord {
        lottery_code: code.to_string(),
        issue: issue.to_string(),
        draw_date: date,
        draw_time: None,
        main_numbers: main.to_string(),
        extra_numbers: extra.map(str::to_string),
        prize_pool: None,
        total_sales: None,
        raw_data: None,
    }
}

/// Provider serving a fixed history of `total` draws, newest first
pub struct MockProvider {
    name: &'static str,
    paginated: bool,
    total: u32,
    failures: Mutex<HashMap<u32, ProviderError>>,
    failing_codes: Mutex<Vec<String>>,
    calls: Mutex<Vec<(String, u32, u32)>>,
}

impl MockProvider {
    pub fn new(name: &'static str, paginated: bool, total: u32) -> Arc<Self> {
        Arc::new(Self {
            name,
            paginated,
            total,
            failures: Mutex::new(HashMap::new()),
            failing_codes: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Make `page` fail with `error` (every time it is asked for)
    pub fn fail_page(&self, page: u32, error: ProviderError) {
        self.failures.lock().unwrap().insert(page, error);
    }

    /// Make every request for `code` fail
    pub fn fail_code(&self, code: &str) {
        self.failing_codes.lock().unwrap().push(code.to_string());
    }

    /// (code, page, limit) of every call so far
    pub fn calls(&self) -> Vec<(String, u32, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DrawProvider for MockProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn paginated(&self) -> bool {
        self.paginated
    }

    async fn fetch_page(&self, lottery_code: &str, page: u32, limit: u32) -> Result<PageResult, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((lottery_code.to_string(), page, limit));

        if self.failing_codes.lock().unwrap().iter().any(|c| c == lottery_code) {
            return Err(ProviderError::HttpStatus {
                status: 500,
                body: "upstream down".to_string(),
            });
        }
        if let Some(error) = self.failures.lock().unwrap().get(&page) {
            return Err(error.clone());
        }
        if page > 1 && !self.paginated {
            return Err(ProviderError::PaginationUnsupported);
        }

        let start = (page - 1) * limit;
        let end = (start + limit).min(self.total);
        let draws = (start..end).map(|n| numbered_draw(lottery_code, n)).collect();

        Ok(PageResult::new(draws, limit, Some(self.total as u64), self.name))
    }
}

/// Returns `min, min+1, ...` wrapping inside the range
pub struct CountingSource;

#[async_trait]
impl RandomSource for CountingSource {
    async fn fetch_integers(&self, count: usize, min: i64, max: i64) -> Result<Vec<i64>, RandomApiError> {
        let span = max - min + 1;
        Ok((0..count as i64).map(|i| min + i % span).collect())
    }
}

pub struct FailingSource;

#[async_trait]
impl RandomSource for FailingSource {
    async fn fetch_integers(&self, _count: usize, _min: i64, _max: i64) -> Result<Vec<i64>, RandomApiError> {
        Err(RandomApiError::HttpStatus(503))
    }
}

pub fn test_settings() -> SyncSettings {
    SyncSettings {
        page_size: 10,
        max_pages: 3,
        incremental_limit: 5,
        page_delay: std::time::Duration::ZERO,
    }
}

pub fn build_state(
    db: DatabaseConnection,
    primary: Arc<MockProvider>,
    secondary: Arc<MockProvider>,
    random: Arc<dyn RandomSource>,
) -> AppState {
    AppState {
        db,
        fetcher: DrawFetcher::new(primary, secondary),
        random,
        admin_api_key: Some(TEST_ADMIN_KEY.to_string()),
        sync_settings: test_settings(),
    }
}

/// Router over a fresh database with healthy mock providers
pub async fn build_test_router() -> (Router, DatabaseConnection) {
    let db = setup_test_db().await.expect("Failed to set up test DB");
    let state = build_state(
        db.clone(),
        MockProvider::new("primary", false, 30),
        MockProvider::new("secondary", true, 30),
        Arc::new(CountingSource),
    );
    (handlers::router(state), db)
}

pub async fn send(app: &Router, request: Request<Body>) -> (axum::http::StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
