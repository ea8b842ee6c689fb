//! Lottery draw providers and fetch orchestration
//!
//! Two third-party APIs serve draw results. The primary one answers fast
//! but only returns a recent window; the secondary one is slower but
//! paginates deep into history. `DrawFetcher` decides which to ask and
//! never continues one provider's pagination on another.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// A draw normalised from any provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawRecord {
    pub lottery_code: String,
    pub issue: String,
    pub draw_date: NaiveDate,
    /// Exact draw time when the provider reports one
    pub draw_time: Option<NaiveDateTime>,
    /// Comma-joined, e.g. "19,21,29,32,33"
    pub main_numbers: String,
    pub extra_numbers: Option<String>,
    /// Cents
    pub prize_pool: Option<i64>,
    /// Cents
    pub total_sales: Option<i64>,
    pub raw_data: Option<serde_json::Value>,
}

/// One page of draws, newest first
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub draws: Vec<DrawRecord>,
    /// Fewer rows than requested means the provider ran out
    pub has_more: bool,
    pub total_count: Option<u64>,
    pub source: &'static str,
}

impl PageResult {
    pub fn new(draws: Vec<DrawRecord>, limit: u32, total_count: Option<u64>, source: &'static str) -> Self {
        let has_more = draws.len() >= limit as usize;
        Self {
            draws,
            has_more,
            total_count,
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    Timeout(String),
    HttpStatus { status: u16, body: String },
    Transport(String),
    Malformed(String),
    /// The provider answered but reported a failure
    Api(String),
    UnsupportedLottery(String),
    PaginationUnsupported,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::Timeout(msg) => write!(f, "Provider timeout: {}", msg),
            ProviderError::HttpStatus { status, body } => {
                write!(f, "Provider HTTP error {}: {}", status, body)
            }
            ProviderError::Transport(msg) => write!(f, "Provider transport error: {}", msg),
            ProviderError::Malformed(msg) => write!(f, "Malformed provider payload: {}", msg),
            ProviderError::Api(msg) => write!(f, "Provider reported error: {}", msg),
            ProviderError::UnsupportedLottery(code) => {
                write!(f, "Lottery '{}' is not supported by this provider", code)
            }
            ProviderError::PaginationUnsupported => write!(f, "Provider does not paginate"),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout(e.to_string())
        } else if e.is_decode() {
            ProviderError::Malformed(e.to_string())
        } else {
            ProviderError::Transport(e.to_string())
        }
    }
}

/// Shared HTTP client with the per-call timeout applied
pub fn build_http_client(timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Transport(e.to_string()))
}

#[async_trait]
pub trait DrawProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether pages beyond the first can be requested
    fn paginated(&self) -> bool;

    /// Fetch one page (1-based) of draws, newest first
    async fn fetch_page(
        &self,
        lottery_code: &str,
        page: u32,
        limit: u32,
    ) -> Result<PageResult, ProviderError>;
}

/// Result of a multi-page history walk
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryBatch {
    pub draws: Vec<DrawRecord>,
    pub pages_fetched: u32,
    /// The last page came back short, so there is nothing older
    pub exhausted: bool,
    /// Set when a later page failed; earlier pages are kept
    pub partial_error: Option<ProviderError>,
    pub source: &'static str,
}

#[derive(Clone)]
pub struct DrawFetcher {
    providers: Vec<Arc<dyn DrawProvider>>,
}

impl DrawFetcher {
    pub fn new(primary: Arc<dyn DrawProvider>, fallback: Arc<dyn DrawProvider>) -> Self {
        Self {
            providers: vec![primary, fallback],
        }
    }

    /// Fetch a page, trying providers in order
    ///
    /// Page 1 goes to every provider until one returns rows. Later pages
    /// only go to paginated providers. An empty answer is "no data", not an
    /// error; the error is returned only when every provider failed.
    pub async fn fetch_page(
        &self,
        lottery_code: &str,
        page: u32,
        limit: u32,
    ) -> Result<PageResult, ProviderError> {
        let mut last_error = None;
        let mut empty_result = None;

        for provider in &self.providers {
            if page > 1 && !provider.paginated() {
                continue;
            }

            match provider.fetch_page(lottery_code, page, limit).await {
                Ok(result) if !result.draws.is_empty() => {
                    tracing::debug!(
                        provider = provider.name(),
                        lottery_code = %lottery_code,
                        page,
                        "Fetched {} draws",
                        result.draws.len()
                    );
                    return Ok(result);
                }
                Ok(result) => {
                    tracing::info!(
                        provider = provider.name(),
                        lottery_code = %lottery_code,
                        page,
                        "Provider returned no draws, trying next"
                    );
                    empty_result = Some(result);
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        lottery_code = %lottery_code,
                        page,
                        "Provider failed: {}",
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        match (empty_result, last_error) {
            (Some(result), _) => Ok(result),
            (None, Some(e)) => Err(e),
            (None, None) => Err(ProviderError::PaginationUnsupported),
        }
    }

    pub async fn fetch_latest(&self, lottery_code: &str) -> Result<Option<DrawRecord>, ProviderError> {
        let result = self.fetch_page(lottery_code, 1, 1).await?;
        Ok(result.draws.into_iter().next())
    }

    /// Walk history pages on a single paginated provider
    ///
    /// Stops after `max_pages`, or when a page comes back shorter than
    /// `page_size`. Sleeps `delay` between pages. If the first page fails
    /// the next paginated provider is tried from scratch; a failure after
    /// that keeps what was fetched and records the error.
    pub async fn fetch_history(
        &self,
        lottery_code: &str,
        start_page: u32,
        max_pages: u32,
        page_size: u32,
        delay: Duration,
    ) -> Result<HistoryBatch, ProviderError> {
        let mut last_error = ProviderError::PaginationUnsupported;

        for provider in self.providers.iter().filter(|p| p.paginated()) {
            match walk_pages(provider.as_ref(), lottery_code, start_page, max_pages, page_size, delay)
                .await
            {
                Ok(batch) => return Ok(batch),
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        lottery_code = %lottery_code,
                        "History fetch failed on first page: {}",
                        e
                    );
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}

async fn walk_pages(
    provider: &dyn DrawProvider,
    lottery_code: &str,
    start_page: u32,
    max_pages: u32,
    page_size: u32,
    delay: Duration,
) -> Result<HistoryBatch, ProviderError> {
    let mut batch = HistoryBatch {
        draws: Vec::new(),
        pages_fetched: 0,
        exhausted: false,
        partial_error: None,
        source: provider.name(),
    };

    let start_page = start_page.max(1);
    for page in start_page..start_page.saturating_add(max_pages) {
        if page > start_page && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match provider.fetch_page(lottery_code, page, page_size).await {
            Ok(result) => {
                batch.pages_fetched += 1;
                let fetched = result.draws.len();
                batch.draws.extend(result.draws);

                tracing::info!(
                    provider = provider.name(),
                    lottery_code = %lottery_code,
                    page,
                    "History page fetched: {} draws (total {})",
                    fetched,
                    batch.draws.len()
                );

                if fetched < page_size as usize {
                    batch.exhausted = true;
                    break;
                }
            }
            Err(e) if batch.pages_fetched == 0 => return Err(e),
            Err(e) => {
                tracing::warn!(
                    provider = provider.name(),
                    lottery_code = %lottery_code,
                    page,
                    "History page failed, keeping {} draws already fetched: {}",
                    batch.draws.len(),
                    e
                );
                batch.partial_error = Some(e);
                break;
            }
        }
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Scripted provider: each call pops the next response
    struct ScriptedProvider {
        name: &'static str,
        paginated: bool,
        responses: Mutex<Vec<Result<usize, ProviderError>>>,
        calls: Mutex<Vec<u32>>,
    }

    impl ScriptedProvider {
        fn new(name: &'static str, paginated: bool, responses: Vec<Result<usize, ProviderError>>) -> Arc<Self> {
            let mut responses = responses;
            responses.reverse();
            Arc::new(Self {
                name,
                paginated,
                responses: Mutex::new(responses),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn pages_requested(&self) -> Vec<u32> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn record(code: &str, issue: u32) -> DrawRecord {
        DrawRecord {
            lottery_code: code.to_string(),
            issue: issue.to_string(),
            draw_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            draw_time: None,
            main_numbers: "1,2,3,4,5".to_string(),
            extra_numbers: Some("1,2".to_string()),
            prize_pool: None,
            total_sales: None,
            raw_data: None,
        }
    }

    #[async_trait]
    impl DrawProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        fn paginated(&self) -> bool {
            self.paginated
        }

        async fn fetch_page(
            &self,
            lottery_code: &str,
            page: u32,
            limit: u32,
        ) -> Result<PageResult, ProviderError> {
            self.calls.lock().unwrap().push(page);
            let next = self
                .responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Ok(0));
            let count = next?;
            let draws = (0..count)
                .map(|i| record(lottery_code, page * 1000 + i as u32))
                .collect();
            Ok(PageResult::new(draws, limit, None, self.name))
        }
    }

    #[tokio::test]
    async fn test_primary_used_when_it_has_rows() {
        let primary = ScriptedProvider::new("primary", false, vec![Ok(5)]);
        let secondary = ScriptedProvider::new("secondary", true, vec![Ok(5)]);
        let fetcher = DrawFetcher::new(primary.clone(), secondary.clone());

        let result = fetcher.fetch_page("dlt", 1, 5).await.unwrap();
        assert_eq!(result.source, "primary");
        assert!(secondary.pages_requested().is_empty());
    }

    #[tokio::test]
    async fn test_falls_back_on_error_and_on_empty() {
        let primary = ScriptedProvider::new(
            "primary",
            false,
            vec![Err(ProviderError::Timeout("15s".to_string())), Ok(0)],
        );
        let secondary = ScriptedProvider::new("secondary", true, vec![Ok(3), Ok(2)]);
        let fetcher = DrawFetcher::new(primary, secondary);

        let first = fetcher.fetch_page("dlt", 1, 20).await.unwrap();
        assert_eq!(first.source, "secondary");
        assert_eq!(first.draws.len(), 3);

        let second = fetcher.fetch_page("dlt", 1, 20).await.unwrap();
        assert_eq!(second.source, "secondary");
        assert!(!second.has_more);
    }

    #[tokio::test]
    async fn test_later_pages_skip_unpaginated_provider() {
        let primary = ScriptedProvider::new("primary", false, vec![Ok(5)]);
        let secondary = ScriptedProvider::new("secondary", true, vec![Ok(5)]);
        let fetcher = DrawFetcher::new(primary.clone(), secondary.clone());

        let result = fetcher.fetch_page("dlt", 3, 5).await.unwrap();
        assert_eq!(result.source, "secondary");
        assert!(primary.pages_requested().is_empty());
        assert_eq!(secondary.pages_requested(), vec![3]);
    }

    #[tokio::test]
    async fn test_all_providers_failing_is_an_error() {
        let primary = ScriptedProvider::new("primary", false, vec![Err(ProviderError::Api("down".into()))]);
        let secondary = ScriptedProvider::new(
            "secondary",
            true,
            vec![Err(ProviderError::HttpStatus { status: 503, body: String::new() })],
        );
        let fetcher = DrawFetcher::new(primary, secondary);

        let err = fetcher.fetch_page("dlt", 1, 20).await.unwrap_err();
        assert!(matches!(err, ProviderError::HttpStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_history_stops_on_short_page() {
        let primary = ScriptedProvider::new("primary", false, vec![]);
        let secondary = ScriptedProvider::new("secondary", true, vec![Ok(10), Ok(10), Ok(4), Ok(10)]);
        let fetcher = DrawFetcher::new(primary.clone(), secondary.clone());

        let batch = fetcher
            .fetch_history("dlt", 1, 10, 10, Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(batch.draws.len(), 24);
        assert_eq!(batch.pages_fetched, 3);
        assert!(batch.exhausted);
        assert!(batch.partial_error.is_none());
        assert_eq!(batch.source, "secondary");
        assert!(primary.pages_requested().is_empty());
    }

    #[tokio::test]
    async fn test_history_respects_page_ceiling() {
        let primary = ScriptedProvider::new("primary", false, vec![]);
        let secondary = ScriptedProvider::new("secondary", true, vec![Ok(10), Ok(10), Ok(10)]);
        let fetcher = DrawFetcher::new(primary, secondary.clone());

        let batch = fetcher
            .fetch_history("dlt", 4, 2, 10, Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(batch.pages_fetched, 2);
        assert!(!batch.exhausted);
        assert_eq!(secondary.pages_requested(), vec![4, 5]);
    }

    #[tokio::test]
    async fn test_history_keeps_pages_before_failure() {
        let primary = ScriptedProvider::new("primary", false, vec![]);
        let secondary = ScriptedProvider::new(
            "secondary",
            true,
            vec![Ok(10), Err(ProviderError::Timeout("15s".to_string()))],
        );
        let fetcher = DrawFetcher::new(primary, secondary);

        let batch = fetcher
            .fetch_history("dlt", 1, 5, 10, Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(batch.draws.len(), 10);
        assert!(!batch.exhausted);
        assert!(matches!(batch.partial_error, Some(ProviderError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_history_first_page_failure_is_an_error() {
        let primary = ScriptedProvider::new("primary", false, vec![]);
        let secondary = ScriptedProvider::new("secondary", true, vec![Err(ProviderError::Malformed("bad".into()))]);
        let fetcher = DrawFetcher::new(primary, secondary);

        let result = fetcher.fetch_history("dlt", 1, 5, 10, Duration::ZERO).await;
        assert!(matches!(result, Err(ProviderError::Malformed(_))));
    }
}
