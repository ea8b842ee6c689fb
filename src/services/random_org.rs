//! random.org integer generator client
//!
//! Numbers come from atmospheric noise via the plain-text integers
//! endpoint, one value per line.

use async_trait::async_trait;
use reqwest::Client;

pub const DEFAULT_RANDOM_ORG_URL: &str = "https://www.random.org/integers/";

/// Largest value random.org accepts for `max`
pub const MAX_RANDOM_VALUE: i64 = 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RandomApiError {
    InvalidRequest(String),
    HttpStatus(u16),
    /// random.org answered with an "Error: ..." body
    Service(String),
    WrongCount { expected: usize, actual: usize },
    OutOfRange { value: i64, min: i64, max: i64 },
    Network(String),
}

impl std::fmt::Display for RandomApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RandomApiError::InvalidRequest(msg) => write!(f, "Invalid random request: {}", msg),
            RandomApiError::HttpStatus(status) => write!(f, "random.org request failed with status {}", status),
            RandomApiError::Service(msg) => write!(f, "random.org error: {}", msg),
            RandomApiError::WrongCount { expected, actual } => write!(
                f,
                "random.org returned {} numbers, expected {}",
                actual, expected
            ),
            RandomApiError::OutOfRange { value, min, max } => write!(
                f,
                "random.org returned {} outside [{}, {}]",
                value, min, max
            ),
            RandomApiError::Network(msg) => write!(f, "Network error: {}", msg),
        }
    }
}

impl std::error::Error for RandomApiError {}

impl From<reqwest::Error> for RandomApiError {
    fn from(e: reqwest::Error) -> Self {
        RandomApiError::Network(e.to_string())
    }
}

/// Source of true-random integers
#[async_trait]
pub trait RandomSource: Send + Sync {
    /// Exactly `count` integers in `[min, max]`, or an error
    async fn fetch_integers(&self, count: usize, min: i64, max: i64) -> Result<Vec<i64>, RandomApiError>;
}

#[derive(Clone)]
pub struct RandomOrgService {
    client: Client,
    base_url: String,
}

impl RandomOrgService {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl RandomSource for RandomOrgService {
    async fn fetch_integers(&self, count: usize, min: i64, max: i64) -> Result<Vec<i64>, RandomApiError> {
        if count == 0 {
            return Err(RandomApiError::InvalidRequest("count must be at least 1".to_string()));
        }
        if min > max {
            return Err(RandomApiError::InvalidRequest(format!("min {} is greater than max {}", min, max)));
        }

        tracing::debug!("[RandomOrg] Requesting {} integers in [{}, {}]", count, min, max);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("num", count.to_string()),
                ("min", min.to_string()),
                ("max", max.to_string()),
                ("col", "1".to_string()),
                ("base", "10".to_string()),
                ("format", "plain".to_string()),
                ("rnd", "new".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            tracing::warn!("[RandomOrg] HTTP {}", status);
            return Err(RandomApiError::HttpStatus(status));
        }

        let body = response.text().await?;
        parse_plain_integers(&body, count, min, max)
    }
}

/// Parse a plain-text body, one integer per line
pub fn parse_plain_integers(body: &str, count: usize, min: i64, max: i64) -> Result<Vec<i64>, RandomApiError> {
    if body.contains("Error:") {
        return Err(RandomApiError::Service(body.trim().to_string()));
    }

    let numbers: Vec<i64> = body
        .lines()
        .filter_map(|line| line.trim().parse::<i64>().ok())
        .collect();

    if numbers.len() != count {
        return Err(RandomApiError::WrongCount {
            expected: count,
            actual: numbers.len(),
        });
    }

    if let Some(&value) = numbers.iter().find(|&&n| n < min || n > max) {
        return Err(RandomApiError::OutOfRange { value, min, max });
    }

    Ok(numbers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_integers() {
        assert_eq!(parse_plain_integers("3\n17\n35\n", 3, 1, 35), Ok(vec![3, 17, 35]));
    }

    #[test]
    fn test_short_response_is_an_error() {
        assert_eq!(
            parse_plain_integers("3\n17\n", 3, 1, 35),
            Err(RandomApiError::WrongCount { expected: 3, actual: 2 })
        );
    }

    #[test]
    fn test_service_error_body() {
        let result = parse_plain_integers("Error: You have used your quota of random bits for today.", 1, 0, 1);
        assert!(matches!(result, Err(RandomApiError::Service(_))));
    }

    #[test]
    fn test_out_of_range_value() {
        assert_eq!(
            parse_plain_integers("0\n36\n", 2, 1, 35),
            Err(RandomApiError::OutOfRange { value: 0, min: 1, max: 35 })
        );
    }
}
