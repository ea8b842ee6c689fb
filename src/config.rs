//! Runtime configuration from environment variables (and `.env`)

use std::env;
use std::time::Duration;

use crate::services::aa1_provider::DEFAULT_AA1_API_URL;
use crate::services::huiniao_provider::DEFAULT_HUINIAO_API_URL;
use crate::services::lottery_sync::SyncSettings;
use crate::services::random_org::DEFAULT_RANDOM_ORG_URL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has an invalid value: '{}'", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    /// Admin endpoints answer 500 CONFIG_ERROR while this is unset
    pub admin_api_key: Option<String>,
    pub aa1_api_url: String,
    pub huiniao_api_url: String,
    pub random_org_url: String,
    pub provider_timeout: Duration,
    pub sync: SyncSettings,
    /// Games synced by the cron binary
    pub sync_lottery_codes: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let defaults = SyncSettings::default();

        Ok(Self {
            database_url,
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:3000"),
            admin_api_key: env::var("ADMIN_API_KEY").ok().filter(|k| !k.is_empty()),
            aa1_api_url: var_or("AA1_API_URL", DEFAULT_AA1_API_URL),
            huiniao_api_url: var_or("HUINIAO_API_URL", DEFAULT_HUINIAO_API_URL),
            random_org_url: var_or("RANDOM_ORG_URL", DEFAULT_RANDOM_ORG_URL),
            provider_timeout: Duration::from_secs(parse_var("PROVIDER_TIMEOUT_SECS", 15)?),
            sync: SyncSettings {
                page_size: parse_var("SYNC_PAGE_SIZE", defaults.page_size)?,
                max_pages: parse_var("SYNC_MAX_PAGES", defaults.max_pages)?,
                incremental_limit: parse_var("SYNC_INCREMENTAL_LIMIT", defaults.incremental_limit)?,
                page_delay: Duration::from_millis(parse_var("SYNC_PAGE_DELAY_MS", 300)?),
            },
            sync_lottery_codes: parse_codes(&var_or("SYNC_LOTTERY_CODES", "dlt")),
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        _ => Ok(default),
    }
}

fn parse_codes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|code| code.trim().to_lowercase())
        .filter(|code| !code.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes() {
        assert_eq!(parse_codes("dlt, SSQ,,pl3 "), vec!["dlt", "ssq", "pl3"]);
        assert!(parse_codes(" ").is_empty());
    }
}
