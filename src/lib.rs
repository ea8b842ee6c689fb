// src/lib.rs

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use config::AppConfig;
use services::aa1_provider::Aa1Provider;
use services::huiniao_provider::HuiniaoProvider;
use services::lottery_api::{build_http_client, DrawFetcher, ProviderError};
use services::lottery_sync::SyncSettings;
use services::random_org::{RandomOrgService, RandomSource};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub fetcher: DrawFetcher,
    pub random: Arc<dyn RandomSource>,
    pub admin_api_key: Option<String>,
    pub sync_settings: SyncSettings,
}

impl AppState {
    /// Wire the outbound clients described by `config`
    pub fn from_config(db: DatabaseConnection, config: &AppConfig) -> Result<Self, ProviderError> {
        let client = build_http_client(config.provider_timeout)?;

        let fetcher = DrawFetcher::new(
            Arc::new(Aa1Provider::new(client.clone(), config.aa1_api_url.clone())),
            Arc::new(HuiniaoProvider::new(client.clone(), config.huiniao_api_url.clone())),
        );
        let random = Arc::new(RandomOrgService::new(client, config.random_org_url.clone()));

        Ok(Self {
            db,
            fetcher,
            random,
            admin_api_key: config.admin_api_key.clone(),
            sync_settings: config.sync.clone(),
        })
    }
}

pub mod config;

pub mod entities {
    pub mod prelude;
    pub mod lottery_draws;
    pub mod lottery_types;
    pub mod sync_status;
}

pub mod services {
    pub mod draw_parser;
    pub mod ticket;
    pub mod prize_rules;
    pub mod batch_simulator;
    pub mod ticket_checker;
    pub mod lottery_api;
    pub mod aa1_provider;
    pub mod huiniao_provider;
    pub mod draw_store;
    pub mod sync_status;
    pub mod lottery_sync;
    pub mod random_org;
    pub mod number_generator;
}

pub mod models;
pub mod handlers;
