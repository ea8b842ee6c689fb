use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lottery_backend::config::AppConfig;
use lottery_backend::services::lottery_sync;
use lottery_backend::AppState;

/// One sync pass over the configured games; meant to be run from cron.
///
/// Usage: sync_lottery [code ...]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,lottery_backend=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Codes on the command line override SYNC_LOTTERY_CODES
    let args: Vec<String> = env::args().skip(1).map(|a| a.to_lowercase()).collect();
    let codes = if args.is_empty() {
        config.sync_lottery_codes.clone()
    } else {
        args
    };

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;
    migration::Migrator::up(&db, None).await?;

    let state = AppState::from_config(db, &config)?;

    tracing::info!("Starting lottery sync for {:?}", codes);
    let outcomes =
        lottery_sync::sync_enabled_lotteries(&state.db, &state.fetcher, &codes, &state.sync_settings).await;

    let failed: Vec<&str> = outcomes
        .iter()
        .filter(|o| o.error.is_some())
        .map(|o| o.lottery_code.as_str())
        .collect();

    for outcome in &outcomes {
        if let Some(report) = &outcome.report {
            tracing::info!(
                "[{}] {:?}: fetched {}, inserted {}, backfilled {}, history complete: {}",
                outcome.lottery_code,
                report.mode,
                report.fetched,
                report.stored.inserted,
                report.stored.backfilled,
                report.history_complete
            );
        }
    }

    if failed.is_empty() {
        tracing::info!("Lottery sync finished");
        Ok(())
    } else {
        tracing::error!("Lottery sync failed for {:?}", failed);
        Err(format!("sync failed for {}", failed.join(", ")).into())
    }
}
