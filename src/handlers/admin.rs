//! Admin sync handlers
//!
//! Protected by a static API key in the `x-api-key` header.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header::HeaderMap, StatusCode},
    Json,
};
use tracing::{error, info, warn};

use crate::handlers::{bad_request, database_error, invalid_body, provider_error, ApiError};
use crate::models::lottery::DEFAULT_LOTTERY_CODE;
use crate::models::sync::{
    CursorEntry, SyncAction, SyncActionResponse, SyncRequest, SyncStatusQuery, SyncStatusResponse,
};
use crate::models::ErrorResponse;
use crate::services::lottery_api::ProviderError;
use crate::services::{draw_store, lottery_sync, sync_status};
use crate::AppState;

const DEFAULT_SYNC_LIMIT: u32 = 50;
const MAX_SYNC_LIMIT: u32 = 100;

fn check_admin_auth(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let admin_key = state.admin_api_key.as_deref().ok_or_else(|| {
        error!("ADMIN_API_KEY not configured");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Server configuration error", "CONFIG_ERROR")),
        )
    })?;

    let provided_key = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if provided_key != admin_key {
        warn!("Invalid or missing API key");
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Invalid or missing API key", "UNAUTHORIZED")),
        ));
    }

    Ok(())
}

/// Resolve the requested game, rejecting codes missing from the catalogue
async fn resolve_code(state: &AppState, code: Option<&str>) -> Result<String, ApiError> {
    let code = code
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_LOTTERY_CODE)
        .to_lowercase();

    match draw_store::find_type(&state.db, &code).await.map_err(database_error)? {
        Some(_) => Ok(code),
        None => Err(bad_request(format!("Unknown lottery code '{}'", code))),
    }
}

fn sync_error(e: Box<dyn std::error::Error + Send + Sync>) -> ApiError {
    if let Some(provider) = e.downcast_ref::<ProviderError>() {
        return provider_error(provider);
    }
    error!("Sync failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(e.to_string(), "SYNC_ERROR")),
    )
}

/// GET /api/admin/sync/status?code=dlt
pub async fn get_sync_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SyncStatusQuery>,
) -> Result<Json<SyncStatusResponse>, ApiError> {
    check_admin_auth(&state, &headers)?;
    let code = resolve_code(&state, query.code.as_deref()).await?;

    let cursor = sync_status::get_cursor(&state.db, &code)
        .await
        .map_err(database_error)?;
    let record_count = draw_store::count_draws(&state.db, &code)
        .await
        .map_err(database_error)?;

    Ok(Json(SyncStatusResponse {
        success: true,
        sync_status: cursor.map(CursorEntry::from),
        record_count,
    }))
}

/// POST /api/admin/sync
///
/// ```json
/// { "action": "sync", "code": "dlt", "page": 1, "limit": 50 }
/// ```
///
/// - `sync` stores one page
/// - `run` performs one scheduled sync step (history or incremental)
/// - `reset` clears the history-complete flag without deleting draws
pub async fn post_sync(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<SyncRequest>, JsonRejection>,
) -> Result<Json<SyncActionResponse>, ApiError> {
    check_admin_auth(&state, &headers)?;
    let Json(request) = body.map_err(invalid_body)?;
    let code = resolve_code(&state, request.code.as_deref()).await?;

    info!(lottery_code = %code, action = ?request.action, "Admin sync request");

    match request.action {
        SyncAction::Sync => {
            let page = request.page.unwrap_or(1).max(1);
            let limit = request
                .limit
                .unwrap_or(DEFAULT_SYNC_LIMIT)
                .clamp(1, MAX_SYNC_LIMIT);

            let report = lottery_sync::sync_page(&state.db, &state.fetcher, &code, page, limit)
                .await
                .map_err(sync_error)?;

            let message = if report.fetched == 0 {
                "No more data".to_string()
            } else {
                format!("Synced page {}: {} draws written", page, report.stored.written())
            };

            Ok(Json(SyncActionResponse {
                success: true,
                message,
                report: Some(report),
            }))
        }
        SyncAction::Run => {
            let report = lottery_sync::sync_lottery(&state.db, &state.fetcher, &code, &state.sync_settings)
                .await
                .map_err(sync_error)?;

            Ok(Json(SyncActionResponse {
                success: true,
                message: "Sync completed".to_string(),
                report: Some(report),
            }))
        }
        SyncAction::Reset => {
            let existed = sync_status::reset_history(&state.db, &code)
                .await
                .map_err(database_error)?;

            let message = if existed {
                "Sync status reset"
            } else {
                "No sync status to reset"
            };

            Ok(Json(SyncActionResponse {
                success: true,
                message: message.to_string(),
                report: None,
            }))
        }
    }
}
