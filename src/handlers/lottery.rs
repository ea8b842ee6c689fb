//! Lottery catalogue and draw history handlers

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::{info, warn};

use crate::handlers::{bad_request, database_error, ApiError};
use crate::models::lottery::{
    DrawEntry, HistoryQuery, HistoryResponse, LatestQuery, LatestResponse, LotteryTypeEntry,
    LotteryTypesResponse, Pagination,
};
use crate::services::draw_store::{self, DrawQuery};
use crate::AppState;

/// GET /api/lottery/types
pub async fn get_lottery_types(
    State(state): State<AppState>,
) -> Result<Json<LotteryTypesResponse>, ApiError> {
    let types = draw_store::list_active_types(&state.db)
        .await
        .map_err(database_error)?;

    Ok(Json(LotteryTypesResponse {
        success: true,
        data: types.into_iter().map(LotteryTypeEntry::from).collect(),
    }))
}

/// Draw history for one game
///
/// GET /api/lottery/history?code=dlt&limit=10&offset=0
/// GET /api/lottery/history?code=dlt&issue=26008
/// GET /api/lottery/history?code=dlt&startDate=2026-01-01&endDate=2026-01-14
///
/// `limit` defaults to 10 and is capped at 100. With `issue` the paging
/// parameters are ignored and the total is 0 or 1.
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let query = query.validate().map_err(|e| {
        warn!(error = %e, "Invalid history query");
        bad_request(e)
    })?;

    info!(
        lottery_code = %query.code,
        limit = query.limit,
        offset = query.offset,
        "History request received"
    );

    if let Some(issue) = &query.issue {
        let draw = draw_store::find_draw(&state.db, &query.code, issue)
            .await
            .map_err(database_error)?;
        let data: Vec<DrawEntry> = draw.into_iter().map(DrawEntry::from).collect();
        let total = data.len() as u64;

        return Ok(Json(HistoryResponse {
            success: true,
            data,
            pagination: Pagination {
                total,
                limit: query.limit,
                offset: 0,
                has_more: false,
            },
        }));
    }

    let (draws, total) = draw_store::list_draws(
        &state.db,
        &query.code,
        &DrawQuery {
            limit: query.limit,
            offset: query.offset,
            start_date: query.start_date,
            end_date: query.end_date,
        },
    )
    .await
    .map_err(database_error)?;

    let returned = draws.len() as u64;

    Ok(Json(HistoryResponse {
        success: true,
        data: draws.into_iter().map(DrawEntry::from).collect(),
        pagination: Pagination {
            total,
            limit: query.limit,
            offset: query.offset,
            has_more: query.offset + returned < total,
        },
    }))
}

/// GET /api/lottery/latest?code=dlt
pub async fn get_latest(
    State(state): State<AppState>,
    Query(query): Query<LatestQuery>,
) -> Result<Json<LatestResponse>, ApiError> {
    let code = query
        .code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| bad_request("code is required"))?
        .to_lowercase();

    let latest = draw_store::latest_draw(&state.db, &code)
        .await
        .map_err(database_error)?;

    let response = match latest {
        Some(draw) => LatestResponse {
            success: true,
            data: Some(DrawEntry::from(draw)),
            message: None,
        },
        None => LatestResponse {
            success: true,
            data: None,
            message: Some("No draw data yet".to_string()),
        },
    };

    Ok(Json(response))
}
