pub mod admin;
pub mod check;
pub mod lottery;
pub mod random;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::models::ErrorResponse;
use crate::AppState;

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/lottery/types", get(lottery::get_lottery_types))
        .route("/api/lottery/history", get(lottery::get_history))
        .route("/api/lottery/latest", get(lottery::get_latest))
        .route("/api/lottery/check", post(check::check_ticket))
        .route("/api/lottery/batch-check", post(check::batch_check))
        .route("/api/random/lottery", post(random::generate_lottery_numbers))
        .route("/api/random/coin", post(random::flip_coin))
        .route("/api/random/dice", post(random::roll_dice))
        .route("/api/random/integer", get(random::random_integer))
        .route("/api/admin/sync/status", get(admin::get_sync_status))
        .route("/api/admin/sync", post(admin::post_sync))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub(crate) fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(message, "VALIDATION_ERROR")),
    )
}

/// Malformed or mistyped JSON bodies are validation errors too
pub(crate) fn invalid_body(rejection: JsonRejection) -> ApiError {
    tracing::warn!("Rejected request body: {}", rejection.body_text());
    bad_request(format!("Invalid request body: {}", rejection.body_text()))
}

pub(crate) fn database_error(e: sea_orm::DbErr) -> ApiError {
    tracing::error!("Database error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Database error", "DATABASE_ERROR")),
    )
}

pub(crate) fn provider_error(e: impl std::fmt::Display) -> ApiError {
    tracing::error!("Upstream provider error: {}", e);
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorResponse::new(e.to_string(), "PROVIDER_ERROR")),
    )
}
