//! True-random generator handlers backed by random.org

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};

use crate::handlers::{bad_request, invalid_body, provider_error, ApiError};
use crate::models::random::{CountRequest, IntegerQuery, LotteryPickRequest, RandomResponse};
use crate::services::number_generator::{
    self, CoinFlips, DiceRoll, GeneratedNumbers, GenerationError, RandomInteger,
};
use crate::AppState;

fn generation_error(e: GenerationError) -> ApiError {
    match e {
        GenerationError::Source(source) => provider_error(source),
        short @ GenerationError::NotEnoughUnique { .. } => provider_error(short),
        other => bad_request(other.to_string()),
    }
}

/// POST /api/random/lottery
pub async fn generate_lottery_numbers(
    State(state): State<AppState>,
    body: Result<Json<LotteryPickRequest>, JsonRejection>,
) -> Result<Json<RandomResponse<GeneratedNumbers>>, ApiError> {
    let Json(request) = body.map_err(invalid_body)?;
    let kind = request.lottery_kind().map_err(bad_request)?;

    let generated = number_generator::generate_lottery(state.random.as_ref(), kind)
        .await
        .map_err(generation_error)?;

    tracing::info!(id = %generated.id, "Generated {:?} numbers", kind);
    Ok(Json(RandomResponse::ok(generated)))
}

/// POST /api/random/coin
pub async fn flip_coin(
    State(state): State<AppState>,
    body: Result<Json<CountRequest>, JsonRejection>,
) -> Result<Json<RandomResponse<CoinFlips>>, ApiError> {
    let Json(request) = body.map_err(invalid_body)?;
    let flips = number_generator::flip_coins(state.random.as_ref(), request.count)
        .await
        .map_err(generation_error)?;

    Ok(Json(RandomResponse::ok(flips)))
}

/// POST /api/random/dice
pub async fn roll_dice(
    State(state): State<AppState>,
    body: Result<Json<CountRequest>, JsonRejection>,
) -> Result<Json<RandomResponse<DiceRoll>>, ApiError> {
    let Json(request) = body.map_err(invalid_body)?;
    let roll = number_generator::roll_dice(state.random.as_ref(), request.count)
        .await
        .map_err(generation_error)?;

    Ok(Json(RandomResponse::ok(roll)))
}

/// GET /api/random/integer?max=100
pub async fn random_integer(
    State(state): State<AppState>,
    Query(query): Query<IntegerQuery>,
) -> Result<Json<RandomResponse<RandomInteger>>, ApiError> {
    let value = number_generator::random_integer(state.random.as_ref(), query.max)
        .await
        .map_err(generation_error)?;

    Ok(Json(RandomResponse::ok(value)))
}
