//! Ticket check handlers
//!
//! Both endpoints validate every input before touching the corpus, then
//! run the evaluator over up to `MAX_CORPUS_SIZE` stored draws.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{info, warn};

use crate::handlers::{bad_request, database_error, invalid_body, ApiError};
use crate::models::lottery::{
    ticket_from_wire, BatchCheckRequest, BatchCheckResponse, CheckRequest, CheckResponse,
    DEFAULT_LOTTERY_CODE,
};
use crate::services::batch_simulator::simulate_batch;
use crate::services::draw_store::{self, MAX_CORPUS_SIZE};
use crate::services::prize_rules::LotteryKind;
use crate::services::ticket::{validate_batch, Ticket, MAX_BATCH_TICKETS};
use crate::services::ticket_checker;
use crate::AppState;

fn resolve_kind(code: Option<&str>) -> Result<LotteryKind, ApiError> {
    let code = code
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_LOTTERY_CODE);

    LotteryKind::from_code(code).ok_or_else(|| {
        warn!(lottery_code = %code, "Ticket check for unsupported game");
        bad_request(format!("Prize checking is not supported for '{}'", code))
    })
}

/// Check one ticket against every stored draw
///
/// POST /api/lottery/check
///
/// ```json
/// { "code": "dlt", "frontNumbers": [1, 2, 3, 4, 5], "backNumbers": [1, 2] }
/// ```
pub async fn check_ticket(
    State(state): State<AppState>,
    body: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<CheckResponse>, ApiError> {
    let Json(request) = body.map_err(invalid_body)?;
    let kind = resolve_kind(request.code.as_deref())?;

    let ticket = ticket_from_wire(&request.front_numbers, &request.back_numbers).map_err(bad_request)?;
    ticket.validate(kind).map_err(|e| {
        warn!(error = %e, "Invalid ticket");
        bad_request(e.to_string())
    })?;

    let draws = draw_store::load_corpus(&state.db, kind.code(), MAX_CORPUS_SIZE)
        .await
        .map_err(database_error)?;

    if draws.is_empty() {
        info!(lottery_code = kind.code(), "Ticket check with empty draw corpus");
        return Ok(Json(CheckResponse::no_draw_data()));
    }

    let report = ticket_checker::check_ticket(kind, &ticket, &draws);

    info!(
        lottery_code = kind.code(),
        draws = draws.len(),
        highest_level = report.highest_level,
        "Ticket checked"
    );

    Ok(Json(CheckResponse {
        success: true,
        error: None,
        code: None,
        report: Some(report),
    }))
}

/// Simulate a batch of tickets against every stored draw
///
/// POST /api/lottery/batch-check
///
/// ```json
/// { "code": "dlt", "tickets": [{ "front": [1, 2, 3, 4, 5], "back": [1, 2] }] }
/// ```
///
/// At most `MAX_BATCH_TICKETS` tickets per request.
pub async fn batch_check(
    State(state): State<AppState>,
    body: Result<Json<BatchCheckRequest>, JsonRejection>,
) -> Result<Json<BatchCheckResponse>, ApiError> {
    let Json(request) = body.map_err(invalid_body)?;
    let kind = resolve_kind(request.code.as_deref())?;

    if request.tickets.len() > MAX_BATCH_TICKETS {
        return Err(bad_request(format!(
            "At most {} tickets can be checked at once, got {}",
            MAX_BATCH_TICKETS,
            request.tickets.len()
        )));
    }

    let tickets: Vec<Ticket> = request
        .tickets
        .iter()
        .enumerate()
        .map(|(index, t)| {
            ticket_from_wire(&t.front, &t.back)
                .map_err(|e| bad_request(format!("Ticket #{}: {}", index + 1, e)))
        })
        .collect::<Result<_, _>>()?;

    validate_batch(kind, &tickets).map_err(|e| {
        warn!(error = %e, "Invalid ticket batch");
        bad_request(e.to_string())
    })?;

    let draws = draw_store::load_corpus(&state.db, kind.code(), MAX_CORPUS_SIZE)
        .await
        .map_err(database_error)?;

    if draws.is_empty() {
        info!(lottery_code = kind.code(), "Batch check with empty draw corpus");
        return Ok(Json(BatchCheckResponse::no_draw_data()));
    }

    let report = simulate_batch(kind, &tickets, &draws);

    info!(
        lottery_code = kind.code(),
        tickets = tickets.len(),
        draws = draws.len(),
        winning_tickets = report.summary.winning_tickets,
        "Batch checked"
    );

    Ok(Json(BatchCheckResponse {
        success: true,
        error: None,
        code: None,
        report: Some(report),
    }))
}
