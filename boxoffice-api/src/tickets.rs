use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use boxoffice_core::CoreError;
use boxoffice_ticket::lifecycle::ValidationOutcome;
use boxoffice_ticket::models::{Ticket, TicketStatus};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tickets/book", post(book_ticket))
        .route("/tickets/user/{user_id}", get(list_user_tickets))
        .route("/tickets/return", post(return_ticket))
        .route("/tickets/transfer", post(transfer_ticket))
        .route("/tickets/validate", post(validate_ticket))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookRequest {
    user_id: Uuid,
    event_id: Uuid,
    seat_id: Uuid,
}

async fn book_ticket(
    State(state): State<AppState>,
    Json(req): Json<BookRequest>,
) -> Result<(StatusCode, Json<Ticket>), AppError> {
    let user = state.users.get(req.user_id).await?;
    let ticket = state.issuer.book(&user, req.event_id, req.seat_id).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// Wallet view: the holder's tickets minus returned/cancelled ones. Used and
/// transferred tickets stay visible as history.
async fn list_user_tickets(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Ticket>>, AppError> {
    let mut tickets = state.tickets.list_for_user(user_id).await?;
    tickets.retain(|t| t.status != TicketStatus::Invalid);
    tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(tickets))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReturnRequest {
    ticket_id: Uuid,
    user_id: Uuid,
}

async fn return_ticket(
    State(state): State<AppState>,
    Json(req): Json<ReturnRequest>,
) -> Result<Json<Value>, AppError> {
    let refund = state
        .lifecycle
        .return_ticket(req.ticket_id, req.user_id)
        .await
        .map_err(not_returnable)?;
    Ok(Json(json!({ "refund": refund })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransferRequest {
    ticket_id: Uuid,
    user_id: Uuid,
    target_email: String,
}

async fn transfer_ticket(
    State(state): State<AppState>,
    Json(req): Json<TransferRequest>,
) -> Result<Json<Value>, AppError> {
    let ticket = state
        .lifecycle
        .transfer(req.ticket_id, req.user_id, &req.target_email)
        .await
        .map_err(not_returnable)?;
    Ok(Json(json!({ "targetEmail": ticket.transferred_to_email })))
}

/// Returns and transfers on a non-valid ticket are caller mistakes, not
/// booking races: report them as bad requests instead of conflicts.
fn not_returnable(err: CoreError) -> AppError {
    match err {
        CoreError::ConflictError(msg) => AppError::ValidationError(msg),
        other => other.into(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidateRequest {
    scan_id: String,
    enforcer_id: Uuid,
}

/// Always 200 for a well-formed scan: "not found" and "already used" are
/// business outcomes, not protocol errors.
async fn validate_ticket(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> Result<Json<ValidationOutcome>, AppError> {
    let enforcer = state.users.get(req.enforcer_id).await.map_err(|_| {
        AppError::AuthorizationError("Ticket validation requires enforcer access".to_string())
    })?;
    if !enforcer.can_validate_tickets() {
        return Err(AppError::AuthorizationError(
            "Ticket validation requires enforcer access".to_string(),
        ));
    }

    let outcome = state.lifecycle.validate(&req.scan_id, enforcer.id).await?;
    Ok(Json(outcome))
}
