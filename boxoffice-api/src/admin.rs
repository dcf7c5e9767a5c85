use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, post},
    Json, Router,
};
use boxoffice_catalog::registry::{Event, NewEvent};
use boxoffice_catalog::seatmap::SeatTemplate;
use boxoffice_core::identity::User;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/events", post(create_event))
        .route("/admin/events/{id}", delete(delete_event))
}

/// The `x-user-id` header stands in for an authenticated principal. Session
/// mechanics live outside this service.
async fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    let user_id = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
        .ok_or_else(|| AppError::AuthorizationError("Admin access required".to_string()))?;

    let user = state
        .users
        .get(user_id)
        .await
        .map_err(|_| AppError::AuthorizationError("Admin access required".to_string()))?;

    if !user.is_admin() {
        return Err(AppError::AuthorizationError("Admin access required".to_string()));
    }
    Ok(user)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateEventRequest {
    #[serde(flatten)]
    fields: NewEvent,
    seat_template: SeatTemplate,
}

async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    require_admin(&state, &headers).await?;
    let event = state.registry.create_event(req.fields, &req.seat_template).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Deleting an event removes the aggregate first, so concurrent bookings
/// fail not-found instead of minting a ticket mid-cascade, then cancels the
/// outstanding valid tickets.
async fn delete_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let admin = require_admin(&state, &headers).await?;

    // 404 with no mutation if the event is unknown.
    state.events.delete(id).await?;

    let cancelled = state.lifecycle.invalidate_for_event(id, admin.id).await?;

    tracing::info!(event_id = %id, cancelled, "Event deleted");
    Ok(Json(json!({ "deleted": true, "cancelledTickets": cancelled })))
}
