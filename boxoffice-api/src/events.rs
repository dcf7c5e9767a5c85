use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use boxoffice_catalog::registry::{Event, EventDetail};
use boxoffice_core::identity::Role;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events/{id}", get(get_event))
        .route("/health", get(health))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "storage": "memory" }))
}

async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(state.registry.list_events().await?))
}

#[derive(Debug, Deserialize)]
struct EventQuery {
    user_id: Option<Uuid>,
}

/// Full event detail. With `?user_id=` the seat arrays are filtered down to
/// what that buyer may select; staff accounts always see the full map.
async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<EventQuery>,
) -> Result<Json<EventDetail>, AppError> {
    let detail = state.registry.get_event(id).await?;

    let detail = match query.user_id {
        Some(user_id) => {
            let user = state.users.get(user_id).await?;
            if user.role == Role::Buyer {
                detail.filtered_for(&user.special_accommodations)
            } else {
                detail
            }
        }
        None => detail,
    };

    Ok(Json(detail))
}
