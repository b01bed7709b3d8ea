//! Event CRUD and registration

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::ApiError;
use crate::extract::{AuthUser, JsonBody};
use crate::models::{Event, EventPayload, MessageResponse, RegistrationsResponse};
use crate::state::AppState;
use crate::store::StoreError;
use crate::validation::{parse_event_id, validate_event};

/// Log refused ownership checks before they become a 403
fn note_forbidden(user: AuthUser, action: &'static str) -> impl FnOnce(StoreError) -> StoreError {
    move |e| {
        if let StoreError::Forbidden(event_id) = e {
            tracing::warn!("User {} may not {} event {}", user.id, action, event_id);
        }
        e
    }
}

/// Handler: GET /events
pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Event>>, ApiError> {
    Ok(Json(state.events.list().await?))
}

/// Handler: GET /events/:id
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    let id = parse_event_id(&id)?;
    Ok(Json(state.events.get(id).await?))
}

/// Handler: POST /events
pub async fn create_event(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<EventPayload>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let fields = validate_event(payload)?;
    let event = state.events.create(user.id, fields).await?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// Handler: PUT /events/:id
pub async fn update_event(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<EventPayload>,
) -> Result<Json<Event>, ApiError> {
    let id = parse_event_id(&id)?;
    let fields = validate_event(payload)?;

    let event = state
        .events
        .update(id, user.id, fields)
        .await
        .map_err(note_forbidden(user, "update"))?;

    Ok(Json(event))
}

/// Handler: DELETE /events/:id
pub async fn delete_event(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_event_id(&id)?;

    state
        .events
        .delete(id, user.id)
        .await
        .map_err(note_forbidden(user, "delete"))?;

    Ok(Json(MessageResponse::new("Event deleted successfully")))
}

/// Handler: POST /events/:id/register
pub async fn register_for_event(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_event_id(&id)?;
    state.events.register(user.id, id).await?;

    Ok(Json(MessageResponse::new(
        "Successfully registered for event",
    )))
}

/// Handler: DELETE /events/:id/unregister
pub async fn unregister_from_event(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_event_id(&id)?;
    state.events.unregister(user.id, id).await?;

    Ok(Json(MessageResponse::new(
        "Successfully unregistered from event",
    )))
}

/// Handler: GET /events/:id/registrations
pub async fn list_registrations(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RegistrationsResponse>, ApiError> {
    let id = parse_event_id(&id)?;
    let user_ids = state.events.registrations_for(id).await?;

    Ok(Json(RegistrationsResponse {
        event_id: id,
        user_ids,
    }))
}
