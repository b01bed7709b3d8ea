//! HTTP handlers for the events API

pub mod events;
pub mod users;

use axum::Json;
use serde::Serialize;

use crate::models::MessageResponse;

/// Handler: GET /
pub async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to the Events API"))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "events-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}
