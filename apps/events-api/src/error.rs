//! Error types for the events API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use event_auth::AuthError;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// One rejected request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ApiError::NotFound(what),
            StoreError::Conflict(what) => ApiError::Conflict(what),
            StoreError::Forbidden(_) => {
                ApiError::Forbidden("Only the event owner may do that".to_string())
            }
            StoreError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            StoreError::UnknownUser(id) => {
                tracing::warn!("Valid token for missing user {}", id);
                ApiError::Unauthorized("Not authorized".to_string())
            }
            StoreError::Auth(e) => e.into(),
            StoreError::Database(e) => ApiError::Database(e),
            StoreError::Task(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(_) | AuthError::TokenExpired => {
                ApiError::Unauthorized("Not authorized".to_string())
            }
            other @ (AuthError::Hash(_) | AuthError::Key(_) | AuthError::Encode(_)) => {
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation failed".to_string()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        let body = match self {
            ApiError::Validation(fields) => json!({
                "error": message,
                "status": status.as_u16(),
                "fields": fields,
            }),
            _ => json!({
                "error": message,
                "status": status.as_u16(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_status_codes() {
        let cases = [
            (StoreError::NotFound("Event not found".into()), StatusCode::NOT_FOUND),
            (StoreError::Conflict("Email taken".into()), StatusCode::CONFLICT),
            (StoreError::Forbidden(1), StatusCode::FORBIDDEN),
            (StoreError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (StoreError::UnknownUser(99), StatusCode::UNAUTHORIZED),
            (
                StoreError::Auth(AuthError::Hash("entropy".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn token_failures_are_unauthorized() {
        for err in [AuthError::TokenExpired, AuthError::InvalidToken("bad")] {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }
}
