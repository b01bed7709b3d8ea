//! Signup and login

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::models::{CredentialsPayload, LoginResponse, SignupResponse};
use crate::state::AppState;
use crate::store::StoreError;
use crate::validation::{validate_login, validate_signup};

/// Handler: POST /signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<CredentialsPayload>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let creds = validate_signup(payload)?;
    let id = state.users.create(&creds.email, &creds.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully".to_string(),
            id,
        }),
    ))
}

/// Handler: POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<CredentialsPayload>,
) -> Result<Json<LoginResponse>, ApiError> {
    let creds = validate_login(payload)?;

    let user = state
        .users
        .validate_credentials(&creds.email, &creds.password)
        .await
        .map_err(|e| {
            if matches!(e, StoreError::InvalidCredentials) {
                tracing::warn!("Failed login attempt");
            }
            e
        })?;

    let token = state.tokens.issue(user.id, &user.email)?;
    tracing::info!("User {} logged in", user.id);

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
    }))
}
