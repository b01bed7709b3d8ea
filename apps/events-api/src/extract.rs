//! Request extractors for authentication and JSON bodies

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
    Json,
};
use event_auth::extract_bearer_token;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::state::AppState;

/// The caller proven by a valid bearer token
///
/// Listing this as a handler argument makes the route protected: the request
/// is rejected with 401 before any other extractor or ownership check runs.
/// Put it first so that it also precedes body parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let token = extract_bearer_token(header)
            .ok_or_else(|| ApiError::Unauthorized("Not authorized".to_string()))?;

        let claims = state.tokens.verify(token).map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            ApiError::from(e)
        })?;

        Ok(Self { id: claims.sub })
    }
}

/// `Json<T>` whose rejection renders as an `ApiError::BadRequest` body
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
            })?;

        Ok(Self(value))
    }
}
