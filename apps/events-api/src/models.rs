//! Data models for the events API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User row. Never serialized: the password hash stays server side.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
}

/// Event stored in database and returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub location: String,
    pub date_time: Option<DateTime<Utc>>,
    /// Owner; the only user allowed to update or delete the event
    pub user_id: i64,
}

/// Validated descriptive fields of an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFields {
    pub name: String,
    pub description: String,
    pub location: String,
    pub date_time: Option<DateTime<Utc>>,
}

/// Validated email/password pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Trimmed and lowercased
    pub email: String,
    pub password: String,
}

/// Body of POST /events and PUT /events/:id
///
/// Every field defaults so that missing values surface as field errors
/// from validation instead of a generic body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventPayload {
    pub name: String,
    pub description: String,
    pub location: String,
    /// RFC 3339 timestamp
    pub date_time: Option<String>,
}

/// Body of POST /signup and POST /login
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsPayload {
    pub email: String,
    pub password: String,
}

/// Generic `{ "message": ... }` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response from POST /signup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    pub message: String,
    pub id: i64,
}

/// Response from POST /login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

/// Response from GET /events/:id/registrations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationsResponse {
    pub event_id: i64,
    pub user_ids: Vec<i64>,
}
