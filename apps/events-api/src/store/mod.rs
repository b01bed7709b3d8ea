//! Database access for users, events and registrations
//!
//! Both stores wrap a clone of the same `SqlitePool`. Uniqueness rules
//! (one account per email, one registration per user and event) are enforced
//! by constraints in the schema, and constraint violations are translated
//! into [`StoreError::Conflict`] here.

mod events;
mod users;

pub use events::EventStore;
pub use users::UserStore;

use event_auth::AuthError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Requester does not own event {0}")]
    Forbidden(i64),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("No user with id {0}")]
    UnknownUser(i64),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Background task failed: {0}")]
    Task(String),
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

/// Run CPU-heavy password work off the async executor
async fn blocking<T, F>(f: F) -> Result<T, StoreError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Task(e.to_string()))
}
