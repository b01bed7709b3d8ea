//! Application state for the events API

use anyhow::Result;
use event_auth::TokenIssuer;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::config::Config;
use crate::store::{EventStore, UserStore};

/// Handles injected into every handler through `State<Arc<AppState>>`
pub struct AppState {
    pub users: UserStore,
    pub events: EventStore,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self> {
        let tokens = TokenIssuer::new(config.jwt_secret.as_bytes(), config.token_ttl_secs)?;
        let pool = connect(&config.database_url(), config.max_connections).await?;

        Ok(Self::from_parts(pool, tokens))
    }

    pub fn from_parts(pool: SqlitePool, tokens: TokenIssuer) -> Self {
        Self {
            users: UserStore::new(pool.clone()),
            events: EventStore::new(pool),
            tokens,
        }
    }
}

/// Open the pool and make sure the schema exists
///
/// For `sqlite::memory:` pass `max_connections = 1`: every connection to an
/// in-memory database sees its own empty database.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    tracing::info!("Connecting to database: {}", database_url);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect(database_url)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    tracing::info!("Running database migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            location TEXT NOT NULL DEFAULT '',
            date_time TEXT,
            user_id INTEGER NOT NULL REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS registrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id),
            event_id INTEGER NOT NULL REFERENCES events(id) ON DELETE CASCADE,
            UNIQUE (user_id, event_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_registrations_event ON registrations(event_id)
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Migrations complete");
    Ok(())
}
