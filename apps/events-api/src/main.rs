//! Events API Server
//!
//! Provides REST endpoints for:
//! - Account signup and login (bearer token issue)
//! - Browsing events
//! - Creating, updating and deleting one's own events
//! - Registering for and unregistering from events
//!
//! State lives in a single SQLite database. Uniqueness of emails and of
//! registrations is enforced by the schema.

use std::sync::Arc;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod error;
mod extract;
mod handlers;
mod models;
mod routes;
mod state;
mod store;
mod validation;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::parse();

    // Initialize logging
    let log_level = if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive(log_level.into())
                .add_directive("tower_http=debug".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Initializing Events API...");
    let state = Arc::new(AppState::new(&config).await?);
    let token_ttl = state.tokens.ttl_secs();

    let app = routes::router(state);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Starting Events API on http://{}", addr);
    info!("Token lifetime: {}s", token_ttl);

    axum::serve(listener, app).await?;

    Ok(())
}
