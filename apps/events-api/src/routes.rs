//! Route table

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, events, users};
use crate::state::AppState;

/// Build the full application router
///
/// Protected handlers take an `AuthUser` argument; there is no separate
/// authenticated sub-router.
pub fn router(state: Arc<AppState>) -> Router {
    // CORS configuration for web clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::welcome))
        .route("/health", get(handlers::health))
        // Events
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        // Registrations
        .route("/events/:id/register", post(events::register_for_event))
        .route("/events/:id/unregister", delete(events::unregister_from_event))
        .route("/events/:id/registrations", get(events::list_registrations))
        // Accounts
        .route("/signup", post(users::signup))
        .route("/login", post(users::login))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
