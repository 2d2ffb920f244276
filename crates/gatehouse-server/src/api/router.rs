//! API router configuration.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Build the application router with CORS and tracing layers.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/create-user", post(handlers::create_user))
        .route("/sign-in", post(handlers::sign_in))
        .route(
            "/visitors",
            post(handlers::log_entry).get(handlers::list_visitors),
        )
        .route("/visitors/pre-register", post(handlers::pre_register))
        .route("/visitors/:id/decision", post(handlers::decide))
        .route("/visitors/:id/revoke", post(handlers::revoke))
        .route("/visitors/expected/:flat", get(handlers::expected_for_flat))
        .route("/profiles", get(handlers::list_profiles))
        .route("/profiles/:id/flat", post(handlers::assign_flat))
        .route("/events/stream", get(handlers::stream_events))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
