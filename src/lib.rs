pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod handlers;
pub mod models;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/metadata",
            post(handlers::metadata::post_metadata)
                .get(handlers::metadata::get_metadata)
                .options(handlers::metadata::preflight),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
