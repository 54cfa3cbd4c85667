pub mod api;
pub mod config;
pub mod error;
pub mod state;

use axum::{Router, routing::get};
use state::AppState;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health_check))
        .route("/api/document.pdf", get(api::generate_document))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
