//! HTTP ingest and operational endpoints.

pub mod error;
pub mod models;
pub mod services;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::decompression::RequestDecompressionLayer;

/// Build the router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/notify", post(services::notify))
        .route("/healthz", get(services::healthz))
        .route("/readyz", get(services::readyz))
        .route("/metrics", get(services::metrics))
        .with_state(state)
        .layer(RequestDecompressionLayer::new())
}
