pub mod handlers;

pub use handlers::{health_check, match_line, parse_order, ApiState};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Routes for the order parsing and matching endpoints.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/orders/parse", post(parse_order))
        .route("/api/match", post(match_line))
        .with_state(state)
}
