// src/api/http/router.rs
// HTTP router composition

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{
    handlers::health_handler,
    tutor::{ask_handler, history_handler},
};
use crate::state::AppState;

pub fn http_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ask", post(ask_handler))
        .route("/history", get(history_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
