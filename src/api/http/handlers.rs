// src/api/http/handlers.rs

use axum::{response::IntoResponse, Json};
use serde_json::json;

pub const SERVICE_NAME: &str = "MBBS Tutor Assistant with Memory";

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "ok": true,
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
