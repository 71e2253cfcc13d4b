use axum::{response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;

/// Liveness probe. No dependencies are consulted.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "recipe-service",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
