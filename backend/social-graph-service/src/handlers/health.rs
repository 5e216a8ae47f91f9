use actix_web::{web, HttpResponse};
use serde_json::json;

use super::AppState;

/// Liveness probe
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "social-graph-service",
    }))
}

/// Readiness probe; checks the storage backend
pub async fn ready(state: web::Data<AppState>) -> HttpResponse {
    match state.repo.health_check().await {
        Ok(()) => HttpResponse::Ok().json(json!({ "status": "ready" })),
        Err(err) => {
            tracing::warn!(error = %err, "Readiness check failed");
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unavailable",
                "error": err.to_string(),
            }))
        }
    }
}
