use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::json;

use crate::{errors::Result, handlers::AppState};

pub async fn liveness() -> Result<Json<serde_json::Value>> {
    Ok(Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let (status, store_status) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(e) => {
            tracing::warn!(error = %e, "store readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
    };

    let overall_status = if status == StatusCode::OK { "ready" } else { "not_ready" };

    (
        status,
        Json(json!({
            "status": overall_status,
            "checks": {
                "store": store_status
            },
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}
