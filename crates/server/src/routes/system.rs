use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use common::types::{Health, SERVICE_NAME};
use serde_json::{json, Value};
use tracing::error;

use crate::{metrics, state::AppState};

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses(
        (status = 200, description = "Service and store are up", body = crate::openapi::HealthResponse),
        (status = 500, description = "Store unreachable")
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Health>) {
    match state.comics.health().await {
        Ok(total) => (
            StatusCode::OK,
            Json(Health::healthy(&state.environment, state.comics.backend(), total)),
        ),
        Err(e) => {
            error!(event = "health_check_failed", error = %e, "store health check failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Health::unhealthy(e.to_string())))
        }
    }
}

/// Static description of the API.
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": SERVICE_NAME,
        "environment": &*state.environment,
        "database": state.comics.backend(),
        "endpoints": {
            "health": "/health",
            "comics": {
                "getAll": "GET /comics",
                "create": "POST /comics",
                "getById": "GET /comics/:id",
                "update": "PUT /comics/:id",
                "delete": "DELETE /comics/:id"
            }
        }
    }))
}

pub async fn metrics() -> impl IntoResponse {
    metrics::encode_metrics()
}
