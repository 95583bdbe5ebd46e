//! Health check handlers.

use axum::extract::State;
use axum::Json;

use nusastay_database::connection;

use crate::dto::response::{ApiResponse, DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health_check() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// GET /api/health/detailed
pub async fn detailed_health(
    State(state): State<AppState>,
) -> Json<ApiResponse<DetailedHealthResponse>> {
    let database_ok = connection::health_check(&state.db_pool).await.is_ok();

    Json(ApiResponse::ok(DetailedHealthResponse {
        status: if database_ok { "ok" } else { "degraded" }.to_string(),
        database: if database_ok {
            "connected"
        } else {
            "unreachable"
        }
        .to_string(),
    }))
}
