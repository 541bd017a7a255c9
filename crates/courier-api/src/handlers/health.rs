//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use courier_service::dto::{HealthResponse, ReadinessResponse};

use crate::state::AppState;

/// Liveness probe
///
/// Returns 200 whenever the process is up. No dependency checks.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness probe
///
/// Verifies database and Redis connectivity. Returns 503 when either
/// dependency is unavailable.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let database_ok = state.pool().acquire().await.is_ok();
    let redis_ok = state.redis_pool().health_check().await.is_ok();

    let response = ReadinessResponse::ready(database_ok, redis_ok);
    let status = if database_ok && redis_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
