use aether_core::HealthSnapshot;
use axum::Json;
use axum::extract::State;

use super::AppState;

/// `GET /health` -- liveness probe with the resolved feature flags.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    summary = "Health check",
    description = "Always 200 while the process is serving. No authentication required.",
    responses(
        (status = 200, description = "Service is up", body = HealthSnapshot)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthSnapshot> {
    Json(HealthSnapshot::now(state.features))
}
