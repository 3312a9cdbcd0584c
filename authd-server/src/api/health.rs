use crate::openapi::HEALTH_TAG;
use crate::state::AppState;
use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Overall status
    pub status: String,
}

/// Liveness probe
///
/// The registry and signing keys live in process memory, so a responding
/// server is a healthy server.
#[utoipa::path(
    get,
    path = "/healthy",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Server is healthy", body = HealthResponse)
    )
)]
pub(crate) async fn healthy() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Creates the health route
pub fn router() -> Router<AppState> {
    Router::new().route("/healthy", get(healthy))
}
