use crate::state::AppState;
use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

pub(crate) const OAUTH_TAG: &str = "OAuth 2.0";
pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const RESOURCE_TAG: &str = "Protected Resources";

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = OAUTH_TAG, description = "Token issuance and server metadata"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = RESOURCE_TAG, description = "Bearer-authenticated resources"),
    ),
    paths(
        crate::api::token::handlers::token,
        crate::api::metadata::metadata,
        crate::api::health::healthy,
        crate::api::whoami::whoami,
    ),
    info(
        title = "authd API",
        description = "OAuth 2.0 client-credentials authorization server",
        version = "0.1.0"
    )
)]
pub(crate) struct ApiDoc;

/// Handler for the OpenAPI JSON specification endpoint
async fn openapi_json_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Creates a router for the OpenAPI documentation route
pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json_handler))
}
