pub(crate) mod endpoints;
pub(crate) mod health;
pub(crate) mod metadata;
mod security;
pub(crate) mod token;
pub(crate) mod whoami;

pub(crate) use security::security_middleware;

use crate::errors::ApiError;
use crate::state::AppState;
use axum::response::IntoResponse;
use axum::routing::any;
use axum::Router;

/// Combines all API routes into a single router.
///
/// The split between protocol endpoints and protected resources is not
/// expressed here: every route (and the fallback) sits behind the security
/// middleware installed in `create_app`, which consults the endpoint
/// classifier so that exactly the protocol set skips bearer authentication
/// and the cross-site check.
pub(super) fn router() -> Router<AppState> {
    Router::new()
        .merge(token::router())
        .merge(metadata::router())
        .merge(health::router())
        .merge(whoami::router())
        // Unmatched paths are protected resources too: the boundary runs
        // before this 404 is ever produced.
        .fallback(any(not_found))
}

async fn not_found() -> axum::response::Response {
    ApiError::not_found("no such endpoint").into_response()
}
