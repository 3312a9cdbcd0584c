//! Authorization-server metadata endpoint (RFC 8414)

use crate::api::endpoints::{METADATA_PATH, TOKEN_PATH};
use crate::openapi::OAUTH_TAG;
use crate::registry::GrantType;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// OAuth 2.0 Authorization Server Metadata document
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthorizationServerMetadata {
    /// Issuer identifier
    pub issuer: String,
    /// URL of the token endpoint
    pub token_endpoint: String,
    /// Grant types this server supports
    pub grant_types_supported: Vec<String>,
    /// Client authentication methods supported at the token endpoint
    pub token_endpoint_auth_methods_supported: Vec<String>,
    /// Union of the scopes registered clients may request
    pub scopes_supported: Vec<String>,
}

/// Authorization server metadata (RFC 8414)
///
/// Lets callers discover the token endpoint and the supported grant without
/// prior configuration.
#[utoipa::path(
    get,
    path = "/.well-known/oauth-authorization-server",
    tag = OAUTH_TAG,
    responses(
        (status = 200, description = "Server metadata", body = AuthorizationServerMetadata)
    )
)]
pub(crate) async fn metadata(State(state): State<AppState>) -> Json<AuthorizationServerMetadata> {
    let issuer = state.issuer.issuer().trim_end_matches('/').to_string();
    Json(AuthorizationServerMetadata {
        token_endpoint: format!("{issuer}{TOKEN_PATH}"),
        issuer,
        grant_types_supported: vec![GrantType::ClientCredentials.as_str().to_string()],
        token_endpoint_auth_methods_supported: vec![
            "client_secret_basic".to_string(),
            "client_secret_post".to_string(),
        ],
        scopes_supported: state.advertised_scopes.as_ref().clone(),
    })
}

/// Creates the metadata route
pub fn router() -> Router<AppState> {
    Router::new().route(METADATA_PATH, get(metadata))
}
