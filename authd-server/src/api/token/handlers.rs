//! Token endpoint handler

use crate::api::token::models::{success_response, OAuthErrorBody, TokenRequestBody, TokenResponse};
use crate::openapi::OAUTH_TAG;
use crate::registry::{GrantType, RegistryError};
use crate::state::AppState;
use crate::token::grant::GrantRejection;
use axum::{
    extract::{rejection::FormRejection, Form, State},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use http::{header, HeaderMap, StatusCode};
use log::{error, info, warn};
use std::time::Duration;

/// Client credentials presented with a token request.
struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

enum CredentialsError {
    /// An Authorization header was present but syntactically broken.
    Malformed(&'static str),
    /// No usable credentials anywhere in the request.
    Missing,
}

/// OAuth 2.0 Token endpoint (RFC 6749 Section 4.4)
///
/// Authenticates the client inline (HTTP Basic or body credentials, Basic
/// winning when both are present), validates the requested grant and scope,
/// and issues a signed bearer token.
#[utoipa::path(
    post,
    path = "/oauth2/token",
    tag = OAUTH_TAG,
    request_body(
        content = TokenRequestBody,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 200, description = "Access token issued successfully", body = TokenResponse),
        (status = 400, description = "Invalid request, grant type or scope", body = OAuthErrorBody),
        (status = 401, description = "Invalid client credentials", body = OAuthErrorBody),
        (status = 500, description = "Internal server error", body = OAuthErrorBody)
    )
)]
pub(crate) async fn token(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<TokenRequestBody>, FormRejection>,
) -> Response {
    let Form(body) = match form {
        Ok(form) => form,
        Err(rejection) => {
            warn!("malformed token request body: {rejection}");
            return error_response(
                StatusCode::BAD_REQUEST,
                OAuthErrorBody::invalid_request("request body must be form-encoded"),
            );
        }
    };

    let credentials = match extract_credentials(&headers, &body) {
        Ok(credentials) => credentials,
        Err(CredentialsError::Malformed(detail)) => {
            warn!("malformed client authentication: {detail}");
            return error_response(
                StatusCode::BAD_REQUEST,
                OAuthErrorBody::invalid_request(detail),
            );
        }
        Err(CredentialsError::Missing) => {
            warn!("token request without client credentials");
            return invalid_client_response();
        }
    };

    let grant_type = match body.grant_type.as_deref() {
        Some(grant_type) => grant_type,
        None => {
            return error_response(
                StatusCode::BAD_REQUEST,
                OAuthErrorBody::invalid_request("grant_type is required"),
            );
        }
    };
    info!(
        "token request from client_id: {} with grant_type: {}",
        credentials.client_id, grant_type
    );

    // Grant-type gate before anything else: a request for a grant this
    // server does not implement never reaches the client store, and the
    // grant-type error outranks any scope error.
    if grant_type != GrantType::ClientCredentials.as_str() {
        warn!(
            "unsupported grant type '{}' from client '{}'",
            grant_type, credentials.client_id
        );
        return error_response(
            StatusCode::BAD_REQUEST,
            OAuthErrorBody::unsupported_grant_type(),
        );
    }

    // Authenticate against the registry, bounded so a slow store fails the
    // request instead of hanging it.
    let lookup_timeout = Duration::from_millis(state.config.registry.lookup_timeout_ms);
    let authenticated = tokio::time::timeout(
        lookup_timeout,
        state
            .registry
            .authenticate(&credentials.client_id, &credentials.client_secret),
    )
    .await;
    let client = match authenticated {
        Ok(Ok(client)) => client,
        Ok(Err(RegistryError::InvalidCredentials)) => {
            warn!(
                "client authentication failed for client_id: {}",
                credentials.client_id
            );
            return invalid_client_response();
        }
        Ok(Err(e)) => {
            error!("client store failure: {e}");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                OAuthErrorBody::server_error(),
            );
        }
        Err(_) => {
            error!(
                "client store lookup timed out after {}ms",
                state.config.registry.lookup_timeout_ms
            );
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                OAuthErrorBody::server_error(),
            );
        }
    };

    let grant = match state
        .validator
        .validate(&client, grant_type, body.scope.as_deref())
    {
        Ok(grant) => grant,
        Err(GrantRejection::UnsupportedGrantType) => {
            warn!(
                "client '{}' is not registered for grant type '{}'",
                client.client_id, grant_type
            );
            return error_response(
                StatusCode::BAD_REQUEST,
                OAuthErrorBody::unsupported_grant_type(),
            );
        }
        Err(GrantRejection::InvalidScope) => {
            warn!(
                "scope '{}' not grantable to client '{}'",
                body.scope.as_deref().unwrap_or_default(),
                client.client_id
            );
            return error_response(StatusCode::BAD_REQUEST, OAuthErrorBody::invalid_scope());
        }
    };

    let issued = match state
        .issuer
        .issue(&grant.client, &grant.granted_scopes, Utc::now())
    {
        Ok(issued) => issued,
        Err(e) => {
            error!("token signing failed: {e}");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                OAuthErrorBody::server_error(),
            );
        }
    };

    info!(
        "issued access token to client '{}' with {} scopes",
        grant.client.client_id,
        issued.granted_scopes.len()
    );
    success_response(&issued)
}

/// Extract client credentials, preferring HTTP Basic over body parameters.
fn extract_credentials(
    headers: &HeaderMap,
    body: &TokenRequestBody,
) -> Result<ClientCredentials, CredentialsError> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| CredentialsError::Malformed("invalid Authorization header"))?;
        if value.len() >= 6 && value[..6].eq_ignore_ascii_case("basic ") {
            return parse_basic(value[6..].trim());
        }
        // A non-Basic scheme on the token endpoint is ignored; body
        // credentials may still authenticate the client.
    }

    match (&body.client_id, &body.client_secret) {
        (Some(client_id), Some(client_secret)) if !client_id.is_empty() => {
            Ok(ClientCredentials {
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
            })
        }
        _ => Err(CredentialsError::Missing),
    }
}

fn parse_basic(encoded: &str) -> Result<ClientCredentials, CredentialsError> {
    let decoded = BASE64
        .decode(encoded)
        .map_err(|_| CredentialsError::Malformed("invalid base64 in Basic credentials"))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| CredentialsError::Malformed("Basic credentials are not valid UTF-8"))?;
    let (client_id, client_secret) = decoded
        .split_once(':')
        .ok_or(CredentialsError::Malformed("Basic credentials must be id:secret"))?;
    if client_id.is_empty() {
        return Err(CredentialsError::Missing);
    }
    Ok(ClientCredentials {
        client_id: client_id.to_string(),
        client_secret: client_secret.to_string(),
    })
}

/// Helper function to create error responses
fn error_response(status: StatusCode, error: OAuthErrorBody) -> Response {
    (status, Json(error)).into_response()
}

/// 401 for failed client authentication, with the challenge header RFC 6749
/// requires when Basic authentication is in play.
fn invalid_client_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"authd\"")],
        Json(OAuthErrorBody::invalid_client()),
    )
        .into_response()
}
