//! Token endpoint request/response models

use crate::token::issuer::IssuedToken;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::header;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// OAuth 2.0 Token Request body (application/x-www-form-urlencoded)
///
/// All fields are optional at the parsing layer so that missing parameters
/// surface as protocol errors instead of generic rejections.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRequestBody {
    /// OAuth 2.0 grant type - must be "client_credentials"
    pub grant_type: Option<String>,
    /// Requested scopes (space-separated); empty means every scope the
    /// client is allowed
    pub scope: Option<String>,
    /// Client identifier (body authentication; HTTP Basic takes precedence)
    pub client_id: Option<String>,
    /// Client secret (body authentication; HTTP Basic takes precedence)
    pub client_secret: Option<String>,
}

/// OAuth 2.0 Token Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// The access token string
    pub access_token: String,
    /// Token type - always "Bearer"
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
    /// Granted scopes (space-separated)
    pub scope: String,
}

impl TokenResponse {
    /// Serialize an issued token into the protocol response shape.
    pub fn from_issued(token: &IssuedToken) -> Self {
        Self {
            access_token: token.value.clone(),
            token_type: "Bearer".to_string(),
            expires_in: token.expires_in(),
            scope: token.granted_scopes.join(" "),
        }
    }
}

/// Build the 200 response for an issued token.
///
/// Token responses must not be cached by intermediaries (RFC 6749 §5.1).
pub fn success_response(token: &IssuedToken) -> Response {
    (
        [
            (header::CACHE_CONTROL, "no-store"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(TokenResponse::from_issued(token)),
    )
        .into_response()
}

/// OAuth 2.0 Error Response
///
/// The error vocabulary is fixed and descriptions are static: nothing in a
/// response distinguishes an unknown client from a wrong secret, and no
/// store or signing detail ever leaks.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OAuthErrorBody {
    /// Error code
    pub error: String,
    /// Human-readable error description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl OAuthErrorBody {
    /// Create an invalid_request error
    pub fn invalid_request(description: &str) -> Self {
        Self {
            error: "invalid_request".to_string(),
            error_description: Some(description.to_string()),
        }
    }

    /// Create an invalid_client error
    pub fn invalid_client() -> Self {
        Self {
            error: "invalid_client".to_string(),
            error_description: Some("Client authentication failed".to_string()),
        }
    }

    /// Create an unsupported_grant_type error
    pub fn unsupported_grant_type() -> Self {
        Self {
            error: "unsupported_grant_type".to_string(),
            error_description: Some("Supported grant types: client_credentials".to_string()),
        }
    }

    /// Create an invalid_scope error
    pub fn invalid_scope() -> Self {
        Self {
            error: "invalid_scope".to_string(),
            error_description: Some(
                "The requested scope is not allowed for this client".to_string(),
            ),
        }
    }

    /// Create a server_error
    pub fn server_error() -> Self {
        Self {
            error: "server_error".to_string(),
            error_description: Some("Internal server error".to_string()),
        }
    }
}
