//! OAuth 2.0 token endpoint (RFC 6749 Section 4.4)
//!
//! Implements the Client Credentials grant for machine-to-machine callers:
//! the client authenticates inline with its registered credentials and
//! receives a signed, time-bounded bearer token. No other grant is
//! supported and no server-side token state is kept.

pub mod handlers;
pub mod models;

use crate::api::endpoints::TOKEN_PATH;
use crate::state::AppState;
use axum::{routing::post, Router};

/// Creates the token endpoint route
pub fn router() -> Router<AppState> {
    Router::new().route(TOKEN_PATH, post(handlers::token))
}
