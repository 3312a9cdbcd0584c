use crate::api::endpoints::{classify, EndpointClass};
use crate::errors::ApiError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::Method;
use log::warn;

/// The verified identity behind a protected-resource request, inserted as a
/// request extension by the security middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedClient {
    pub client_id: String,
    pub scopes: Vec<String>,
    pub expires_at: i64,
}

/// Security boundary applied to every route.
///
/// Protocol endpoints pass through untouched: no bearer requirement and no
/// cross-site check, since the token endpoint authenticates the client
/// itself as part of the grant exchange. Protected resources are checked
/// for cross-site requests first, then must carry a valid bearer token;
/// either rejection happens before any handler logic runs.
pub(crate) async fn security_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match classify(request.uri().path()) {
        EndpointClass::Protocol => next.run(request).await,
        EndpointClass::Protected => {
            if let Err(rejection) = enforce_cross_site_policy(&state, &request) {
                return rejection;
            }
            match authenticate_bearer(&state, &request) {
                Ok(principal) => {
                    request.extensions_mut().insert(principal);
                    next.run(request).await
                }
                Err(rejection) => rejection,
            }
        }
    }
}

/// Reject state-changing requests that carry a foreign Origin header.
/// Applies only to protected resources; the classifier keeps protocol
/// endpoints out of here entirely.
fn enforce_cross_site_policy(state: &AppState, request: &Request<Body>) -> Result<(), Response> {
    match request.method() {
        &Method::POST | &Method::PUT | &Method::PATCH | &Method::DELETE => {}
        _ => return Ok(()),
    }

    let Some(origin) = request.headers().get(http::header::ORIGIN) else {
        return Ok(());
    };
    let origin = origin.to_str().unwrap_or("");
    if state
        .config
        .security
        .allowed_origins
        .iter()
        .any(|allowed| allowed == origin)
    {
        return Ok(());
    }

    warn!(
        "rejected cross-site {} to {} from origin '{}'",
        request.method(),
        request.uri().path(),
        origin
    );
    Err(ApiError::forbidden("cross-site request rejected").into_response())
}

/// Require a valid bearer token and resolve it to a principal.
fn authenticate_bearer(
    state: &AppState,
    request: &Request<Body>,
) -> Result<AuthenticatedClient, Response> {
    let header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            warn!("missing Authorization header for {}", request.uri().path());
            ApiError::unauthorized("missing bearer token").into_response()
        })?;

    let token = match header.to_str() {
        Ok(value) if value.len() > 7 && value[..7].eq_ignore_ascii_case("bearer ") => &value[7..],
        _ => {
            warn!("malformed Authorization header for {}", request.uri().path());
            return Err(ApiError::unauthorized("expected a bearer token").into_response());
        }
    };

    let claims = state.issuer.verify(token).map_err(|_| {
        warn!("invalid bearer token for {}", request.uri().path());
        ApiError::unauthorized("invalid or expired bearer token").into_response()
    })?;

    Ok(AuthenticatedClient {
        client_id: claims.sub.clone(),
        scopes: claims.scopes(),
        expires_at: claims.exp,
    })
}
