use crate::api::security::AuthenticatedClient;
use crate::openapi::RESOURCE_TAG;
use crate::state::AppState;
use axum::{routing::get, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The caller's own identity as established by its bearer token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WhoamiResponse {
    /// Authenticated client identifier
    pub client_id: String,
    /// Scopes granted to the presented token
    pub scopes: Vec<String>,
    /// Token expiry, seconds since the Unix epoch
    pub expires_at: i64,
}

/// Reference protected resource
///
/// Reflects the identity the security boundary established from the bearer
/// token. Reaching this handler at all proves the request was
/// authenticated.
#[utoipa::path(
    get,
    path = "/whoami",
    tag = RESOURCE_TAG,
    params(
        ("Authorization" = String, Header, description = "Bearer access token"),
    ),
    responses(
        (status = 200, description = "The authenticated principal", body = WhoamiResponse),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
pub(crate) async fn whoami(
    Extension(principal): Extension<AuthenticatedClient>,
) -> Json<WhoamiResponse> {
    Json(WhoamiResponse {
        client_id: principal.client_id,
        scopes: principal.scopes,
        expires_at: principal.expires_at,
    })
}

/// Creates the protected resource route
pub fn router() -> Router<AppState> {
    Router::new().route("/whoami", get(whoami))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestFixture;
    use http::StatusCode;

    #[tokio::test]
    async fn test_whoami_reflects_the_token() {
        let fixture = TestFixture::new().await;
        let token = fixture.issue_token(&["openid"]);

        let response = fixture.get_with_bearer("/whoami", &token).await;
        let body = response.assert_ok().json_as::<WhoamiResponse>();
        assert_eq!(body.client_id, "my-client");
        assert_eq!(body.scopes, vec!["openid"]);
        assert!(body.expires_at > 0);
    }

    #[tokio::test]
    async fn test_whoami_with_token_from_the_token_endpoint() {
        let fixture = TestFixture::new().await;

        let token_response = fixture
            .post_form(
                "/oauth2/token",
                &[("Authorization", &TestFixture::basic("my-client", "my-secret"))],
                &[("grant_type", "client_credentials")],
            )
            .await;
        let access_token = token_response.assert_ok().json["access_token"]
            .as_str()
            .expect("access_token present")
            .to_string();

        let body = fixture
            .get_with_bearer("/whoami", &access_token)
            .await
            .assert_ok()
            .json_as::<WhoamiResponse>();
        assert_eq!(body.client_id, "my-client");
        assert_eq!(body.scopes, vec!["openid"]);
    }

    #[tokio::test]
    async fn test_whoami_requires_authentication() {
        let fixture = TestFixture::new().await;
        let response = fixture.get("/whoami", &[]).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
